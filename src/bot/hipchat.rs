//! HipChat room bot.
//!
//! HipChat has no streaming endpoint on the v2 API, so this polls room
//! history on an interval and tracks the last message id it has answered.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::{ResponseEngine, TrainingPair};
use crate::hipchat::HipChatClient;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const HISTORY_WINDOW: u32 = 20;

/// Whether a fresh history item deserves a reply. Our own notifications
/// come back through history; each one matches a pending reply exactly
/// once and is consumed rather than answered.
fn should_answer(message: &str, pending_replies: &mut HashSet<String>) -> bool {
    if message.trim().is_empty() {
        return false;
    }
    !pending_replies.remove(message)
}

/// Run the poll loop indefinitely.
pub async fn run<E: ResponseEngine>(engine: &E, hipchat: &HipChatClient) -> Result<(), String> {
    info!("HipChat bot polling every {:?}", POLL_INTERVAL);

    // Skip the backlog: only answer messages that arrive after startup
    let mut last_seen: Option<String> = hipchat
        .latest(1)
        .await?
        .into_iter()
        .last()
        .map(|m| m.id);
    let mut pending_replies: HashSet<String> = HashSet::new();

    loop {
        tokio::time::sleep(POLL_INTERVAL).await;

        let items = match hipchat.latest(HISTORY_WINDOW).await {
            Ok(items) => items,
            Err(e) => {
                warn!("History poll failed: {e}");
                continue;
            }
        };

        // Take only what follows the last answered message
        let fresh: Vec<_> = match &last_seen {
            Some(id) => match items.iter().position(|m| &m.id == id) {
                Some(pos) => items.into_iter().skip(pos + 1).collect(),
                None => items,
            },
            None => items,
        };

        for msg in fresh {
            last_seen = Some(msg.id.clone());
            if !should_answer(&msg.message, &mut pending_replies) {
                continue;
            }

            info!("{}: \"{}\"", msg.from.name(), msg.message);
            let reply = match engine.respond(&msg.message).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Engine error, skipping message: {e}");
                    continue;
                }
            };

            hipchat.send(&reply).await?;
            pending_replies.insert(reply.clone());
            if let Some(pair) = TrainingPair::new(&msg.message, &reply) {
                engine.train(&pair).await.map_err(|e| e.to_string())?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pending_reply_is_skipped_once() {
        // Two humans answered in one poll window, both replies pending
        let mut pending: HashSet<String> =
            ["reply A".to_string(), "reply B".to_string()].into();

        // Next poll: both of our replies show up as fresh history items
        assert!(!should_answer("reply A", &mut pending));
        assert!(!should_answer("reply B", &mut pending));
        assert!(pending.is_empty());

        // A later human message with the same text is fair game again
        assert!(should_answer("reply A", &mut pending));
    }

    #[test]
    fn test_human_messages_are_answered() {
        let mut pending: HashSet<String> = ["reply A".to_string()].into();
        assert!(should_answer("how do I restart the build?", &mut pending));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_blank_messages_are_ignored() {
        let mut pending = HashSet::new();
        assert!(!should_answer("   ", &mut pending));
        assert!(!should_answer("", &mut pending));
    }
}
