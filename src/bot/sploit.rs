//! Bot-talks-to-bot on Reddit.
//!
//! Polls the newest comments in a subreddit, picks out ones whose author
//! looks like another bot, and answers them with the engine's reply.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::{ResponseEngine, TrainingPair};
use crate::reddit::{Comment, RedditClient};

const POLL_INTERVAL: Duration = Duration::from_secs(30);
const COMMENT_WINDOW: u32 = 50;

/// Heuristic for bot accounts: the conventional "*bot" suffix or an
/// auto-moderation handle.
pub fn is_bot_author(author: &str) -> bool {
    let lower = author.to_lowercase();
    lower.ends_with("bot") || lower == "automoderator"
}

/// Forget answered ids that have fallen out of the poll window; the
/// newest-comments listing can never return them again, so the set stays
/// bounded by the window size over an indefinite run.
fn prune_answered(answered: &mut HashSet<String>, window: &[Comment]) {
    answered.retain(|id| window.iter().any(|c| &c.id == id));
}

/// Run the poll loop indefinitely.
pub async fn run<E: ResponseEngine>(
    engine: &E,
    reddit: &RedditClient,
    subreddit: &str,
) -> Result<(), String> {
    info!("Sploit bot watching r/{} for other bots", subreddit);
    let mut answered: HashSet<String> = HashSet::new();

    loop {
        let comments = match reddit.new_comments(subreddit, COMMENT_WINDOW).await {
            Ok(comments) => comments,
            Err(e) => {
                warn!("Comment poll failed: {e}");
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
        };
        prune_answered(&mut answered, &comments);

        for comment in comments {
            if answered.contains(&comment.id) {
                continue;
            }
            let Some(author) = comment.author.as_deref() else {
                continue;
            };
            if !is_bot_author(author) || author == reddit.username {
                continue;
            }
            if comment.body.trim().is_empty() {
                continue;
            }

            info!("Bot sighting: {} said \"{}\"", author, comment.body);
            let reply = match engine.respond(&comment.body).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Engine error, skipping comment: {e}");
                    continue;
                }
            };

            reddit.reply(&comment.id, &reply).await?;
            answered.insert(comment.id.clone());

            if let Some(pair) = TrainingPair::new(&comment.body, &reply) {
                engine.train(&pair).await.map_err(|e| e.to_string())?;
            }
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_suffix_matches() {
        assert!(is_bot_author("RemindMeBot"));
        assert!(is_bot_author("totes_meta_bot"));
        assert!(is_bot_author("AutoModerator"));
    }

    #[test]
    fn test_humans_do_not_match() {
        assert!(!is_bot_author("alice"));
        assert!(!is_bot_author("bottomtext")); // "bot" prefix is not enough
        assert!(!is_bot_author("robotics_fan"));
    }

    #[test]
    fn test_answered_ids_are_pruned_to_the_window() {
        let window = vec![
            Comment {
                id: "new1".to_string(),
                author: Some("SomeBot".to_string()),
                body: "beep".to_string(),
                replies: Vec::new(),
            },
            Comment {
                id: "new2".to_string(),
                author: Some("alice".to_string()),
                body: "hello".to_string(),
                replies: Vec::new(),
            },
        ];

        let mut answered: HashSet<String> =
            ["new1".to_string(), "ancient".to_string()].into();
        prune_answered(&mut answered, &window);

        // Still-visible ids survive, ones that scrolled away are dropped
        assert!(answered.contains("new1"));
        assert!(!answered.contains("ancient"));
        assert_eq!(answered.len(), 1);
    }
}
