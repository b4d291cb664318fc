//! Gitter room bot.
//!
//! Streams room messages, replies to everything that isn't the bot's own,
//! and trains each exchange so the engine's store reflects the room.

use tracing::{info, warn};

use crate::engine::{ResponseEngine, TrainingPair};
use crate::gitter::GitterClient;

/// Run the bot until the stream closes.
pub async fn run<E: ResponseEngine>(engine: &E, gitter: &GitterClient) -> Result<(), String> {
    let me = gitter.current_user().await?;
    info!("Gitter bot running as @{}", me.username);

    let mut stream = gitter.stream().await?;
    while let Some(msg) = stream.next_message().await? {
        if msg.from_user.id == me.id {
            continue;
        }
        if msg.text.trim().is_empty() {
            continue;
        }

        info!("@{}: \"{}\"", msg.from_user.username, msg.text);
        let reply = match engine.respond(&msg.text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Engine error, skipping message: {e}");
                continue;
            }
        };

        gitter.send(&reply).await?;
        if let Some(pair) = TrainingPair::new(&msg.text, &reply) {
            engine.train(&pair).await.map_err(|e| e.to_string())?;
        }
    }

    info!("Gitter stream closed");
    Ok(())
}
