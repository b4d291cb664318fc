//! Gitter API client.
//!
//! REST for room lookup and sending; the streaming endpoint delivers one
//! JSON message per line with whitespace heartbeats in between, so the
//! stream reader buffers chunks and splits on newlines.

use serde::Deserialize;
use tracing::{debug, info};

const API_BASE: &str = "https://api.gitter.im/v1";
const STREAM_BASE: &str = "https://stream.gitter.im/v1";

/// A chat message in a Gitter room.
#[derive(Debug, Clone, Deserialize)]
pub struct GitterMessage {
    pub id: String,
    pub text: String,
    #[serde(rename = "fromUser")]
    pub from_user: GitterUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitterUser {
    pub id: String,
    pub username: String,
}

#[derive(Deserialize)]
struct Room {
    id: String,
    name: String,
}

/// Authenticated Gitter client bound to one room.
pub struct GitterClient {
    http: reqwest::Client,
    token: String,
    room_id: String,
}

impl GitterClient {
    /// Resolve the room URI (e.g. "jahrik/edward") and join it.
    pub async fn join(room_uri: &str, token: &str) -> Result<Self, String> {
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{API_BASE}/rooms"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "uri": room_uri }))
            .send()
            .await
            .map_err(|e| format!("Gitter room lookup failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Gitter API error {status}: {body}"));
        }

        let room: Room = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse room: {e}"))?;

        info!("Joined Gitter room {} ({})", room.name, room.id);
        Ok(Self {
            http,
            token: token.to_string(),
            room_id: room.id,
        })
    }

    /// The authenticated user (to skip the bot's own messages).
    pub async fn current_user(&self) -> Result<GitterUser, String> {
        let response = self
            .http
            .get(format!("{API_BASE}/user"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| format!("Gitter user lookup failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Gitter API error {}", response.status()));
        }

        let users: Vec<GitterUser> = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse user: {e}"))?;
        users.into_iter().next().ok_or_else(|| "No authenticated user".to_string())
    }

    /// Send a message to the room.
    pub async fn send(&self, text: &str) -> Result<(), String> {
        let response = self
            .http
            .post(format!("{API_BASE}/rooms/{}/chatMessages", self.room_id))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| format!("Gitter send failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Gitter API error {}", response.status()));
        }
        Ok(())
    }

    /// Open the room's message stream.
    pub async fn stream(&self) -> Result<GitterStream, String> {
        let response = self
            .http
            .get(format!("{STREAM_BASE}/rooms/{}/chatMessages", self.room_id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| format!("Gitter stream failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Gitter stream error {}", response.status()));
        }

        info!("Streaming messages from room {}", self.room_id);
        Ok(GitterStream {
            response,
            buffer: Vec::new(),
        })
    }
}

/// Line-buffered reader over the streaming response.
///
/// Buffers raw bytes: network chunks can split a multi-byte UTF-8
/// character, so decoding happens per complete line, never per chunk.
pub struct GitterStream {
    response: reqwest::Response,
    buffer: Vec<u8>,
}

/// Pop the next complete line from the buffer, trimmed.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    let pos = buffer.iter().position(|&b| b == b'\n')?;
    let line: Vec<u8> = buffer.drain(..=pos).collect();
    Some(String::from_utf8_lossy(&line).trim().to_string())
}

impl GitterStream {
    /// Next message from the stream. Returns None when the stream closes.
    pub async fn next_message(&mut self) -> Result<Option<GitterMessage>, String> {
        loop {
            if let Some(line) = take_line(&mut self.buffer) {
                // Heartbeats are bare whitespace lines
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<GitterMessage>(&line) {
                    Ok(msg) => return Ok(Some(msg)),
                    Err(e) => {
                        debug!("Skipping unparseable stream line: {e}");
                        continue;
                    }
                }
            }

            match self
                .response
                .chunk()
                .await
                .map_err(|e| format!("Gitter stream read failed: {e}"))?
            {
                Some(bytes) => self.buffer.extend_from_slice(&bytes),
                None => return Ok(None),
            }
        }
    }
}
