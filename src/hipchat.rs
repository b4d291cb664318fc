//! HipChat v2 API client.
//!
//! History polling plus room messages. The upstream project never got this
//! transport working; this client is a plain poll/send pair.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::HipChatCredentials;

/// A message from room history.
#[derive(Debug, Clone, Deserialize)]
pub struct HipChatMessage {
    pub id: String,
    pub message: String,
    pub from: Sender,
}

/// The sender is a user object for people, a bare string for system notices.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Sender {
    User { name: String },
    System(String),
}

impl Sender {
    pub fn name(&self) -> &str {
        match self {
            Sender::User { name } => name,
            Sender::System(name) => name,
        }
    }
}

#[derive(Deserialize)]
struct HistoryResponse {
    items: Vec<HipChatMessage>,
}

/// Client bound to one HipChat room.
pub struct HipChatClient {
    http: reqwest::Client,
    host: String,
    room: String,
    token: String,
}

impl HipChatClient {
    pub fn new(creds: &HipChatCredentials) -> Self {
        info!("HipChat room {} on {}", creds.room, creds.host);
        Self {
            http: reqwest::Client::new(),
            host: creds.host.trim_end_matches('/').to_string(),
            room: creds.room.clone(),
            token: creds.access_token.clone(),
        }
    }

    /// Fetch the most recent room messages, oldest first.
    pub async fn latest(&self, max_results: u32) -> Result<Vec<HipChatMessage>, String> {
        let url = format!(
            "{}/v2/room/{}/history/latest?max-results={max_results}",
            self.host,
            urlencoding::encode(&self.room)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| format!("HipChat history failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HipChat API error {status}: {body}"));
        }

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse history: {e}"))?;

        debug!("Fetched {} history items", body.items.len());
        Ok(body.items)
    }

    /// Send a message to the room.
    pub async fn send(&self, text: &str) -> Result<(), String> {
        let url = format!(
            "{}/v2/room/{}/message",
            self.host,
            urlencoding::encode(&self.room)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await
            .map_err(|e| format!("HipChat send failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("HipChat API error {}", response.status()));
        }
        Ok(())
    }
}
