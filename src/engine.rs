//! HTTP adapter for the external response engine service.
//!
//! The engine owns statement storage and best-match response selection;
//! this module only speaks its API. Everything sent through the adapter
//! passes the emoji-aware preprocessor first.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::preprocess::normalize;

/// An (input utterance, response utterance) pair fed to the engine.
///
/// Both sides are guaranteed non-empty: construction rejects pairs where
/// either side normalizes to an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    input: String,
    response: String,
}

impl TrainingPair {
    pub fn new(input: &str, response: &str) -> Option<Self> {
        let input = normalize(input);
        let response = normalize(response);
        if input.is_empty() || response.is_empty() {
            return None;
        }
        Some(Self { input, response })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// One statement from the engine's store, as returned by a dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug)]
pub enum EngineError {
    Http(String),
    Api(String),
    Parse(String),
    Empty,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Http(e) => write!(f, "HTTP error: {e}"),
            EngineError::Api(e) => write!(f, "engine API error: {e}"),
            EngineError::Parse(e) => write!(f, "parse error: {e}"),
            EngineError::Empty => write!(f, "empty engine response"),
        }
    }
}

impl std::error::Error for EngineError {}

/// The seam between trainers/bots and the engine service.
///
/// Trainers are generic over this so tests can substitute a stub.
pub trait ResponseEngine: Send + Sync {
    /// Current best reply to an input utterance.
    fn respond(&self, input: &str) -> impl Future<Output = Result<String, EngineError>> + Send;

    /// Reinforce a single training pair.
    fn train(&self, pair: &TrainingPair) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Train an ordered conversation: each statement responds to the previous.
    fn train_conversation(
        &self,
        statements: &[String],
    ) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Dump the statement store (for export).
    fn statements(&self) -> impl Future<Output = Result<Vec<Statement>, EngineError>> + Send;
}

#[derive(Serialize)]
struct RespondRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct RespondResponse {
    text: String,
}

#[derive(Serialize)]
struct TrainRequest<'a> {
    text: &'a str,
    in_response_to: &'a str,
}

#[derive(Serialize)]
struct ConversationRequest<'a> {
    statements: &'a [String],
}

#[derive(Deserialize)]
struct StatementsResponse {
    statements: Vec<Statement>,
}

/// reqwest client for the engine's HTTP API.
pub struct EngineClient {
    base_url: String,
    http: reqwest::Client,
}

impl EngineClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api(format!("{status}: {body}")));
        }
        Ok(response)
    }
}

impl ResponseEngine for EngineClient {
    async fn respond(&self, input: &str) -> Result<String, EngineError> {
        let text = normalize(input);
        if text.is_empty() {
            return Err(EngineError::Empty);
        }

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .json(&RespondRequest { text: &text })
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;

        let response = Self::check(response).await?;
        let body: RespondResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Parse(e.to_string()))?;

        if body.text.is_empty() {
            return Err(EngineError::Empty);
        }
        Ok(body.text)
    }

    async fn train(&self, pair: &TrainingPair) -> Result<(), EngineError> {
        let response = self
            .http
            .post(format!("{}/statements", self.base_url))
            .json(&TrainRequest {
                text: pair.response(),
                in_response_to: pair.input(),
            })
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn train_conversation(&self, statements: &[String]) -> Result<(), EngineError> {
        let statements: Vec<String> = statements
            .iter()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        if statements.len() < 2 {
            return Ok(());
        }

        let response = self
            .http
            .post(format!("{}/conversations", self.base_url))
            .json(&ConversationRequest {
                statements: &statements,
            })
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn statements(&self) -> Result<Vec<Statement>, EngineError> {
        let response = self
            .http
            .get(format!("{}/statements", self.base_url))
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;

        let response = Self::check(response).await?;
        let body: StatementsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Parse(e.to_string()))?;
        Ok(body.statements)
    }
}
