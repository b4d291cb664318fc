//! Corpus trainers. Each routine produces training pairs (or ordered
//! conversations) from one data source and feeds them to the engine.

pub mod corpus;
pub mod reddit;
pub mod twitter;
pub mod ubuntu;
pub mod word_list;

/// Stub engines shared by the trainer unit tests.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Mutex;

    use crate::engine::{EngineError, ResponseEngine, Statement, TrainingPair};

    /// Replies with a fixed string (or echoes the input when `reply` is None)
    /// and records every trained pair.
    pub struct StubEngine {
        reply: Option<String>,
        pub trained: Mutex<Vec<(String, String)>>,
        pub conversations: Mutex<Vec<Vec<String>>>,
    }

    impl StubEngine {
        pub fn echoing() -> Self {
            Self {
                reply: None,
                trained: Mutex::new(Vec::new()),
                conversations: Mutex::new(Vec::new()),
            }
        }

        pub fn fixed(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                trained: Mutex::new(Vec::new()),
                conversations: Mutex::new(Vec::new()),
            }
        }

        pub fn trained_pairs(&self) -> Vec<(String, String)> {
            self.trained.lock().unwrap().clone()
        }
    }

    impl ResponseEngine for StubEngine {
        async fn respond(&self, input: &str) -> Result<String, EngineError> {
            Ok(self.reply.clone().unwrap_or_else(|| input.to_string()))
        }

        async fn train(&self, pair: &TrainingPair) -> Result<(), EngineError> {
            self.trained
                .lock()
                .unwrap()
                .push((pair.input().to_string(), pair.response().to_string()));
            Ok(())
        }

        async fn train_conversation(&self, statements: &[String]) -> Result<(), EngineError> {
            self.conversations.lock().unwrap().push(statements.to_vec());
            Ok(())
        }

        async fn statements(&self) -> Result<Vec<Statement>, EngineError> {
            Ok(self
                .trained_pairs()
                .into_iter()
                .map(|(input, response)| Statement {
                    text: response,
                    in_response_to: Some(input),
                    created_at: None,
                })
                .collect())
        }
    }
}
