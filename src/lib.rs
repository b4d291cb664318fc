//! edward: a personal chat-bot orchestrator.
//!
//! Wires an externally-run conversational response engine to chat transports
//! (Reddit, Twitter, Gitter, HipChat, local voice) and feeds it training
//! corpora. All response generation and statement storage live in the engine
//! service; this crate supplies credentials, fetch loops, filters, and CLI
//! plumbing.

pub mod bot;
pub mod config;
pub mod engine;
pub mod gitter;
pub mod hipchat;
pub mod preprocess;
pub mod reddit;
pub mod training;
pub mod twitter;
