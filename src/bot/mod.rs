//! Transport bots. Each is a loop: read a message from its chat surface,
//! ask the engine for a reply, write the reply back, and train the exchange.

pub mod feedback;
pub mod gitter;
pub mod hipchat;
pub mod sploit;
pub mod stt;
pub mod tts;
pub mod voice;
