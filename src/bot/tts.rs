//! Text-to-speech for the voice bot.
//!
//! Talks to a local TTS HTTP server (Kokoro-FastAPI style `/v1/tts`
//! endpoint returning WAV) and plays the result through ffplay.

use std::process::Command;

use tracing::{debug, info};

/// TTS client bound to a local synthesis server.
pub struct TtsClient {
    endpoint: String,
    http: reqwest::Client,
}

impl TtsClient {
    /// `endpoint` is the server base URL, e.g. "http://localhost:8880".
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Synthesize text to WAV audio.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String> {
        let preview: String = text.chars().take(50).collect();
        info!("Speaking: \"{}\"", preview);

        let response = self
            .http
            .post(format!("{}/v1/tts", self.endpoint))
            .json(&serde_json::json!({ "text": text, "format": "wav" }))
            .send()
            .await
            .map_err(|e| format!("TTS request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("TTS error {status}: {body}"));
        }

        let wav = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read TTS response: {e}"))?;
        debug!("Got {} bytes of WAV audio", wav.len());
        Ok(wav.to_vec())
    }
}

/// Play WAV audio through the default output device.
pub fn play(wav: &[u8]) -> Result<(), String> {
    let path = std::env::temp_dir().join(format!("edward_tts_{}.wav", std::process::id()));
    std::fs::write(&path, wav).map_err(|e| format!("Failed to write temp WAV: {e}"))?;

    let result = Command::new("ffplay")
        .args(["-autoexit", "-nodisp", "-loglevel", "quiet", path.to_str().unwrap()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map_err(|e| format!("Failed to run ffplay: {e}"));

    let _ = std::fs::remove_file(&path);
    let status = result?;

    if !status.success() {
        return Err(format!("ffplay exited with {status}"));
    }
    Ok(())
}
