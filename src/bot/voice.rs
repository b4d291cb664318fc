//! Local voice bot: microphone in, speaker out.
//!
//! Each turn records a few seconds from the default microphone (ffmpeg
//! ALSA capture), transcribes it with Whisper, asks the engine for a
//! reply, and speaks the reply through the TTS server.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{info, warn};

use crate::bot::stt::Transcriber;
use crate::bot::tts::{self, TtsClient};
use crate::engine::{ResponseEngine, TrainingPair};

/// Seconds of audio captured per turn.
const RECORD_SECONDS: u32 = 5;

/// Record from the default microphone into WAV bytes.
fn record() -> Result<Vec<u8>, String> {
    let path = std::env::temp_dir().join(format!("edward_rec_{}.wav", std::process::id()));

    let result = Command::new("ffmpeg")
        .args([
            "-f",
            "alsa",
            "-i",
            "default",
            "-t",
            &RECORD_SECONDS.to_string(),
            "-ar",
            "16000",
            "-ac",
            "1",
            "-y",
            path.to_str().unwrap(),
        ])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .output()
        .map_err(|e| format!("Failed to run ffmpeg: {e}"));

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let _ = std::fs::remove_file(&path);
        return Err(format!("Microphone capture failed: {stderr}"));
    }

    let wav = std::fs::read(&path).map_err(|e| format!("Failed to read recording: {e}"));
    let _ = std::fs::remove_file(&path);
    wav
}

/// Run the listen/reply loop indefinitely (ctrl-c to stop).
pub async fn run<E: ResponseEngine>(
    engine: &E,
    model_path: &Path,
    tts_endpoint: &str,
) -> Result<(), String> {
    let transcriber = Transcriber::new(model_path)?;
    let tts = TtsClient::new(tts_endpoint.to_string());
    info!("Voice bot ready, listening in {}s turns", RECORD_SECONDS);

    loop {
        let audio = match record() {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Recording failed: {e}");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let heard = transcriber.transcribe(&audio)?;
        if heard.is_empty() {
            continue;
        }

        let reply = match engine.respond(&heard).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Engine error: {e}");
                continue;
            }
        };
        info!("Reply: \"{}\"", reply);

        match tts.synthesize(&reply).await {
            Ok(wav) => {
                if let Err(e) = tts::play(&wav) {
                    warn!("Playback failed: {e}");
                }
            }
            Err(e) => warn!("Synthesis failed: {e}"),
        }

        if let Some(pair) = TrainingPair::new(&heard, &reply) {
            engine.train(&pair).await.map_err(|e| e.to_string())?;
        }
    }
}
