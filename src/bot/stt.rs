//! Speech-to-text for the voice bot, backed by whisper-rs.
//!
//! Accepts whatever container the recorder produced (WAV from the local
//! microphone capture); ffmpeg converts it to the 16 kHz mono f32 PCM that
//! Whisper expects.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper transcription engine.
pub struct Transcriber {
    ctx: WhisperContext,
}

impl Transcriber {
    /// Load a Whisper model from a ggml `.bin` file.
    pub fn new(model_path: &Path) -> Result<Self, String> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found: {:?}", model_path));
        }

        info!("Loading Whisper model from {:?}", model_path);
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        Ok(Self { ctx })
    }

    /// Transcribe recorded audio to text.
    pub fn transcribe(&self, audio: &[u8]) -> Result<String, String> {
        let pcm = to_pcm(audio)?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_translate(false);
        params.set_no_timestamps(true);

        state
            .full(params, &pcm)
            .map_err(|e| format!("Transcription failed: {e}"))?;

        let mut text = String::new();
        for segment in state.as_iter() {
            if let Ok(s) = segment.to_str() {
                text.push_str(s);
                text.push(' ');
            }
        }

        let text = text.trim().to_string();
        let preview: String = text.chars().take(100).collect();
        info!("Heard: \"{}\"", preview);
        Ok(text)
    }
}

/// Convert recorded audio to 16 kHz mono f32 PCM via ffmpeg.
fn to_pcm(audio: &[u8]) -> Result<Vec<f32>, String> {
    let input_path = std::env::temp_dir().join(format!("edward_stt_{}.audio", std::process::id()));
    std::fs::write(&input_path, audio).map_err(|e| format!("Failed to write temp audio: {e}"))?;

    let output = Command::new("ffmpeg")
        .args([
            "-i",
            input_path.to_str().unwrap(),
            "-ar",
            "16000",
            "-ac",
            "1",
            "-f",
            "s16le",
            "-acodec",
            "pcm_s16le",
            "-y",
            "pipe:1",
        ])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .output()
        .map_err(|e| format!("Failed to run ffmpeg: {e}"));

    let _ = std::fs::remove_file(&input_path);
    let output = output?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("ffmpeg failed: {stderr}"));
    }

    let samples: Vec<f32> = output
        .stdout
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32 / 32768.0)
        .collect();

    debug!("Converted to {} PCM samples", samples.len());
    Ok(samples)
}
