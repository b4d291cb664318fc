//! Word list reinforcement training.
//!
//! Shuffles a list of common English words and fans it out over a fixed
//! worker pool. Each worker asks the engine for its current reply to a word
//! and trains (word, reply) only when the reply differs from the word, so
//! an engine that just echoes learns nothing new.

use std::path::Path;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::engine::{EngineError, ResponseEngine, TrainingPair};

/// Fixed pool size, matching the four training processes this always ran with.
pub const WORKERS: usize = 4;

/// Read a newline-delimited word list, skipping blanks and comments.
pub fn load_words(path: &Path) -> Result<Vec<String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read word list {:?}: {e}", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// One reinforcement step: train (word, reply) when the engine's reply
/// differs from the word. Returns whether a pair was emitted.
async fn train_word<E: ResponseEngine>(engine: &E, word: &str) -> Result<bool, EngineError> {
    let reply = engine.respond(word).await?;
    if reply == word {
        debug!("\"{}\" already maps to itself, skipping", word);
        return Ok(false);
    }

    match TrainingPair::new(word, &reply) {
        Some(pair) => {
            engine.train(&pair).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Shuffle the words and train them across the worker pool.
///
/// Returns the number of pairs emitted. Workers own disjoint slices; the
/// only shared state is the engine itself.
pub async fn run<E>(engine: Arc<E>, mut words: Vec<String>) -> Result<usize, String>
where
    E: ResponseEngine + 'static,
{
    words.shuffle(&mut rand::thread_rng());
    info!("Training {} words across {} workers", words.len(), WORKERS);

    let chunk_size = words.len().div_ceil(WORKERS).max(1);
    let mut handles = Vec::with_capacity(WORKERS);

    for chunk in words.chunks(chunk_size) {
        let engine = engine.clone();
        let chunk: Vec<String> = chunk.to_vec();
        handles.push(tokio::spawn(async move {
            let mut emitted = 0usize;
            for word in &chunk {
                match train_word(engine.as_ref(), word).await {
                    Ok(true) => emitted += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Training \"{}\" failed: {e}", word);
                        return Err(e.to_string());
                    }
                }
            }
            Ok(emitted)
        }));
    }

    let mut total = 0usize;
    for handle in handles {
        total += handle
            .await
            .map_err(|e| format!("Worker panicked: {e}"))??;
    }

    info!("Word list training done: {} pairs emitted", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::stub::StubEngine;
    use std::io::Write;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_echo_engine_emits_nothing() {
        let engine = Arc::new(StubEngine::echoing());
        let emitted = run(engine.clone(), words(&["the", "of", "and", "hello", "world"]))
            .await
            .unwrap();
        assert_eq!(emitted, 0);
        assert!(engine.trained_pairs().is_empty());
    }

    #[tokio::test]
    async fn test_fixed_engine_emits_one_pair_per_word() {
        let input = words(&["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"]);
        let engine = Arc::new(StubEngine::fixed("beep"));
        let emitted = run(engine.clone(), input.clone()).await.unwrap();

        assert_eq!(emitted, input.len());
        let mut trained: Vec<String> = engine
            .trained_pairs()
            .into_iter()
            .map(|(word, reply)| {
                assert_eq!(reply, "beep");
                word
            })
            .collect();
        trained.sort();
        let mut expected: Vec<String> = input;
        expected.sort();
        // Every word trained exactly once, regardless of scheduling order
        assert_eq!(trained, expected);
    }

    #[tokio::test]
    async fn test_word_matching_fixed_reply_is_skipped() {
        let engine = Arc::new(StubEngine::fixed("beep"));
        let emitted = run(engine.clone(), words(&["beep", "boop"])).await.unwrap();
        assert_eq!(emitted, 1);
        assert_eq!(engine.trained_pairs(), vec![("boop".to_string(), "beep".to_string())]);
    }

    #[tokio::test]
    async fn test_more_words_than_workers_are_partitioned() {
        let many: Vec<String> = (0..97).map(|i| format!("word{i}")).collect();
        let engine = Arc::new(StubEngine::fixed("x"));
        let emitted = run(engine.clone(), many).await.unwrap();
        assert_eq!(emitted, 97);
    }

    #[tokio::test]
    async fn test_empty_list_is_a_noop() {
        let engine = Arc::new(StubEngine::fixed("x"));
        assert_eq!(run(engine, Vec::new()).await.unwrap(), 0);
    }

    #[test]
    fn test_load_words_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the\n\n# common words\nof\n  and  ").unwrap();
        let words = load_words(file.path()).unwrap();
        assert_eq!(words, vec!["the", "of", "and"]);
    }
}
