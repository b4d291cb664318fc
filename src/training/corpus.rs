//! English corpus training from JSON conversation files.
//!
//! A corpus directory holds `.json` files shaped like
//! `{"conversations": [["Hi", "Hello"], ...]}`; each conversation with at
//! least two statements is trained as an ordered chain. Starter files ship
//! under `corpus/english/`.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::engine::ResponseEngine;

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    #[allow(dead_code)]
    categories: Vec<String>,
    conversations: Vec<Vec<String>>,
}

/// Load every conversation from the `.json` files in `dir`, in file-name order.
pub fn load_corpus(dir: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read corpus directory {:?}: {e}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(format!("No corpus files found in {:?}", dir));
    }

    let mut conversations = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {:?}: {e}", path))?;
        let file: CorpusFile = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {e}", path))?;
        debug!("{:?}: {} conversations", path.file_name(), file.conversations.len());
        conversations.extend(file.conversations);
    }

    Ok(conversations)
}

/// Train every conversation in the corpus directory.
/// Returns the number of conversations trained.
pub async fn run<E: ResponseEngine>(engine: &E, dir: &Path) -> Result<usize, String> {
    let conversations = load_corpus(dir)?;
    info!("Teaching bot {} conversations from {:?}", conversations.len(), dir);

    let mut trained = 0usize;
    for conversation in &conversations {
        if conversation.len() < 2 {
            continue;
        }
        engine
            .train_conversation(conversation)
            .await
            .map_err(|e| e.to_string())?;
        trained += 1;
    }

    info!("Corpus training done: {} conversations", trained);
    Ok(trained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::stub::StubEngine;

    fn write_corpus(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_trains_conversations_from_files() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(
            dir.path(),
            "greetings.json",
            r#"{"categories": ["greetings"], "conversations": [["Hi", "Hello"], ["How are you?", "Good, you?", "Also good."]]}"#,
        );

        let engine = StubEngine::echoing();
        let trained = run(&engine, dir.path()).await.unwrap();
        assert_eq!(trained, 2);

        let conversations = engine.conversations.lock().unwrap().clone();
        assert_eq!(conversations[0], vec!["Hi", "Hello"]);
        assert_eq!(conversations[1].len(), 3);
    }

    #[tokio::test]
    async fn test_single_statement_conversations_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(
            dir.path(),
            "thin.json",
            r#"{"conversations": [["just one line"], ["a", "b"]]}"#,
        );

        let engine = StubEngine::echoing();
        assert_eq!(run(&engine, dir.path()).await.unwrap(), 1);
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_corpus(dir.path()).is_err());
    }

    #[test]
    fn test_non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), "notes.txt", "not a corpus");
        write_corpus(dir.path(), "real.json", r#"{"conversations": [["a", "b"]]}"#);
        assert_eq!(load_corpus(dir.path()).unwrap().len(), 1);
    }
}
