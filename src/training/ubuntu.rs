//! Ubuntu Dialogue Corpus training.
//!
//! Works on an already-extracted corpus: a directory tree of `.tsv` dialog
//! files, one utterance per line with the text in the fourth tab column
//! (timestamp, from, to, text). Each dialog with at least two utterances is
//! trained as a conversation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::engine::ResponseEngine;
use crate::preprocess::normalize;

/// Parse one dialog file's contents into its ordered utterances.
pub fn parse_dialog(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.split('\t').nth(3))
        .map(normalize)
        .filter(|text| !text.is_empty())
        .collect()
}

fn collect_tsv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), String> {
    for entry in std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read corpus directory {:?}: {e}", dir))?
    {
        let path = entry.map_err(|e| format!("Directory walk failed: {e}"))?.path();
        if path.is_dir() {
            collect_tsv_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "tsv") {
            out.push(path);
        }
    }
    Ok(())
}

/// Train every dialog under the extracted corpus directory.
/// Returns the number of dialogs trained.
pub async fn run<E: ResponseEngine>(engine: &E, dir: &Path) -> Result<usize, String> {
    let mut files = Vec::new();
    collect_tsv_files(dir, &mut files)?;
    files.sort();

    if files.is_empty() {
        return Err(format!(
            "No .tsv dialogs found under {:?} (extract the Ubuntu corpus there first)",
            dir
        ));
    }
    info!("Training {} Ubuntu dialogs from {:?}", files.len(), dir);

    let mut trained = 0usize;
    for path in &files {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Skipping unreadable dialog {:?}: {e}", path);
                continue;
            }
        };

        let utterances = parse_dialog(&content);
        if utterances.len() < 2 {
            debug!("Dialog {:?} too short, skipping", path.file_name());
            continue;
        }

        engine
            .train_conversation(&utterances)
            .await
            .map_err(|e| e.to_string())?;
        trained += 1;
    }

    info!("Ubuntu training done: {} dialogs", trained);
    Ok(trained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::stub::StubEngine;

    const DIALOG: &str = "2012-01-01T00:00:00Z\talice\t\tmy wifi driver broke after the update\n\
                          2012-01-01T00:01:00Z\tbob\talice\twhich kernel are you on?\n\
                          2012-01-01T00:02:00Z\talice\tbob\t3.2, the one from precise\n";

    #[test]
    fn test_parse_dialog_extracts_text_column() {
        let utterances = parse_dialog(DIALOG);
        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[1], "which kernel are you on?");
    }

    #[test]
    fn test_parse_dialog_skips_empty_text() {
        let content = "ts\talice\t\t\nts\tbob\talice\thello\n";
        assert_eq!(parse_dialog(content), vec!["hello"]);
    }

    #[test]
    fn test_parse_dialog_ignores_malformed_lines() {
        let content = "no tabs here\nts\tbob\talice\tstill parsed\n";
        assert_eq!(parse_dialog(content), vec!["still parsed"]);
    }

    #[tokio::test]
    async fn test_trains_dialogs_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("dialogs").join("3");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("1.tsv"), DIALOG).unwrap();
        std::fs::write(nested.join("2.tsv"), "ts\ta\t\tonly one line\n").unwrap();

        let engine = StubEngine::echoing();
        let trained = run(&engine, dir.path()).await.unwrap();
        // The one-utterance dialog is skipped
        assert_eq!(trained, 1);
        assert_eq!(engine.conversations.lock().unwrap()[0].len(), 3);
    }

    #[tokio::test]
    async fn test_missing_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StubEngine::echoing();
        assert!(run(&engine, dir.path()).await.is_err());
    }
}
