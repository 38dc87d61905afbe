//! Question sources.
//!
//! A source hands back the ordered problem statements for one category.
//! Retrieval is one-shot and read-only; the session caches the result.
//!
//! File format (JSON object keyed by category):
//!
//! ```text
//! { "combinatorics": ["How many ...?", "In how many ways ...?"] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::config::Config;

type QuestionBank = BTreeMap<String, Vec<String>>;

/// Read-only supplier of problem statements.
pub trait QuestionSource: Send + Sync {
    /// Returns the problems for `category`, in source order.
    ///
    /// Blank entries are dropped. An unknown category is an error; a known
    /// category with no problems returns an empty list.
    fn fetch(&self, category: &str) -> Result<Vec<String>>;

    /// Short human-readable description for logs and CLI output.
    fn describe(&self) -> String;
}

/// Problems bundled with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinQuestions;

impl BuiltinQuestions {
    fn bank() -> Result<QuestionBank> {
        serde_json::from_str(include_str!("../questions.json"))
            .context("Failed to parse built-in questions")
    }
}

impl QuestionSource for BuiltinQuestions {
    fn fetch(&self, category: &str) -> Result<Vec<String>> {
        select_category(Self::bank()?, category)
    }

    fn describe(&self) -> String {
        "built-in questions".to_string()
    }
}

/// Problems loaded from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileQuestions {
    path: PathBuf,
}

impl FileQuestions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for FileQuestions {
    fn fetch(&self, category: &str) -> Result<Vec<String>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read questions from {}", self.path.display()))?;
        let bank: QuestionBank = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse questions from {}", self.path.display()))?;
        select_category(bank, category)
    }

    fn describe(&self) -> String {
        format!("questions file {}", self.path.display())
    }
}

/// Picks the source configured by `questions_file`, falling back to the
/// built-in problems.
pub fn source_for(config: &Config) -> Arc<dyn QuestionSource> {
    match config.questions_path() {
        Some(path) => Arc::new(FileQuestions::new(path)),
        None => Arc::new(BuiltinQuestions),
    }
}

fn select_category(mut bank: QuestionBank, category: &str) -> Result<Vec<String>> {
    let questions = bank.remove(category).ok_or_else(|| {
        let known: Vec<&str> = bank.keys().map(String::as_str).collect();
        if known.is_empty() {
            anyhow!("Unknown question category '{category}'")
        } else {
            anyhow!(
                "Unknown question category '{category}' (available: {})",
                known.join(", ")
            )
        }
    })?;

    Ok(questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_builtin_combinatorics_is_populated() {
        let questions = BuiltinQuestions.fetch("combinatorics").unwrap();
        assert!(questions.len() >= 5);
        assert!(questions.iter().all(|q| !q.trim().is_empty()));
    }

    #[test]
    fn test_unknown_category_lists_available() {
        let err = BuiltinQuestions.fetch("geometry").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("geometry"));
        assert!(message.contains("combinatorics"));
    }

    #[test]
    fn test_file_source_drops_blank_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(
            &path,
            r#"{ "combinatorics": ["  How many ways?  ", "", "   "], "other": ["x"] }"#,
        )
        .unwrap();

        let questions = FileQuestions::new(&path).fetch("combinatorics").unwrap();
        assert_eq!(questions, vec!["How many ways?".to_string()]);
    }

    #[test]
    fn test_file_source_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let source = FileQuestions::new(dir.path().join("missing.json"));
        let err = source.fetch("combinatorics").unwrap_err();
        assert!(err.to_string().contains("Failed to read questions"));
    }

    #[test]
    fn test_source_for_prefers_configured_file() {
        let config = Config {
            questions_file: Some("/tmp/custom.json".to_string()),
            ..Config::default()
        };
        assert!(source_for(&config).describe().contains("custom.json"));
        assert_eq!(
            source_for(&Config::default()).describe(),
            "built-in questions"
        );
    }
}
