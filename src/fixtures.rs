// src/fixtures.rs
//! Seeding the store from a JSON file of questions at startup.
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::{NewQuestion, QUESTION_TEXT_MAX_LEN};
use crate::store::QuestionStore;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed fixture file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Question {index} is {len} characters long, the limit is {max}", max = QUESTION_TEXT_MAX_LEN)]
    TextTooLong { index: usize, len: usize },

    #[error("Failed to insert question: {0}")]
    Insert(#[from] sqlx::Error),
}

pub fn parse(json: &str, path: &str) -> Result<Vec<NewQuestion>, FixtureError> {
    let questions: Vec<NewQuestion> =
        serde_json::from_str(json).map_err(|source| FixtureError::Parse {
            path: path.to_string(),
            source,
        })?;

    for (index, question) in questions.iter().enumerate() {
        let len = question.question_text.chars().count();
        if len > QUESTION_TEXT_MAX_LEN {
            return Err(FixtureError::TextTooLong { index, len });
        }
    }

    Ok(questions)
}

/// Saves every question in the file in one transaction, returning how many
/// were loaded. Entries with an `id` replace that row, so reloading the same
/// file on every startup leaves the store unchanged.
pub async fn load(store: &dyn QuestionStore, path: &Path) -> Result<usize, FixtureError> {
    let shown = path.display().to_string();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Read {
            path: shown.clone(),
            source,
        })?;

    let questions = parse(&json, &shown)?;
    let count = store.insert_all(questions).await?.len();

    info!("Loaded {count} questions from {shown}");
    Ok(count)
}
