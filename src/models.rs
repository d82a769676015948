// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest `question_text` the `polls_question` table accepts.
pub const QUESTION_TEXT_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

/// Insert payload, also the shape of one entry in a fixture file.
///
/// With an `id` the row is saved under that key, replacing any existing one.
/// Without, the store picks the next free id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    #[serde(default)]
    pub id: Option<i64>,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl NewQuestion {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            question_text: question_text.into(),
            pub_date,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
