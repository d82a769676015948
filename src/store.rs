// src/store.rs
//! Question persistence.
//!
//! Handlers only see the [`QuestionStore`] trait. Production runs on
//! [`PgQuestionStore`]; [`MemoryQuestionStore`] backs the service when no
//! database is configured and is what the tests drive.
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tokio::sync::RwLock;

use crate::models::{NewQuestion, Question};

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// At most `limit` questions, newest `pub_date` first. Ties go to the
    /// higher id.
    async fn latest(&self, limit: i64) -> Result<Vec<Question>, sqlx::Error>;

    async fn get(&self, id: i64) -> Result<Option<Question>, sqlx::Error>;

    /// Saves one question. An explicit id overwrites the row with that id.
    async fn insert(&self, question: NewQuestion) -> Result<Question, sqlx::Error>;

    /// Saves every question, all or nothing. Saving the same keyed batch
    /// twice leaves the store as after the first.
    async fn insert_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, sqlx::Error>;
}

pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn save(conn: &mut PgConnection, question: NewQuestion) -> Result<Question, sqlx::Error> {
    let Some(id) = question.id else {
        return sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO polls_question (question_text, pub_date)
            VALUES ($1, $2)
            RETURNING id, question_text, pub_date
            "#,
        )
        .bind(question.question_text)
        .bind(question.pub_date)
        .fetch_one(conn)
        .await;
    };

    let saved = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO polls_question (id, question_text, pub_date)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET question_text = EXCLUDED.question_text,
            pub_date = EXCLUDED.pub_date
        RETURNING id, question_text, pub_date
        "#,
    )
    .bind(id)
    .bind(question.question_text)
    .bind(question.pub_date)
    .fetch_one(&mut *conn)
    .await?;

    // Explicit ids bypass the sequence; move it past them.
    sqlx::query(
        r#"
        SELECT setval(
            pg_get_serial_sequence('polls_question', 'id'),
            COALESCE((SELECT MAX(id) FROM polls_question), 0) + 1,
            false
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(saved)
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn latest(&self, limit: i64) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text, pub_date
            FROM polls_question
            ORDER BY pub_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM polls_question WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert(&self, question: NewQuestion) -> Result<Question, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        save(&mut conn, question).await
    }

    async fn insert_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(questions.len());
        for question in questions {
            saved.push(save(&mut tx, question).await?);
        }
        tx.commit().await?;

        Ok(saved)
    }
}

#[derive(Default)]
struct Rows {
    questions: Vec<Question>,
    last_id: i64,
}

impl Rows {
    fn save(&mut self, question: NewQuestion) -> Question {
        // Ids start at 1, like a BIGSERIAL column.
        let id = question.id.unwrap_or(self.last_id + 1);
        self.last_id = self.last_id.max(id);

        let saved = Question {
            id,
            question_text: question.question_text,
            pub_date: question.pub_date,
        };
        match self.questions.iter_mut().find(|q| q.id == id) {
            Some(existing) => *existing = saved.clone(),
            None => self.questions.push(saved.clone()),
        }

        saved
    }
}

#[derive(Default)]
pub struct MemoryQuestionStore {
    rows: RwLock<Rows>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.questions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.questions.is_empty()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn latest(&self, limit: i64) -> Result<Vec<Question>, sqlx::Error> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut questions = self.rows.read().await.questions.clone();

        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        questions.truncate(limit);

        Ok(questions)
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(rows.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn insert(&self, question: NewQuestion) -> Result<Question, sqlx::Error> {
        Ok(self.rows.write().await.save(question))
    }

    async fn insert_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, sqlx::Error> {
        let mut rows = self.rows.write().await;
        Ok(questions.into_iter().map(|q| rows.save(q)).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryQuestionStore::new();
        let first = store.insert(NewQuestion::new("What's new?", at(1))).await.unwrap();
        let second = store.insert(NewQuestion::new("What's up?", at(2))).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn latest_orders_newest_first_and_truncates() {
        let store = MemoryQuestionStore::new();
        for day in [3, 1, 7, 5, 2, 6, 4] {
            store
                .insert(NewQuestion::new(format!("Day {day}"), at(day)))
                .await
                .unwrap();
        }

        let latest = store.latest(5).await.unwrap();
        let days: Vec<_> = latest.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(days, ["Day 7", "Day 6", "Day 5", "Day 4", "Day 3"]);
    }

    #[tokio::test]
    async fn latest_breaks_ties_by_id() {
        let store = MemoryQuestionStore::new();
        let when = Utc::now() - Duration::hours(1);
        store.insert(NewQuestion::new("older id", when)).await.unwrap();
        store.insert(NewQuestion::new("newer id", when)).await.unwrap();

        let latest = store.latest(5).await.unwrap();
        assert_eq!(latest[0].question_text, "newer id");
        assert_eq!(latest[1].question_text, "older id");
    }

    #[tokio::test]
    async fn latest_on_empty_store() {
        let store = MemoryQuestionStore::new();
        assert!(store.latest(5).await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn negative_limit_yields_nothing() {
        let store = MemoryQuestionStore::new();
        store.insert(NewQuestion::new("Anyone?", at(1))).await.unwrap();
        assert!(store.latest(-1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn explicit_id_overwrites_and_advances_next_id() {
        let store = MemoryQuestionStore::new();
        store.insert(NewQuestion::new("Draft", at(1)).with_id(10)).await.unwrap();
        let replaced = store
            .insert(NewQuestion::new("Final", at(2)).with_id(10))
            .await
            .unwrap();
        let next = store.insert(NewQuestion::new("Next", at(3))).await.unwrap();

        assert_eq!(replaced.id, 10);
        assert_eq!(store.get(10).await.unwrap().unwrap().question_text, "Final");
        assert_eq!(next.id, 11);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn insert_all_with_ids_is_repeatable() {
        let store = MemoryQuestionStore::new();
        let batch = vec![
            NewQuestion::new("What's new?", at(1)).with_id(1),
            NewQuestion::new("What's up?", at(2)).with_id(2),
        ];

        store.insert_all(batch.clone()).await.unwrap();
        let first = store.latest(10).await.unwrap();
        store.insert_all(batch).await.unwrap();

        assert_eq!(store.latest(10).await.unwrap(), first);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_by_id() {
        let store = MemoryQuestionStore::new();
        let created = store.insert(NewQuestion::new("What's new?", at(1))).await.unwrap();

        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
        assert_eq!(store.get(42).await.unwrap(), None);
    }
}
