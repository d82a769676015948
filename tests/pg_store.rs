// PostgreSQL store tests.
//
// These need a live database: `DATABASE_URL=postgres://... cargo test -- --ignored`.
// `#[sqlx::test]` creates a scratch database per test and applies `migrations/`.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;

use polls::models::NewQuestion;
use polls::store::{PgQuestionStore, QuestionStore};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn latest_is_newest_first_and_limited(pool: PgPool) {
    let store = PgQuestionStore::new(pool);
    for day in [3, 1, 7, 5, 2, 6, 4] {
        store
            .insert(NewQuestion::new(format!("Day {day}"), at(day)))
            .await
            .unwrap();
    }

    let latest = store.latest(5).await.unwrap();
    let texts: Vec<_> = latest.iter().map(|q| q.question_text.as_str()).collect();
    assert_eq!(texts, ["Day 7", "Day 6", "Day 5", "Day 4", "Day 3"]);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn equal_pub_dates_favour_higher_id(pool: PgPool) {
    let store = PgQuestionStore::new(pool);
    store.insert(NewQuestion::new("older id", at(1))).await.unwrap();
    store.insert(NewQuestion::new("newer id", at(1))).await.unwrap();

    let latest = store.latest(5).await.unwrap();
    assert_eq!(latest[0].question_text, "newer id");
    assert_eq!(latest[1].question_text, "older id");
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn get_existing_and_missing(pool: PgPool) {
    let store = PgQuestionStore::new(pool);
    let created = store.insert(NewQuestion::new("What's new?", at(1))).await.unwrap();

    assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(store.get(created.id + 100).await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn keyed_batch_is_idempotent_and_sequence_advances(pool: PgPool) {
    let store = PgQuestionStore::new(pool.clone());
    let batch = vec![
        NewQuestion::new("What's new?", at(1)).with_id(1),
        NewQuestion::new("Tabs or spaces?", at(2)).with_id(2),
    ];

    store.insert_all(batch.clone()).await.unwrap();
    store.insert_all(batch).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM polls_question")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let next = store.insert(NewQuestion::new("Unkeyed", at(3))).await.unwrap();
    assert_eq!(next.id, 3);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn failed_batch_commits_nothing(pool: PgPool) {
    let store = PgQuestionStore::new(pool.clone());
    let batch = vec![
        NewQuestion::new("fits", at(1)).with_id(1),
        NewQuestion::new("x".repeat(201), at(2)).with_id(2),
    ];

    assert!(store.insert_all(batch).await.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM polls_question")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
