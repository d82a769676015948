// handlers.rs
use axum::{
    extract::{Path, State},
    response::Html,
};
use tera::Context;
use tracing::debug;

use crate::error::AppResult;
use crate::shortcuts::{get_or_404, int_segment, parse_id};
use crate::templates::{DETAIL_TEMPLATE, INDEX_TEMPLATE};
use crate::AppState;

/// How many questions the index page lists.
pub const LATEST_QUESTION_LIMIT: i64 = 5;

/// List the most recently published questions
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let latest_question_list = state.store.latest(LATEST_QUESTION_LIMIT).await?;
    debug!("Listing {} questions", latest_question_list.len());

    let mut context = Context::new();
    context.insert("latest_question_list", &latest_question_list);
    state.templates.render(INDEX_TEMPLATE, &context)
}

/// Show a single question, 404 if it doesn't exist
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> AppResult<Html<String>> {
    let question_id = parse_id(&question_id)?;
    let question = get_or_404(state.store.get(question_id).await?)?;

    let mut context = Context::new();
    context.insert("question", &question);
    state.templates.render(DETAIL_TEMPLATE, &context)
}

// Results and voting are placeholders: neither touches the store.

pub async fn results(Path(question_id): Path<String>) -> AppResult<String> {
    let question_id = int_segment(&question_id)?;
    Ok(format!("You're looking at the results of question {question_id}."))
}

pub async fn vote(Path(question_id): Path<String>) -> AppResult<String> {
    let question_id = int_segment(&question_id)?;
    Ok(format!("You're voting on question {question_id}."))
}
