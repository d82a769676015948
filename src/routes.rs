// routes.rs
use axum::{
    http::{header::LOCATION, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::handlers;
use crate::shortcuts::{int_segment, parse_id};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/polls/", get(handlers::index))
        .route("/polls/{question_id}/", get(handlers::detail))
        .route("/polls/{question_id}/results/", get(handlers::results))
        .route("/polls/{question_id}/vote/", get(handlers::vote).post(handlers::vote))
        .route("/polls", get(append_slash))
        .route("/polls/{question_id}", get(append_slash))
        .route("/polls/{question_id}/results", get(append_slash))
        .route("/polls/{question_id}/vote", get(append_slash))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permanent redirect to the same path with a trailing slash, query kept.
/// Only issued when the slashed path would match, otherwise a 404.
async fn append_slash(uri: Uri) -> Result<impl IntoResponse, AppError> {
    let segments: Vec<&str> = uri.path().split('/').collect();
    match segments.as_slice() {
        [_, _, id] => {
            parse_id(id)?;
        }
        [_, _, id, _] => {
            int_segment(id)?;
        }
        _ => {}
    }

    let location = match uri.query() {
        Some(query) => format!("{}/?{query}", uri.path()),
        None => format!("{}/", uri.path()),
    };

    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]))
}

async fn not_found() -> AppError {
    AppError::NotFound
}
