// src/shortcuts.rs
use crate::error::{AppError, AppResult};

/// Unwraps a lookup, turning a missing row into a 404.
pub fn get_or_404<T>(found: Option<T>) -> AppResult<T> {
    found.ok_or(AppError::NotFound)
}

/// Matches a `<question_id>` path segment the way an integer route converter
/// would: ASCII digits only, any length. Anything else behaves like an
/// unmatched route. Returns the number without leading zeros.
pub fn int_segment(segment: &str) -> AppResult<&str> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound);
    }

    let trimmed = segment.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0" } else { trimmed })
}

/// A `<question_id>` segment as a primary key. Numbers past `i64::MAX` can't
/// name a row, so they are a 404 too.
pub fn parse_id(segment: &str) -> AppResult<i64> {
    int_segment(segment)?.parse().map_err(|_| AppError::NotFound)
}
