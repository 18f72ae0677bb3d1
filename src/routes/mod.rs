//! Crate-level route handlers

pub mod health;

use axum::http::Uri;

use crate::error::AppError;

/// JSON 404 for paths no route matches
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
