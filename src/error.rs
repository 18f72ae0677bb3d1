//! Error handling for the application

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::CostingErrorResponse;
use crate::pricing::CostingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Costing(#[from] CostingError),

    /// Body or path the extractors could not decode
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Costing(CostingError::DraftNotFound(_))
            | AppError::Costing(CostingError::UnknownCategory(_)) => StatusCode::NOT_FOUND,
            AppError::Costing(CostingError::ShapeMismatch { .. })
            | AppError::Costing(CostingError::Validation { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Rejected { status, .. } => *status,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Costing(CostingError::DraftNotFound(_)) => "draft_not_found",
            AppError::Costing(CostingError::UnknownCategory(_)) => "unknown_category",
            AppError::Costing(CostingError::ShapeMismatch { .. }) => "shape_mismatch",
            AppError::Costing(CostingError::Validation { .. }) => "validation_error",
            AppError::Rejected { .. } => "invalid_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::warn!(error_type = self.error_type(), "{}", self);
        let message = self.to_string();

        let details = match &self {
            AppError::Costing(CostingError::Validation { errors, .. }) => {
                Some(serde_json::json!({ "errors": errors }))
            }
            AppError::Costing(CostingError::ShapeMismatch {
                category,
                expected,
                found,
            }) => Some(serde_json::json!({
                "category": category,
                "expected": expected,
                "found": found,
            })),
            _ => None,
        };

        let body = CostingErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
