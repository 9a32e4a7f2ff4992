//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config: {0}")]
    Config(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(rejection.body_text());
        }
        AppError::BadRequest(rejection.body_text())
    }
}

/// Body of every non-2xx response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Coarse classes of store failure. Only the class is shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    Unavailable,
    Constraint,
    Query,
}

impl StoreFailure {
    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreFailure::Unavailable,
            sqlx::Error::Database(db) if db.constraint().is_some() => StoreFailure::Constraint,
            _ => StoreFailure::Query,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StoreFailure::Unavailable => "database unavailable",
            StoreFailure::Constraint => "constraint violation",
            StoreFailure::Query => "query failed",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration error".to_string())
            }
            AppError::Validation(msg) | AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Db(e) => {
                let failure = StoreFailure::classify(&e);
                tracing::error!(error = %e, class = ?failure, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, failure.message().to_string())
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
