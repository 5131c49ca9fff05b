use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::account::ProvisionError;
use crate::auth::jwt::DecodeError;
use crate::store::StoreError;

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type
#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    NotFound(String),
    Unauthorized(String),
    Validation(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Denials, missing records, and invalid input are deliberately
        // indistinguishable on the wire: all render 404 with an empty body.
        let status = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Database error occurred" })),
                )
                    .into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
            AppError::NotFound(msg) => {
                tracing::debug!(reason = %msg, "request denied");
                StatusCode::NOT_FOUND
            }
            AppError::Unauthorized(msg) => {
                tracing::debug!(reason = %msg, "request denied");
                StatusCode::NOT_FOUND
            }
            AppError::Validation(msg) => {
                tracing::debug!(reason = %msg, "request denied");
                StatusCode::NOT_FOUND
            }
        };

        (status, Json(json!({}))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Db(e) => AppError::Database(e),
            StoreError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<ProvisionError> for AppError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::NotFound => AppError::NotFound("no matching pending record".to_string()),
            ProvisionError::Validation(msg) => AppError::Validation(msg),
            ProvisionError::Store(e) => e.into(),
            ProvisionError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
