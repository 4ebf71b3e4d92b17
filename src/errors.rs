//! Error types for dynaschema operations.
//!
//! [`DataStoreError`] is what storage backends report. [`ApiError`] is what HTTP handlers return;
//! it renders as a JSON body of the form `{"message": ..., "errors": [...]}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataStoreError {
    /// The requested item, or a record it depends on, was not found.
    #[error("Item not found in data store")]
    NotFound,
    /// An item with the same unique name already exists.
    #[error("Item already exists in data store")]
    AlreadyExists,
    /// An internal storage system error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DataStoreError::AlreadyExists
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DataStoreError::NotFound
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable summary.
    pub message: String,
    /// Individual validation violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Underlying cause of an internal failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Errors returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed.
    #[error("{0}")]
    BadRequest(String),
    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A unique name is already taken.
    #[error("{0}")]
    Conflict(String),
    /// The submitted schema or data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Storage failed.
    #[error("Something went wrong!")]
    Internal(#[from] DataStoreError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON body this error renders as.
    pub fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            message: self.to_string(),
            errors: None,
            error: None,
        };
        match self {
            ApiError::Validation(validation) => {
                body.errors = Some(validation.errors().to_vec());
            }
            ApiError::Internal(cause) => {
                body.error = Some(cause.to_string());
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!(error = %cause, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
