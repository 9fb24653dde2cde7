//! API error taxonomy.
//!
//! One error type for every handler; maps to the `{"error": "..."}` wire
//! shape the clients consume.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: missing or unusable identity. Message stays generic so probing
    /// cannot distinguish unknown users from wrong passwords.
    #[error("{0}")]
    Unauthorized(String),
    /// 403: identity known, action not allowed.
    #[error("{0}")]
    Forbidden(String),
    /// 404: resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// 400: request payload rejected.
    #[error("{0}")]
    Validation(String),
    /// 409: uniqueness conflict.
    #[error("{0}")]
    Conflict(String),
    /// 500: anything unexpected. Details go to the log, not the client.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!("Internal error: {:?}", e);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(what) => Self::Conflict(format!("{} already exists", what)),
            StoreError::Database(err) => Self::Internal(anyhow::anyhow!(err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let msg = e
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(m) => format!("{}: {}", field, m),
                    None => format!("{}: invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_duplicate_store_error_maps_to_conflict() {
        let err: ApiError = StoreError::Duplicate("Username".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal(anyhow::anyhow!("pool exhausted"));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
