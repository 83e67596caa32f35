//! Typed errors and HTTP mapping.

use crate::store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("failed to {action}")]
    Internal {
        action: &'static str,
        message: String,
    },
}

impl AppError {
    /// Map a store failure; `action` names what the request was doing, for 500 bodies.
    pub fn from_store(action: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => AppError::BadRequest(msg),
            StoreError::InvalidIdentifier(_) => AppError::BadRequest("invalid todo id".into()),
            StoreError::NotFound(_) => AppError::NotFound("todo not found".into()),
            StoreError::Storage(e) => AppError::Internal {
                action,
                message: e.to_string(),
            },
        }
    }

    /// `map_err` adapter: `store.list_all().await.map_err(AppError::during("list todos"))`.
    pub fn during(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |err| AppError::from_store(action, err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed JSON, a non-object body or a wrongly typed field are all client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal { action, message } => {
                tracing::error!(action = *action, error = %message, "request failed");
                Some(message.clone())
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
