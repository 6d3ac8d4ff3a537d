//! REST API routes for Millwright

mod checklist;
mod plants;
mod routes;
mod visits;

pub use checklist::*;
pub use plants::*;
pub use routes::*;
pub use visits::*;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::EngineError;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta {
                timestamp: Utc::now(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
}

/// API error response body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Unauthenticated(String),
    InvalidArgument(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Unauthenticated(msg) => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHENTICATED", &msg),
            ),
            AppError::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ARGUMENT", &msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", &msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL", &msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unauthenticated => AppError::Unauthenticated(err.to_string()),
            EngineError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            EngineError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            EngineError::Storage(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource not found".to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

/// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
}

/// The trusted caller identity, supplied by the authenticating collaborator
/// in the `x-owner-id` header. No credential checks happen here.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-owner-id")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| OwnerId(s.to_string()))
            .ok_or_else(|| AppError::Unauthenticated("missing x-owner-id header".to_string()))
    }
}
