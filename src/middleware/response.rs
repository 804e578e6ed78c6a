use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::services::CreationError;

/// `{success, message?, content?}` envelope.
///
/// Always rendered with 200; business failures travel in `success` and
/// `message`. Transport failures use [`crate::error::ApiError`] instead.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(content: T) -> Self {
        Self {
            success: true,
            message: None,
            content: Some(content),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            content: None,
        }
    }
}

impl<T: Serialize> From<Result<T, CreationError>> for ApiResponse<T> {
    fn from(result: Result<T, CreationError>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(err) => Self::failure(err.client_message()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
