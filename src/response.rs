use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorCode};

/// ApiResponse
///
/// The JSON envelope wrapped around every response body:
/// `{ "status": <code>, "message": <text>, "data": <payload or null> }`.
/// `status == 200` means success; any other value is an [`ErrorCode`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: ErrorCode) -> Self {
        Self {
            status: code.code(),
            message: code.message().to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ErrorCode::Success.code()
    }
}

impl ApiResponse<()> {
    /// A success envelope with `data: null`, used by mutations that return nothing.
    pub fn empty() -> Self {
        Self {
            status: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Handler return type: a success envelope or the first error encountered.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
