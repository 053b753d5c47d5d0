use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    auth::AuthError, policy::PermissionDenied, response::ApiResponse, storage::StorageError,
};

/// ErrorCode
///
/// The application status codes carried in the `status` field of every response
/// envelope. Each code maps to a fixed message and to the HTTP status used on the wire.
/// The HTTP status is coarse (401/400/403/500); clients are expected to branch on the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    Unknown,

    // User module
    UsernameUsed,
    PasswordWrong,
    UserNotExist,
    TokenWrong,
    PermissionDenied,
    UsernameEmpty,
    EmailEmpty,
    EmailInvalid,
    EmailUsed,
    PasswordEmpty,

    // Article module
    ArticleNotExist,
    TitleEmpty,

    // Category module
    CategoryNameUsed,
    CategoryNotExist,
    CategoryNameEmpty,

    // Comment module
    CommentNotExist,
    CommentContentEmpty,

    UploadFailed,
    InvalidParam,
}

impl ErrorCode {
    /// The numeric code sent to clients.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 200,
            Self::Unknown => 500,
            Self::UsernameUsed => 1001,
            Self::PasswordWrong => 1002,
            Self::UserNotExist => 1003,
            Self::TokenWrong => 1004,
            Self::PermissionDenied => 1005,
            Self::UsernameEmpty => 1006,
            Self::EmailEmpty => 1007,
            Self::EmailInvalid => 1008,
            Self::EmailUsed => 1009,
            Self::PasswordEmpty => 1010,
            Self::ArticleNotExist => 2001,
            Self::TitleEmpty => 2002,
            Self::CategoryNameUsed => 3001,
            Self::CategoryNotExist => 3002,
            Self::CategoryNameEmpty => 3003,
            Self::CommentNotExist => 4001,
            Self::CommentContentEmpty => 4002,
            Self::UploadFailed => 5001,
            Self::InvalidParam => 9001,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "FAIL",
            Self::UsernameUsed => "Username has been used",
            Self::PasswordWrong => "Password is wrong",
            Self::UserNotExist => "User does not exist",
            Self::TokenWrong => "Token is wrong",
            Self::PermissionDenied => "User has no right",
            Self::UsernameEmpty => "Username is empty",
            Self::EmailEmpty => "Email is empty",
            Self::EmailInvalid => "Email is invalid",
            Self::EmailUsed => "Email has been used",
            Self::PasswordEmpty => "Password is empty",
            Self::ArticleNotExist => "Article does not exist",
            Self::TitleEmpty => "Article title is empty",
            Self::CategoryNameUsed => "Category name has been used",
            Self::CategoryNotExist => "Category does not exist",
            Self::CategoryNameEmpty => "Category name is empty",
            Self::CommentNotExist => "Comment does not exist",
            Self::CommentContentEmpty => "Comment content is empty",
            Self::UploadFailed => "Upload failed",
            Self::InvalidParam => "Invalid parameter",
        }
    }

    /// The HTTP status used when this code is returned.
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::TokenWrong => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::InvalidParam
            | Self::UsernameEmpty
            | Self::EmailEmpty
            | Self::EmailInvalid
            | Self::PasswordEmpty
            | Self::TitleEmpty
            | Self::CategoryNameEmpty
            | Self::CommentContentEmpty => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// StoreError
///
/// Typed failures of the entity store. Validation and conflict variants are produced
/// by the store's own checks before a mutation; `Database` wraps anything the
/// backing store reports that is not one of those.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username is empty")]
    UsernameEmpty,
    #[error("email is empty")]
    EmailEmpty,
    #[error("email is not a valid address")]
    EmailInvalid,
    #[error("password is empty")]
    PasswordEmpty,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("email is already taken")]
    EmailTaken,
    #[error("user not found")]
    UserNotFound,

    #[error("category name is empty")]
    NameEmpty,
    #[error("category name is already taken")]
    NameTaken,
    #[error("category not found")]
    CategoryNotFound,

    #[error("article title is empty")]
    TitleEmpty,
    #[error("article not found")]
    ArticleNotFound,

    #[error("comment content is empty")]
    ContentEmpty,
    #[error("comment not found")]
    CommentNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UsernameEmpty => ErrorCode::UsernameEmpty,
            Self::EmailEmpty => ErrorCode::EmailEmpty,
            Self::EmailInvalid => ErrorCode::EmailInvalid,
            Self::PasswordEmpty => ErrorCode::PasswordEmpty,
            Self::UsernameTaken => ErrorCode::UsernameUsed,
            Self::EmailTaken => ErrorCode::EmailUsed,
            Self::UserNotFound => ErrorCode::UserNotExist,
            Self::NameEmpty => ErrorCode::CategoryNameEmpty,
            Self::NameTaken => ErrorCode::CategoryNameUsed,
            Self::CategoryNotFound => ErrorCode::CategoryNotExist,
            Self::TitleEmpty => ErrorCode::TitleEmpty,
            Self::ArticleNotFound => ErrorCode::ArticleNotExist,
            Self::ContentEmpty => ErrorCode::CommentContentEmpty,
            Self::CommentNotFound => ErrorCode::CommentNotExist,
            Self::Database(_) => ErrorCode::Unknown,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// ApiError
///
/// Every failure a handler can surface. Handlers return the first error they hit;
/// `IntoResponse` turns it into the JSON envelope with the matching code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("authentication failed: {0}")]
    Unauthorized(#[from] AuthError),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("password does not match")]
    PasswordWrong,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("no file field in upload")]
    MissingFile,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidParam(_) => ErrorCode::InvalidParam,
            Self::Unauthorized(_) => ErrorCode::TokenWrong,
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Self::PasswordWrong => ErrorCode::PasswordWrong,
            Self::Store(e) => e.error_code(),
            Self::Upload(_) | Self::MissingFile => ErrorCode::UploadFailed,
            Self::Internal(_) => ErrorCode::Unknown,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();

        // Internal detail stays in the logs; the client only sees the code's message.
        match code {
            ErrorCode::Unknown | ErrorCode::UploadFailed => {
                tracing::error!(error = %self, "request failed")
            }
            ErrorCode::TokenWrong | ErrorCode::PermissionDenied => {
                tracing::warn!(error = %self, "request rejected")
            }
            _ => tracing::debug!(error = %self, code = code.code(), "request failed"),
        }

        (code.status_code(), Json(ApiResponse::<()>::failure(code))).into_response()
    }
}
