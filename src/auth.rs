use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use thiserror::Error;

use crate::{
    error::ApiError,
    token::{TokenError, TokenService},
};

/// AuthError
///
/// Why the gate refused a request. Every variant is reported to the client with the
/// same authentication code; the distinction only reaches the logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// AuthUser
///
/// The authenticated identity of a request, injected by the gate into the request
/// extensions and read back by handlers on protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// bearer_token
///
/// Returns the token of an `Authorization: Bearer <token>` header. Anything else
/// (missing header, other scheme, empty token, non-ASCII value) is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AuthError::MissingCredentials),
    }
}

/// authenticate
///
/// Extracts and verifies the bearer token carried by `headers`.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers)?;
    let identity = tokens.verify(token)?;

    Ok(AuthUser {
        id: identity.user_id,
        username: identity.username,
    })
}

/// AuthUser Extractor Implementation
///
/// On routes behind the gate the identity is already in the request extensions and
/// is returned as is. Otherwise the token is verified here, so a handler that takes
/// `AuthUser` can never run unauthenticated.
///
/// Rejection: `ApiError::Unauthorized` (HTTP 401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let tokens = TokenService::from_ref(state);
        let user = authenticate(&parts.headers, &tokens)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
