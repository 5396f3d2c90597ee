use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use super::ContextError;
use crate::app::AppState;
use crate::error::ApiError;

/// Identity resolved from the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ContextError::MissingUserContext.into())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthHeaderError {
    #[error("empty auth header")]
    Missing,

    #[error("invalid auth header")]
    Malformed,
}

/// Validates the bearer token and attaches `AuthUser` for downstream extractors
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "rejected request: {}", e);
        ApiError::unauthorized(e.to_string())
    })?;

    let user_id = state.auth.parse_token(token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Header must be exactly `<scheme> <token>` with a `Bearer` scheme
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthHeaderError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthHeaderError::Missing)?;
    let value = header.to_str().map_err(|_| AuthHeaderError::Malformed)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthHeaderError::Malformed),
    }
}
