use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use super::{AuthUser, ContextError};
use crate::app::AppState;
use crate::database::models::Todolist;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListPath {
    pub list_id: i32,
}

/// A list the authenticated user owns, resolved from `:list_id`
#[derive(Clone, Debug)]
pub struct CurrentList(pub Todolist);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentList
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentList>()
            .cloned()
            .ok_or_else(|| ContextError::MissingListContext.into())
    }
}

/// Loads the list scoped by `(user_id, list_id)`.
/// A list owned by someone else is indistinguishable from a missing one.
pub async fn list_context_middleware(
    State(state): State<AppState>,
    path: Result<Path<ListPath>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Path(ListPath { list_id }) = path?;

    let AuthUser { user_id } = request
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or(ContextError::MissingUserContext)?;

    let list = state
        .repo
        .lists
        .list_by_id(user_id, list_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id, list_id, "list lookup missed");
            ContextError::ListNotFound
        })?;

    request.extensions_mut().insert(CurrentList(list));

    Ok(next.run(request).await)
}
