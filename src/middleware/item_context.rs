use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use super::{ContextError, CurrentList};
use crate::app::AppState;
use crate::database::models::TodoItem;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ItemPath {
    pub todo_id: i32,
}

/// An item contained in the current list, resolved from `:todo_id`
#[derive(Clone, Debug)]
pub struct CurrentItem(pub TodoItem);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentItem
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentItem>()
            .cloned()
            .ok_or_else(|| ContextError::MissingItemContext.into())
    }
}

/// Must run after `list_context_middleware`; loads the item scoped by `(list_id, item_id)`
pub async fn item_context_middleware(
    State(state): State<AppState>,
    path: Result<Path<ItemPath>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Path(ItemPath { todo_id }) = path?;

    let list_id = request
        .extensions()
        .get::<CurrentList>()
        .map(|CurrentList(list)| list.id)
        .ok_or(ContextError::MissingListContext)?;

    let item = state
        .repo
        .items
        .item_by_id(list_id, todo_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(list_id, todo_id, "todo lookup missed");
            ContextError::ItemNotFound
        })?;

    request.extensions_mut().insert(CurrentItem(item));

    Ok(next.run(request).await)
}
