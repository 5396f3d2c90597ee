use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{NewItem, TodoItem, UpdateItemData};
use crate::error::ApiError;
use crate::handlers::{reject_blank_title, require_fields};
use crate::middleware::{ApiResponse, ApiResult, CurrentItem, CurrentList, DataEnvelope};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/lists/:list_id/todos
pub async fn get_all(State(state): State<AppState>, CurrentList(list): CurrentList) -> ApiResult<DataEnvelope<TodoItem>> {
    let items = state.repo.items.all_items(list.id).await?;
    Ok(ApiResponse::success(DataEnvelope::new(items)))
}

/// POST /api/lists/:list_id/todos - New todos start with `done = false`
pub async fn create(
    State(state): State<AppState>,
    CurrentList(list): CurrentList,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoItem> {
    let Json(req) = payload?;
    require_fields(&[("title", req.title.as_str())])?;

    let item = state
        .repo
        .items
        .create_item(
            list.id,
            NewItem {
                title: req.title,
                description: req.description.unwrap_or_default(),
            },
        )
        .await?;

    tracing::info!(list_id = list.id, todo_id = item.id, "todo created");
    Ok(ApiResponse::created(item))
}

/// GET /api/lists/:list_id/todos/:todo_id
pub async fn get(CurrentItem(item): CurrentItem) -> ApiResult<TodoItem> {
    Ok(ApiResponse::success(item))
}

/// PATCH /api/lists/:list_id/todos/:todo_id
pub async fn update(
    State(state): State<AppState>,
    CurrentItem(item): CurrentItem,
    payload: Result<Json<UpdateItemData>, JsonRejection>,
) -> ApiResult<TodoItem> {
    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(ApiError::validation_error(
            "Provide at least one of title, description or done",
            None,
        ));
    }
    reject_blank_title(patch.title.as_deref())?;

    let updated = state.repo.items.update_item(item.id, &patch).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/lists/:list_id/todos/:todo_id
pub async fn delete(State(state): State<AppState>, CurrentItem(item): CurrentItem) -> ApiResult<()> {
    state.repo.items.delete_item(item.id).await?;
    tracing::info!(todo_id = item.id, "todo deleted");
    Ok(ApiResponse::<()>::no_content())
}
