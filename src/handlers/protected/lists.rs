use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{NewList, Todolist, UpdateListData};
use crate::error::ApiError;
use crate::handlers::{reject_blank_title, require_fields};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, CurrentList, DataEnvelope};

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/lists - Every list the caller owns, ordered by id
pub async fn get_all(State(state): State<AppState>, user: AuthUser) -> ApiResult<DataEnvelope<Todolist>> {
    let lists = state.repo.lists.all_lists(user.user_id).await?;
    Ok(ApiResponse::success(DataEnvelope::new(lists)))
}

/// POST /api/lists - Create a list owned by the caller
///
/// The list row and its ownership row are written in one transaction.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> ApiResult<Todolist> {
    let Json(req) = payload?;
    require_fields(&[("title", req.title.as_str())])?;

    let list = state
        .repo
        .lists
        .create_list(
            user.user_id,
            NewList {
                title: req.title,
                description: req.description.unwrap_or_default(),
            },
        )
        .await?;

    tracing::info!(user_id = user.user_id, list_id = list.id, "list created");
    Ok(ApiResponse::created(list))
}

/// GET /api/lists/:list_id
pub async fn get(CurrentList(list): CurrentList) -> ApiResult<Todolist> {
    Ok(ApiResponse::success(list))
}

/// PATCH /api/lists/:list_id - Partial update; omitted fields keep their value
pub async fn update(
    State(state): State<AppState>,
    CurrentList(list): CurrentList,
    payload: Result<Json<UpdateListData>, JsonRejection>,
) -> ApiResult<Todolist> {
    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(ApiError::validation_error("Provide at least one of title or description", None));
    }
    reject_blank_title(patch.title.as_deref())?;

    let updated = state.repo.lists.update_list(list.id, &patch).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/lists/:list_id - Removes the list together with its todos
pub async fn delete(State(state): State<AppState>, CurrentList(list): CurrentList) -> ApiResult<()> {
    state.repo.lists.delete_list(list.id).await?;
    tracing::info!(list_id = list.id, "list deleted");
    Ok(ApiResponse::<()>::no_content())
}
