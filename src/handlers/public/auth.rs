// handlers/public/auth.rs - POST /auth/sign-up and POST /auth/sign-in

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub id: i32,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
}

/// POST /auth/sign-up - Register a new account
///
/// Input: `{ "name", "username", "password" }`, all required.
/// Output: `201 { "id", "name", "username" }`; a taken username is a 400.
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<SignUpResponse> {
    let Json(req) = payload?;
    require_fields(&[
        ("name", req.name.as_str()),
        ("username", req.username.as_str()),
        ("password", req.password.as_str()),
    ])?;

    let user = state.auth.create_user(&req.name, &req.username, &req.password).await?;

    Ok(ApiResponse::created(SignUpResponse {
        id: user.id,
        name: user.name,
        username: user.username,
    }))
}

/// POST /auth/sign-in - Exchange credentials for a bearer token
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<SignInResponse> {
    let Json(req) = payload?;
    require_fields(&[("username", req.username.as_str()), ("password", req.password.as_str())])?;

    let token = state.auth.sign_in(&req.username, &req.password).await?;

    Ok(ApiResponse::success(SignInResponse { token }))
}
