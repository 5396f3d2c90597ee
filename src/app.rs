use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{identity_middleware, item_context_middleware, list_context_middleware};
use crate::services::AuthService;

/// Shared per-process dependencies, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub repo: Repository,
}

impl AppState {
    pub fn new(auth: AuthService, repo: Repository) -> Self {
        Self {
            auth: Arc::new(auth),
            repo,
        }
    }
}

/// Full application router.
///
/// Context middleware is attached with `route_layer`, so it only runs for
/// matched routes and sees their path parameters. The last layer added runs
/// first: identity, then list context, then todo context.
pub fn app(state: AppState) -> Router {
    let todo_routes = Router::new()
        .route(
            "/api/lists/:list_id/todos/:todo_id",
            get(protected::todo_get)
                .patch(protected::todo_update)
                .delete(protected::todo_delete),
        )
        .route_layer(from_fn_with_state(state.clone(), item_context_middleware))
        .route_layer(from_fn_with_state(state.clone(), list_context_middleware));

    let list_routes = Router::new()
        .route(
            "/api/lists/:list_id",
            get(protected::list_get)
                .patch(protected::list_update)
                .delete(protected::list_delete),
        )
        .route(
            "/api/lists/:list_id/todos",
            get(protected::todo_get_all).post(protected::todo_create),
        )
        .route_layer(from_fn_with_state(state.clone(), list_context_middleware));

    let api_routes = Router::new()
        .route("/api/lists", get(protected::list_get_all).post(protected::list_create))
        .merge(list_routes)
        .merge(todo_routes)
        .route_layer(from_fn_with_state(state.clone(), identity_middleware));

    Router::new()
        .route("/auth/sign-up", post(public::sign_up))
        .route("/auth/sign-in", post(public::sign_in))
        .merge(api_routes)
        // Global middleware, innermost first
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!("handler panicked: {}", detail);

    ApiError::internal_server_error("An error occurred while processing your request").into_response()
}
