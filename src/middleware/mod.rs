pub mod auth;
pub mod item_context;
pub mod list_context;
pub mod response;

use thiserror::Error;

pub use auth::{identity_middleware, AuthUser};
pub use item_context::{item_context_middleware, CurrentItem};
pub use list_context::{list_context_middleware, CurrentList};
pub use response::{ApiResponse, ApiResult, DataEnvelope};

/// Failures while resolving request-scoped context.
///
/// The `Missing*` variants mean a route was mounted without the middleware
/// that provides the value; the `*NotFound` variants are scoped lookup misses.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("user id missing from request context")]
    MissingUserContext,

    #[error("list missing from request context")]
    MissingListContext,

    #[error("todo missing from request context")]
    MissingItemContext,

    #[error("list not found")]
    ListNotFound,

    #[error("todo not found")]
    ItemNotFound,
}
