// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Route Prefix: /api/*
// Middleware: identity → list context → todo context, each resolved before
// the handler runs. Handlers read them through the `AuthUser`, `CurrentList`
// and `CurrentItem` extractors and never re-check ownership themselves.

pub mod lists;
pub mod todos;

pub use lists::create as list_create;
pub use lists::delete as list_delete;
pub use lists::get as list_get;
pub use lists::get_all as list_get_all;
pub use lists::update as list_update;

pub use todos::create as todo_create;
pub use todos::delete as todo_delete;
pub use todos::get as todo_get;
pub use todos::get_all as todo_get_all;
pub use todos::update as todo_update;
