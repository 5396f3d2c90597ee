// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition lives here; everything else sits behind the identity
// middleware under /api.

pub mod auth;

pub use auth::{sign_in, sign_up};
