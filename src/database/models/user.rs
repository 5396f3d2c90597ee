use serde::Serialize;
use sqlx::FromRow;

/// Registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Insert payload for the users table; `password_hash` is already derived
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}
