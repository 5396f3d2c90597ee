use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::repository::UserStore;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, username, password_hash
            "#,
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn find_user_id(&self, username: &str, password_hash: &str) -> Result<Option<i32>, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT id FROM users
            WHERE username = $1
            AND password_hash = $2
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }
}
