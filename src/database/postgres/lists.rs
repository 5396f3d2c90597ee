use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewList, Todolist, UpdateListData};
use crate::database::repository::ListStore;
use crate::database::update_builder::UpdateBuilder;

const LIST_COLUMNS: &str = "id, title, description";

pub struct PgListStore {
    pool: PgPool,
}

impl PgListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListStore for PgListStore {
    async fn create_list(&self, user_id: i32, list: NewList) -> Result<Todolist, DatabaseError> {
        // Dropping `tx` on any early return rolls both inserts back
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Todolist>(
            r#"
            INSERT INTO todo_lists (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description
            "#,
        )
        .bind(&list.title)
        .bind(&list.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO users_lists (user_id, list_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(created.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(list_id = created.id, user_id, "created list");
        Ok(created)
    }

    async fn all_lists(&self, user_id: i32) -> Result<Vec<Todolist>, DatabaseError> {
        let lists = sqlx::query_as::<_, Todolist>(
            r#"
            SELECT tl.id, tl.title, tl.description
            FROM todo_lists AS tl
            INNER JOIN users_lists AS ul ON tl.id = ul.list_id
            WHERE ul.user_id = $1
            ORDER BY tl.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    async fn list_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<Todolist>, DatabaseError> {
        let list = sqlx::query_as::<_, Todolist>(
            r#"
            SELECT tl.id, tl.title, tl.description
            FROM todo_lists AS tl
            INNER JOIN users_lists AS ul ON tl.id = ul.list_id
            WHERE ul.user_id = $1
            AND tl.id = $2
            "#,
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(list)
    }

    async fn update_list(&self, list_id: i32, data: &UpdateListData) -> Result<Todolist, DatabaseError> {
        let statement = UpdateBuilder::new("todo_lists", LIST_COLUMNS).build(list_id, data.assignments())?;

        statement
            .query_as::<Todolist>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("list {}", list_id)))
    }

    async fn delete_list(&self, list_id: i32) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Items first: their join rows cascade away with the list
        sqlx::query(
            r#"
            DELETE FROM todo_items
            WHERE id IN (SELECT item_id FROM lists_items WHERE list_id = $1)
            "#,
        )
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM todo_lists WHERE id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
