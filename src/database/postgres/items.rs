use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewItem, TodoItem, UpdateItemData};
use crate::database::repository::ItemStore;
use crate::database::update_builder::UpdateBuilder;

const ITEM_COLUMNS: &str = "id, title, description, done";

pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn create_item(&self, list_id: i32, item: NewItem) -> Result<TodoItem, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, TodoItem>(
            r#"
            INSERT INTO todo_items (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, done
            "#,
        )
        .bind(&item.title)
        .bind(&item.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO lists_items (list_id, item_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(list_id)
        .bind(created.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(item_id = created.id, list_id, "created item");
        Ok(created)
    }

    async fn all_items(&self, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError> {
        let items = sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT ti.id, ti.title, ti.description, ti.done
            FROM todo_items AS ti
            INNER JOIN lists_items AS li ON li.item_id = ti.id
            WHERE li.list_id = $1
            ORDER BY ti.id
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn item_by_id(&self, list_id: i32, item_id: i32) -> Result<Option<TodoItem>, DatabaseError> {
        let item = sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT ti.id, ti.title, ti.description, ti.done
            FROM todo_items AS ti
            INNER JOIN lists_items AS li ON li.item_id = ti.id
            WHERE li.list_id = $1
            AND ti.id = $2
            "#,
        )
        .bind(list_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_item(&self, item_id: i32, data: &UpdateItemData) -> Result<TodoItem, DatabaseError> {
        let statement = UpdateBuilder::new("todo_items", ITEM_COLUMNS).build(item_id, data.assignments())?;

        statement
            .query_as::<TodoItem>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("item {}", item_id)))
    }

    async fn delete_item(&self, item_id: i32) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM todo_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
