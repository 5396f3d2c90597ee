use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewItem, NewList, NewUser, TodoItem, Todolist, UpdateItemData, UpdateListData, User,
};
use crate::database::postgres::{PgItemStore, PgListStore, PgUserStore};

/// Persists accounts and answers credential lookups
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::UniqueViolation` when the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Equality lookup on `(username, password_hash)`
    async fn find_user_id(&self, username: &str, password_hash: &str) -> Result<Option<i32>, DatabaseError>;
}

/// Lists, always scoped by the owning user
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Inserts the list and its ownership join row in one transaction
    async fn create_list(&self, user_id: i32, list: NewList) -> Result<Todolist, DatabaseError>;
    async fn all_lists(&self, user_id: i32) -> Result<Vec<Todolist>, DatabaseError>;
    async fn list_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<Todolist>, DatabaseError>;
    async fn update_list(&self, list_id: i32, data: &UpdateListData) -> Result<Todolist, DatabaseError>;
    /// Removes the list together with every item it contains
    async fn delete_list(&self, list_id: i32) -> Result<(), DatabaseError>;
}

/// Items, always scoped by their containing list
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts the item and its containment join row in one transaction
    async fn create_item(&self, list_id: i32, item: NewItem) -> Result<TodoItem, DatabaseError>;
    async fn all_items(&self, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError>;
    async fn item_by_id(&self, list_id: i32, item_id: i32) -> Result<Option<TodoItem>, DatabaseError>;
    async fn update_item(&self, item_id: i32, data: &UpdateItemData) -> Result<TodoItem, DatabaseError>;
    async fn delete_item(&self, item_id: i32) -> Result<(), DatabaseError>;
}

/// One named handle per storage capability
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UserStore>,
    pub lists: Arc<dyn ListStore>,
    pub items: Arc<dyn ItemStore>,
}

impl Repository {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            lists: Arc::new(PgListStore::new(pool.clone())),
            items: Arc::new(PgItemStore::new(pool)),
        }
    }
}
