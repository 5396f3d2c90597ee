use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Duration;

use crate::app::AppState;
use crate::auth::{PasswordHasher, TokenService};
use crate::database::models::{
    NewItem, NewList, NewUser, TodoItem, Todolist, UpdateItemData, UpdateListData, User,
};
use crate::database::{DatabaseError, ItemStore, ListStore, Repository, UserStore};
use crate::services::AuthService;

pub const TEST_JWT_SECRET: &str = "test-signing-key";
pub const TEST_PASSWORD_SALT: &str = "test-salt";

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: Vec<User>,
    lists: BTreeMap<i32, Todolist>,
    items: BTreeMap<i32, TodoItem>,
    users_lists: Vec<(i32, i32)>,
    lists_items: Vec<(i32, i32)>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for every store trait, mirroring the Postgres join semantics.
/// A simulated join-insert fault discards the staged primary row like a rollback would.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_join_insert: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository {
            users: self.clone(),
            lists: self.clone(),
            items: self.clone(),
        }
    }

    pub fn fail_join_inserts(&self, fail: bool) {
        self.fail_join_insert.store(fail, Ordering::SeqCst);
    }

    /// Number of mutating list/item calls that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.tables().lists.len()
    }

    pub fn item_count(&self) -> usize {
        self.tables().items.len()
    }

    pub fn user_by_id(&self, id: i32) -> Option<User> {
        self.tables().users.iter().find(|u| u.id == id).cloned()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn join_fault(&self) -> Result<(), DatabaseError> {
        if self.fail_join_insert.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::Protocol(
                "simulated join insert failure".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation("users_username_key".to_string()));
        }
        let created = User {
            id: tables.next_id(),
            name: user.name,
            username: user.username,
            password_hash: user.password_hash,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_id(&self, username: &str, password_hash: &str) -> Result<Option<i32>, DatabaseError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username && u.password_hash == password_hash)
            .map(|u| u.id))
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn create_list(&self, user_id: i32, list: NewList) -> Result<Todolist, DatabaseError> {
        self.record_write();
        let mut tables = self.tables();
        let created = Todolist {
            id: tables.next_id(),
            title: list.title,
            description: list.description,
        };
        self.join_fault()?;
        tables.lists.insert(created.id, created.clone());
        tables.users_lists.push((user_id, created.id));
        Ok(created)
    }

    async fn all_lists(&self, user_id: i32) -> Result<Vec<Todolist>, DatabaseError> {
        let tables = self.tables();
        Ok(tables
            .users_lists
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .filter_map(|(_, list_id)| tables.lists.get(list_id).cloned())
            .collect())
    }

    async fn list_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<Todolist>, DatabaseError> {
        let tables = self.tables();
        if !tables.users_lists.contains(&(user_id, list_id)) {
            return Ok(None);
        }
        Ok(tables.lists.get(&list_id).cloned())
    }

    async fn update_list(&self, list_id: i32, data: &UpdateListData) -> Result<Todolist, DatabaseError> {
        self.record_write();
        if data.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }
        let mut tables = self.tables();
        let list = tables
            .lists
            .get_mut(&list_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("list {}", list_id)))?;
        if let Some(title) = &data.title {
            list.title = title.clone();
        }
        if let Some(description) = &data.description {
            list.description = description.clone();
        }
        Ok(list.clone())
    }

    async fn delete_list(&self, list_id: i32) -> Result<(), DatabaseError> {
        self.record_write();
        let mut tables = self.tables();
        let contained: Vec<i32> = tables
            .lists_items
            .iter()
            .filter(|(list, _)| *list == list_id)
            .map(|(_, item)| *item)
            .collect();
        for item_id in contained {
            tables.items.remove(&item_id);
        }
        tables.lists_items.retain(|(list, _)| *list != list_id);
        tables.users_lists.retain(|(_, list)| *list != list_id);
        tables.lists.remove(&list_id);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_item(&self, list_id: i32, item: NewItem) -> Result<TodoItem, DatabaseError> {
        self.record_write();
        let mut tables = self.tables();
        let created = TodoItem {
            id: tables.next_id(),
            title: item.title,
            description: item.description,
            done: false,
        };
        self.join_fault()?;
        tables.items.insert(created.id, created.clone());
        tables.lists_items.push((list_id, created.id));
        Ok(created)
    }

    async fn all_items(&self, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError> {
        let tables = self.tables();
        Ok(tables
            .lists_items
            .iter()
            .filter(|(list, _)| *list == list_id)
            .filter_map(|(_, item_id)| tables.items.get(item_id).cloned())
            .collect())
    }

    async fn item_by_id(&self, list_id: i32, item_id: i32) -> Result<Option<TodoItem>, DatabaseError> {
        let tables = self.tables();
        if !tables.lists_items.contains(&(list_id, item_id)) {
            return Ok(None);
        }
        Ok(tables.items.get(&item_id).cloned())
    }

    async fn update_item(&self, item_id: i32, data: &UpdateItemData) -> Result<TodoItem, DatabaseError> {
        self.record_write();
        if data.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }
        let mut tables = self.tables();
        let item = tables
            .items
            .get_mut(&item_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("item {}", item_id)))?;
        if let Some(title) = &data.title {
            item.title = title.clone();
        }
        if let Some(description) = &data.description {
            item.description = description.clone();
        }
        if let Some(done) = data.done {
            item.done = done;
        }
        Ok(item.clone())
    }

    async fn delete_item(&self, item_id: i32) -> Result<(), DatabaseError> {
        self.record_write();
        let mut tables = self.tables();
        tables.items.remove(&item_id);
        tables.lists_items.retain(|(_, item)| *item != item_id);
        Ok(())
    }
}

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_JWT_SECRET, Duration::hours(12))
}

/// Application state wired to a fresh in-memory store
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let store = MemoryStore::new();
    let repo = store.repository();
    let auth = AuthService::new(repo.users.clone(), PasswordHasher::new(TEST_PASSWORD_SALT), test_tokens());
    (AppState::new(auth, repo), store)
}
