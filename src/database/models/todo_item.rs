use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::update_builder::Assignment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
}

/// Partial update for an item. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateItemData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl UpdateItemData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("title", self.title.clone()),
            Assignment::text("description", self.description.clone()),
            Assignment::boolean("done", self.done),
        ]
    }
}
