use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::update_builder::Assignment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todolist {
    pub id: i32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewList {
    pub title: String,
    pub description: String,
}

/// Partial update for a list. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateListData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateListData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Columns in the order they are written to the SET clause
    pub fn assignments(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("title", self.title.clone()),
            Assignment::text("description", self.description.clone()),
        ]
    }
}
