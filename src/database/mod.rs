pub mod manager;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod update_builder;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{ItemStore, ListStore, Repository, UserStore};
