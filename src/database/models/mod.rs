pub mod todo_item;
pub mod todo_list;
pub mod user;

pub use todo_item::{NewItem, TodoItem, UpdateItemData};
pub use todo_list::{NewList, Todolist, UpdateListData};
pub use user::{NewUser, User};
