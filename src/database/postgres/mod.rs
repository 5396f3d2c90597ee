// Postgres adapters for the repository traits.
//
// Tables: users, todo_lists, users_lists (ownership), todo_items, lists_items (containment).

mod items;
mod lists;
mod users;

pub use items::PgItemStore;
pub use lists::PgListStore;
pub use users::PgUserStore;
