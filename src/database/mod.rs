pub mod items;
pub mod manager;
pub mod models;
pub mod store;
pub mod users;

pub use items::PgItemStore;
pub use manager::{DatabaseError, DatabaseManager};
pub use store::{ItemSearch, ItemStore, UserStore};
pub use users::PgUserStore;
