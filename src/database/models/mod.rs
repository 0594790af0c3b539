pub mod item;
pub mod user;

pub use item::{Item, ItemDetail, ItemDocument, ItemSummary, StoredItem, Work};
pub use user::User;
