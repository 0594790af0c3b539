pub mod item_service;

pub use item_service::{ItemError, ItemPage, ItemService, ListParams};
