use async_trait::async_trait;
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::models::{StoredItem, User};
use crate::filter::{ItemFilter, Pagination};
use crate::types::Role;

/// Credential store backing the auth module
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Insert a user atomically. Returns `None` when the username is already taken.
    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<i64>, DatabaseError>;

    /// Returns `false` when no user has that username.
    async fn set_role(&self, username: &str, role: Role) -> Result<bool, DatabaseError>;
}

/// One page of matches plus the total match count, read from the same snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSearch {
    pub rows: Vec<StoredItem>,
    pub total: i64,
}

/// Item store holding one opaque JSON document per row
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, document: &Value) -> Result<i64, DatabaseError>;

    async fn fetch(&self, id: i64) -> Result<Option<StoredItem>, DatabaseError>;

    /// Matching rows in ascending id order, restricted to the page window, and the
    /// number of rows matching overall.
    async fn search(
        &self,
        filter: &ItemFilter,
        pagination: &Pagination,
    ) -> Result<ItemSearch, DatabaseError>;

    /// Returns `false` when no row has that id.
    async fn replace(&self, id: i64, document: &Value) -> Result<bool, DatabaseError>;

    /// Returns `false` when no row has that id.
    async fn remove(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
