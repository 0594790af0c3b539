use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AuthError, AuthService};
use crate::database::models::{Item, ItemDetail, ItemDocument, ItemSummary};
use crate::database::{DatabaseError, ItemSearch, ItemStore};
use crate::filter::{FilterError, ItemFilter, Pagination};
use crate::types::{Identity, Role};

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found")]
    NotFound(i64),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Pagination(#[from] FilterError),

    #[error("Failed to serialize item: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Query string of `GET /items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub q: Option<String>,
    pub base: Option<String>,
    pub occupation: Option<String>,
}

/// One page of listing results. Search terms are echoed as the caller sent them.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub page: i64,
    pub page_size: i64,
    pub q: Option<String>,
    pub base: Option<String>,
    pub occupation: Option<String>,
    pub total: i64,
    pub items: Vec<ItemSummary>,
}

/// CRUD and search over the item store. Reads need any identity; writes need admin.
pub struct ItemService {
    items: Arc<dyn ItemStore>,
    default_page_size: i64,
    max_page_size: i64,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemStore>, default_page_size: i64, max_page_size: i64) -> Self {
        Self {
            items,
            default_page_size,
            max_page_size,
        }
    }

    /// Stores the modelled fields only; absent optionals are stored as `null`.
    pub async fn create(&self, item: Item, caller: &Identity) -> Result<i64, ItemError> {
        AuthService::require_role(caller, Role::Admin)?;
        let value = serde_json::to_value(item)?;
        self.store(&value, "item", caller).await
    }

    /// Stores the document exactly as the caller sent it.
    pub async fn insert_document(
        &self,
        document: ItemDocument,
        caller: &Identity,
    ) -> Result<i64, ItemError> {
        AuthService::require_role(caller, Role::Admin)?;
        let kind = document.kind();
        self.store(&document.into_value(), kind, caller).await
    }

    async fn store(&self, value: &Value, kind: &str, caller: &Identity) -> Result<i64, ItemError> {
        let id = self.items.insert(value).await?;
        tracing::info!("{} inserted {} document {}", caller.username, kind, id);
        Ok(id)
    }

    pub async fn get(&self, id: i64, caller: &Identity) -> Result<ItemDetail, ItemError> {
        let row = self.items.fetch(id).await?.ok_or(ItemError::NotFound(id))?;
        tracing::debug!("{} read item {}", caller.username, id);
        Ok(row.detail())
    }

    pub async fn list(&self, params: ListParams, caller: &Identity) -> Result<ItemPage, ItemError> {
        let pagination = Pagination::resolve(
            params.page,
            params.page_size,
            self.default_page_size,
            self.max_page_size,
        )?;
        let filter = ItemFilter::new(
            params.q.as_deref(),
            params.base.as_deref(),
            params.occupation.as_deref(),
        );

        let ItemSearch { rows, total } = self.items.search(&filter, &pagination).await?;
        tracing::debug!(
            "{} listed page {} ({} of {} items)",
            caller.username,
            pagination.page,
            rows.len(),
            total
        );

        Ok(ItemPage {
            page: pagination.page,
            page_size: pagination.page_size,
            q: params.q,
            base: params.base,
            occupation: params.occupation,
            total,
            items: rows.iter().map(|row| row.summary()).collect(),
        })
    }

    pub async fn update(
        &self,
        id: i64,
        document: ItemDocument,
        caller: &Identity,
    ) -> Result<(), ItemError> {
        AuthService::require_role(caller, Role::Admin)?;
        if !self.items.replace(id, &document.into_value()).await? {
            return Err(ItemError::NotFound(id));
        }
        tracing::info!("{} replaced item {}", caller.username, id);
        Ok(())
    }

    pub async fn delete(&self, id: i64, caller: &Identity) -> Result<(), ItemError> {
        AuthService::require_role(caller, Role::Admin)?;
        if !self.items.remove(id).await? {
            return Err(ItemError::NotFound(id));
        }
        tracing::info!("{} deleted item {}", caller.username, id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.items.health_check().await
    }
}
