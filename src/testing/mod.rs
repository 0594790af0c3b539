//! In-memory stores so services and routes can be exercised without PostgreSQL.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::database::models::{StoredItem, User};
use crate::database::{DatabaseError, ItemSearch, ItemStore, UserStore};
use crate::filter::{ItemFilter, JsonField, Pagination};
use crate::types::Role;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<String, User>>,
}

impl MemoryUserStore {
    /// Drop a user behind the service's back, as an out-of-band delete would.
    pub async fn forget(&self, username: &str) {
        self.users.write().await.remove(username);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<i64>, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Ok(None);
        }
        let id = users.values().map(|u| u.id).max().unwrap_or(0) + 1;
        users.insert(
            username.to_string(),
            User {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                role,
            },
        );
        Ok(Some(id))
    }

    async fn set_role(&self, username: &str, role: Role) -> Result<bool, DatabaseError> {
        match self.users.write().await.get_mut(username) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryItemStore {
    inner: RwLock<ItemTable>,
    offline: AtomicBool,
}

#[derive(Default)]
struct ItemTable {
    next_id: i64,
    rows: BTreeMap<i64, Value>,
}

impl MemoryItemStore {
    /// Make `health_check` fail, as an unreachable database would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn insert(&self, document: &Value) -> Result<i64, DatabaseError> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, document.clone());
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Option<StoredItem>, DatabaseError> {
        let table = self.inner.read().await;
        Ok(table.rows.get(&id).map(|data| StoredItem {
            id,
            data: data.clone(),
        }))
    }

    async fn search(
        &self,
        filter: &ItemFilter,
        pagination: &Pagination,
    ) -> Result<ItemSearch, DatabaseError> {
        let table = self.inner.read().await;
        let matching: Vec<(&i64, &Value)> = table
            .rows
            .iter()
            .filter(|(_, data)| filter_matches(filter, data))
            .collect();

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let rows = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, data)| StoredItem {
                id: **id,
                data: (*data).clone(),
            })
            .collect();

        Ok(ItemSearch {
            rows,
            total: matching.len() as i64,
        })
    }

    async fn replace(&self, id: i64, document: &Value) -> Result<bool, DatabaseError> {
        let mut table = self.inner.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = document.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionError("store is offline".to_string()));
        }
        Ok(())
    }
}

/// Evaluates an `ItemFilter` in process with the semantics of its generated SQL.
pub fn filter_matches(filter: &ItemFilter, document: &Value) -> bool {
    filter.predicates().into_iter().all(|(fields, needle)| {
        let needle = needle.to_lowercase();
        fields.iter().any(|field| {
            extract_text(document, *field)
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    })
}

/// Text value of a document path, mirroring PostgreSQL's `->>` operator.
fn extract_text(document: &Value, field: JsonField) -> Option<String> {
    let path: &[&str] = match field {
        JsonField::Name => &["name"],
        JsonField::WorkBase => &["work", "base"],
        JsonField::WorkOccupation => &["work", "occupation"],
    };
    let mut current = document;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    match current {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches(q: Option<&str>, base: Option<&str>, occupation: Option<&str>, doc: &Value) -> bool {
        filter_matches(&ItemFilter::new(q, base, occupation), doc)
    }

    #[test]
    fn extract_follows_nested_paths() {
        let doc = json!({ "name": "Bat", "work": { "base": "Gotham", "occupation": null } });
        assert_eq!(extract_text(&doc, JsonField::Name).as_deref(), Some("Bat"));
        assert_eq!(extract_text(&doc, JsonField::WorkBase).as_deref(), Some("Gotham"));
        assert_eq!(extract_text(&doc, JsonField::WorkOccupation), None);
        assert_eq!(extract_text(&json!({ "work": "none" }), JsonField::WorkBase), None);
        let numeric = json!({ "name": 42 });
        assert_eq!(extract_text(&numeric, JsonField::Name).as_deref(), Some("42"));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let bat = json!({
            "name": "Bat",
            "work": { "base": "Gotham City", "occupation": "vigilante" }
        });
        let supes = json!({ "name": "Superman", "work": { "base": "Metropolis" } });
        assert!(matches(Some("got"), None, None, &bat));
        assert!(!matches(Some("got"), None, None, &supes));
    }

    #[test]
    fn combined_terms_narrow_results() {
        let gordon = json!({
            "name": "Gordon",
            "work": { "base": "Gotham", "occupation": "police" }
        });
        let bat = json!({ "name": "Bat", "work": { "base": "Gotham", "occupation": "vigilante" } });
        assert!(matches(Some("go"), None, None, &gordon) && matches(Some("go"), None, None, &bat));
        assert!(!matches(Some("go"), None, Some("vig"), &gordon));
        assert!(matches(Some("go"), None, Some("vig"), &bat));
    }

    #[test]
    fn documents_without_work_never_match_work_filters() {
        let doc = json!({ "name": "Gotham Ghost" });
        assert!(matches(Some("gotham"), None, None, &doc));
        assert!(!matches(None, Some("gotham"), None, &doc));
        assert!(!matches(None, None, Some("ghost"), &doc));
    }

    #[test]
    fn wildcards_in_terms_are_literal() {
        assert!(!matches(Some("%"), None, None, &json!({ "name": "Bat" })));
        assert!(matches(Some("%"), None, None, &json!({ "name": "100% Bat" })));
    }

    #[tokio::test]
    async fn total_counts_every_match_beyond_the_page() {
        let store = MemoryItemStore::default();
        for name in ["Bat", "Batgirl", "Robin", "Batwoman"] {
            store.insert(&json!({ "name": name })).await.unwrap();
        }
        let filter = ItemFilter::new(Some("bat"), None, None);
        let page = Pagination {
            page: 2,
            page_size: 2,
        };
        let found = store.search(&filter, &page).await.unwrap();
        assert_eq!(found.total, 3);
        assert_eq!(found.rows.len(), 1);
        assert_eq!(found.rows[0].data["name"], "Batwoman");
    }

    #[tokio::test]
    async fn health_follows_the_offline_switch() {
        let store = MemoryItemStore::default();
        assert!(store.health_check().await.is_ok());
        store.set_offline(true);
        assert!(store.health_check().await.is_err());
    }
}
