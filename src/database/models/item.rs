use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ITEM_KEYS: [&str; 3] = ["name", "image", "work"];
const WORK_KEYS: [&str; 2] = ["base", "occupation"];

/// Item shape accepted by `POST /items`. Unknown keys are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub work: Option<Work>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
}

/// Body of the raw insert and full-replace routes: any JSON object, stored exactly as sent.
/// Arrays, strings and other scalars are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ItemDocument(Map<String, Value>);

impl ItemDocument {
    /// `"item"` when the object uses only item keys and parses as an `Item`, else `"opaque"`.
    pub fn kind(&self) -> &'static str {
        if self.is_item_shaped() {
            "item"
        } else {
            "opaque"
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn is_item_shaped(&self) -> bool {
        let keys_fit = self.0.keys().all(|k| ITEM_KEYS.contains(&k.as_str()));
        let work_fits = match self.0.get("work") {
            Some(Value::Object(work)) => work.keys().all(|k| WORK_KEYS.contains(&k.as_str())),
            _ => true,
        };
        keys_fit && work_fits && Item::deserialize(&Value::Object(self.0.clone())).is_ok()
    }
}

impl From<Map<String, Value>> for ItemDocument {
    fn from(map: Map<String, Value>) -> Self {
        ItemDocument(map)
    }
}

/// Row of the `data` table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: i64,
    pub data: Value,
}

impl StoredItem {
    fn field(&self, key: &str) -> Value {
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            name: self.field("name"),
            image: self.field("image"),
        }
    }

    pub fn detail(&self) -> ItemDetail {
        ItemDetail {
            id: self.id,
            name: self.field("name"),
            work: self.field("work"),
            image: self.field("image"),
        }
    }
}

/// List projection: work is only returned by the detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: Value,
    pub image: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub id: i64,
    pub name: Value,
    pub work: Value,
    pub image: Value,
}
