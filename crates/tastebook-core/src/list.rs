//! User-defined lists of tastings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tastebook_storage::Table;

use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub id: String,
    pub name: String,
    /// Tasting ids, in display order
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_ids: Vec::new(),
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn contains(&self, tasting_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == tasting_id)
    }

    pub fn add(&mut self, tasting_id: impl Into<String>) {
        let tasting_id = tasting_id.into();
        if !self.contains(&tasting_id) {
            self.item_ids.push(tasting_id);
        }
    }

    /// Returns true if the id was present.
    pub fn remove(&mut self, tasting_id: &str) -> bool {
        let before = self.item_ids.len();
        self.item_ids.retain(|id| id != tasting_id);
        self.item_ids.len() != before
    }
}

impl Document for UserList {
    const TABLE: Table = Table::Lists;

    fn id(&self) -> &str {
        &self.id
    }
}
