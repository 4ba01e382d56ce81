//! Category documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tastebook_storage::Table;

use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Fields this version does not know about, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subcategories: Vec::new(),
            color: None,
            icon: None,
            created_at: None,
            extra: Map::new(),
        }
    }
}

impl Document for Category {
    const TABLE: Table = Table::Categories;

    fn id(&self) -> &str {
        &self.id
    }
}
