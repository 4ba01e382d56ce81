//! Tasting documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tastebook_images::ImageEntry;
use tastebook_storage::Table;

use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tasting {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vintage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Bottles (or units) on hand
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink_from: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink_to: Option<i32>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    /// Small inline JPEG for list rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Milliseconds since the Unix epoch; filled in on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tasting {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            producer: None,
            variety: None,
            label: None,
            batch: None,
            category: None,
            subcategory: None,
            country: None,
            region: None,
            purchase_location: None,
            vintage: None,
            abv: None,
            price: None,
            stock: 0,
            score: None,
            is_favorite: false,
            notes: None,
            pairing: None,
            drink_from: None,
            drink_to: None,
            images: Vec::new(),
            thumbnail: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Blob ids this tasting points at.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.images.iter().filter_map(ImageEntry::reference)
    }

    pub fn has_inline_images(&self) -> bool {
        self.images.iter().any(ImageEntry::is_inline)
    }
}

impl Document for Tasting {
    const TABLE: Table = Table::Tastings;

    fn id(&self) -> &str {
        &self.id
    }
}
