//! Generic persisted unit and the collections it lives in

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::Result;

/// Named collections. Each maps to one SQL table or one key-value key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Tastings,
    Categories,
    Lists,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Tastings, Table::Categories, Table::Lists];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Tastings => "tastings",
            Table::Categories => "categories",
            Table::Lists => "lists",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Table {
    type Err = StorageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tastings" => Ok(Table::Tastings),
            "categories" => Ok(Table::Categories),
            "lists" => Ok(Table::Lists),
            _ => Err(StorageError::UnknownTable(s.to_string())),
        }
    }
}

/// A document stored in a table.
///
/// `body` is the whole document. Its `id` and `createdAt` fields are kept in
/// sync with the record's own columns so a body read back on its own is
/// self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub body: Value,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Record {
    pub fn new(id: impl Into<String>, mut body: Value, created_at: i64) -> Self {
        let id = id.into();
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::String(id.clone()));
            map.insert("createdAt".to_string(), Value::from(created_at));
        }

        Self {
            id,
            body,
            created_at,
        }
    }

    /// Build a record from a document body, taking `id` from the body and
    /// defaulting `createdAt` to now when the body has none.
    pub fn from_document(body: Value) -> Result<Self> {
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(StorageError::MissingId)?
            .to_string();
        let created_at = body
            .get("createdAt")
            .and_then(Value::as_i64)
            .unwrap_or_else(now_millis);

        Ok(Self::new(id, body, created_at))
    }

    /// Rebuild a record from a stored body whose timestamp column may be
    /// missing (rows written before the column existed).
    pub(crate) fn from_stored(id: String, body: Value, created_at: Option<i64>) -> Self {
        let created_at = created_at
            .or_else(|| body.get("createdAt").and_then(Value::as_i64))
            .unwrap_or(0);
        Self::new(id, body, created_at)
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Newest first. Stable, so ties keep their stored order.
pub(crate) fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
