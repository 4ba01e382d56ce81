//! Key-value engine adapter
//!
//! Each collection is a single key holding the full array of documents, so
//! every write is load, modify, write back. Two overlapping writers on the
//! same collection would lose one of the updates; callers must issue writes
//! to a collection one at a time (the single-writer precondition). Bulk
//! writes are one whole-array rewrite, which is atomic against other calls
//! but not across a process crash between separate keys (images).

use serde_json::Value;

use crate::adapter::{EngineAdapter, StorageMode};
use crate::error::StorageError;
use crate::kv::KvStore;
use crate::record::{sort_newest_first, Record, Table};
use crate::Result;

const IMAGE_PREFIX: &str = "image:";
const SETTING_PREFIX: &str = "setting:";

pub struct FallbackAdapter {
    kv: KvStore,
}

impl FallbackAdapter {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    pub fn store(&self) -> &KvStore {
        &self.kv
    }

    fn load_collection(&self, table: Table) -> Result<Vec<Value>> {
        match self.kv.get(table.as_str())? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(StorageError::Corrupt {
                key: table.as_str().to_string(),
                reason: "collection is not an array".to_string(),
            }),
        }
    }

    fn store_collection(&self, table: Table, items: Vec<Value>) -> Result<()> {
        self.kv.set(table.as_str(), &Value::Array(items))
    }
}

fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

fn to_record(table: Table, item: Value) -> Option<Record> {
    let Some(id) = item_id(&item).map(str::to_string) else {
        tracing::warn!(table = %table, "Skipping stored document without an id");
        return None;
    };
    let created_at = item.get("createdAt").and_then(Value::as_i64);
    Some(Record::from_stored(id, item, created_at))
}

fn upsert_into(items: &mut Vec<Value>, record: &Record) {
    match items
        .iter()
        .position(|item| item_id(item) == Some(record.id.as_str()))
    {
        Some(index) => items[index] = record.body.clone(),
        None => items.push(record.body.clone()),
    }
}

fn image_key(id: &str) -> String {
    format!("{IMAGE_PREFIX}{id}")
}

impl EngineAdapter for FallbackAdapter {
    fn mode(&self) -> StorageMode {
        StorageMode::Fallback
    }

    fn get_all(&self, table: Table) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = self
            .load_collection(table)?
            .into_iter()
            .filter_map(|item| to_record(table, item))
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn get_by_id(&self, table: Table, id: &str) -> Result<Option<Record>> {
        Ok(self
            .load_collection(table)?
            .into_iter()
            .find(|item| item_id(item) == Some(id))
            .and_then(|item| to_record(table, item)))
    }

    fn save(&self, table: Table, record: &Record) -> Result<()> {
        self.save_bulk(table, std::slice::from_ref(record))
    }

    fn save_bulk(&self, table: Table, records: &[Record]) -> Result<()> {
        let mut items = self.load_collection(table)?;
        for record in records {
            upsert_into(&mut items, record);
        }
        self.store_collection(table, items)
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        let mut items = self.load_collection(table)?;
        let before = items.len();
        items.retain(|item| item_id(item) != Some(id));
        if items.len() == before {
            return Ok(());
        }
        self.store_collection(table, items)
    }

    fn get_image(&self, id: &str) -> Result<Option<String>> {
        match self.kv.get(&image_key(id))? {
            None => Ok(None),
            Some(Value::String(payload)) => Ok(Some(payload)),
            Some(_) => Err(StorageError::Corrupt {
                key: image_key(id),
                reason: "image payload is not a string".to_string(),
            }),
        }
    }

    fn save_image(&self, id: &str, payload: &str) -> Result<()> {
        self.kv
            .set(&image_key(id), &Value::String(payload.to_string()))
    }

    fn save_images_bulk(&self, images: &[(String, String)]) -> Result<()> {
        for (id, payload) in images {
            self.save_image(id, payload)?;
        }
        Ok(())
    }

    fn delete_image(&self, id: &str) -> Result<()> {
        self.kv.remove(&image_key(id))
    }

    fn image_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .kv
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(IMAGE_PREFIX).map(str::to_string))
            .collect())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.get_all(Table::Tastings)?.is_empty())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .kv
            .get(&format!("{SETTING_PREFIX}{key}"))?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.kv.set(
            &format!("{SETTING_PREFIX}{key}"),
            &Value::String(value.to_string()),
        )
    }
}
