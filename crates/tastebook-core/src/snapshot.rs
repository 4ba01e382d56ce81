//! Portable JSON snapshots of the whole store
//!
//! Documents travel as their stored bodies, not through the typed models, so
//! fields a model does not know (or cannot read) survive an export/import
//! cycle untouched. Only `images` and `thumbnail` are rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tastebook_images::ImageEntry;
use tastebook_storage::{Record, Table};

use crate::error::CoreError;
use crate::pipeline::ImageFields;
use crate::store::Store;
use crate::Result;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotKind {
    /// Images resolved to their payloads
    Full,
    /// Images and thumbnails stripped
    TextOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tastings: Vec<Value>,
    #[serde(default)]
    pub categories: Vec<Value>,
    #[serde(default)]
    pub lists: Vec<Value>,
    pub exported_at: DateTime<Utc>,
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: SnapshotKind,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Store {
    pub fn export_snapshot(&self, include_images: bool) -> Result<Snapshot> {
        let mut tastings = Vec::new();
        for record in self.list_all(Table::Tastings)? {
            let mut body = record.body;
            if include_images {
                self.resolve_images(&record.id, &mut body)?;
            } else {
                strip_images(&mut body);
            }
            tastings.push(body);
        }

        let snapshot = Snapshot {
            tastings,
            categories: bodies(self.list_all(Table::Categories)?),
            lists: bodies(self.list_all(Table::Lists)?),
            exported_at: Utc::now(),
            version: SNAPSHOT_VERSION,
            kind: if include_images {
                SnapshotKind::Full
            } else {
                SnapshotKind::TextOnly
            },
        };

        tracing::info!(
            kind = ?snapshot.kind,
            tastings = snapshot.tastings.len(),
            categories = snapshot.categories.len(),
            lists = snapshot.lists.len(),
            "Exported snapshot"
        );
        Ok(snapshot)
    }

    /// Swap every blob reference for its payload so the snapshot is
    /// self-contained. References whose blob is gone are dropped.
    fn resolve_images(&self, id: &str, body: &mut Value) -> Result<()> {
        let mut fields = match ImageFields::from_body(body) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Exporting unreadable images as stored");
                return Ok(());
            }
        };

        let mut resolved = Vec::with_capacity(fields.images.len());
        for entry in fields.images.drain(..) {
            match entry {
                ImageEntry::Reference(blob_id) => match self.get_image_payload(&blob_id)? {
                    Some(payload) => resolved.push(ImageEntry::Inline(payload)),
                    None => {
                        tracing::warn!(id = %id, blob_id = %blob_id, "Dropping missing image from export")
                    }
                },
                inline => resolved.push(inline),
            }
        }
        fields.images = resolved;
        fields.apply_to(body)
    }

    /// Restore a snapshot. Never fails loudly: a document that cannot be read
    /// returns false before anything is written, and records that fail on
    /// their own are logged while the rest are applied.
    pub fn import_snapshot(&self, document: &Value) -> bool {
        let snapshot: Snapshot = match serde_json::from_value(document.clone()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Rejecting malformed snapshot");
                return false;
            }
        };

        if snapshot.version > SNAPSHOT_VERSION {
            tracing::error!(
                version = snapshot.version,
                supported = SNAPSHOT_VERSION,
                "Rejecting snapshot from a newer version"
            );
            return false;
        }

        let mut failures = self.import_bulk(Table::Categories, &snapshot.categories);

        // One at a time through the normal save path so inline images land
        // in the blob store.
        for body in &snapshot.tastings {
            let saved = Record::from_document(body.clone())
                .map_err(CoreError::from)
                .and_then(|record| self.save(Table::Tastings, record));
            if let Err(e) = saved {
                tracing::error!(id = ?body.get("id"), error = %e, "Failed to import tasting");
                failures += 1;
            }
        }

        failures += self.import_bulk(Table::Lists, &snapshot.lists);

        tracing::info!(
            kind = ?snapshot.kind,
            tastings = snapshot.tastings.len(),
            failures,
            "Imported snapshot"
        );
        failures == 0
    }

    pub fn import_snapshot_str(&self, text: &str) -> bool {
        match serde_json::from_str::<Value>(text) {
            Ok(document) => self.import_snapshot(&document),
            Err(e) => {
                tracing::error!(error = %e, "Snapshot is not valid JSON");
                false
            }
        }
    }

    /// Save every valid document of a table in one bulk write. Returns how
    /// many documents did not make it.
    fn import_bulk(&self, table: Table, docs: &[Value]) -> usize {
        let mut failures = 0;
        let mut records = Vec::with_capacity(docs.len());
        for body in docs {
            match Record::from_document(body.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!(table = %table, error = %e, "Skipping unusable document");
                    failures += 1;
                }
            }
        }

        let count = records.len();
        if count > 0 {
            if let Err(e) = self.save_bulk(table, records) {
                tracing::error!(table = %table, count, error = %e, "Failed to import documents");
                failures += count;
            }
        }
        failures
    }
}

fn bodies(records: Vec<Record>) -> Vec<Value> {
    records.into_iter().map(|record| record.body).collect()
}

fn strip_images(body: &mut Value) {
    if let Value::Object(map) = body {
        map.insert("images".to_string(), Value::Array(Vec::new()));
        map.remove("thumbnail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::list::UserList;
    use crate::store::tests::{fallback_store, png_payload, primary_store};
    use crate::tasting::Tasting;
    use serde_json::json;

    fn seeded(store: &Store) -> String {
        let payload = png_payload(64, 32);
        let mut t = Tasting::new("t1", "Barolo");
        t.producer = Some("Bodega X".to_string());
        t.images = vec![ImageEntry::Inline(payload.clone())];
        store.put(&t).unwrap();
        store.put(&Category::new("c1", "Red")).unwrap();
        let mut list = UserList::new("l1", "Cellar");
        list.add("t1");
        store.put(&list).unwrap();
        payload
    }

    #[test]
    fn test_full_export_resolves_images() {
        let store = primary_store();
        let payload = seeded(&store);

        let snapshot = store.export_snapshot(true).unwrap();
        assert_eq!(snapshot.kind, SnapshotKind::Full);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.tastings[0]["images"], json!([payload]));
        assert!(snapshot.tastings[0]["thumbnail"].is_string());
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.lists[0]["itemIds"], json!(["t1"]));

        let json: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "FULL");
        assert!(json["exportedAt"].is_string());
    }

    #[test]
    fn test_full_export_imports_into_other_backend() {
        let source = primary_store();
        let payload = seeded(&source);
        let document = serde_json::to_value(source.export_snapshot(true).unwrap()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = fallback_store(&dir);
        assert!(target.import_snapshot(&document));

        let imported: Tasting = target.get("t1").unwrap().unwrap();
        assert!(!imported.has_inline_images());
        assert!(imported.thumbnail.is_some());
        let id = imported.references().next().unwrap().to_string();
        assert_eq!(target.get_image_payload(&id).unwrap(), Some(payload));
        assert_eq!(target.lists().unwrap()[0].item_ids, vec!["t1"]);
    }

    #[test]
    fn test_text_only_round_trip_creates_no_blobs() {
        let source = primary_store();
        seeded(&source);
        let snapshot = source.export_snapshot(false).unwrap();
        assert_eq!(snapshot.kind, SnapshotKind::TextOnly);
        assert_eq!(snapshot.tastings[0]["images"], json!([]));
        assert!(snapshot.tastings[0].get("thumbnail").is_none());

        let target = primary_store();
        let text = snapshot.to_json().unwrap();
        assert!(target.import_snapshot_str(&text));

        let imported = target.tastings().unwrap();
        assert_eq!(imported.len(), 1);
        assert!(imported[0].images.is_empty());
        assert_eq!(imported[0].producer.as_deref(), Some("Bodega X"));
        assert_eq!(target.purge_orphan_images().unwrap(), 0);
        assert!(target.get_image_payload("anything").unwrap().is_none());
    }

    #[test]
    fn test_export_keeps_documents_the_models_cannot_read() {
        let source = primary_store();
        source
            .save(
                Table::Tastings,
                Record::new("t1", json!({ "vintage": "2015" }), 2),
            )
            .unwrap();
        source
            .save(Table::Tastings, Record::new("t2", json!({}), 1))
            .unwrap();
        source
            .save(
                Table::Categories,
                Record::new("c1", json!({ "color": "red" }), 1),
            )
            .unwrap();

        let snapshot = source.export_snapshot(false).unwrap();
        assert_eq!(snapshot.tastings.len(), 2);
        assert_eq!(snapshot.tastings[0]["vintage"], "2015");
        assert_eq!(snapshot.categories, vec![json!({ "id": "c1", "color": "red", "createdAt": 1 })]);

        let dir = tempfile::tempdir().unwrap();
        let target = fallback_store(&dir);
        assert!(target.import_snapshot(&serde_json::to_value(&snapshot).unwrap()));
        assert_eq!(target.list_all(Table::Tastings).unwrap().len(), 2);
        assert_eq!(
            target.get_by_id(Table::Categories, "c1").unwrap(),
            source.get_by_id(Table::Categories, "c1").unwrap()
        );
    }

    #[test]
    fn test_documents_without_id_are_counted_as_failures() {
        let store = primary_store();
        let document = json!({
            "tastings": [{ "id": "t1", "name": "Barolo" }, { "name": "no id" }],
            "categories": [{ "name": "no id" }],
            "exportedAt": "2026-01-01T00:00:00Z",
            "version": SNAPSHOT_VERSION,
            "type": "TEXT_ONLY"
        });

        assert!(!store.import_snapshot(&document));
        assert_eq!(store.list_all(Table::Tastings).unwrap().len(), 1);
        assert!(store.list_all(Table::Categories).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let store = primary_store();
        assert!(!store.import_snapshot(&json!({ "tastings": "nope" })));
        assert!(!store.import_snapshot(&json!([1, 2, 3])));
        assert!(!store.import_snapshot_str("{ not json"));
        assert!(!store.import_snapshot(&json!({
            "tastings": [],
            "exportedAt": "2026-01-01T00:00:00Z",
            "version": SNAPSHOT_VERSION + 1,
            "type": "FULL"
        })));
        assert!(store.tastings().unwrap().is_empty());
    }
}
