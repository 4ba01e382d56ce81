//! Storage facade
//!
//! Every read and write from the tasting-management layer goes through
//! `Store`. It dispatches to whichever engine the selector picked and keeps
//! the cross-collection invariants the engines cannot:
//! - persisted tastings never carry inline image payloads
//! - blobs are deleted together with the tasting (or image) that owned them
//! - lists never keep the id of a deleted tasting
//!
//! Calls are blocking and assume a single logical writer. Issue writes one at
//! a time; no ordering is promised between calls made concurrently from
//! different threads.

use serde_json::Value;
use std::collections::HashSet;

use tastebook_images::ThumbnailSpec;
use tastebook_storage::{
    BlobStore, EngineAdapter, MigrationOutcome, Migrator, Record, StorageContext, StorageError,
    StorageMode, Table,
};

use crate::config::Config;
use crate::document::Document;
use crate::error::CoreError;
use crate::list::UserList;
use crate::pipeline::{ImageFields, ImagePipeline};
use crate::tasting::Tasting;
use crate::Result;

pub struct Store {
    ctx: StorageContext,
    blobs: BlobStore,
    pipeline: ImagePipeline,
}

/// A tasting record after the pipeline ran, ready to be written.
struct PreparedTasting {
    record: Record,
    created: Vec<String>,
    dropped: Vec<String>,
}

impl Store {
    /// Select a backend and finish any pending legacy migration before the
    /// store is handed out.
    pub fn initialize(config: &Config) -> Result<Self> {
        let ctx = tastebook_storage::select(&config.selector())?;
        Self::open(ctx, config.thumbnail)
    }

    /// Build a store over an already chosen backend, running the legacy
    /// migration first when one is attached.
    pub fn open(ctx: StorageContext, thumbnail: ThumbnailSpec) -> Result<Self> {
        let blobs = BlobStore::new(ctx.adapter().clone());
        let store = Self {
            pipeline: ImagePipeline::new(blobs.clone(), thumbnail),
            blobs,
            ctx,
        };

        let outcome = store.migrate()?;
        tracing::info!(mode = %store.mode(), ?outcome, "Storage initialized");
        Ok(store)
    }

    fn migrate(&self) -> Result<MigrationOutcome> {
        let Some(legacy) = self.ctx.legacy() else {
            return Ok(MigrationOutcome::NothingToMigrate);
        };
        if self.mode() != StorageMode::Primary {
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        Migrator::new(self.adapter(), legacy.as_ref())
            .run()
            .map_err(|e| {
                tracing::error!(error = %e, "Legacy migration failed; will retry on next start");
                CoreError::Migration(e)
            })
    }

    pub fn mode(&self) -> StorageMode {
        self.ctx.mode()
    }

    fn adapter(&self) -> &dyn EngineAdapter {
        self.ctx.adapter().as_ref()
    }

    // === Record operations ===

    pub fn list_all(&self, table: Table) -> Result<Vec<Record>> {
        Ok(self.adapter().get_all(table)?)
    }

    pub fn get_by_id(&self, table: Table, id: &str) -> Result<Option<Record>> {
        Ok(self.adapter().get_by_id(table, id)?)
    }

    /// Upsert a record and return it as persisted.
    pub fn save(&self, table: Table, record: Record) -> Result<Record> {
        let record = Record::new(record.id, record.body, record.created_at);

        if table != Table::Tastings {
            self.adapter().save(table, &record)?;
            return Ok(record);
        }

        let prepared = self.prepare_tasting(record)?;
        if let Err(e) = self.adapter().save(Table::Tastings, &prepared.record) {
            self.pipeline.discard(&prepared.created);
            return Err(e.into());
        }
        self.release(&prepared.dropped);

        Ok(prepared.record)
    }

    /// Upsert many records in one all-or-nothing write.
    pub fn save_bulk(&self, table: Table, records: Vec<Record>) -> Result<Vec<Record>> {
        let records: Vec<Record> = records
            .into_iter()
            .map(|r| Record::new(r.id, r.body, r.created_at))
            .collect();

        if table != Table::Tastings {
            self.adapter().save_bulk(table, &records)?;
            return Ok(records);
        }

        let mut prepared = Vec::with_capacity(records.len());
        for record in records {
            match self.prepare_tasting(record) {
                Ok(p) => prepared.push(p),
                Err(e) => {
                    prepared.iter().for_each(|p| self.pipeline.discard(&p.created));
                    return Err(e);
                }
            }
        }

        let records: Vec<Record> = prepared.iter().map(|p| p.record.clone()).collect();
        if let Err(e) = self.adapter().save_bulk(Table::Tastings, &records) {
            prepared.iter().for_each(|p| self.pipeline.discard(&p.created));
            return Err(e.into());
        }
        prepared.iter().for_each(|p| self.release(&p.dropped));

        Ok(records)
    }

    /// Delete by id. Unknown ids are a no-op.
    pub fn delete(&self, table: Table, id: &str) -> Result<()> {
        if table != Table::Tastings {
            return Ok(self.adapter().delete(table, id)?);
        }

        let references = self.persisted_references(id)?;
        self.blobs.delete_many(references.iter().map(String::as_str))?;

        self.adapter().delete(Table::Tastings, id)?;
        let pruned = self.prune_lists(id)?;

        tracing::info!(id = %id, lists_pruned = pruned, "Deleted tasting");
        Ok(())
    }

    pub fn get_image_payload(&self, id: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(id)?)
    }

    /// Delete every blob that no persisted tasting references.
    ///
    /// Tastings whose rows cannot be parsed are invisible here, so their blobs
    /// count as orphans.
    pub fn purge_orphan_images(&self) -> Result<usize> {
        let mut referenced = HashSet::new();
        for record in self.adapter().get_all(Table::Tastings)? {
            match ImageFields::from_body(&record.body) {
                Ok(fields) => referenced.extend(fields.references()),
                Err(e) => tracing::warn!(id = %record.id, error = %e, "Ignoring unreadable images"),
            }
        }

        let orphans: Vec<String> = self
            .blobs
            .ids()?
            .into_iter()
            .filter(|id| !referenced.contains(id))
            .collect();
        let count = self.blobs.delete_many(orphans.iter().map(String::as_str))?;

        if count > 0 {
            tracing::info!(count, "Purged orphan images");
        }
        Ok(count)
    }

    fn prepare_tasting(&self, mut record: Record) -> Result<PreparedTasting> {
        let previous = self.persisted_references(&record.id)?;

        let mut fields = ImageFields::from_body(&record.body)?;
        let created = self.pipeline.prepare_fields(&mut fields)?;
        if let Err(e) = fields.apply_to(&mut record.body) {
            self.pipeline.discard(&created);
            return Err(e);
        }

        let kept = fields.references();
        let dropped = previous.into_iter().filter(|id| !kept.contains(id)).collect();

        Ok(PreparedTasting {
            record,
            created,
            dropped,
        })
    }

    /// Blob ids held by the stored version of a tasting.
    ///
    /// A row whose body no longer parses yields none, so it can still be
    /// overwritten or deleted like any other.
    fn persisted_references(&self, id: &str) -> Result<HashSet<String>> {
        let existing = match self.adapter().get_by_id(Table::Tastings, id) {
            Ok(existing) => existing,
            Err(StorageError::Corrupt { key, reason }) => {
                tracing::warn!(id = %id, key = %key, reason = %reason, "Stored tasting is unreadable");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let Some(existing) = existing else {
            return Ok(HashSet::new());
        };
        match ImageFields::from_body(&existing.body) {
            Ok(fields) => Ok(fields.references()),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Stored tasting has unreadable images");
                Ok(HashSet::new())
            }
        }
    }

    /// Remove blobs a tasting no longer references. The record write already
    /// succeeded, so failures only leave orphans behind.
    fn release(&self, dropped: &[String]) {
        for id in dropped {
            if let Err(e) = self.blobs.delete(id) {
                tracing::warn!(blob_id = %id, error = %e, "Failed to delete dropped image");
            }
        }
    }

    fn prune_lists(&self, tasting_id: &str) -> Result<usize> {
        let mut changed = Vec::new();
        for mut record in self.adapter().get_all(Table::Lists)? {
            let Some(Value::Array(items)) = record.body.get_mut("itemIds") else {
                continue;
            };
            let before = items.len();
            items.retain(|item| item.as_str() != Some(tasting_id));
            if items.len() != before {
                changed.push(record);
            }
        }

        if !changed.is_empty() {
            self.adapter().save_bulk(Table::Lists, &changed)?;
        }
        Ok(changed.len())
    }

    // === Typed documents ===

    /// All documents of a type, newest first. Records that do not match the
    /// type are logged and skipped.
    pub fn list<D: Document>(&self) -> Result<Vec<D>> {
        let table = D::TABLE;
        let records = self.list_all(table)?;
        let mut docs = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match D::from_record(record) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(table = %table, id = %id, error = %e, "Skipping malformed document")
                }
            }
        }
        Ok(docs)
    }

    pub fn get<D: Document>(&self, id: &str) -> Result<Option<D>> {
        self.get_by_id(D::TABLE, id)?
            .map(D::from_record)
            .transpose()
    }

    pub fn put<D: Document>(&self, doc: &D) -> Result<D> {
        D::from_record(self.save(D::TABLE, doc.to_record()?)?)
    }

    pub fn put_bulk<D: Document>(&self, docs: &[D]) -> Result<Vec<D>> {
        let records = docs
            .iter()
            .map(Document::to_record)
            .collect::<Result<Vec<_>>>()?;
        self.save_bulk(D::TABLE, records)?
            .into_iter()
            .map(D::from_record)
            .collect()
    }

    pub fn remove<D: Document>(&self, id: &str) -> Result<()> {
        self.delete(D::TABLE, id)
    }

    pub fn tastings(&self) -> Result<Vec<Tasting>> {
        self.list()
    }

    pub fn lists(&self) -> Result<Vec<UserList>> {
        self.list()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::category::Category;
    use serde_json::json;
    use std::sync::Arc;
    use tastebook_images::{ImageEntry, InlineImage, INLINE_PREFIX};
    use tastebook_storage::{Database, FallbackAdapter, KvStore, PrimaryAdapter};

    pub(crate) fn primary_store() -> Store {
        store_over(Database::open_in_memory().unwrap())
    }

    fn store_over(db: Database) -> Store {
        let adapter = Arc::new(PrimaryAdapter::new(db));
        Store::open(StorageContext::new(adapter), ThumbnailSpec::default()).unwrap()
    }

    fn execute(db: &Database, sql: &str) {
        db.with_connection(|conn| {
            conn.execute(sql, [])?;
            Ok(())
        })
        .unwrap();
    }

    pub(crate) fn fallback_store(dir: &tempfile::TempDir) -> Store {
        let adapter = Arc::new(FallbackAdapter::new(KvStore::open(dir.path()).unwrap()));
        Store::open(StorageContext::new(adapter), ThumbnailSpec::default()).unwrap()
    }

    pub(crate) fn png_payload(width: u32, height: u32) -> String {
        use image::{DynamicImage, ImageFormat, RgbImage};
        use std::io::Cursor;

        let image = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 42]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        InlineImage::new("image/png", bytes).to_data_url()
    }

    fn tasting(id: &str, producer: &str, created_at: i64) -> Tasting {
        let mut t = Tasting::new(id, format!("Wine {id}"));
        t.producer = Some(producer.to_string());
        t.created_at = Some(created_at);
        t
    }

    #[test]
    fn test_round_trip_record() {
        let store = primary_store();
        let body = json!({
            "id": "t1",
            "name": "Rioja",
            "producer": null,
            "tags": ["red", "spain"],
            "nested": { "a": 1 }
        });

        let saved = store
            .save(Table::Tastings, Record::from_document(body.clone()).unwrap())
            .unwrap();
        let loaded = store.get_by_id(Table::Tastings, "t1").unwrap().unwrap();

        let mut expected = body;
        expected["createdAt"] = json!(saved.created_at);
        assert_eq!(loaded.body, expected);
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_upsert_idempotence() {
        let store = primary_store();
        store.put(&tasting("t1", "A", 1)).unwrap();
        let mut updated = tasting("t1", "B", 1);
        updated.stock = 4;
        store.put(&updated).unwrap();

        let all = store.tastings().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].producer.as_deref(), Some("B"));
        assert_eq!(all[0].stock, 4);
    }

    #[test]
    fn test_inline_image_save_scenario() {
        let store = primary_store();
        let payload = png_payload(640, 480);
        let mut t = Tasting::new("t1", "Barolo");
        t.images = vec![ImageEntry::Inline(payload.clone())];

        let saved = store.put(&t).unwrap();

        assert_eq!(saved.images.len(), 1);
        let id = saved.images[0].reference().unwrap().to_string();
        assert!(!id.starts_with(INLINE_PREFIX));
        let thumbnail = InlineImage::parse(saved.thumbnail.as_deref().unwrap()).unwrap();
        let decoded = image::load_from_memory(&thumbnail.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 75));
        assert_eq!(store.get_image_payload(&id).unwrap(), Some(payload));

        // Persisted form carries no inline payloads either
        let persisted: Tasting = store.get("t1").unwrap().unwrap();
        assert!(!persisted.has_inline_images());
        assert_eq!(persisted, saved);
    }

    #[test]
    fn test_removing_image_deletes_blob() {
        let store = primary_store();
        let mut t = Tasting::new("t1", "Barolo");
        t.images = vec![
            ImageEntry::Inline(png_payload(10, 10)),
            ImageEntry::Inline(png_payload(12, 12)),
        ];
        let mut saved = store.put(&t).unwrap();
        let removed = saved.images.remove(0).reference().unwrap().to_string();
        let kept = saved.images[0].reference().unwrap().to_string();

        store.put(&saved).unwrap();

        assert!(store.get_image_payload(&removed).unwrap().is_none());
        assert!(store.get_image_payload(&kept).unwrap().is_some());
    }

    #[test]
    fn test_orphan_free_delete() {
        let store = primary_store();
        let mut t = Tasting::new("t1", "Barolo");
        t.images = vec![ImageEntry::Inline(png_payload(30, 30))];
        let saved = store.put(&t).unwrap();
        let blob = saved.images[0].reference().unwrap().to_string();
        store.put(&Tasting::new("t2", "Rioja")).unwrap();

        let mut cellar = UserList::new("l1", "Cellar");
        cellar.add("t1");
        cellar.add("t2");
        let mut gifts = UserList::new("l2", "Gifts");
        gifts.add("t1");
        store.put_bulk(&[cellar, gifts]).unwrap();

        store.remove::<Tasting>("t1").unwrap();

        assert!(store.get::<Tasting>("t1").unwrap().is_none());
        assert!(store.get_image_payload(&blob).unwrap().is_none());
        for list in store.lists().unwrap() {
            assert!(!list.contains("t1"), "list {} still has t1", list.name);
        }
        let cellar: UserList = store.get("l1").unwrap().unwrap();
        assert_eq!(cellar.item_ids, vec!["t2"]);
    }

    #[test]
    fn test_unreadable_tasting_row_can_be_replaced_and_deleted() {
        let db = Database::open_in_memory().unwrap();
        let store = store_over(db.clone());
        execute(
            &db,
            "INSERT INTO tastings (id, body, created_at) VALUES ('bad', '{oops', 1)",
        );
        assert!(store.list_all(Table::Tastings).unwrap().is_empty());

        store
            .save(
                Table::Tastings,
                Record::new("bad", json!({ "name": "Recovered" }), 2),
            )
            .unwrap();
        let recovered: Tasting = store.get("bad").unwrap().unwrap();
        assert_eq!(recovered.name, "Recovered");

        let mut list = UserList::new("l1", "Cellar");
        list.add("bad");
        store.put(&list).unwrap();
        execute(&db, "UPDATE tastings SET body = '{oops' WHERE id = 'bad'");

        store.delete(Table::Tastings, "bad").unwrap();
        let remaining: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM tastings", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(remaining, 0);
        let list: UserList = store.get("l1").unwrap().unwrap();
        assert!(list.item_ids.is_empty());
    }

    #[test]
    fn test_empty_thumbnail_is_derived_on_save() {
        let store = primary_store();
        let body = json!({
            "id": "t1",
            "thumbnail": "",
            "images": [png_payload(40, 40)]
        });

        let saved = store
            .save(Table::Tastings, Record::from_document(body).unwrap())
            .unwrap();
        let thumbnail = saved.body["thumbnail"].as_str().unwrap();
        assert!(thumbnail.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let store = primary_store();
        store.delete(Table::Tastings, "ghost").unwrap();
        store.delete(Table::Categories, "ghost").unwrap();
    }

    #[test]
    fn test_bulk_rename_producer() {
        let store = primary_store();
        store
            .put_bulk(&[
                tasting("t1", "Bodega X", 1),
                tasting("t2", "Bodega X", 2),
                tasting("t3", "Other", 3),
            ])
            .unwrap();

        let renamed: Vec<Tasting> = store
            .tastings()
            .unwrap()
            .into_iter()
            .filter(|t| t.producer.as_deref() == Some("Bodega X"))
            .map(|mut t| {
                t.producer = Some("Bodega Y".to_string());
                t
            })
            .collect();
        assert_eq!(renamed.len(), 2);
        store.put_bulk(&renamed).unwrap();

        let all = store.tastings().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all
            .iter()
            .all(|t| t.producer.as_deref() != Some("Bodega X")));
        assert_eq!(
            all.iter()
                .filter(|t| t.producer.as_deref() == Some("Bodega Y"))
                .count(),
            2
        );
    }

    #[test]
    fn test_bulk_failure_discards_new_blobs() {
        let store = primary_store();
        let mut good = Tasting::new("t1", "Good");
        good.images = vec![ImageEntry::Inline(png_payload(8, 8))];

        let bad = Record::new("t2", json!({ "images": [1] }), 1);
        let result = store.save_bulk(Table::Tastings, vec![good.to_record().unwrap(), bad]);

        assert!(matches!(result, Err(CoreError::InvalidDocument(_))));
        assert!(store.tastings().unwrap().is_empty());
        assert!(store.blobs.ids().unwrap().is_empty());
    }

    #[test]
    fn test_purge_orphan_images() {
        let store = primary_store();
        let mut t = Tasting::new("t1", "Barolo");
        t.images = vec![ImageEntry::Inline(png_payload(8, 8))];
        let saved = store.put(&t).unwrap();
        store.blobs.put("data:image/png;base64,stray").unwrap();

        assert_eq!(store.purge_orphan_images().unwrap(), 1);
        assert_eq!(store.blobs.ids().unwrap().len(), 1);
        assert!(store
            .get_image_payload(saved.images[0].reference().unwrap())
            .unwrap()
            .is_some());
    }

    fn run_sequence(store: &Store) {
        store.put(&tasting("t1", "Bodega X", 10)).unwrap();
        store.put(&tasting("t2", "Bodega X", 20)).unwrap();
        store.put(&tasting("t3", "Other", 30)).unwrap();
        let mut red = Category::new("c1", "Red");
        red.subcategories = vec!["Tempranillo".to_string()];
        red.created_at = Some(5);
        store.put(&red).unwrap();

        let mut list = UserList::new("l1", "Favorites");
        list.created_at = Some(7);
        list.add("t1");
        list.add("t3");
        store.put(&list).unwrap();

        let mut t2 = tasting("t2", "Bodega Y", 20);
        t2.stock = 6;
        store.put(&t2).unwrap();
        store.delete(Table::Tastings, "t3").unwrap();
    }

    fn assert_same_view(primary: &Store, fallback: &Store) {
        for table in Table::ALL {
            assert_eq!(
                primary.list_all(table).unwrap(),
                fallback.list_all(table).unwrap(),
                "table {table} differs"
            );
        }

        let text_export = |store: &Store| {
            let mut snapshot = serde_json::to_value(store.export_snapshot(false).unwrap()).unwrap();
            snapshot.as_object_mut().unwrap().remove("exportedAt");
            snapshot
        };
        assert_eq!(text_export(primary), text_export(fallback));
        assert_eq!(primary.export_csv().unwrap(), fallback.export_csv().unwrap());
    }

    #[test]
    fn test_backend_equivalence() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let primary = store_over(db.clone());
        let fallback = fallback_store(&dir);

        run_sequence(&primary);
        run_sequence(&fallback);

        assert_same_view(&primary, &fallback);
        assert_eq!(
            primary.get_by_id(Table::Lists, "l1").unwrap(),
            fallback.get_by_id(Table::Lists, "l1").unwrap()
        );

        // An unreadable stored tasting is skipped by reads and does not block
        // writes to its id on either backend.
        execute(
            &db,
            "INSERT INTO tastings (id, body, created_at) VALUES ('bad', '{oops', 1)",
        );
        let kv = KvStore::open(dir.path()).unwrap();
        let mut items = kv.get("tastings").unwrap().unwrap();
        items.as_array_mut().unwrap().push(json!("oops"));
        kv.set("tastings", &items).unwrap();
        assert_same_view(&primary, &fallback);

        for store in [&primary, &fallback] {
            store
                .save(
                    Table::Tastings,
                    Record::new("bad", json!({ "name": "Recovered" }), 40),
                )
                .unwrap();
        }
        assert_same_view(&primary, &fallback);

        for store in [&primary, &fallback] {
            store.delete(Table::Tastings, "bad").unwrap();
        }
        assert_same_view(&primary, &fallback);
        assert_eq!(primary.mode(), StorageMode::Primary);
        assert_eq!(fallback.mode(), StorageMode::Fallback);
    }

    #[test]
    fn test_fallback_store_handles_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = fallback_store(&dir);
        let payload = png_payload(200, 100);
        let mut t = Tasting::new("t1", "Barolo");
        t.images = vec![ImageEntry::Inline(payload.clone())];

        let saved = store.put(&t).unwrap();
        let id = saved.images[0].reference().unwrap().to_string();
        assert_eq!(store.get_image_payload(&id).unwrap(), Some(payload));

        store.remove::<Tasting>("t1").unwrap();
        assert!(store.get_image_payload(&id).unwrap().is_none());
    }

    #[test]
    fn test_initialize_migrates_legacy_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf());

        {
            let legacy = FallbackAdapter::new(KvStore::open(&config.fallback_dir).unwrap());
            legacy
                .save(Table::Tastings, &tasting("t1", "Bodega X", 1).to_record().unwrap())
                .unwrap();
            legacy
                .save(Table::Categories, &Category::new("c1", "Red").to_record().unwrap())
                .unwrap();
            legacy.save_image("img_legacy", "data:image/png;base64,AAAA").unwrap();
        }

        let store = Store::initialize(&config).unwrap();
        assert_eq!(store.mode(), StorageMode::Primary);
        assert_eq!(store.tastings().unwrap().len(), 1);
        assert_eq!(store.list::<Category>().unwrap().len(), 1);
        assert_eq!(
            store.get_image_payload("img_legacy").unwrap().as_deref(),
            Some("data:image/png;base64,AAAA")
        );

        // New writes after migration are not overwritten by a later start
        store.put(&tasting("t1", "Bodega Z", 1)).unwrap();
        drop(store);
        let store = Store::initialize(&config).unwrap();
        let t1: Tasting = store.get("t1").unwrap().unwrap();
        assert_eq!(t1.producer.as_deref(), Some("Bodega Z"));
    }

    #[test]
    fn test_initialize_without_primary_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().to_path_buf());
        config.database_path = None;

        let store = Store::initialize(&config).unwrap();
        assert_eq!(store.mode(), StorageMode::Fallback);
        store.put(&Tasting::new("t1", "Barolo")).unwrap();

        let reopened = Store::initialize(&config).unwrap();
        assert_eq!(reopened.tastings().unwrap().len(), 1);
    }
}
