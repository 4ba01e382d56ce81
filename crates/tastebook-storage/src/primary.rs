//! SQLite-backed engine adapter

use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::adapter::{EngineAdapter, StorageMode};
use crate::database::Database;
use crate::error::StorageError;
use crate::record::{sort_newest_first, Record, Table};
use crate::Result;

const UPSERT_IMAGE: &str = "INSERT INTO images (id, data) VALUES (?1, ?2)
     ON CONFLICT(id) DO UPDATE SET data = excluded.data";

pub struct PrimaryAdapter {
    db: Database,
}

impl PrimaryAdapter {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn upsert(conn: &Connection, table: Table, record: &Record) -> Result<()> {
    let body = serde_json::to_string(&record.body)?;
    conn.execute(
        &format!(
            "INSERT INTO {table} (id, body, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body, created_at = excluded.created_at"
        ),
        rusqlite::params![record.id, body, record.created_at],
    )?;
    Ok(())
}

fn parse_body(table: Table, id: &str, body: Option<&str>) -> Option<Value> {
    let Some(text) = body else {
        tracing::warn!(table = %table, id = %id, "Skipping row with empty body");
        return None;
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            tracing::warn!(table = %table, id = %id, "Skipping row whose body is not an object");
            None
        }
        Err(e) => {
            tracing::warn!(table = %table, id = %id, error = %e, "Skipping unparseable row");
            None
        }
    }
}

/// Scan a table. `ordered` sorts in SQL by `created_at`; the unordered form
/// does not touch that column at all so it still works on unmigrated tables.
fn scan(conn: &Connection, table: Table, ordered: bool) -> Result<Vec<Record>> {
    let sql = if ordered {
        format!("SELECT id, body, created_at FROM {table} ORDER BY created_at DESC")
    } else {
        format!("SELECT id, body FROM {table}")
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let id: String = row.get(0)?;
        let body: Option<String> = row.get(1)?;
        let created_at: Option<i64> = if ordered { row.get(2)? } else { None };
        Ok((id, body, created_at))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, body, created_at) = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "Skipping unreadable row");
                continue;
            }
        };

        if let Some(body) = parse_body(table, &id, body.as_deref()) {
            records.push(Record::from_stored(id, body, created_at));
        }
    }

    if !ordered {
        sort_newest_first(&mut records);
    }

    Ok(records)
}

impl EngineAdapter for PrimaryAdapter {
    fn mode(&self) -> StorageMode {
        StorageMode::Primary
    }

    fn get_all(&self, table: Table) -> Result<Vec<Record>> {
        self.db.with_connection(|conn| match scan(conn, table, true) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "Ordered scan failed, retrying unordered");
                scan(conn, table, false)
            }
        })
    }

    fn get_by_id(&self, table: Table, id: &str) -> Result<Option<Record>> {
        let row = self.db.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT body, created_at FROM {table} WHERE id = ?1"),
                    [id],
                    |row| {
                        Ok((
                            row.get::<_, Option<String>>(0)?,
                            row.get::<_, Option<i64>>(1)?,
                        ))
                    },
                )
                .optional()?)
        })?;

        let Some((body, created_at)) = row else {
            return Ok(None);
        };

        let body = parse_body(table, id, body.as_deref()).ok_or_else(|| StorageError::Corrupt {
            key: format!("{table}/{id}"),
            reason: "body is not a JSON object".to_string(),
        })?;

        Ok(Some(Record::from_stored(id.to_string(), body, created_at)))
    }

    fn save(&self, table: Table, record: &Record) -> Result<()> {
        self.db.with_connection(|conn| upsert(conn, table, record))
    }

    fn save_bulk(&self, table: Table, records: &[Record]) -> Result<()> {
        self.db.transaction(|conn| {
            for record in records {
                upsert(conn, table, record)?;
            }
            Ok(())
        })?;

        tracing::debug!(table = %table, count = records.len(), "Bulk upsert committed");
        Ok(())
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
            Ok(())
        })
    }

    fn get_image(&self, id: &str) -> Result<Option<String>> {
        self.db.with_connection(|conn| {
            let data: Option<Option<String>> = conn
                .query_row("SELECT data FROM images WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(data.flatten())
        })
    }

    fn save_image(&self, id: &str, payload: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(UPSERT_IMAGE, [id, payload])?;
            Ok(())
        })
    }

    fn save_images_bulk(&self, images: &[(String, String)]) -> Result<()> {
        self.db.transaction(|conn| {
            let mut stmt = conn.prepare(UPSERT_IMAGE)?;
            for (id, payload) in images {
                stmt.execute([id, payload])?;
            }
            Ok(())
        })
    }

    fn delete_image(&self, id: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM images WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    fn image_ids(&self) -> Result<Vec<String>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM images ORDER BY id")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    fn is_empty(&self) -> Result<bool> {
        self.db.with_connection(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM tastings)",
                [],
                |row| row.get(0),
            )?;
            Ok(!exists)
        })
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.db.get_setting(key)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.db.set_setting(key, value)
    }
}
