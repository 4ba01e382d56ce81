//! Schema setup
//!
//! Every statement is idempotent so the schema can be applied on every boot.
//! Later revisions only ever add columns; nothing is dropped or recreated.

use rusqlite::Connection;

use crate::record::Table;
use crate::Result;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    for table in Table::ALL {
        create_collection_table(conn, table)?;
        ensure_created_at(conn, table)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS images (
            id TEXT PRIMARY KEY,
            data TEXT
        );

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
    "#,
    )?;

    Ok(())
}

fn create_collection_table(conn: &Connection, table: Table) -> Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            body TEXT,
            created_at INTEGER
        );"
    ))?;
    Ok(())
}

/// Early revisions stored collections without `created_at`.
fn ensure_created_at(conn: &Connection, table: Table) -> Result<()> {
    if has_column(conn, table.as_str(), "created_at")? {
        return Ok(());
    }

    tracing::info!(table = %table, "Adding missing created_at column");
    conn.execute_batch(&format!(
        "ALTER TABLE {table} ADD COLUMN created_at INTEGER"
    ))?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|name| name == column))
}
