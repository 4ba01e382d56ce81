//! Backend-neutral storage contract

use serde::{Deserialize, Serialize};

use crate::record::{Record, Table};
use crate::Result;

/// Which physical backend serves the session. Chosen once by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Primary,
    Fallback,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Primary => "primary",
            StorageMode::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations every backend provides.
///
/// The facade and the migrator only ever talk to this trait.
pub trait EngineAdapter: Send + Sync {
    fn mode(&self) -> StorageMode;

    /// All records in a table, newest first. Unparseable rows are skipped.
    fn get_all(&self, table: Table) -> Result<Vec<Record>>;

    fn get_by_id(&self, table: Table, id: &str) -> Result<Option<Record>>;

    /// Insert or overwrite by id.
    fn save(&self, table: Table, record: &Record) -> Result<()>;

    /// Upsert every record, all or nothing.
    fn save_bulk(&self, table: Table, records: &[Record]) -> Result<()>;

    /// Deleting an unknown id is a no-op.
    fn delete(&self, table: Table, id: &str) -> Result<()>;

    fn get_image(&self, id: &str) -> Result<Option<String>>;

    fn save_image(&self, id: &str, payload: &str) -> Result<()>;

    fn save_images_bulk(&self, images: &[(String, String)]) -> Result<()>;

    fn delete_image(&self, id: &str) -> Result<()>;

    fn image_ids(&self) -> Result<Vec<String>>;

    /// True when the store holds no tastings.
    fn is_empty(&self) -> Result<bool>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;

    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}
