//! Storage configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tastebook_images::ThumbnailSpec;
use tastebook_storage::SelectorConfig;

use crate::error::CoreError;
use crate::Result;

const DATA_DIR_ENV: &str = "TASTEBOOK_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file for the primary engine. `None` forces the fallback store.
    pub database_path: Option<PathBuf>,
    /// Directory of the key-value fallback store
    pub fallback_dir: PathBuf,
    /// Thumbnail size and quality
    #[serde(default)]
    pub thumbnail: ThumbnailSpec,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: Some(data_dir.join("tastebook.db")),
            fallback_dir: data_dir.join("kv"),
            thumbnail: ThumbnailSpec::default(),
        }
    }

    /// `TASTEBOOK_DATA_DIR`, else the platform's local data directory.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::data_local_dir()
            .map(|d| d.join("Tastebook"))
            .unwrap_or_else(|| PathBuf::from(".tastebook"))
    }

    /// Read a JSON config file. A missing file means defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    pub fn selector(&self) -> SelectorConfig {
        SelectorConfig {
            database_path: self.database_path.clone(),
            fallback_dir: self.fallback_dir.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
