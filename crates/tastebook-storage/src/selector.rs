//! Backend selection
//!
//! Selection is split in two: `probe` classifies what the configuration
//! offers without opening anything, and `build_adapter` turns that into a
//! live adapter. The policy is durability over performance: the SQLite engine
//! is used only when it is backed by a real file, anything else (including an
//! in-memory database) degrades to the key-value store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapter::{EngineAdapter, StorageMode};
use crate::database::Database;
use crate::error::StorageError;
use crate::fallback::FallbackAdapter;
use crate::kv::KvStore;
use crate::primary::PrimaryAdapter;
use crate::Result;

const MEMORY_PATH: &str = ":memory:";

/// Where each backend would live.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// SQLite file. `None` disables the primary engine.
    pub database_path: Option<PathBuf>,
    /// Root directory of the key-value store.
    pub fallback_dir: PathBuf,
}

/// What the runtime can offer for the primary engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Durable { path: PathBuf },
    MemoryOnly,
    Unavailable { reason: String },
}

pub fn probe(config: &SelectorConfig) -> Capability {
    let Some(path) = config.database_path.as_deref() else {
        return Capability::Unavailable {
            reason: "primary engine disabled".to_string(),
        };
    };

    if path.as_os_str().is_empty() || path == Path::new(MEMORY_PATH) {
        return Capability::MemoryOnly;
    }

    if path.is_dir() {
        return Capability::Unavailable {
            reason: format!("{} is a directory", path.display()),
        };
    }

    Capability::Durable {
        path: path.to_path_buf(),
    }
}

/// Build the session's storage context. Never fails because of the primary
/// engine; only a fallback that cannot be opened is an error.
pub fn build_adapter(capability: Capability, fallback_dir: &Path) -> Result<StorageContext> {
    match capability {
        Capability::Durable { path } => match open_primary(&path) {
            Ok(primary) => {
                let legacy = KvStore::open_existing(fallback_dir)
                    .map(|kv| Arc::new(FallbackAdapter::new(kv)) as Arc<dyn EngineAdapter>);

                tracing::info!(
                    path = %path.display(),
                    legacy = legacy.is_some(),
                    "Using primary storage engine"
                );
                return Ok(StorageContext::with_legacy(Arc::new(primary), legacy));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Primary engine unavailable");
            }
        },
        Capability::MemoryOnly => {
            tracing::warn!("Rejecting memory-only primary engine");
        }
        Capability::Unavailable { reason } => {
            tracing::info!(reason = %reason, "Primary engine unavailable");
        }
    }

    let kv = KvStore::open(fallback_dir)
        .map_err(|e| StorageError::FallbackUnavailable(format!("{}: {e}", fallback_dir.display())))?;

    tracing::info!(path = %fallback_dir.display(), "Using fallback storage engine");
    Ok(StorageContext::new(Arc::new(FallbackAdapter::new(kv))))
}

pub fn select(config: &SelectorConfig) -> Result<StorageContext> {
    build_adapter(probe(config), &config.fallback_dir)
}

fn open_primary(path: &Path) -> Result<PrimaryAdapter> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(path)?;
    if !db.is_durable()? {
        return Err(StorageError::NotDurable(path.display().to_string()));
    }

    Ok(PrimaryAdapter::new(db))
}

/// The backend chosen for this session, plus the legacy store to migrate
/// from when the primary engine is active.
#[derive(Clone)]
pub struct StorageContext {
    mode: StorageMode,
    adapter: Arc<dyn EngineAdapter>,
    legacy: Option<Arc<dyn EngineAdapter>>,
}

impl StorageContext {
    pub fn new(adapter: Arc<dyn EngineAdapter>) -> Self {
        Self::with_legacy(adapter, None)
    }

    pub fn with_legacy(
        adapter: Arc<dyn EngineAdapter>,
        legacy: Option<Arc<dyn EngineAdapter>>,
    ) -> Self {
        Self {
            mode: adapter.mode(),
            adapter,
            legacy,
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn adapter(&self) -> &Arc<dyn EngineAdapter> {
        &self.adapter
    }

    pub fn legacy(&self) -> Option<&Arc<dyn EngineAdapter>> {
        self.legacy.as_ref()
    }
}
