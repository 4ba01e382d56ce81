//! Tastebook Storage Layer
//!
//! Local persistence for every Tastebook collection:
//! - One `EngineAdapter` contract over two physical backends
//! - Primary: SQLite file with one table per collection plus an image table
//! - Fallback: durable directory-backed key-value namespace
//! - Backend selection at startup and a one-shot legacy migration
//!
//! All calls are blocking. The layer assumes a single logical writer; see
//! `FallbackAdapter` for what that means for whole-collection rewrites.

mod adapter;
mod blob;
mod database;
mod error;
mod fallback;
mod kv;
mod migrations;
mod migrator;
mod primary;
mod record;
mod selector;

pub use adapter::{EngineAdapter, StorageMode};
pub use blob::BlobStore;
pub use database::Database;
pub use error::StorageError;
pub use fallback::FallbackAdapter;
pub use kv::KvStore;
pub use migrator::{MigrationOutcome, Migrator, MIGRATION_FLAG};
pub use primary::PrimaryAdapter;
pub use record::{Record, Table};
pub use selector::{build_adapter, probe, select, Capability, SelectorConfig, StorageContext};

pub type Result<T> = std::result::Result<T, StorageError>;
