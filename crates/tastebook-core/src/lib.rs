//! Tastebook Core
//!
//! The storage facade the tasting-management layer talks to. It owns backend
//! selection and legacy migration at startup, runs the image pipeline on every
//! tasting write, and keeps blobs and list memberships free of dangling ids.

mod category;
mod config;
mod csv;
mod document;
mod error;
mod list;
mod pipeline;
mod snapshot;
mod store;
mod tasting;

pub use category::Category;
pub use config::Config;
pub use csv::render_csv;
pub use document::Document;
pub use error::CoreError;
pub use list::UserList;
pub use pipeline::{ImageFields, ImagePipeline};
pub use snapshot::{Snapshot, SnapshotKind, SNAPSHOT_VERSION};
pub use store::Store;
pub use tasting::Tasting;

// Re-export the layers beneath the facade
pub use tastebook_images::{ImageEntry, ImageError, ThumbnailSpec};
pub use tastebook_storage::{
    EngineAdapter, MigrationOutcome, Record, StorageContext, StorageError, StorageMode, Table,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
