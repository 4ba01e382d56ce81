//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document has no string id")]
    MissingId,

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Primary engine is not durable: {0}")]
    NotDurable(String),

    #[error("Fallback store unavailable: {0}")]
    FallbackUnavailable(String),
}
