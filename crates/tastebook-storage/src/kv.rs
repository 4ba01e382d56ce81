//! Durable key-value namespace on a directory
//!
//! Each key is one JSON file. Writes go to a temporary file first and are
//! renamed into place so a crash never leaves a half-written value behind.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::StorageError;
use crate::Result;

const EXTENSION: &str = "json";

pub struct KvStore {
    root: PathBuf,
}

impl KvStore {
    /// Open (creating if needed) the namespace rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open an existing namespace without creating anything on disk.
    pub fn open_existing<P: AsRef<Path>>(root: P) -> Option<Self> {
        let root = root.as_ref();
        root.is_dir().then(|| Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for_key(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        let content = serde_json::to_string(value)?;
        let tmp_path = self.root.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, self.path_for_key(key))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for_key(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every key currently stored, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_key(stem) {
                Some(key) => keys.push(key),
                None => tracing::warn!(file = %path.display(), "Ignoring file with undecodable key"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", encode_key(key), EXTENSION))
    }
}

/// Percent-style escaping so any key maps to a portable file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
