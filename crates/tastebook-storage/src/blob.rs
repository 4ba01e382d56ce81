//! Image blob storage
//!
//! Blobs live beside the record tables in whichever backend is active. The
//! store has no notion of ownership; whoever references a blob deletes it.

use std::sync::Arc;
use uuid::Uuid;

use crate::adapter::EngineAdapter;
use crate::Result;

const ID_PREFIX: &str = "img_";

#[derive(Clone)]
pub struct BlobStore {
    adapter: Arc<dyn EngineAdapter>,
}

impl BlobStore {
    pub fn new(adapter: Arc<dyn EngineAdapter>) -> Self {
        Self { adapter }
    }

    /// Store a payload under a freshly generated id and return the id.
    pub fn put(&self, payload: &str) -> Result<String> {
        let id = format!("{ID_PREFIX}{}", Uuid::new_v4().simple());
        self.adapter.save_image(&id, payload)?;
        tracing::debug!(blob_id = %id, bytes = payload.len(), "Stored blob");
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<Option<String>> {
        self.adapter.get_image(id)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.adapter.delete_image(id)
    }

    pub fn delete_many<'a, I>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut count = 0;
        for id in ids {
            self.adapter.delete_image(id)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn ids(&self) -> Result<Vec<String>> {
        self.adapter.image_ids()
    }
}
