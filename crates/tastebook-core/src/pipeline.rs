//! Image pipeline
//!
//! Runs before every tasting write: inline payloads are moved into the blob
//! store and replaced by their ids, and the first inline payload of a save
//! seeds the thumbnail when the tasting has none yet.

use serde_json::Value;
use std::collections::HashSet;

use tastebook_images::{derive_thumbnail, ImageEntry, ThumbnailSpec};
use tastebook_storage::BlobStore;

use crate::error::CoreError;
use crate::Result;

/// The image-bearing fields of a tasting body.
///
/// Lets the facade rewrite images on a raw record without round-tripping the
/// whole body through `Tasting`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFields {
    pub images: Vec<ImageEntry>,
    pub thumbnail: Option<String>,
    had_images: bool,
}

impl ImageFields {
    pub fn from_body(body: &Value) -> Result<Self> {
        let (images, had_images) = match body.get("images") {
            None | Some(Value::Null) => (Vec::new(), false),
            Some(value) => (
                serde_json::from_value(value.clone()).map_err(|e| {
                    CoreError::InvalidDocument(format!("images must be a list of strings: {e}"))
                })?,
                true,
            ),
        };
        let thumbnail = body
            .get("thumbnail")
            .and_then(Value::as_str)
            .filter(|thumbnail| !thumbnail.is_empty())
            .map(str::to_string);

        Ok(Self {
            images,
            thumbnail,
            had_images,
        })
    }

    pub fn apply_to(&self, body: &mut Value) -> Result<()> {
        let Value::Object(map) = body else {
            return Err(CoreError::InvalidDocument(
                "tasting body is not an object".to_string(),
            ));
        };

        if self.had_images || !self.images.is_empty() {
            map.insert("images".to_string(), serde_json::to_value(&self.images)?);
        }
        if let Some(thumbnail) = &self.thumbnail {
            map.insert("thumbnail".to_string(), Value::String(thumbnail.clone()));
        }
        Ok(())
    }

    pub fn references(&self) -> HashSet<String> {
        self.images
            .iter()
            .filter_map(ImageEntry::reference)
            .map(str::to_string)
            .collect()
    }
}

#[derive(Clone)]
pub struct ImagePipeline {
    blobs: BlobStore,
    spec: ThumbnailSpec,
}

impl ImagePipeline {
    pub fn new(blobs: BlobStore, spec: ThumbnailSpec) -> Self {
        Self { blobs, spec }
    }

    /// Store every inline entry and swap in its blob id.
    ///
    /// Returns the ids of the blobs written, so the caller can discard them if
    /// the record write that follows fails. If storing a blob fails, the ones
    /// already written by this call are removed before the error is returned.
    pub fn prepare(
        &self,
        images: &mut [ImageEntry],
        thumbnail: &mut Option<String>,
    ) -> Result<Vec<String>> {
        let mut created = Vec::new();
        let mut first_inline = true;

        for entry in images.iter_mut() {
            let ImageEntry::Inline(payload) = entry else {
                continue;
            };

            if first_inline && thumbnail.as_deref().map_or(true, str::is_empty) {
                match derive_thumbnail(payload, &self.spec) {
                    Ok(thumb) => *thumbnail = Some(thumb),
                    Err(e) => tracing::warn!(error = %e, "Could not derive thumbnail"),
                }
            }
            first_inline = false;

            match self.blobs.put(payload) {
                Ok(id) => {
                    created.push(id.clone());
                    *entry = ImageEntry::Reference(id);
                }
                Err(e) => {
                    self.discard(&created);
                    return Err(e.into());
                }
            }
        }

        Ok(created)
    }

    pub fn prepare_fields(&self, fields: &mut ImageFields) -> Result<Vec<String>> {
        self.prepare(&mut fields.images, &mut fields.thumbnail)
    }

    /// Best-effort removal of blobs written for a save that did not land.
    pub fn discard(&self, ids: &[String]) {
        for id in ids {
            if let Err(e) = self.blobs.delete(id) {
                tracing::warn!(blob_id = %id, error = %e, "Failed to discard blob");
            }
        }
    }
}
