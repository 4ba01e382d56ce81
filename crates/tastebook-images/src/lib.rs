//! Tastebook Images
//!
//! Image entries on a tasting are either inline payloads (base64 data URLs,
//! only valid until the next save) or references into the blob store. The
//! distinction is made once, when an entry is deserialized.

mod entry;
mod error;
mod inline;
mod thumbnail;

pub use entry::{ImageEntry, INLINE_PREFIX};
pub use error::ImageError;
pub use inline::InlineImage;
pub use thumbnail::{derive_thumbnail, ThumbnailSpec};

pub type Result<T> = std::result::Result<T, ImageError>;
