//! Image entry variant

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Signature shared by every inline payload.
pub const INLINE_PREFIX: &str = "data:image/";

/// One element of a tasting's `images` sequence.
///
/// Serialized as a bare string either way, so stored documents keep the
/// shape older clients wrote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageEntry {
    /// Self-contained encoded payload awaiting storage
    Inline(String),
    /// Id of a blob store entry
    Reference(String),
}

impl ImageEntry {
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(INLINE_PREFIX) {
            ImageEntry::Inline(value)
        } else {
            ImageEntry::Reference(value)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageEntry::Inline(payload) => payload,
            ImageEntry::Reference(id) => id,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageEntry::Inline(_))
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            ImageEntry::Reference(id) => Some(id),
            ImageEntry::Inline(_) => None,
        }
    }
}

impl Serialize for ImageEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ImageEntry::parse)
    }
}
