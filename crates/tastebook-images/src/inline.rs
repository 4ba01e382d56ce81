//! Base64 data URL payloads

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::entry::INLINE_PREFIX;
use crate::error::ImageError;
use crate::Result;

/// A decoded `data:image/...;base64,...` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn parse(payload: &str) -> Result<Self> {
        if !payload.starts_with(INLINE_PREFIX) {
            return Err(ImageError::NotInline);
        }

        let (header, data) = payload
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or(ImageError::NotInline)?;
        let mime = header.strip_suffix(";base64").ok_or(ImageError::NotBase64)?;

        Ok(Self {
            mime: mime.to_string(),
            bytes: STANDARD.decode(data.trim())?,
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
