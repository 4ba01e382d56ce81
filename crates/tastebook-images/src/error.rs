//! Image error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Not an inline image payload")]
    NotInline,

    #[error("Inline payload is not base64 encoded")]
    NotBase64,

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),
}
