//! Upload
//!
//! The image-upload pipeline: content sniffing, validated persistence
//! under a hardened directory, and a processing step that falls back to
//! an inline data URL when the uploader is unavailable.

use thiserror::Error;

pub mod pipeline;
pub mod sniff;
pub mod store;

pub use pipeline::{ImagePipeline, ImageUploader, ProcessedImage, product_draft};
pub use sniff::{ImageKind, dimensions, sniff};
pub use store::{ImageStore, UploadReceipt};

/// Reasons an upload is rejected.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No bytes were received.
    #[error("no file uploaded")]
    Empty,

    /// The payload exceeds the size limit.
    #[error("file too large (limit {limit} bytes)")]
    TooLarge {
        /// The configured size limit in bytes.
        limit: u64,
    },

    /// The bytes are not one of the accepted image formats.
    #[error("unsupported image type")]
    UnsupportedType,

    /// The bytes carry an image signature but no readable header.
    #[error("invalid image data")]
    InvalidImage,

    /// The upload directory or target file could not be written.
    #[error("upload could not be stored")]
    Io(#[from] std::io::Error),
}

/// Validate upload bytes: non-empty, within the limit, a recognized
/// image format with a readable header.
pub(crate) fn validate(
    bytes: &[u8],
    max_bytes: u64,
) -> Result<(sniff::ImageKind, (u32, u32)), UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() as u64 > max_bytes {
        return Err(UploadError::TooLarge { limit: max_bytes });
    }

    let kind = sniff::sniff(bytes).ok_or(UploadError::UnsupportedType)?;
    let size = sniff::dimensions(bytes).ok_or(UploadError::InvalidImage)?;

    Ok((kind, size))
}
