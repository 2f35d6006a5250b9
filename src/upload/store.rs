//! Image store
//!
//! Validated persistence of uploaded images under a hardened directory.
//! Files are stored under a randomized basename with the extension
//! derived from the sniffed content, never from the declared filename.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{UploadError, validate};
use crate::config::ImageConfig;

/// Apache guard written into the upload directory so nothing stored
/// there can ever execute as a script.
const DIRECTORY_GUARD: &str = "Options -Indexes\n\
<FilesMatch \"\\.(php|phar|phtml|pl|cgi|sh)$\">\n\
Deny from all\n\
</FilesMatch>\n";

/// The stored-image result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Always `true`; failures surface as errors instead.
    pub ok: bool,

    /// Public URL of the stored file.
    pub url: String,

    /// Basename plus content-derived extension.
    pub filename: String,

    /// MIME type derived from the sniffed content.
    pub mime: String,

    /// Pixel width from the image header.
    pub width: u32,

    /// Pixel height from the image header.
    pub height: u32,

    /// Stored size in bytes.
    pub bytes: u64,
}

/// Filesystem-backed image storage.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_base: String,
    max_bytes: u64,
}

impl ImageStore {
    /// Open (creating if needed) an upload directory mapped to the given
    /// public base URL.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or its guard file cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>, public_base: impl Into<String>) -> Result<Self, UploadError> {
        Self::open_with_limit(dir, public_base, ImageConfig::default().max_bytes)
    }

    /// [`ImageStore::open`] with a custom size limit.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or its guard file cannot be
    /// created.
    pub fn open_with_limit(
        dir: impl Into<PathBuf>,
        public_base: impl Into<String>,
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let guard = dir.join(".htaccess");
        if !guard.exists() {
            fs::write(&guard, DIRECTORY_GUARD)?;
        }

        Ok(Self {
            dir,
            public_base: public_base.into().trim_end_matches('/').to_owned(),
            max_bytes,
        })
    }

    /// The directory files are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] for empty, oversized, unrecognized or
    /// unreadable payloads, or if the file cannot be written.
    pub fn store(&self, bytes: &[u8]) -> Result<UploadReceipt, UploadError> {
        let (kind, (width, height)) = validate(bytes, self.max_bytes)?;

        let basename = format!("{:016x}", rand::thread_rng().r#gen::<u64>());
        let filename = format!("{basename}.{}", kind.extension());
        fs::write(self.dir.join(&filename), bytes)?;

        Ok(UploadReceipt {
            ok: true,
            url: format!("{}/{filename}", self.public_base),
            filename,
            mime: kind.mime().to_owned(),
            width,
            height,
            bytes: bytes.len() as u64,
        })
    }
}
