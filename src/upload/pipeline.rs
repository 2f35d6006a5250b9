//! Image pipeline
//!
//! Processing of user-supplied images: validate, hand off to the
//! uploader, and degrade to an inline data URL when the uploader is
//! unreachable so the catalog keeps working offline. Also builds
//! product drafts out of uploaded image filenames.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use mockall::automock;
use rand::Rng;
use rust_decimal::Decimal;

use super::{UploadError, store::UploadReceipt, validate};
use crate::{
    catalog::{ImageRef, Product},
    config::ImageConfig,
    util::{extract_price, fresh_product_id, slugify},
};

/// The remote side of the upload flow.
#[automock]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload image bytes, returning where they ended up.
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadReceipt, UploadError>;
}

/// Where a processed image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// Either the uploader's public URL or an inline data URL.
    pub url: String,

    /// `false` when the data-URL fallback was taken.
    pub hosted: bool,
}

/// The validate-upload-fallback flow.
pub struct ImagePipeline {
    uploader: Arc<dyn ImageUploader>,
    config: ImageConfig,
}

impl ImagePipeline {
    #[must_use]
    pub fn new(uploader: Arc<dyn ImageUploader>) -> Self {
        Self::with_config(uploader, ImageConfig::default())
    }

    /// A pipeline with custom image limits.
    #[must_use]
    pub fn with_config(uploader: Arc<dyn ImageUploader>, config: ImageConfig) -> Self {
        Self { uploader, config }
    }

    /// Validate and upload an image, falling back to an inline data URL
    /// when the uploader fails.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] only for invalid input; uploader
    /// failures are downgraded to the fallback, not surfaced.
    pub async fn process(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ProcessedImage, UploadError> {
        let (kind, _) = validate(bytes, self.config.max_bytes)?;

        match self.uploader.upload(filename, bytes).await {
            Ok(receipt) => Ok(ProcessedImage {
                url: receipt.url,
                hosted: true,
            }),
            Err(error) => {
                tracing::warn!(filename, %error, "upload failed, inlining as data URL");
                let encoded = STANDARD.encode(bytes);
                Ok(ProcessedImage {
                    url: format!("data:{};base64,{encoded}", kind.mime()),
                    hosted: false,
                })
            }
        }
    }
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build a catalog product from an uploaded image.
///
/// The title comes from the filename with its extension stripped and
/// separators spaced out; a `$45.00`-style fragment in the name becomes
/// the price, otherwise one is drawn from the 50-250 range. `index`
/// keeps ids and fallback names unique within one batch.
#[must_use]
pub fn product_draft(filename: &str, image_url: &str, index: usize) -> Product {
    let basename = filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
        .replace(['-', '_'], " ")
        .trim()
        .to_owned();

    let price = extract_price(&basename)
        .unwrap_or_else(|| Decimal::new(rand::thread_rng().gen_range(5000..25000), 2));

    let mut title = strip_price_tag(&basename);
    if title.is_empty() {
        title = format!("Product {}", index + 1);
    }

    Product {
        id: fresh_product_id() + index as i64,
        slug: slugify(&title),
        title,
        image: image_url.to_owned(),
        images: vec![ImageRef {
            src: image_url.to_owned(),
        }],
        regular_price: Some(price),
        price: Some(price),
        categories: vec!["Artwork".to_owned()],
        tags: vec!["art".to_owned()],
        description: "<p>Beautiful original artwork from your collection.</p>".to_owned(),
        short_description: "A stunning piece from your collection.".to_owned(),
        ..Product::default()
    }
}

/// Remove a trailing `$45.00`-style fragment from a draft title.
fn strip_price_tag(text: &str) -> String {
    let Some(pos) = text.find('$') else {
        return text.trim().to_owned();
    };

    let (before, rest) = text.split_at(pos);
    let after = rest
        .trim_start_matches('$')
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c.is_whitespace());

    let before = before.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    format!("{before} {after}").trim().to_owned()
}
