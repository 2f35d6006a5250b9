//! Catalog models
//!
//! The product entity and the persisted catalog blob. Field names follow
//! the stored JSON, which older profiles and exported files already use;
//! prices deserialize tolerantly because hand-edited catalogs carry them
//! as numbers, `"82.00"` strings, `"$1,234.50"` strings or empty strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::{self, is_data_url};

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Available for purchase.
    #[default]
    InStock,

    /// Cannot be added to the cart.
    OutOfStock,

    /// Purchasable, will ship later.
    OnBackorder,
}

/// A legacy gallery image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image URL.
    #[serde(default)]
    pub src: String,
}

/// One of the two explicit gallery slots the editor exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySlot {
    /// Image URL, empty when the slot is unused.
    #[serde(default)]
    pub url: String,
}

/// Physical dimensions, kept as free-form strings like the editor fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length.
    #[serde(default)]
    pub length: String,

    /// Width.
    #[serde(default)]
    pub width: String,

    /// Height.
    #[serde(default)]
    pub height: String,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Millisecond-timestamp-based id; `0` until [`Product::normalize`]
    /// assigns one.
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: i64,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,

    /// Product kind (`"simple"` for everything this demo sells).
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Publication status.
    #[serde(default = "default_status")]
    pub status: String,

    /// Stock availability.
    #[serde(default)]
    pub stock_status: StockStatus,

    /// Undiscounted price.
    #[serde(default, with = "flexible_price")]
    pub regular_price: Option<Decimal>,

    /// Discounted price, when on sale.
    #[serde(default, with = "flexible_price")]
    pub sale_price: Option<Decimal>,

    /// Effective price, when set explicitly.
    #[serde(default, with = "flexible_price")]
    pub price: Option<Decimal>,

    /// Long HTML description.
    #[serde(default)]
    pub description: String,

    /// Short description shown on cards.
    #[serde(default)]
    pub short_description: String,

    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Primary image URL.
    #[serde(default)]
    pub image: String,

    /// Legacy gallery image list; never contains data URLs after
    /// normalization.
    #[serde(default)]
    pub images: Vec<ImageRef>,

    /// The two explicit gallery slots; canonicalized to exactly two
    /// entries by [`Product::normalize`].
    #[serde(default)]
    pub gallery: Vec<GallerySlot>,

    /// Whether the extra gallery slots are shown; `None` means "infer
    /// from gallery content".
    #[serde(default)]
    pub extra_images_enabled: Option<bool>,

    /// Whether stock levels are tracked.
    #[serde(default)]
    pub manage_stock: bool,

    /// Units on hand, when stock is managed.
    #[serde(default)]
    pub stock_quantity: Option<u32>,

    /// Shipping weight, free-form.
    #[serde(default)]
    pub weight: String,

    /// Physical dimensions.
    #[serde(default)]
    pub dimensions: Dimensions,

    /// Shipping class name.
    #[serde(default)]
    pub shipping_class: String,

    /// Featured flag.
    #[serde(default)]
    pub featured: bool,

    /// Limit purchases to one per order.
    #[serde(default)]
    pub sold_individually: bool,

    /// Hidden from the shop page.
    #[serde(default)]
    pub hidden: bool,
}

fn default_kind() -> String {
    "simple".to_owned()
}

fn default_status() -> String {
    "publish".to_owned()
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: 0,
            title: "New Product".to_owned(),
            slug: String::new(),
            sku: String::new(),
            kind: default_kind(),
            status: default_status(),
            stock_status: StockStatus::InStock,
            regular_price: None,
            sale_price: None,
            price: None,
            description: String::new(),
            short_description: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            image: String::new(),
            images: Vec::new(),
            gallery: vec![GallerySlot::default(), GallerySlot::default()],
            extra_images_enabled: Some(false),
            manage_stock: false,
            stock_quantity: None,
            weight: String::new(),
            dimensions: Dimensions::default(),
            shipping_class: String::new(),
            featured: false,
            sold_individually: false,
            hidden: false,
        }
    }
}

impl Product {
    /// The price a cart line captures: sale price, else explicit price,
    /// else regular price, else zero.
    pub fn effective_price(&self) -> Decimal {
        self.sale_price
            .or(self.price)
            .or(self.regular_price)
            .unwrap_or_default()
    }

    /// `true` when the product cannot be added to the cart.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_status == StockStatus::OutOfStock
    }

    /// Whether the extra gallery slots should be shown.
    pub fn extras_enabled(&self) -> bool {
        self.extra_images_enabled
            .unwrap_or_else(|| self.gallery.iter().any(|slot| !slot.url.trim().is_empty()))
    }

    /// `true` when `reference` names this product by id or slug.
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.id.to_string() == reference || (!self.slug.is_empty() && self.slug == reference)
    }

    /// Canonicalize the product in place.
    ///
    /// - the gallery becomes exactly two slots, empties preserved;
    /// - `extra_images_enabled` is resolved (explicit wins, else inferred);
    /// - `images` keeps only non-empty, non-data-URL, de-duplicated URLs
    ///   distinct from the primary image;
    /// - the primary image falls back to a gallery slot and is never a
    ///   data URL;
    /// - the title and id receive defaults when missing.
    pub fn normalize(&mut self) {
        let url1 = self
            .gallery
            .first()
            .map(|slot| slot.url.trim().to_owned())
            .unwrap_or_default();
        let url2 = self
            .gallery
            .get(1)
            .map(|slot| slot.url.trim().to_owned())
            .unwrap_or_default();

        let inferred = !url1.is_empty() || !url2.is_empty();
        self.extra_images_enabled = Some(self.extra_images_enabled.unwrap_or(inferred));

        let legacy = self.images.iter().map(|image| image.src.clone());
        let mut seen = Vec::new();
        for url in [url1.clone(), url2.clone()].into_iter().chain(legacy) {
            if url.is_empty() || is_data_url(&url) || seen.contains(&url) {
                continue;
            }
            seen.push(url);
        }

        self.gallery = vec![GallerySlot { url: url1 }, GallerySlot { url: url2 }];

        if self.image.trim().is_empty() {
            self.image = seen.first().cloned().unwrap_or_default();
        }
        if is_data_url(&self.image) {
            self.image = seen
                .iter()
                .find(|url| !is_data_url(url))
                .cloned()
                .unwrap_or_default();
        }

        self.images = seen
            .into_iter()
            .filter(|url| *url != self.image)
            .map(|src| ImageRef { src })
            .collect();

        if self.title.trim().is_empty() {
            self.title = "Untitled Product".to_owned();
        }
        if self.id == 0 {
            self.id = util::fresh_product_id();
        }
    }
}

/// The persisted catalog blob: `{ "products": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    /// The product list.
    pub products: Vec<Product>,
}

impl CatalogData {
    /// Wrap a product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// A slot only satisfies the priority chain when it holds at least
    /// one product.
    pub fn is_usable(&self) -> bool {
        !self.products.is_empty()
    }

    /// Normalize every product in place.
    pub fn normalize(&mut self) {
        for product in &mut self.products {
            product.normalize();
        }
    }
}

fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(match value {
        serde_json::Value::Number(number) => number.as_i64().unwrap_or_default(),
        serde_json::Value::String(text) => text.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Tolerant price (de)serialization: accepts numbers, price-like strings
/// and empty/null values; writes back the string form the stored JSON
/// already uses (`""` for absent).
pub(crate) mod flexible_price {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::util::parse_price;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        Ok(match value {
            serde_json::Value::Number(number) => parse_price(&number.to_string()),
            serde_json::Value::String(text) => parse_price(&text),
            _ => None,
        })
    }

    pub(crate) fn serialize<S>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match price {
            Some(value) => serializer.serialize_str(&value.to_string()),
            None => serializer.serialize_str(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn prices_deserialize_from_mixed_shapes() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 1761000000001,
                "title": "Neon City Lights",
                "regular_price": "82.00",
                "sale_price": "",
                "price": 64.5
            }"#,
        )?;

        assert_eq!(product.regular_price, Some(dec!(82.00)));
        assert_eq!(product.sale_price, None);
        assert_eq!(product.price, Some(dec!(64.5)));

        Ok(())
    }

    #[test]
    fn id_accepts_numeric_string() -> TestResult {
        let product: Product = serde_json::from_str(r#"{"id": "1761000000001"}"#)?;

        assert_eq!(product.id, 1_761_000_000_001);

        Ok(())
    }

    #[test]
    fn effective_price_precedence() -> TestResult {
        let mut product = Product {
            regular_price: Some(dec!(100)),
            price: Some(dec!(90)),
            sale_price: Some(dec!(80)),
            ..Product::default()
        };

        assert_eq!(product.effective_price(), dec!(80));

        product.sale_price = None;
        assert_eq!(product.effective_price(), dec!(90));

        product.price = None;
        assert_eq!(product.effective_price(), dec!(100));

        product.regular_price = None;
        assert_eq!(product.effective_price(), dec!(0));

        Ok(())
    }

    #[test]
    fn stock_status_uses_stored_spelling() -> TestResult {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock)?,
            "\"outofstock\""
        );
        assert_eq!(
            serde_json::from_str::<StockStatus>("\"onbackorder\"")?,
            StockStatus::OnBackorder
        );

        Ok(())
    }

    #[test]
    fn matches_reference_by_id_or_slug() {
        let product = Product {
            id: 42,
            slug: "neon-city-lights".to_owned(),
            ..Product::default()
        };

        assert!(product.matches_reference("42"));
        assert!(product.matches_reference("neon-city-lights"));
        assert!(!product.matches_reference("43"));
        assert!(!product.matches_reference(""));
    }

    #[test]
    fn normalize_canonicalizes_gallery_and_images() {
        let mut product = Product {
            id: 7,
            title: "Print".to_owned(),
            image: String::new(),
            gallery: vec![GallerySlot {
                url: " https://cdn.test/a.jpg ".to_owned(),
            }],
            images: vec![
                ImageRef {
                    src: "https://cdn.test/a.jpg".to_owned(),
                },
                ImageRef {
                    src: "data:image/png;base64,AAAA".to_owned(),
                },
                ImageRef {
                    src: "https://cdn.test/b.jpg".to_owned(),
                },
            ],
            extra_images_enabled: None,
            ..Product::default()
        };

        product.normalize();

        assert_eq!(product.gallery.len(), 2);
        assert_eq!(product.gallery[0].url, "https://cdn.test/a.jpg");
        assert_eq!(product.gallery[1].url, "");
        assert_eq!(product.extra_images_enabled, Some(true));

        // Primary fell back to the first gallery URL and was removed from
        // the legacy list; the data URL is gone.
        assert_eq!(product.image, "https://cdn.test/a.jpg");
        assert_eq!(
            product.images,
            vec![ImageRef {
                src: "https://cdn.test/b.jpg".to_owned()
            }]
        );
    }

    #[test]
    fn normalize_fills_title_and_id() {
        let mut product = Product {
            id: 0,
            title: "  ".to_owned(),
            ..Product::default()
        };

        product.normalize();

        assert_eq!(product.title, "Untitled Product");
        assert!(product.id > 0, "normalize assigns a fresh id");
    }

    #[test]
    fn normalize_never_keeps_a_data_url_primary() {
        let mut product = Product {
            id: 7,
            image: "data:image/jpeg;base64,BBBB".to_owned(),
            images: vec![ImageRef {
                src: "https://cdn.test/real.jpg".to_owned(),
            }],
            ..Product::default()
        };

        product.normalize();

        assert_eq!(product.image, "https://cdn.test/real.jpg");
    }

    #[test]
    fn catalog_usability_requires_products() {
        assert!(!CatalogData::default().is_usable());
        assert!(CatalogData::new(vec![Product::default()]).is_usable());
    }
}
