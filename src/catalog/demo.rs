//! Built-in fallback catalog
//!
//! The last resort of the priority chain: a fresh visitor with no saved
//! data, no cached demo and no network still sees a working shop.

use rust_decimal_macros::dec;

use super::models::{CatalogData, GallerySlot, ImageRef, Product, StockStatus};

struct Seed {
    id: i64,
    title: &'static str,
    slug: &'static str,
    sku: &'static str,
    stock_status: StockStatus,
    regular_price: rust_decimal::Decimal,
    categories: [&'static str; 2],
    tags: [&'static str; 3],
    image: &'static str,
    images: [&'static str; 2],
    description: &'static str,
    short_description: &'static str,
    manage_stock: bool,
    stock_quantity: Option<u32>,
}

impl Seed {
    fn build(&self) -> Product {
        Product {
            id: self.id,
            title: self.title.to_owned(),
            slug: self.slug.to_owned(),
            sku: self.sku.to_owned(),
            stock_status: self.stock_status,
            regular_price: Some(self.regular_price),
            categories: self.categories.iter().map(ToString::to_string).collect(),
            tags: self.tags.iter().map(ToString::to_string).collect(),
            image: self.image.to_owned(),
            images: self
                .images
                .iter()
                .map(|src| ImageRef {
                    src: (*src).to_owned(),
                })
                .collect(),
            gallery: vec![GallerySlot::default(), GallerySlot::default()],
            extra_images_enabled: Some(false),
            description: self.description.to_owned(),
            short_description: self.short_description.to_owned(),
            manage_stock: self.manage_stock,
            stock_quantity: self.stock_quantity,
            ..Product::default()
        }
    }
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: 1_761_000_000_001,
        title: "Neon City Lights",
        slug: "neon-city-lights",
        sku: "ARTP-NEON-001",
        stock_status: StockStatus::InStock,
        regular_price: dec!(82.00),
        categories: ["Art Prints", "Photography"],
        tags: ["neon", "city", "night"],
        image: "https://images.unsplash.com/photo-1496307042754-b4aa456c4a2d?w=1200&auto=format&fit=crop&q=80",
        images: [
            "https://images.unsplash.com/photo-1517816743773-6e0fd518b4a6?w=1000&auto=format&fit=crop&q=80",
            "https://images.unsplash.com/photo-1503602642458-232111445657?w=1000&auto=format&fit=crop&q=80",
        ],
        description: "<p>Vibrant neon reflections across a rainy avenue. Perfect centerpiece for modern spaces.</p>",
        short_description: "A vibrant nightscape bathed in neon.",
        manage_stock: true,
        stock_quantity: Some(18),
    },
    Seed {
        id: 1_761_000_000_003,
        title: "Tropical Wave",
        slug: "tropical-wave",
        sku: "ARTP-OCEAN-001",
        stock_status: StockStatus::InStock,
        regular_price: dec!(99.00),
        categories: ["Art Prints", "Nature"],
        tags: ["ocean", "surf", "blue"],
        image: "https://images.unsplash.com/photo-1472214103451-9374bd1c798e?w=1200&auto=format&fit=crop&q=80",
        images: [
            "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=1000&auto=format&fit=crop&q=80",
            "https://images.unsplash.com/photo-1504196606672-aef5c9cefc92?w=1000&auto=format&fit=crop&q=80",
        ],
        description: "<p>A crystalline breaker captured at golden hour. Cool blues with soft foam detail.</p>",
        short_description: "Serene, high-energy ocean print.",
        manage_stock: true,
        stock_quantity: Some(32),
    },
    Seed {
        id: 1_761_000_000_004,
        title: "Golden Desert Dunes",
        slug: "golden-desert-dunes",
        sku: "ARTP-DESERT-001",
        stock_status: StockStatus::InStock,
        regular_price: dec!(109.00),
        categories: ["Art Prints", "Landscape"],
        tags: ["desert", "sand", "minimal"],
        image: "https://images.unsplash.com/photo-1501785888041-af3ef285b470?w=1200&auto=format&fit=crop&q=80",
        images: [
            "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?w=1000&auto=format&fit=crop&q=80",
            "https://images.unsplash.com/photo-1501785888041-af3ef285b470?w=800&auto=format&fit=crop&q=80",
        ],
        description: "<p>Minimalist ridgelines and long shadows. Calm, warm and sculptural.</p>",
        short_description: "Minimal desert geometry.",
        manage_stock: false,
        stock_quantity: None,
    },
    Seed {
        id: 1_761_000_000_007,
        title: "Geometric Prism",
        slug: "geometric-prism",
        sku: "ARTP-GEO-001",
        stock_status: StockStatus::OutOfStock,
        regular_price: dec!(139.00),
        categories: ["Art Prints", "Abstract"],
        tags: ["geometric", "modern", "color"],
        image: "https://images.unsplash.com/photo-1520975916090-3105956dac38?w=1200&auto=format&fit=crop&q=80",
        images: [
            "https://images.unsplash.com/photo-1500534314209-a25ddb2bd429?w=1000&auto=format&fit=crop&q=80",
            "https://images.unsplash.com/photo-1501769214405-5e86a7334e36?w=1000&auto=format&fit=crop&q=80",
        ],
        description: "<p>Crystal-like geometry with saturated color transitions. Bold and contemporary.</p>",
        short_description: "Bold geometric abstraction.",
        manage_stock: false,
        stock_quantity: None,
    },
    Seed {
        id: 1_761_000_000_008,
        title: "Cosmic Aurora",
        slug: "cosmic-aurora",
        sku: "ARTP-AUR-001",
        stock_status: StockStatus::InStock,
        regular_price: dec!(149.00),
        categories: ["Art Prints", "Photography"],
        tags: ["aurora", "night", "sky"],
        image: "https://images.unsplash.com/photo-1470770841072-f978cf4d019e?w=1200&auto=format&fit=crop&q=80",
        images: [
            "https://images.unsplash.com/photo-1454789548928-9efd52dc4031?w=1000&auto=format&fit=crop&q=80",
            "https://images.unsplash.com/photo-1446776811953-b23d57bd21aa?w=1000&auto=format&fit=crop&q=80",
        ],
        description: "<p>A sweeping aurora dances under a field of stars. Deep greens and violets for a dramatic focal point.</p>",
        short_description: "Sweeping aurora under the stars.",
        manage_stock: true,
        stock_quantity: Some(12),
    },
];

/// The hardcoded fallback catalog.
pub fn demo_products() -> CatalogData {
    CatalogData::new(SEEDS.iter().map(Seed::build).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_catalog_is_usable() {
        let data = demo_products();

        assert!(data.is_usable());
        assert_eq!(data.products.len(), 5);
    }

    #[test]
    fn fallback_includes_an_out_of_stock_product() {
        let data = demo_products();

        assert!(
            data.products.iter().any(Product::is_out_of_stock),
            "geometric prism is out of stock"
        );
    }

    #[test]
    fn fallback_slugs_are_unique() {
        let data = demo_products();
        let mut slugs: Vec<&str> = data.products.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();

        assert_eq!(slugs.len(), data.products.len());
    }
}
