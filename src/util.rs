//! Utilities
//!
//! Small formatting and parsing helpers shared by the catalog, cart and
//! upload modules.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Turn arbitrary text into a URL-safe slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen and trims leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Parse a price out of a user-supplied value.
///
/// Tolerates currency symbols, commas and surrounding whitespace
/// (`"$1,234.50"` parses as `1234.50`). Returns `None` for empty or
/// unparseable input.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

/// Extract the first `12` / `12.34` style number from free text.
///
/// Used to pick a price out of uploaded image filenames such as
/// `"sunset print $45.00.jpg"`.
pub fn extract_price(text: &str) -> Option<Decimal> {
    let mut number = String::new();
    let mut seen_dot = false;

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
        } else if ch == '.' && !number.is_empty() && !seen_dot {
            number.push(ch);
            seen_dot = true;
        } else if !number.is_empty() {
            break;
        }
    }

    // A trailing dot ("45.") is not a price fragment.
    let trimmed = number.trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse().ok()
}

/// Format a price for display, always with two decimal places.
pub fn format_price(price: Option<Decimal>) -> String {
    let value = price.unwrap_or_default();
    format!("${:.2}", value.round_dp(2))
}

/// Human-readable file size (`"1.5 MB"`).
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_owned();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    let name = UNITS.get(unit).unwrap_or(&"Bytes");
    format!("{rounded} {name}")
}

/// Generate a fresh product id.
///
/// Millisecond timestamp plus a small random component, matching the id
/// scheme the demo catalogs already use.
pub fn fresh_product_id() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default();

    millis + rand::thread_rng().gen_range(0..1000)
}

/// `true` when the URL is an inline `data:` URL rather than a fetchable one.
pub fn is_data_url(url: &str) -> bool {
    url.trim_start().starts_with("data:")
}

/// The zero price.
pub fn zero() -> Decimal {
    dec!(0)
}
