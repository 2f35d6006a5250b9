//! Image sniffing
//!
//! Magic-byte format detection and header-level dimension extraction.
//! The declared filename or content type is never trusted; the stored
//! extension and MIME type derive from these checks alone.

/// An accepted image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// The MIME type for this format.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// The file extension used when persisting this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Detect the image format from magic bytes. `None` for anything that is
/// not a JPEG, PNG, GIF or WebP.
#[must_use]
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageKind::Jpeg);
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageKind::Png);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageKind::Gif);
    }
    if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP") {
        return Some(ImageKind::Webp);
    }
    None
}

/// Read the pixel dimensions out of the image header.
///
/// Returns `None` when the bytes are not a recognized format or the
/// header is truncated or malformed.
#[must_use]
pub fn dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    match sniff(bytes)? {
        ImageKind::Jpeg => jpeg_dimensions(bytes),
        ImageKind::Png => png_dimensions(bytes),
        ImageKind::Gif => gif_dimensions(bytes),
        ImageKind::Webp => webp_dimensions(bytes),
    }
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes([
        *bytes.get(at)?,
        *bytes.get(at.checked_add(1)?)?,
    ]))
}

fn le_u16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes([
        *bytes.get(at)?,
        *bytes.get(at.checked_add(1)?)?,
    ]))
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes([
        *bytes.get(at)?,
        *bytes.get(at.checked_add(1)?)?,
        *bytes.get(at.checked_add(2)?)?,
        *bytes.get(at.checked_add(3)?)?,
    ]))
}

/// IHDR is always the first chunk: width and height sit at fixed offsets
/// past the signature and chunk header.
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.get(12..16) != Some(b"IHDR") {
        return None;
    }
    Some((be_u32(bytes, 16)?, be_u32(bytes, 20)?))
}

/// Logical screen size from the header, little-endian.
fn gif_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    Some((u32::from(le_u16(bytes, 6)?), u32::from(le_u16(bytes, 8)?)))
}

/// Walk the marker segments until a start-of-frame carries the size.
fn jpeg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2_usize;

    loop {
        while *bytes.get(pos)? != 0xFF {
            pos = pos.checked_add(1)?;
        }
        while *bytes.get(pos)? == 0xFF {
            pos = pos.checked_add(1)?;
        }
        let marker = *bytes.get(pos)?;
        pos = pos.checked_add(1)?;

        match marker {
            // Standalone markers carry no payload.
            0x01 | 0xD0..=0xD8 => {}
            // End of image before any frame header.
            0xD9 => return None,
            // SOF0..SOF15, minus the non-frame markers in that range.
            0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                let height = u32::from(be_u16(bytes, pos.checked_add(3)?)?);
                let width = u32::from(be_u16(bytes, pos.checked_add(5)?)?);
                return Some((width, height));
            }
            _ => {
                let length = usize::from(be_u16(bytes, pos)?);
                pos = pos.checked_add(length)?;
            }
        }
    }
}

/// Dimensions from whichever chunk follows the container header: lossy
/// `VP8 `, lossless `VP8L` or extended `VP8X`.
fn webp_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    match bytes.get(12..16)? {
        b"VP8 " => {
            // Key frame sync code, then 14-bit dimensions.
            if bytes.get(23..26) != Some(&[0x9D, 0x01, 0x2A]) {
                return None;
            }
            let width = u32::from(le_u16(bytes, 26)? & 0x3FFF);
            let height = u32::from(le_u16(bytes, 28)? & 0x3FFF);
            Some((width, height))
        }
        b"VP8L" => {
            if *bytes.get(20)? != 0x2F {
                return None;
            }
            let b0 = u32::from(*bytes.get(21)?);
            let b1 = u32::from(*bytes.get(22)?);
            let b2 = u32::from(*bytes.get(23)?);
            let b3 = u32::from(*bytes.get(24)?);
            let width = 1 + (((b1 & 0x3F) << 8) | b0);
            let height = 1 + (((b3 & 0x0F) << 10) | (b2 << 2) | (b1 >> 6));
            Some((width, height))
        }
        b"VP8X" => {
            let read_u24 = |at: usize| -> Option<u32> {
                Some(
                    u32::from(*bytes.get(at)?)
                        | (u32::from(*bytes.get(at.checked_add(1)?)?) << 8)
                        | (u32::from(*bytes.get(at.checked_add(2)?)?) << 16),
                )
            };
            Some((read_u24(24)? + 1, read_u24(27)? + 1))
        }
        _ => None,
    }
}

/// Minimal valid image headers used by upload tests.
#[cfg(test)]
pub(crate) mod samples {
    pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend(13_u32.to_be_bytes());
        bytes.extend(b"IHDR");
        bytes.extend(width.to_be_bytes());
        bytes.extend(height.to_be_bytes());
        bytes.extend([8, 6, 0, 0, 0]);
        bytes
    }

    pub(crate) fn tiny_gif(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend(width.to_le_bytes());
        bytes.extend(height.to_le_bytes());
        bytes.extend([0, 0, 0]);
        bytes
    }

    pub(crate) fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        // An APP0 segment before the frame header.
        bytes.extend([0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]);
        // SOF0: length, precision, height, width, component count.
        bytes.extend([0xFF, 0xC0, 0x00, 0x11, 0x08]);
        bytes.extend(height.to_be_bytes());
        bytes.extend(width.to_be_bytes());
        bytes.push(0x03);
        bytes
    }

    pub(crate) fn tiny_webp(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend(20_u32.to_le_bytes());
        bytes.extend(b"WEBP");
        bytes.extend(b"VP8 ");
        bytes.extend(12_u32.to_le_bytes());
        bytes.extend([0x00, 0x00, 0x00]);
        bytes.extend([0x9D, 0x01, 0x2A]);
        bytes.extend(width.to_le_bytes());
        bytes.extend(height.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::{samples::*, *};

    #[test]
    fn sniffs_each_format_from_magic_bytes() {
        assert_eq!(sniff(&tiny_jpeg(10, 20)), Some(ImageKind::Jpeg));
        assert_eq!(sniff(&tiny_png(10, 20)), Some(ImageKind::Png));
        assert_eq!(sniff(&tiny_gif(10, 20)), Some(ImageKind::Gif));
        assert_eq!(sniff(&tiny_webp(10, 20)), Some(ImageKind::Webp));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert_eq!(sniff(b"not an image"), None);
        assert_eq!(sniff(b"<?php echo 1; ?>"), None);
        assert_eq!(sniff(&[]), None);
    }

    #[test]
    fn riff_without_webp_fourcc_is_not_an_image() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend(12_u32.to_le_bytes());
        bytes.extend(b"WAVE");
        assert_eq!(sniff(&bytes), None);
    }

    #[test]
    fn png_header_dimensions() {
        assert_eq!(dimensions(&tiny_png(1200, 800)), Some((1200, 800)));
    }

    #[test]
    fn gif_header_dimensions() {
        assert_eq!(dimensions(&tiny_gif(640, 480)), Some((640, 480)));
    }

    #[test]
    fn jpeg_frame_dimensions_found_past_app_segments() {
        assert_eq!(dimensions(&tiny_jpeg(1024, 768)), Some((1024, 768)));
    }

    #[test]
    fn webp_lossy_dimensions() {
        assert_eq!(dimensions(&tiny_webp(320, 240)), Some((320, 240)));
    }

    #[test]
    fn truncated_headers_yield_no_dimensions() {
        let png = tiny_png(10, 10);
        assert_eq!(dimensions(png.get(..14).unwrap_or_default()), None);

        // A JPEG cut off before its frame header.
        assert_eq!(dimensions(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04]), None);
    }
}
