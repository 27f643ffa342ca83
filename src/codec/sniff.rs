//! Image signature detection

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const JPEG: &[u8] = &[0xff, 0xd8, 0xff];
const GIF87A: &[u8] = b"GIF87a";
const GIF89A: &[u8] = b"GIF89a";
const RIFF: &[u8] = b"RIFF";
const WEBP: &[u8] = b"WEBP";
const BMP: &[u8] = b"BM";

/// Guess an image MIME type from the leading bytes
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else if bytes.starts_with(GIF87A) || bytes.starts_with(GIF89A) {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(RIFF) && &bytes[8..12] == WEBP {
        Some("image/webp")
    } else if bytes.starts_with(BMP) {
        Some("image/bmp")
    } else {
        None
    }
}

/// Whether the string is base64 for JPEG data
pub fn is_base64_image(input: &str) -> bool {
    if !super::is_valid_base64(input) {
        return false;
    }
    match super::decode_to_bytes(input) {
        Ok(bytes) => bytes.starts_with(JPEG),
        Err(_) => false,
    }
}
