//! Base64 encoding, decoding and validation
//!
//! All conversions use the RFC 4648 standard alphabet (`A-Z a-z 0-9 + /`)
//! with `=` padding. Encoding is total; decoding never panics and reports
//! malformed input as [`Error::DecodeFailure`].

pub mod data_uri;
pub mod sniff;

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, MSG_INVALID_BASE64};

pub use self::data_uri::{parse_data_uri, to_data_uri, DataUri};
pub use self::sniff::{is_base64_image, sniff_image_mime};

fn base64_alphabet() -> &'static Regex {
    static ALPHABET: OnceLock<Regex> = OnceLock::new();
    ALPHABET.get_or_init(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("static pattern compiles"))
}

/// Encode text as base64 over its UTF-8 bytes
pub fn encode_text(input: &str) -> String {
    STANDARD.encode(input.as_bytes())
}

/// Decode base64 into UTF-8 text
pub fn decode_to_text(input: &str) -> Result<String> {
    let bytes = decode_to_bytes(input)?;
    String::from_utf8(bytes).map_err(Error::from)
}

/// Encode binary data as base64
pub fn encode_bytes(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decode base64 into binary data
pub fn decode_to_bytes(input: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(input)
        .map_err(|e| Error::DecodeFailure(format!("Failed to decode base64: {}", e)))
}

/// Syntactic base64 check.
///
/// Returns `false` for empty or whitespace-only input, and `true` when every
/// character is in the base64 alphabet or is `=`. Length and padding are not
/// checked, so a `true` result can still fail to decode.
pub fn is_valid_base64(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    base64_alphabet().is_match(input)
}

/// Outcome of validating a candidate base64 string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the input passed the syntactic check
    pub is_valid: bool,
    /// Why the input was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Turn a failed validation into an [`Error::InvalidFormat`]
    pub fn into_result(self) -> Result<()> {
        match self.reason {
            Some(reason) if !self.is_valid => Err(Error::InvalidFormat(reason)),
            _ => Ok(()),
        }
    }
}

/// Validate a candidate base64 string, keeping the reason on failure
pub fn validate(input: &str) -> ValidationResult {
    if input.trim().is_empty() {
        ValidationResult::invalid("Input is empty")
    } else if is_valid_base64(input) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(MSG_INVALID_BASE64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_text("Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(encode_text("Hello"), "SGVsbG8=");
        assert_eq!(encode_text(""), "");
        assert_eq!(encode_bytes(&[0xff, 0x00, 0x10]), "/wAQ");
    }

    #[test]
    fn test_decode_hello() {
        assert!(is_valid_base64("SGVsbG8="));
        assert_eq!(decode_to_text("SGVsbG8=").unwrap(), "Hello");
    }

    #[test]
    fn test_text_round_trip_unicode() {
        for text in ["", "plain ascii", "héllo wörld", "日本語のテキスト", "emoji 🚀✨", "tab\tnew\nline"] {
            let encoded = encode_text(text);
            assert_eq!(decode_to_text(&encoded).unwrap(), text, "round trip failed for {text:?}");
        }
    }

    #[test]
    fn test_bytes_round_trip_every_length() {
        let data: Vec<u8> = (0..=255u8).rev().collect();
        for len in 0..data.len() {
            let slice = &data[..len];
            assert_eq!(decode_to_bytes(&encode_bytes(slice)).unwrap(), slice);
        }
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(text in any::<String>()) {
            prop_assert_eq!(decode_to_text(&encode_text(&text)).unwrap(), text);
        }

        #[test]
        fn prop_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            prop_assert_eq!(decode_to_bytes(&encode_bytes(&data)).unwrap(), data);
        }

        #[test]
        fn prop_encoded_output_passes_validator(data in proptest::collection::vec(any::<u8>(), 1..4096)) {
            let encoded = encode_bytes(&data);
            prop_assert!(!encoded.is_empty());
            prop_assert!(is_valid_base64(&encoded));
        }
    }

    #[test]
    fn test_is_valid_base64() {
        assert!(!is_valid_base64(""));
        assert!(!is_valid_base64("   "));
        assert!(!is_valid_base64("\n\t"));
        assert!(!is_valid_base64("not base64!!"));
        assert!(!is_valid_base64("SGVs bG8="));
        assert!(is_valid_base64("abc+/=="));
        // alphabet is right, length is not: accepted here, rejected by decode
        assert!(is_valid_base64("abc"));
        assert!(decode_to_bytes("abc").is_err());
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(decode_to_bytes("SGVsbG8"), Err(Error::DecodeFailure(_))));
        assert!(matches!(decode_to_bytes("not base64!!"), Err(Error::DecodeFailure(_))));
        assert!(matches!(decode_to_bytes("A"), Err(Error::DecodeFailure(_))));
        // valid base64 of bytes that are not UTF-8
        assert!(matches!(decode_to_text("/w=="), Err(Error::DecodeFailure(_))));
    }

    #[test]
    fn test_validate_reasons() {
        assert_eq!(validate("SGVsbG8=").reason, None);
        assert_eq!(validate("  ").reason.as_deref(), Some("Input is empty"));

        let invalid = validate("%%%");
        assert!(!invalid.is_valid);
        assert_eq!(invalid.reason.as_deref(), Some("Invalid base64 string"));
        assert!(matches!(invalid.into_result(), Err(Error::InvalidFormat(_))));
        assert!(validate("SGVsbG8=").into_result().is_ok());
    }

    #[test]
    fn test_validation_result_json() {
        let json = serde_json::to_value(validate("SGVsbG8=")).unwrap();
        assert_eq!(json, serde_json::json!({ "is_valid": true }));
    }
}
