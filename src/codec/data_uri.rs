//! Data URI helpers
//!
//! Platforms that read a file "as a data URL" hand back
//! `data:<mime>;base64,<payload>`. Only the payload is ever stored.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A parsed `data:<mime>;base64,<payload>` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUri {
    /// MIME type from the header, `text/plain` when the header omits it
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64 payload, without the header
    pub payload: String,
}

/// Build a base64 data URI for the given bytes
pub fn to_data_uri(data: &[u8], mime_type: &str) -> String {
    format!(
        "{}{}{},{}",
        DATA_SCHEME,
        mime_type,
        BASE64_MARKER,
        super::encode_bytes(data)
    )
}

/// Parse a base64 data URI into its MIME type and payload
pub fn parse_data_uri(input: &str) -> Result<DataUri> {
    let rest = input
        .strip_prefix(DATA_SCHEME)
        .ok_or_else(|| Error::InvalidFormat("Missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidFormat("Missing ',' after data URI header".to_string()))?;

    let media_type = header
        .strip_suffix(BASE64_MARKER)
        .ok_or_else(|| Error::InvalidFormat("Data URI is not base64 encoded".to_string()))?;

    // parameters such as ;charset=... are not part of the MIME type
    let mime_type = media_type.split(';').next().unwrap_or_default().trim();
    let mime_type = if mime_type.is_empty() {
        "text/plain".to_string()
    } else {
        mime_type.to_ascii_lowercase()
    };

    Ok(DataUri {
        mime_type,
        payload: payload.to_string(),
    })
}
