//! Headless converter panels
//!
//! A panel holds the two paired fields of one converter and keeps them in
//! sync according to its [`ConversionMode`]. In encode mode the base64
//! field is derived; in decode mode the other field is.

mod builder;
mod image;
mod text;

pub use builder::{ImagePanelBuilder, ImagePanelOptions};
pub use image::{Download, ImagePanel, ImagePanelState};
pub use text::{TextPanel, TextPanelState};

use serde::{Deserialize, Serialize};

/// Which field of a panel is the source of truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Raw input is edited, base64 is derived
    #[default]
    Encode,
    /// Base64 is edited, raw output is derived
    Decode,
}

impl ConversionMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ConversionMode::Encode => ConversionMode::Decode,
            ConversionMode::Decode => ConversionMode::Encode,
        }
    }

    /// Check if this is encode mode
    pub fn is_encode(self) -> bool {
        self == ConversionMode::Encode
    }

    /// Check if this is decode mode
    pub fn is_decode(self) -> bool {
        self == ConversionMode::Decode
    }
}

/// A text panel field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The plain text field
    Text,
    /// The base64 field
    Base64,
}
