//! # b64-converter: text and image <-> Base64
//!
//! `b64-converter` converts between plain text and Base64, and between image
//! files and Base64 data strings, in both directions.
//!
//! The crate is split into a pure codec and two headless panels that keep a
//! pair of fields in sync the way an interactive converter would:
//!
//! - [`codec`]: RFC 4648 encode/decode, syntactic validation, data URIs
//! - [`TextPanel`]: text <-> Base64 with an encode/decode mode
//! - [`ImagePanel`]: image file <-> Base64 with previews and downloads
//! - [`preview`]: explicit acquire/release of preview handles
//! - [`reader`]: asynchronous file reads tagged with a request id
//!
//! Conversion failures never panic; they are returned as [`Error`] values and
//! recorded as the panel's inline error.

pub mod clipboard;
pub mod codec;
pub mod error;
pub mod panel;
pub mod preview;
pub mod reader;

// Re-export commonly used types for convenience
pub use clipboard::{Clipboard, MemoryClipboard};
pub use codec::{decode_to_bytes, decode_to_text, encode_bytes, encode_text, is_valid_base64};
pub use error::{Error, Result};
pub use panel::{ConversionMode, Field, ImagePanel, ImagePanelBuilder, TextPanel};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use reader::{FileReader, FsFileReader, SelectedFile};
