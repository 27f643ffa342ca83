//! Text <-> base64 panel

use log::{debug, warn};

use crate::clipboard::Clipboard;
use crate::codec::{self, ValidationResult};
use crate::error::{Error, Result, MSG_INVALID_BASE64};

use super::{ConversionMode, Field};

/// Coarse state of a text panel's source field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPanelState {
    /// The source field is empty
    Empty,
    /// The derived field reflects the source field
    Valid,
    /// The source field could not be converted
    Invalid,
}

/// Keeps a text field and a base64 field in sync
#[derive(Debug, Default)]
pub struct TextPanel {
    mode: ConversionMode,
    text: String,
    base64: String,
    error: Option<Error>,
}

impl TextPanel {
    /// Create an empty panel in encode mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current mode
    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Current text field contents
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current base64 field contents
    pub fn base64(&self) -> &str {
        &self.base64
    }

    /// The inline error, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Banner text for the inline error
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(Error::user_message)
    }

    /// The text field is derived in decode mode
    pub fn is_text_read_only(&self) -> bool {
        self.mode.is_decode()
    }

    /// The base64 field is derived in encode mode
    pub fn is_base64_read_only(&self) -> bool {
        self.mode.is_encode()
    }

    /// Syntactic check of the base64 field
    pub fn validation(&self) -> ValidationResult {
        codec::validate(&self.base64)
    }

    /// Summarize the panel state
    pub fn state(&self) -> TextPanelState {
        let source = match self.mode {
            ConversionMode::Encode => &self.text,
            ConversionMode::Decode => &self.base64,
        };
        if source.is_empty() {
            TextPanelState::Empty
        } else if self.error.is_some() {
            TextPanelState::Invalid
        } else {
            TextPanelState::Valid
        }
    }

    /// Edit the text field and re-encode. Encode mode only.
    pub fn set_text(&mut self, value: impl Into<String>) -> Result<()> {
        if self.is_text_read_only() {
            debug!("Text field is read-only in decode mode");
            return Err(Error::ReadOnlyField("text".to_string()));
        }

        self.text = value.into();
        self.base64 = codec::encode_text(&self.text);
        self.error = None;
        Ok(())
    }

    /// Edit the base64 field and re-decode. Decode mode only.
    ///
    /// A syntactically invalid or undecodable value is kept as typed, the
    /// text field is left stale and the error is both recorded and returned.
    pub fn set_base64(&mut self, value: impl Into<String>) -> Result<()> {
        if self.is_base64_read_only() {
            debug!("Base64 field is read-only in encode mode");
            return Err(Error::ReadOnlyField("base64".to_string()));
        }

        self.base64 = value.into();

        if self.base64.is_empty() {
            self.text.clear();
            self.error = None;
            return Ok(());
        }

        if !codec::is_valid_base64(&self.base64) {
            return self.fail(Error::InvalidFormat(MSG_INVALID_BASE64.to_string()));
        }

        match codec::decode_to_text(&self.base64) {
            Ok(text) => {
                self.text = text;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Error decoding base64: {}", e);
                self.fail(Error::DecodeFailure(MSG_INVALID_BASE64.to_string()))
            }
        }
    }

    /// Switch modes. Only the error is cleared; both fields keep their contents.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
        debug!("Text panel switched to {:?} mode", self.mode);
    }

    /// Copy a field to the clipboard
    pub fn copy(&self, field: Field, clipboard: &dyn Clipboard) -> Result<()> {
        let content = match field {
            Field::Text => &self.text,
            Field::Base64 => &self.base64,
        };
        clipboard.write_text(content)
    }

    fn fail(&mut self, error: Error) -> Result<()> {
        self.error = Some(error.clone());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn decode_panel() -> TextPanel {
        let mut panel = TextPanel::new();
        panel.toggle_mode();
        panel
    }

    #[test]
    fn test_encode_mode_tracks_text() {
        let mut panel = TextPanel::new();
        assert_eq!(panel.mode(), ConversionMode::Encode);
        assert_eq!(panel.state(), TextPanelState::Empty);

        panel.set_text("Hello, World!").unwrap();
        assert_eq!(panel.base64(), "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(panel.state(), TextPanelState::Valid);

        panel.set_text("Hello").unwrap();
        assert_eq!(panel.base64(), "SGVsbG8=");

        panel.set_text("").unwrap();
        assert_eq!(panel.base64(), "");
        assert_eq!(panel.state(), TextPanelState::Empty);
    }

    #[test]
    fn test_read_only_fields() {
        let mut panel = TextPanel::new();
        assert!(panel.is_base64_read_only());
        assert!(!panel.is_text_read_only());
        assert_eq!(
            panel.set_base64("SGVsbG8="),
            Err(Error::ReadOnlyField("base64".to_string()))
        );
        assert_eq!(panel.base64(), "");

        let mut panel = decode_panel();
        assert!(panel.is_text_read_only());
        assert!(matches!(panel.set_text("hi"), Err(Error::ReadOnlyField(_))));
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn test_decode_valid() {
        let mut panel = decode_panel();
        panel.set_base64("SGVsbG8=").unwrap();
        assert_eq!(panel.text(), "Hello");
        assert!(panel.error().is_none());
        assert!(panel.validation().is_valid);
    }

    #[test]
    fn test_decode_invalid_syntax_keeps_stale_text() {
        let mut panel = decode_panel();
        panel.set_base64("SGVsbG8=").unwrap();

        let err = panel.set_base64("not base64!!").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
        assert_eq!(panel.error_message(), Some("Invalid base64 string"));
        assert_eq!(panel.text(), "Hello");
        assert_eq!(panel.base64(), "not base64!!");
        assert_eq!(panel.state(), TextPanelState::Invalid);
    }

    #[test]
    fn test_decode_failure_after_syntax_check() {
        let mut panel = decode_panel();
        panel.set_base64("SGVsbG8=").unwrap();

        // right alphabet, wrong length
        assert!(matches!(panel.set_base64("SGVsbG8"), Err(Error::DecodeFailure(_))));
        assert_eq!(panel.error_message(), Some("Invalid base64 string"));
        assert_eq!(panel.text(), "Hello");

        // decodes, but not to UTF-8
        assert!(matches!(panel.set_base64("/w=="), Err(Error::DecodeFailure(_))));
        assert_eq!(panel.text(), "Hello");
    }

    #[test]
    fn test_decode_empty_clears() {
        let mut panel = decode_panel();
        panel.set_base64("SGVsbG8=").unwrap();
        let _ = panel.set_base64("%%");
        assert!(panel.error().is_some());

        panel.set_base64("").unwrap();
        assert_eq!(panel.text(), "");
        assert!(panel.error().is_none());
        assert_eq!(panel.state(), TextPanelState::Empty);
    }

    #[test]
    fn test_toggle_twice_preserves_content() {
        let mut panel = TextPanel::new();
        panel.set_text("Hello").unwrap();

        panel.toggle_mode();
        let _ = panel.set_base64("bad input!");
        assert!(panel.error().is_some());

        panel.toggle_mode();
        assert_eq!(panel.mode(), ConversionMode::Encode);
        assert!(panel.is_base64_read_only());
        assert!(panel.error().is_none());
        assert_eq!(panel.text(), "Hello");
        assert_eq!(panel.base64(), "bad input!");

        panel.toggle_mode();
        panel.toggle_mode();
        assert_eq!(panel.mode(), ConversionMode::Encode);
        assert_eq!(panel.text(), "Hello");
        assert_eq!(panel.base64(), "bad input!");
    }

    #[test]
    fn test_copy_does_not_mutate() {
        let clipboard = MemoryClipboard::new();
        let mut panel = TextPanel::new();
        panel.set_text("Hello").unwrap();

        panel.copy(Field::Base64, &clipboard).unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("SGVsbG8="));

        panel.copy(Field::Text, &clipboard).unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("Hello"));

        assert_eq!(panel.text(), "Hello");
        assert_eq!(panel.base64(), "SGVsbG8=");
    }
}
