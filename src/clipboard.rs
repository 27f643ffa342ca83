//! Clipboard sink for copy actions

use std::sync::Mutex;

use crate::error::{Error, Result};

/// Destination for copied plain text
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard that keeps the last copied text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// The last copied text
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| Error::InternalError("Clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
