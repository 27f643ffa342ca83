//! Image <-> base64 panel

use std::path::Path;

use bytes::Bytes;
use log::{debug, error, warn};

use crate::clipboard::Clipboard;
use crate::codec;
use crate::error::{Error, Result, MSG_INVALID_BASE64, MSG_INVALID_IMAGE_DATA, MSG_NOT_AN_IMAGE};
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::reader::{FileReader, ReadRequest, ReadResponse, RequestId, SelectedFile};

use super::{ConversionMode, ImagePanelBuilder, ImagePanelOptions};

/// Coarse state of an image panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePanelState {
    /// Nothing to show
    NoAsset,
    /// A preview is available
    Previewing,
    /// The last input could not be converted
    Error,
}

/// A decoded image offered as a file download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name
    pub file_name: String,
    /// MIME type of the data
    pub mime_type: String,
    /// File contents
    pub bytes: Bytes,
}

impl Download {
    /// Write the download to disk
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        debug!("Saved {} ({} bytes) to {}", self.file_name, self.bytes.len(), path.display());
        Ok(())
    }
}

/// Converts image files to base64 and base64 back to previewable images
#[derive(Debug)]
pub struct ImagePanel {
    mode: ConversionMode,
    options: ImagePanelOptions,
    registry: PreviewRegistry,
    /// Name of the last accepted file
    file_name: Option<String>,
    /// MIME type of the last accepted file or pasted data URI
    mime_type: Option<String>,
    base64: String,
    preview: Option<PreviewHandle>,
    error: Option<Error>,
    /// Read whose result will be applied; any other result is stale
    active_request: Option<RequestId>,
}

impl Default for ImagePanel {
    fn default() -> Self {
        ImagePanelBuilder::new().build()
    }
}

impl ImagePanel {
    /// Create a panel in encode mode issuing previews from `registry`
    pub fn new(registry: PreviewRegistry, options: ImagePanelOptions) -> Self {
        Self {
            mode: ConversionMode::Encode,
            options,
            registry,
            file_name: None,
            mime_type: None,
            base64: String::new(),
            preview: None,
            error: None,
            active_request: None,
        }
    }

    /// Get the current mode
    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Get the panel options
    pub fn options(&self) -> &ImagePanelOptions {
        &self.options
    }

    /// Current base64 field contents
    pub fn base64(&self) -> &str {
        &self.base64
    }

    /// Name of the last accepted file
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// MIME type decoded data is shown as
    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or(&self.options.default_mime_type)
    }

    /// The current preview
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// URL of the current preview
    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    /// The inline error, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Banner text for the inline error
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(Error::user_message)
    }

    /// The base64 field is derived in encode mode
    pub fn is_base64_read_only(&self) -> bool {
        self.mode.is_encode()
    }

    /// Whether a file read is in flight
    pub fn has_pending_read(&self) -> bool {
        self.active_request.is_some()
    }

    /// Summarize the panel state
    pub fn state(&self) -> ImagePanelState {
        if self.error.is_some() {
            ImagePanelState::Error
        } else if self.preview.is_some() {
            ImagePanelState::Previewing
        } else {
            ImagePanelState::NoAsset
        }
    }

    /// Accept a file selection and issue the read for it. Encode mode only.
    ///
    /// Non-image files are rejected without touching the current asset.
    /// The returned request becomes the active one; results of earlier
    /// requests will be discarded.
    pub fn begin_file_selection(&mut self, file: SelectedFile) -> Result<ReadRequest> {
        if self.mode.is_decode() {
            return Err(Error::ReadOnlyField("image".to_string()));
        }

        self.error = None;

        if !file.is_image() {
            warn!("Rejected {} with type {:?}", file.name, file.mime_type);
            let err = Error::UnsupportedFileType(MSG_NOT_AN_IMAGE.to_string());
            self.error = Some(err.clone());
            return Err(err);
        }

        let request = ReadRequest::new(file);
        debug!("Reading {} as request {}", request.file.name, request.id);
        self.active_request = Some(request.id);
        Ok(request)
    }

    /// Apply a finished read.
    ///
    /// Returns `Ok(false)` when the response belongs to a superseded request
    /// and was discarded.
    pub fn complete_file_selection(&mut self, response: ReadResponse) -> Result<bool> {
        if self.active_request != Some(response.id) {
            debug!("Discarding stale read {} for {}", response.id, response.file.name);
            return Ok(false);
        }
        self.active_request = None;

        let bytes = match response.result {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error converting image: {}", e);
                self.error = Some(e.clone());
                return Err(e);
            }
        };

        let file = response.file;
        self.base64 = codec::encode_bytes(&bytes);
        // the preview is built from the file bytes, not re-decoded from base64
        self.show_preview(bytes, file.mime_type.clone());
        self.file_name = Some(file.name);
        self.mime_type = Some(file.mime_type);
        self.error = None;
        Ok(true)
    }

    /// Select a file and read it to completion
    pub async fn select_file(&mut self, reader: &dyn FileReader, file: SelectedFile) -> Result<()> {
        let request = self.begin_file_selection(file)?;
        let response = request.execute(reader).await;
        self.complete_file_selection(response).map(|_| ())
    }

    /// Edit the base64 field and refresh the preview. Decode mode only.
    ///
    /// A pasted `data:` URI is accepted; an `image/` type in its header
    /// becomes the tracked type, any other type is ignored. The typed value
    /// is kept even when it cannot be decoded.
    pub fn set_base64(&mut self, value: impl Into<String>) -> Result<()> {
        if self.is_base64_read_only() {
            debug!("Base64 field is read-only in encode mode");
            return Err(Error::ReadOnlyField("base64".to_string()));
        }

        self.base64 = value.into();

        if self.base64.is_empty() {
            self.clear_preview();
            self.error = None;
            return Ok(());
        }

        let (payload, declared_mime) = match codec::parse_data_uri(&self.base64) {
            Ok(uri) => (uri.payload, Some(uri.mime_type)),
            Err(_) => (self.base64.clone(), None),
        };

        if !codec::is_valid_base64(&payload) {
            self.clear_preview();
            return self.fail(Error::InvalidFormat(MSG_INVALID_BASE64.to_string()));
        }

        match codec::decode_to_bytes(&payload) {
            Ok(bytes) => {
                match declared_mime {
                    Some(mime_type) if mime_type.starts_with("image/") => {
                        self.mime_type = Some(mime_type);
                    }
                    Some(mime_type) => {
                        debug!("Ignoring non-image data URI type {}", mime_type);
                    }
                    None => {}
                }
                let mime_type = self.preview_mime_type(&bytes);
                self.show_preview(bytes, mime_type);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Error converting base64 to image: {}", e);
                self.clear_preview();
                self.fail(Error::DecodeFailure(MSG_INVALID_IMAGE_DATA.to_string()))
            }
        }
    }

    /// Switch modes, discarding the preview, the base64 field, the error
    /// and any read in flight
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.clear_preview();
        self.base64.clear();
        self.error = None;
        self.active_request = None;
        debug!("Image panel switched to {:?} mode", self.mode);
    }

    /// The decoded image as a download. Decode mode with a preview only.
    pub fn download(&self) -> Result<Download> {
        let preview = match (&self.preview, self.mode) {
            (Some(preview), ConversionMode::Decode) => preview,
            _ => return Err(Error::NothingToDownload),
        };
        let blob = preview
            .blob()
            .ok_or_else(|| Error::InternalError(format!("Preview {} is not registered", preview.url())))?;

        Ok(Download {
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| self.options.default_download_name.clone()),
            mime_type: blob.mime_type,
            bytes: blob.bytes,
        })
    }

    /// Copy the base64 field to the clipboard
    pub fn copy(&self, clipboard: &dyn Clipboard) -> Result<()> {
        clipboard.write_text(&self.base64)
    }

    fn preview_mime_type(&self, bytes: &[u8]) -> String {
        if self.options.sniff_mime_type {
            if let Some(mime_type) = codec::sniff_image_mime(bytes) {
                return mime_type.to_string();
            }
        }
        self.mime_type().to_string()
    }

    fn show_preview(&mut self, bytes: Vec<u8>, mime_type: String) {
        self.clear_preview();
        self.preview = Some(self.registry.acquire(bytes, mime_type));
    }

    fn clear_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }

    fn fail(&mut self, error: Error) -> Result<()> {
        self.error = Some(error.clone());
        Err(error)
    }
}
