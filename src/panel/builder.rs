//! Builder for configuring and creating image panels

use crate::preview::PreviewRegistry;
use super::ImagePanel;

/// Image panel options
#[derive(Debug, Clone)]
pub struct ImagePanelOptions {
    /// MIME type used for decoded data when no file type has been seen
    pub default_mime_type: String,
    /// File name offered for downloads when no file name has been seen
    pub default_download_name: String,
    /// Prefer the MIME type detected from the decoded bytes
    pub sniff_mime_type: bool,
}

impl Default for ImagePanelOptions {
    fn default() -> Self {
        Self {
            default_mime_type: "image/png".to_string(),
            default_download_name: "image".to_string(),
            sniff_mime_type: false,
        }
    }
}

/// Builder for creating and configuring image panels
#[derive(Default)]
pub struct ImagePanelBuilder {
    /// Panel options
    options: ImagePanelOptions,
    /// Registry that previews are issued from
    registry: Option<PreviewRegistry>,
}

impl ImagePanelBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MIME type assumed for decoded data
    pub fn with_default_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.options.default_mime_type = mime_type.into();
        self
    }

    /// Set the fallback download file name
    pub fn with_default_download_name(mut self, name: impl Into<String>) -> Self {
        self.options.default_download_name = name.into();
        self
    }

    /// Detect the MIME type of decoded data from its signature
    pub fn with_mime_sniffing(mut self, enable: bool) -> Self {
        self.options.sniff_mime_type = enable;
        self
    }

    /// Share an existing preview registry
    pub fn with_registry(mut self, registry: PreviewRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the panel
    pub fn build(self) -> ImagePanel {
        ImagePanel::new(self.registry.unwrap_or_default(), self.options)
    }
}
