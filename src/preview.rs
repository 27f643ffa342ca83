//! Preview handle management
//!
//! A preview handle is a revocable reference to an in-memory image blob,
//! addressed by a `blob:` URL. Handles are released when dropped, so a panel
//! that replaces or discards its handle never leaves a live blob behind.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

/// Binary data with the MIME type it should be rendered as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Raw bytes
    pub bytes: Bytes,
    /// MIME type the bytes are interpreted as
    pub mime_type: String,
}

/// Shared store of live preview blobs
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    blobs: Arc<DashMap<String, Blob>>,
}

impl PreviewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return the handle that owns it
    pub fn acquire(&self, bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> PreviewHandle {
        let url = format!("blob:{}", Uuid::new_v4());
        let blob = Blob {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        };
        debug!("Acquired preview {} ({}, {} bytes)", url, blob.mime_type, blob.bytes.len());
        self.blobs.insert(url.clone(), blob);

        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    /// Look up the blob behind a preview URL
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.blobs.get(url).map(|entry| entry.value().clone())
    }

    /// Number of blobs that have not been released
    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }

    fn revoke(&self, url: &str) {
        if self.blobs.remove(url).is_some() {
            debug!("Released preview {}", url);
        }
    }
}

/// Owning reference to a registered preview blob
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// The `blob:` URL identifying this preview
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The blob this handle renders
    pub fn blob(&self) -> Option<Blob> {
        self.registry.resolve(&self.url)
    }

    /// Release the blob now instead of at drop
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}
