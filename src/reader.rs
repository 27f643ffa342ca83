//! Asynchronous file reading
//!
//! Reading a selected file is the only asynchronous step in a conversion.
//! Every read carries a [`RequestId`] so the caller can tell a current
//! result from one that was superseded while it was in flight.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identity of a file read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh request id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file the user picked, as reported by the file-selection surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Where the bytes live
    pub path: PathBuf,
}

impl SelectedFile {
    /// Create a selected file with an explicit MIME type
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            path: path.into(),
        }
    }

    /// Describe a file on disk, deriving name and MIME type from the path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_extension(&path).to_string();
        Self {
            name,
            mime_type,
            path,
        }
    }

    /// Whether the declared MIME type is an image type
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// MIME type for a path, judged by its extension
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Source of file bytes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read the whole file
    async fn read(&self, file: &SelectedFile) -> Result<Vec<u8>>;
}

/// Reads files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

#[async_trait]
impl FileReader for FsFileReader {
    async fn read(&self, file: &SelectedFile) -> Result<Vec<u8>> {
        tokio::fs::read(&file.path).await.map_err(|e| {
            Error::IoError(format!("Failed to read file '{}': {}", file.path.display(), e))
        })
    }
}

/// A read that has been issued but not yet completed
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Identity of this read
    pub id: RequestId,
    /// The file being read
    pub file: SelectedFile,
}

/// The outcome of a [`ReadRequest`]
#[derive(Debug)]
pub struct ReadResponse {
    /// Identity of the read this answers
    pub id: RequestId,
    /// The file that was read
    pub file: SelectedFile,
    /// File bytes, or why they could not be read
    pub result: Result<Vec<u8>>,
}

impl ReadRequest {
    /// Create a request with a fresh id
    pub fn new(file: SelectedFile) -> Self {
        Self {
            id: RequestId::new(),
            file,
        }
    }

    /// Perform the read on the current task
    pub async fn execute(self, reader: &dyn FileReader) -> ReadResponse {
        let result = reader.read(&self.file).await;
        ReadResponse {
            id: self.id,
            file: self.file,
            result,
        }
    }
}

/// Run a read on a background task and hand back the response channel
pub fn spawn_read(reader: Arc<dyn FileReader>, request: ReadRequest) -> oneshot::Receiver<ReadResponse> {
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let id = request.id;
        let response = request.execute(reader.as_ref()).await;
        if sender.send(response).is_err() {
            debug!("Read {} finished after its receiver was dropped", id);
        }
    });

    receiver
}
