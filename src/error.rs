//! Error types for the converter

use std::string::FromUtf8Error;

use thiserror::Error;

/// Inline message for input that fails the syntactic Base64 check
pub const MSG_INVALID_BASE64: &str = "Invalid base64 string";
/// Inline message for Base64 that looks right but does not decode to an image blob
pub const MSG_INVALID_IMAGE_DATA: &str = "Invalid base64 image data";
/// Inline message for a non-image file selection
pub const MSG_NOT_AN_IMAGE: &str = "Please select an image file";
/// Inline message for a file that could not be read or encoded
pub const MSG_IMAGE_CONVERSION: &str = "Error converting image to base64";

/// Errors that can occur while converting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input failed the syntactic Base64 check
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input looked like Base64 but did not decode to valid text or bytes
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Selected file is not an image
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The field is derived in the current mode and cannot be edited
    #[error("Field is read-only in the current mode: {0}")]
    ReadOnlyField(String),

    /// Download requested without a decoded preview
    #[error("Nothing to download")]
    NothingToDownload,

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Short message suitable for an inline error banner.
    ///
    /// Conversion errors raised by the panels already carry their banner
    /// text; the remaining variants map to fixed messages.
    pub fn user_message(&self) -> &str {
        match self {
            Error::InvalidFormat(msg) | Error::DecodeFailure(msg) | Error::UnsupportedFileType(msg) => msg.as_str(),
            Error::ReadOnlyField(_) => "This field is read-only in the current mode",
            Error::NothingToDownload => "Nothing to download",
            Error::IoError(_) => MSG_IMAGE_CONVERSION,
            Error::InternalError(_) => "Something went wrong",
        }
    }

    /// Whether this error belongs to the recoverable conversion taxonomy
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_) | Error::DecodeFailure(_) | Error::UnsupportedFileType(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::DecodeFailure(err.to_string())
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Self {
        Error::DecodeFailure(format!("decoded bytes are not valid UTF-8: {}", err))
    }
}
