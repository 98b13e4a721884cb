use crate::codec::Format;
use thiserror::Error;

/// Custom error types for the codec-bench library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A codec failed to turn a record into bytes.
    #[error("{format} encode failed: {message}")]
    Encode { format: Format, message: String },

    /// A codec failed to turn bytes back into a record.
    #[error("{format} decode failed: {message}")]
    Decode { format: Format, message: String },

    /// The Avro schema could not be parsed.
    #[error("Invalid Avro schema: {0}")]
    Schema(String),

    /// A decoded message differs from the record that was encoded.
    #[error("{format} round trip produced a different record")]
    Mismatch { format: Format },

    /// Rejected benchmark configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV report output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet report output failed.
    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Create a new `Encode` error for `format` from any displayable cause.
    pub fn encode(format: Format, cause: impl std::fmt::Display) -> Self {
        Self::Encode {
            format,
            message: cause.to_string(),
        }
    }

    /// Create a new `Decode` error for `format` from any displayable cause.
    pub fn decode(format: Format, cause: impl std::fmt::Display) -> Self {
        Self::Decode {
            format,
            message: cause.to_string(),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
