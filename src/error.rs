//! Error types for CardioVision

use thiserror::Error;

/// Errors that can occur during ingestion and analysis
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse export: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error parsing {filename}: {source}")]
    File {
        filename: String,
        #[source]
        source: Box<ComputeError>,
    },

    #[error("No records available for analysis")]
    EmptyInput,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Unknown history entry: {0}")]
    UnknownEntry(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ComputeError {
    /// Attach the originating file name to an error
    pub fn in_file(self, filename: impl Into<String>) -> Self {
        ComputeError::File {
            filename: filename.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through any file context
    pub fn root(&self) -> &ComputeError {
        match self {
            ComputeError::File { source, .. } => source.root(),
            other => other,
        }
    }
}
