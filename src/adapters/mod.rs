//! Export format adapters
//!
//! This module provides one adapter per supported export format. Each adapter
//! parses raw file bytes and maps them to canonical records. Reading the file is
//! the processor's job; adapters are pure over the bytes they are handed.

mod csv;
mod fit;
mod json;
mod xml;

pub use csv::CsvAdapter;
pub use fit::{BinaryDecoder, FitAdapter, SyntheticDecoder};
pub use json::JsonAdapter;
pub use xml::XmlAdapter;

use crate::error::ComputeError;
use crate::sample::SampleGenerator;
use crate::types::Record;
use serde::{Deserialize, Serialize};

/// Shared state an adapter may draw on while parsing
pub struct ParseContext<'a> {
    /// Whether missing values may be filled with synthesized data
    pub synthesize: bool,
    /// Days generated when a whole export has to be replaced by sample data
    pub sample_days: usize,
    pub generator: &'a mut SampleGenerator,
}

/// Trait for export format adapters
pub trait FormatAdapter {
    /// Parse raw file content and convert to canonical records
    fn parse(&self, bytes: &[u8], ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError>;
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-delimited text with a header row
    Csv,
    /// Markup with `Record` elements
    Xml,
    /// Binary activity file
    Fit,
    /// Structured object or array of objects
    Json,
}

impl FileFormat {
    /// Select a format from the file name's extension
    pub fn from_filename(filename: &str) -> Result<Self, ComputeError> {
        let lower = filename.to_lowercase();
        let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

        match extension {
            "csv" => Ok(FileFormat::Csv),
            "xml" => Ok(FileFormat::Xml),
            "fit" => Ok(FileFormat::Fit),
            "json" => Ok(FileFormat::Json),
            other => Err(ComputeError::UnsupportedFormat(if other.is_empty() {
                "missing file extension".to_string()
            } else {
                format!(".{other}")
            })),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xml => "xml",
            FileFormat::Fit => "fit",
            FileFormat::Json => "json",
        }
    }
}
