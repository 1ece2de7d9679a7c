//! Delimited text adapter
//!
//! The first line is the header row. Each following line is split on commas and
//! zipped against the headers by position. Quoted fields are not supported: a
//! comma inside a value always starts a new column.

use crate::error::ComputeError;
use crate::normalizer::Normalizer;
use crate::types::Record;
use tracing::debug;

use super::{FormatAdapter, ParseContext};

/// CSV export adapter
pub struct CsvAdapter;

impl FormatAdapter for CsvAdapter {
    fn parse(&self, bytes: &[u8], _ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ComputeError::ParseError(format!("CSV is not valid UTF-8: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut lines = text.split('\n').map(|line| line.trim_end_matches('\r'));
        let headers: Vec<&str> = match lines.next() {
            Some(header) => header.split(',').map(str::trim).collect(),
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (index, line) in lines.enumerate() {
            let pairs = headers
                .iter()
                .zip(line.split(','))
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (*header, value));

            match Normalizer::normalize(pairs) {
                Some(record) => records.push(record),
                // header is line 1
                None => debug!(line = index + 2, "skipping CSV row"),
            }
        }

        Ok(records)
    }
}
