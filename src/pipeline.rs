//! Pipeline orchestration
//!
//! This module provides the public API for CardioVision.
//! It routes an export to its format adapter, records the upload in history,
//! and scores record sequences.

use crate::adapters::{
    BinaryDecoder, CsvAdapter, FileFormat, FitAdapter, FormatAdapter, JsonAdapter, ParseContext,
    XmlAdapter,
};
use crate::config::ProcessorConfig;
use crate::error::ComputeError;
use crate::history::HistoryStore;
use crate::models::{self, ModelKind, ModelProfile};
use crate::risk::RiskEngine;
use crate::sample::SampleGenerator;
use crate::types::{AnalysisResult, HistoricalEntry, Record};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Parse an in-memory export and score it in one step.
///
/// # Arguments
/// * `filename` - Name of the export; its extension selects the format
/// * `bytes` - Raw file content
/// * `model` - Model profile used for scoring
///
/// # Example
/// ```ignore
/// let result = analyze_export("week.csv", &bytes, ModelKind::CardioNet)?;
/// println!("{:?}", result.risk_level);
/// ```
pub fn analyze_export(
    filename: &str,
    bytes: &[u8],
    model: ModelKind,
) -> Result<AnalysisResult, ComputeError> {
    let mut processor = CardioProcessor::new();
    let records = processor.ingest_bytes(filename, bytes)?;
    processor.analyze(&records, model)
}

/// Stateful processor holding the upload history for a session.
///
/// Operations are expected to run one at a time; every method that changes
/// state takes `&mut self`.
pub struct CardioProcessor {
    config: ProcessorConfig,
    generator: SampleGenerator,
    history: HistoryStore,
    csv: CsvAdapter,
    xml: XmlAdapter,
    json: JsonAdapter,
    fit: FitAdapter,
}

impl Default for CardioProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CardioProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    /// Create a processor with specific settings
    pub fn with_config(config: ProcessorConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => SampleGenerator::seeded(seed),
            None => SampleGenerator::new(),
        };

        Self {
            config,
            generator,
            history: HistoryStore::new(),
            csv: CsvAdapter,
            xml: XmlAdapter,
            json: JsonAdapter,
            fit: FitAdapter::default(),
        }
    }

    /// Replace the decoder used for binary exports
    pub fn with_binary_decoder(mut self, decoder: Box<dyn BinaryDecoder + Send + Sync>) -> Self {
        self.fit = FitAdapter::new(decoder);
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Read an export from disk, parse it and record it in history.
    ///
    /// The format is chosen from the file name before anything is read, so an
    /// unsupported extension fails without touching the file system.
    pub async fn ingest(&mut self, path: impl AsRef<Path>) -> Result<Vec<Record>, ComputeError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let format = FileFormat::from_filename(&filename).map_err(|e| e.in_file(&filename))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ComputeError::from(e).in_file(&filename))?;

        self.ingest_format(&filename, format, &bytes)
    }

    /// Parse an export already held in memory and record it in history
    pub fn ingest_bytes(&mut self, filename: &str, bytes: &[u8]) -> Result<Vec<Record>, ComputeError> {
        let format = FileFormat::from_filename(filename).map_err(|e| e.in_file(filename))?;
        self.ingest_format(filename, format, bytes)
    }

    /// Parse bytes with the adapter for `format`, without touching history
    pub fn parse(&mut self, format: FileFormat, bytes: &[u8]) -> Result<Vec<Record>, ComputeError> {
        let mut ctx = ParseContext {
            synthesize: self.config.synthesize,
            sample_days: self.config.sample_days,
            generator: &mut self.generator,
        };

        let adapter: &dyn FormatAdapter = match format {
            FileFormat::Csv => &self.csv,
            FileFormat::Xml => &self.xml,
            FileFormat::Json => &self.json,
            FileFormat::Fit => &self.fit,
        };

        adapter.parse(bytes, &mut ctx)
    }

    fn ingest_format(
        &mut self,
        filename: &str,
        format: FileFormat,
        bytes: &[u8],
    ) -> Result<Vec<Record>, ComputeError> {
        let records = self.parse(format, bytes).map_err(|e| {
            warn!(filename, format = format.as_str(), error = %e, "failed to parse export");
            e.in_file(filename)
        })?;

        let entry = HistoricalEntry::new(filename, records.clone());
        info!(
            filename,
            format = format.as_str(),
            records = records.len(),
            origin = ?entry.origin,
            "ingested export"
        );
        self.history.append(entry);

        Ok(records)
    }

    /// Score a record sequence
    pub fn analyze(&self, records: &[Record], model: ModelKind) -> Result<AnalysisResult, ComputeError> {
        RiskEngine::analyze(records, model)
    }

    /// Score a record sequence with a model looked up by key
    pub fn analyze_key(&self, records: &[Record], model_key: &str) -> Result<AnalysisResult, ComputeError> {
        RiskEngine::analyze_key(records, model_key)
    }

    /// Past uploads, newest first
    pub fn list_history(&self) -> &[HistoricalEntry] {
        self.history.list()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Records of one past upload
    pub fn recall(&self, id: Uuid) -> Result<Vec<Record>, ComputeError> {
        self.history
            .get(id)
            .map(|entry| entry.records.clone())
            .ok_or_else(|| ComputeError::UnknownEntry(id.to_string()))
    }

    /// Records of several past uploads, tagged with their file names
    pub fn merge_history(&self, ids: &[Uuid]) -> Result<Vec<Record>, ComputeError> {
        self.history.merge(ids)
    }

    /// Generate `n` days of sample records ending today
    pub fn generate_sample(&mut self, n: usize) -> Vec<Record> {
        self.generator.generate(n)
    }

    /// Available model profiles
    pub fn models(&self) -> impl Iterator<Item = &'static ModelProfile> {
        models::catalog()
    }
}
