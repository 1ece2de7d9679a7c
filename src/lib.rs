//! CardioVision - Rule-based cardiovascular risk screening for wearable exports
//!
//! CardioVision turns heterogeneous health exports into uniform daily records
//! and scores them through a deterministic pipeline: format adaptation →
//! normalization → averaging → rule evaluation → risk classification.
//!
//! ## Modules
//!
//! - **Ingestion**: CSV, XML, JSON and FIT adapters with optional synthetic backfill
//! - **Analysis**: threshold rules scaled by a selectable model profile
//! - **History**: in-memory log of uploads that can be recalled or merged

pub mod adapters;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod risk;
pub mod sample;
pub mod types;
pub mod waveform;

pub use config::ProcessorConfig;
pub use error::ComputeError;
pub use models::ModelKind;
pub use pipeline::{analyze_export, CardioProcessor};
pub use risk::RiskEngine;
pub use types::{AnalysisResult, HistoricalEntry, Record, RiskLevel};

/// CardioVision version
pub const CARDIOVISION_VERSION: &str = env!("CARGO_PKG_VERSION");
