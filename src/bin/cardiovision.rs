//! CardioVision CLI - Command-line interface for CardioVision
//!
//! Commands:
//! - analyze: Ingest one or more exports and score them
//! - sample: Generate synthetic daily records
//! - models: List the available model profiles

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardiovision::models::{self, ModelKind};
use cardiovision::types::{AnalysisResult, Record};
use cardiovision::waveform::{self, WavePoint};
use cardiovision::{CardioProcessor, ComputeError, ProcessorConfig, CARDIOVISION_VERSION};

/// CardioVision - Rule-based cardiovascular risk screening for wearable exports
#[derive(Parser)]
#[command(name = "cardiovision")]
#[command(version = CARDIOVISION_VERSION)]
#[command(about = "Score wearable health exports for cardiovascular risk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest exports (CSV, XML, JSON, FIT) and score the combined records
    Analyze {
        /// Export files; several files are merged in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Model key (cardioNet, healthVision, cardiacInsight)
        #[arg(short, long, default_value = "cardioNet")]
        model: String,

        /// Load processor settings from a TOML file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include an illustrative pulse waveform for the average BPM
        #[arg(long)]
        waveform: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate synthetic daily records ending today
    Sample {
        /// Number of days
        #[arg(long, default_value = "30")]
        days: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Score the generated records with this model instead of printing them
        #[arg(short, long)]
        model: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List available model profiles
    Models,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cardiovision=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), CardioCliError> {
    match cli.command {
        Commands::Analyze {
            files,
            model,
            config,
            waveform,
            pretty,
        } => cmd_analyze(&files, &model, config.as_deref(), waveform, pretty).await,
        Commands::Sample {
            days,
            seed,
            model,
            pretty,
        } => cmd_sample(days, seed, model.as_deref(), pretty),
        Commands::Models => cmd_models(),
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    files: Vec<String>,
    record_count: usize,
    result: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    waveform: Option<Vec<WavePoint>>,
}

async fn cmd_analyze(
    files: &[PathBuf],
    model_key: &str,
    config: Option<&Path>,
    with_waveform: bool,
    pretty: bool,
) -> Result<(), CardioCliError> {
    // resolve the model before reading anything
    let model = ModelKind::from_key(model_key)?;
    let config = match config {
        Some(path) => ProcessorConfig::from_path(path)?,
        None => ProcessorConfig::default(),
    };

    let mut processor = CardioProcessor::with_config(config);
    for file in files {
        processor.ingest(file).await?;
    }

    // history is newest first; merge in command-line order
    let ids: Vec<_> = processor.list_history().iter().rev().map(|e| e.id).collect();
    let records = if ids.len() == 1 {
        processor.recall(ids[0])?
    } else {
        processor.merge_history(&ids)?
    };

    let result = processor.analyze(&records, model)?;
    let waveform = with_waveform
        .then(|| result.average_bpm.map(waveform::pulse_waveform))
        .flatten();

    let output = AnalyzeOutput {
        files: processor
            .list_history()
            .iter()
            .rev()
            .map(|e| e.filename.clone())
            .collect(),
        record_count: records.len(),
        result: &result,
        waveform,
    };

    write_json(&output, pretty)
}

fn cmd_sample(
    days: usize,
    seed: Option<u64>,
    model_key: Option<&str>,
    pretty: bool,
) -> Result<(), CardioCliError> {
    let model = model_key.map(ModelKind::from_key).transpose()?;
    let mut processor = CardioProcessor::with_config(ProcessorConfig {
        seed,
        ..Default::default()
    });
    let records: Vec<Record> = processor.generate_sample(days);

    match model {
        Some(model) => {
            let result = processor.analyze(&records, model)?;
            write_json(&result, pretty)
        }
        None => write_json(&records, pretty),
    }
}

fn cmd_models() -> Result<(), CardioCliError> {
    let catalog: Vec<_> = models::catalog()
        .map(|profile| {
            serde_json::json!({
                "key": profile.key,
                "name": profile.display_name,
                "description": profile.description,
                "accuracy": profile.accuracy_label,
                "specialties": profile.specialties,
            })
        })
        .collect();

    write_json(&catalog, true)
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), CardioCliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;
    Ok(())
}

// Error types

#[derive(Debug)]
enum CardioCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
}

impl From<io::Error> for CardioCliError {
    fn from(e: io::Error) -> Self {
        CardioCliError::Io(e)
    }
}

impl From<ComputeError> for CardioCliError {
    fn from(e: ComputeError) -> Self {
        CardioCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CardioCliError {
    fn from(e: serde_json::Error) -> Self {
        CardioCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CardioCliError> for CliError {
    fn from(e: CardioCliError) -> Self {
        match e {
            CardioCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CardioCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            CardioCliError::Compute(e) => {
                let (code, hint) = match e.root() {
                    ComputeError::UnsupportedFormat(_) => (
                        "UNSUPPORTED_FORMAT",
                        Some("Supported formats: .csv, .xml, .fit, .json"),
                    ),
                    ComputeError::ParseError(_) | ComputeError::JsonError(_) => {
                        ("PARSE_ERROR", Some("Check that the export is not corrupted"))
                    }
                    ComputeError::Io(_) => ("IO_ERROR", Some("Check file paths and permissions")),
                    ComputeError::EmptyInput => (
                        "NO_RECORDS",
                        Some("The export contained no rows with at least two populated fields"),
                    ),
                    ComputeError::UnknownModel(_) => (
                        "UNKNOWN_MODEL",
                        Some("Run 'cardiovision models' to list model keys"),
                    ),
                    ComputeError::UnknownEntry(_) => ("UNKNOWN_ENTRY", None),
                    ComputeError::ConfigError(_) => {
                        ("CONFIG_ERROR", Some("Check the TOML settings file"))
                    }
                    ComputeError::File { .. } => ("PARSE_ERROR", None),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: hint.map(str::to_string),
                }
            }
        }
    }
}
