//! End-to-end ingestion through the public API: files on disk → records →
//! history → risk result.

use std::path::PathBuf;

use cardiovision::types::{ColorTag, DataOrigin, Provenance};
use cardiovision::{CardioProcessor, ComputeError, ModelKind, ProcessorConfig, RiskLevel};
use pretty_assertions::assert_eq;
use uuid::Uuid;

const STRAINED_CSV: &str = "date,heartRate,restingHR,hrv,sleep,steps\r\n\
2024-03-01,95,85,20,5.5,4000\r\n\
2024-03-02,95,85,20,5.5,4000\r\n\
\r\n";

const HEALTHY_JSON: &str = r#"[
  {"date": "2024-03-03", "heartRate": 68, "restingHR": 58, "hrv": 45, "sleep": 7.8, "steps": 11000},
  {"date": "2024-03-04", "heartRate": "70", "restingHR": 60, "hrv": 47, "sleep": 8.0, "steps": 12000}
]"#;

const APPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HealthData locale="en_US">
  <Record type="HKQuantityTypeIdentifierHeartRate" startDate="2024-03-05" value="72"/>
  <Record type="HKQuantityTypeIdentifierHeartRate" startDate="2024-03-06" value="76"/>
</HealthData>"#;

/// Temp file removed on drop
struct TempExport(PathBuf);

impl TempExport {
    async fn write(name: &str, content: &[u8]) -> Self {
        let dir = std::env::temp_dir().join(format!("cardiovision-e2e-{}", Uuid::now_v7()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(name);
        tokio::fs::write(&path, content).await.unwrap();
        Self(path)
    }
}

impl Drop for TempExport {
    fn drop(&mut self) {
        if let Some(dir) = self.0.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

fn processor() -> CardioProcessor {
    CardioProcessor::with_config(ProcessorConfig {
        seed: Some(2024),
        ..Default::default()
    })
}

#[tokio::test]
async fn csv_export_scores_urgent() {
    let file = TempExport::write("strained.csv", STRAINED_CSV.as_bytes()).await;
    let mut processor = processor();

    let records = processor.ingest(&file.0).await.unwrap();
    assert_eq!(records.len(), 2);

    let result = processor.analyze(&records, ModelKind::HealthVision).unwrap();
    assert_eq!(result.risk_score, 7.0);
    assert_eq!(result.risk_level, RiskLevel::Urgent);
    assert_eq!(result.color, ColorTag::Red);
    assert_eq!(
        result.factors,
        vec![
            "Elevated resting heart rate",
            "High average heart rate",
            "Low heart rate variability",
            "Insufficient sleep",
            "Low daily activity",
        ]
    );
    assert_eq!(result.potential_concerns.len(), 4);
    assert_eq!(result.metrics.avg_resting_hr, Some(85));
    assert_eq!(result.metrics.avg_sleep, Some(5.5));
}

#[tokio::test]
async fn json_export_scores_normal() {
    let file = TempExport::write("healthy.json", HEALTHY_JSON.as_bytes()).await;
    let mut processor = processor();

    let records = processor.ingest(&file.0).await.unwrap();
    let result = processor.analyze_key(&records, "cardioNet").unwrap();

    assert_eq!(result.risk_score, 0.0);
    assert_eq!(result.risk_level, RiskLevel::Normal);
    assert!(result.factors.is_empty());
    // numeric strings are coerced
    assert_eq!(result.metrics.avg_heart_rate, Some(69));
    assert_eq!(result.average_bpm, Some(69.0));
}

#[tokio::test]
async fn xml_export_backfills_missing_metrics() {
    let file = TempExport::write("export.xml", APPLE_XML.as_bytes()).await;
    let mut processor = processor();

    let records = processor.ingest(&file.0).await.unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.date(), Some("2024-03-05"));
    assert_eq!(first.heart_rate(), Some(72.0));
    assert_eq!(first.provenance("heartRate"), Some(Provenance::Measured));
    assert_eq!(first.provenance("steps"), Some(Provenance::Synthesized));

    assert_eq!(processor.list_history()[0].origin, DataOrigin::Augmented);
}

#[tokio::test]
async fn merged_history_is_scored_as_one_sequence() {
    let strained = TempExport::write("strained.csv", STRAINED_CSV.as_bytes()).await;
    let healthy = TempExport::write("healthy.json", HEALTHY_JSON.as_bytes()).await;
    let mut processor = processor();

    processor.ingest(&strained.0).await.unwrap();
    processor.ingest(&healthy.0).await.unwrap();

    let history = processor.list_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].filename, "healthy.json");
    assert_eq!(history[1].filename, "strained.csv");

    let ids = [history[1].id, history[0].id];
    let merged = processor.merge_history(&ids).unwrap();
    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0].source.as_deref(), Some("strained.csv"));
    assert_eq!(merged[3].source.as_deref(), Some("healthy.json"));

    let result = processor.analyze(&merged, ModelKind::CardiacInsight).unwrap();
    // means: HR 82, RHR 72, HRV 33, sleep 6.7, steps 7750
    assert_eq!(result.risk_score, 0.0);
    assert_eq!(result.metrics.avg_heart_rate, Some(82));
    assert_eq!(result.metrics.avg_steps, Some(7750));
}

#[tokio::test]
async fn failures_leave_history_untouched() {
    let broken = TempExport::write("broken.json", b"[{\"date\":").await;
    let mut processor = processor();

    let err = processor.ingest(&broken.0).await.unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(matches!(err.root(), ComputeError::JsonError(_)));

    let err = processor.ingest("/nonexistent/notes.txt").await.unwrap_err();
    assert!(matches!(err.root(), ComputeError::UnsupportedFormat(_)));

    assert!(processor.list_history().is_empty());
}
