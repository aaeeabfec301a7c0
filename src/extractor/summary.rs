use crate::error::RecordBookError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Outcome of exporting every batch file found under one input path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub input: String,
    pub output_directory: PathBuf,
    pub batches_total: usize,
    pub batches_saved: usize,
    pub batches_skipped: usize,
    pub batches_failed: usize,
    pub records_accumulated: usize,
    pub saved_batches: Vec<String>,
    pub skipped_batches: Vec<String>,
    pub failed_batches: Vec<String>,
    pub saved_files: Vec<PathBuf>,
    pub combined_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    #[serde(skip, default = "Instant::now")]
    start_time: Instant,
}

impl ExportSummary {
    pub fn new<S: Into<String>>(input: S, output_directory: PathBuf, batches_total: usize) -> Self {
        Self {
            input: input.into(),
            output_directory,
            batches_total,
            batches_saved: 0,
            batches_skipped: 0,
            batches_failed: 0,
            records_accumulated: 0,
            saved_batches: Vec::new(),
            skipped_batches: Vec::new(),
            failed_batches: Vec::new(),
            saved_files: Vec::new(),
            combined_file: None,
            report_file: None,
            errors: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    pub fn add_saved(&mut self, batch: &str, path: PathBuf) {
        self.batches_saved += 1;
        self.saved_batches.push(batch.to_string());
        self.saved_files.push(path);
    }

    /// Empty batches are skipped; every other error counts as a failure.
    pub fn add_unsaved(&mut self, batch: &str, error: &RecordBookError) {
        if error.is_benign() {
            self.batches_skipped += 1;
            self.skipped_batches.push(batch.to_string());
        } else {
            self.batches_failed += 1;
            self.failed_batches.push(batch.to_string());
        }
        self.errors.push(format!("{}: {}", batch, error));
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn finish(&mut self, records_accumulated: usize) {
        self.records_accumulated = records_accumulated;
        self.duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_complete(&self) -> bool {
        self.batches_saved == self.batches_total && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counters() {
        let mut summary = ExportSummary::new("scans", PathBuf::from("out"), 3);

        summary.add_saved("page_001", PathBuf::from("out/page_001_20240101_000000.xlsx"));
        summary.add_unsaved(
            "page_002",
            &RecordBookError::EmptyBatch {
                name: "page_002".to_string(),
            },
        );
        summary.add_unsaved("page_003", &RecordBookError::NothingAccumulated);
        summary.add_unsaved("page_004", &RecordBookError::MissingSchema);
        summary.finish(5);

        assert_eq!(summary.batches_saved, 1);
        assert_eq!(summary.batches_skipped, 2);
        assert_eq!(summary.batches_failed, 1);
        assert_eq!(summary.records_accumulated, 5);
        assert_eq!(summary.errors.len(), 3);
        assert_eq!(summary.saved_batches, ["page_001"]);
        assert_eq!(summary.skipped_batches, ["page_002", "page_003"]);
        assert_eq!(summary.failed_batches, ["page_004"]);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_complete_run() {
        let mut summary = ExportSummary::new("scans", PathBuf::from("out"), 1);
        summary.add_saved("a", PathBuf::from("out/a.xlsx"));
        summary.finish(1);

        assert!(summary.is_complete());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["batches_saved"], 1);
        assert!(json.get("start_time").is_none());
    }
}
