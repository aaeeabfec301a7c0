#![recursion_limit = "256"]

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod scanner;
pub mod schemas;
pub mod table;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, LoggingConfig, OutputConfig};
pub use error::{RecordBookError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ExportSummary, Examples, Extractor, ExtractorConfig, OutputWriter, DEFAULT_COMBINED_NAME,
};
pub use scanner::{BatchFile, BatchScanner};
pub use table::{Cell, Record, Table, TableError};
pub use ui::{OutputFormatter, OutputMode, ProgressLogWriter, ProgressManager};

use std::path::Path;
use tracing::{info, warn};

/// Main library interface: exports batch files through the military
/// records extractor.
pub struct RecordBook {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl RecordBook {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Saves every batch under `input`, then the combined spreadsheet if
    /// configured. Per-batch failures are collected in the summary.
    pub fn export<P: AsRef<Path>>(&self, input: P) -> Result<ExportSummary> {
        let input = input.as_ref();
        self.output_formatter.start_operation("Scanning for batch files");

        let batches = BatchScanner::new(&self.config.input).scan(input)?;
        self.output_formatter
            .info(&format!("Found {} batch files", batches.len()));

        let mut extractor = schemas::military::extractor(&self.config.output.directory)?;
        self.output_formatter
            .info(&format!("Using {}", extractor.description()));

        let mut summary = ExportSummary::new(
            input.display().to_string(),
            extractor.output_directory().to_path_buf(),
            batches.len(),
        );

        self.output_formatter.start_operation("Saving batches");
        let progress = self
            .progress_manager
            .create_batch_progress(batches.len() as u64);

        for (index, batch) in batches.iter().enumerate() {
            ui::progress::update_batch_progress(&progress, index as u64, &batch.display_path());

            let outcome = batch
                .read_records()
                .and_then(|records| extractor.save_batch(&records, &batch.name));

            match outcome {
                Ok(path) => summary.add_saved(&batch.display_path(), path),
                Err(e) => {
                    self.progress_manager.suspend(|| {
                        self.output_formatter
                            .warning(&format!("{}: {}", batch.display_path(), e))
                    });
                    summary.add_unsaved(&batch.display_path(), &e);
                }
            }
        }

        ui::progress::finish_progress_with_summary(
            &progress,
            &format!("Saved {} of {} batches", summary.batches_saved, batches.len()),
            summary.elapsed(),
        );

        if self.config.output.write_combined {
            match extractor.save_combined(&self.config.output.combined_name) {
                Ok(path) => {
                    self.output_formatter
                        .success(&format!("Combined output saved to {}", path.display()));
                    summary.combined_file = Some(path);
                }
                Err(e) if e.is_benign() => {
                    warn!("Skipping combined output: {}", e);
                }
                Err(e) => {
                    self.output_formatter.print_user_friendly_error(&e);
                    summary.add_error(format!("combined output: {}", e));
                }
            }
        }

        summary.finish(extractor.output().record_count());

        if self.config.output.write_report {
            if summary.records_accumulated == 0 {
                warn!("No data available for report generation");
            } else {
                match summary.write_markdown_report(extractor.output_directory()) {
                    Ok(path) => summary.report_file = Some(path),
                    Err(e) => {
                        self.output_formatter.print_user_friendly_error(&e);
                        summary.add_error(format!("run report: {}", e));
                    }
                }
            }
        }

        info!(
            saved = summary.batches_saved,
            skipped = summary.batches_skipped,
            failed = summary.batches_failed,
            records = summary.records_accumulated,
            "Export finished"
        );

        Ok(summary)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        std::fs::write(output_path.as_ref(), Config::create_sample_config())?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Log sink that keeps diagnostics from tearing the progress bar.
    pub fn log_writer(&self) -> ProgressLogWriter {
        self.progress_manager.log_writer()
    }

    pub fn handle_error(&self, error: &RecordBookError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_book(output: &Path, write_combined: bool) -> RecordBook {
        let mut config = Config::default();
        config.output.directory = output.to_path_buf();
        config.output.write_combined = write_combined;
        config.output.write_report = false;
        RecordBook::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_export_collects_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.json"), r#"[{"Surname": "Иванов", "Page": 70}]"#).unwrap();
        fs::write(input.join("b.json"), "[]").unwrap();
        fs::write(input.join("c.json"), r#"[{"Surname": ["nested"]}]"#).unwrap();
        fs::write(input.join("d.json"), "not json").unwrap();

        let book = quiet_book(&temp_dir.path().join("out"), true);
        let summary = book.export(&input).unwrap();

        assert_eq!(summary.batches_total, 4);
        assert_eq!(summary.batches_saved, 1);
        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.batches_failed, 2);
        assert_eq!(summary.records_accumulated, 1);
        assert!(summary.combined_file.as_ref().is_some_and(|p| p.exists()));
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_export_without_combined_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("page_001.json");
        fs::write(&input, r#"[{"Surname": "Попов"}]"#).unwrap();

        let book = quiet_book(&temp_dir.path().join("out"), false);
        let summary = book.export(&input).unwrap();

        assert!(summary.is_complete());
        assert!(summary.combined_file.is_none());
        assert_eq!(summary.saved_files.len(), 1);
    }

    #[test]
    fn test_export_of_only_empty_batches_skips_combined() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("empty.json");
        fs::write(&input, "[]").unwrap();

        let book = quiet_book(&temp_dir.path().join("out"), true);
        let summary = book.export(&input).unwrap();

        assert_eq!(summary.batches_skipped, 1);
        assert!(summary.combined_file.is_none());
        assert_eq!(summary.errors.len(), 1);
    }

    #[test]
    fn test_export_writes_run_report() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("page_001.json"), r#"[{"Surname": "Иванов"}]"#).unwrap();
        fs::write(input.join("page_002.json"), "[]").unwrap();

        let output = temp_dir.path().join("out");
        let mut config = Config::default();
        config.output.directory = output.clone();
        let book = RecordBook::new(config, OutputMode::Plain, 0, true);

        let summary = book.export(&input).unwrap();

        let report = summary.report_file.as_ref().unwrap();
        assert!(report.starts_with(output.join("reports")));
        let content = fs::read_to_string(report).unwrap();
        assert!(content.contains("- **Batches**: 1 saved / 0 failed / 1 skipped / 2 total"));
        assert!(content.contains("1. page_002.json"));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        RecordBook::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
