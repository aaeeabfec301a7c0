use crate::error::Result;
use crate::extractor::ExportSummary;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Batch lists are left out of the report above this many batches.
pub const MAX_LISTED_BATCHES: usize = 100;

pub const REPORTS_DIR: &str = "reports";

impl ExportSummary {
    /// Writes `reports/export_report_{YYYYMMDD_HHMMSS}.md` under `output_dir`.
    pub fn write_markdown_report(&self, output_dir: &Path) -> Result<PathBuf> {
        let reports_dir = output_dir.join(REPORTS_DIR);
        fs::create_dir_all(&reports_dir)?;

        let now = Local::now();
        let stem = format!("export_report_{}", now.format("%Y%m%d_%H%M%S"));
        let mut report_path = reports_dir.join(format!("{}.md", stem));
        let mut counter = 1;
        while report_path.exists() {
            report_path = reports_dir.join(format!("{}_{}.md", stem, counter));
            counter += 1;
        }

        let mut file = fs::File::create(&report_path)?;

        writeln!(file, "# Export Report")?;
        writeln!(file)?;
        writeln!(file, "## Summary")?;
        writeln!(file)?;
        writeln!(file, "- **Date**: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "- **Total Records Exported**: {}", self.records_accumulated)?;
        writeln!(
            file,
            "- **Batches**: {} saved / {} failed / {} skipped / {} total",
            self.batches_saved, self.batches_failed, self.batches_skipped, self.batches_total
        )?;
        writeln!(
            file,
            "- **Processing Time**: {}",
            format_hms(self.duration.as_secs())
        )?;
        match self.combined_file {
            Some(ref combined) => writeln!(file, "- **Combined File**: {}", file_name(combined))?,
            None => writeln!(file, "- **Combined File**: not written")?,
        }
        writeln!(file)?;

        let listed = self.saved_batches.len() + self.failed_batches.len() + self.skipped_batches.len();
        if listed <= MAX_LISTED_BATCHES {
            write_batch_list(&mut file, "Saved Batches", &self.saved_batches)?;
            write_batch_list(&mut file, "Failed Batches", &self.failed_batches)?;
            write_batch_list(&mut file, "Skipped Batches", &self.skipped_batches)?;
        } else {
            writeln!(file, "(Too many batches to list individually)")?;
            writeln!(file)?;
        }

        if !self.errors.is_empty() {
            writeln!(file, "## Issues Encountered")?;
            writeln!(file)?;
            for error in &self.errors {
                writeln!(file, "- {}", error)?;
            }
            writeln!(file)?;
        }

        writeln!(file, "## Processing Details")?;
        writeln!(file)?;
        writeln!(file, "| Parameter | Value |")?;
        writeln!(file, "|-----------|-------|")?;
        writeln!(file, "| input | {} |", self.input)?;
        writeln!(file, "| output_directory | {} |", self.output_directory.display())?;
        writeln!(file, "| started_at | {} |", self.started_at.to_rfc3339())?;
        writeln!(file, "| spreadsheets_written | {} |", self.saved_files.len())?;

        info!(path = %report_path.display(), "Generated report");
        Ok(report_path)
    }
}

fn write_batch_list(file: &mut fs::File, title: &str, batches: &[String]) -> Result<()> {
    if batches.is_empty() {
        return Ok(());
    }

    writeln!(file, "### {}", title)?;
    writeln!(file)?;
    for (i, batch) in batches.iter().enumerate() {
        writeln!(file, "{}. {}", i + 1, batch)?;
    }
    writeln!(file)?;
    Ok(())
}

fn format_hms(secs: u64) -> String {
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
