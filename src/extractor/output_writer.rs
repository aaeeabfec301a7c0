use crate::error::{RecordBookError, Result};
use crate::table::{Record, Table};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const DEFAULT_COMBINED_NAME: &str = "combined_output";

/// Number of accumulated records dumped when the combined table fails.
const DIAGNOSTIC_SAMPLE: usize = 10;

/// Buffers every accepted record and writes per-batch and combined
/// spreadsheets into one output directory.
pub struct OutputWriter {
    output_directory: PathBuf,
    accumulator: Vec<Record>,
}

impl OutputWriter {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Result<Self> {
        let output_directory = output_directory.into();
        fs::create_dir_all(&output_directory).map_err(RecordBookError::Io)?;

        Ok(Self {
            output_directory,
            accumulator: Vec::new(),
        })
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn records(&self) -> &[Record] {
        &self.accumulator
    }

    pub fn record_count(&self) -> usize {
        self.accumulator.len()
    }

    /// Writes `records` to `{name}_{timestamp}.xlsx`, where `name` is the
    /// file stem of `base_name` with characters not allowed in file names
    /// replaced by `_`.
    ///
    /// Records that tabulate are accumulated even if the write then fails,
    /// so the combined export still covers them.
    pub fn save_batch(&mut self, records: &[Record], base_name: &str) -> Result<PathBuf> {
        if records.is_empty() {
            warn!(batch = base_name, "No data provided to save, skipping spreadsheet");
            return Err(RecordBookError::EmptyBatch {
                name: base_name.to_string(),
            });
        }

        let table = match Table::from_records(records) {
            Ok(table) => table,
            Err(e) => {
                error!(batch = base_name, error = %e, "Failed to build table");
                debug!(batch = base_name, data = ?records, "Data that caused the error");
                return Err(RecordBookError::Conversion {
                    name: base_name.to_string(),
                    source: e,
                });
            }
        };

        self.accumulator.extend_from_slice(records);

        let output_path = self.next_output_path(&file_stem(base_name));
        match table.write_xlsx(&output_path) {
            Ok(()) => {
                info!(
                    records = records.len(),
                    path = %output_path.display(),
                    "Saved batch output"
                );
                Ok(output_path)
            }
            Err(e) => {
                error!(path = %output_path.display(), error = %e, "Failed to save spreadsheet");
                Err(RecordBookError::Write {
                    path: output_path.display().to_string(),
                    source: e,
                })
            }
        }
    }

    /// Table over every accumulated record, in arrival order. Empty when
    /// nothing has been accumulated or the records cannot be tabulated.
    pub fn combined_table(&self) -> Table {
        if self.accumulator.is_empty() {
            return Table::empty();
        }

        match Table::from_records(&self.accumulator) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "Failed to build combined table");
                let sample = &self.accumulator[..self.accumulator.len().min(DIAGNOSTIC_SAMPLE)];
                debug!(data = ?sample, "Combined data that caused the error (first items)");
                Table::empty()
            }
        }
    }

    /// Writes every accumulated record to `{base_name}_{timestamp}.xlsx`.
    /// `base_name` is used as given apart from characters not allowed in
    /// file names.
    pub fn save_combined(&self, base_name: &str) -> Result<PathBuf> {
        if self.accumulator.is_empty() {
            warn!("No combined data to save");
            return Err(RecordBookError::NothingAccumulated);
        }

        let table = self.combined_table();
        if table.is_empty() {
            error!(
                records = self.accumulator.len(),
                "Combined table is empty despite having collected data, cannot save"
            );
            return Err(RecordBookError::EmptyCombinedView {
                records: self.accumulator.len(),
            });
        }

        let output_path = self.next_output_path(&sanitize_base_name(base_name));
        match table.write_xlsx(&output_path) {
            Ok(()) => {
                info!(
                    records = self.accumulator.len(),
                    path = %output_path.display(),
                    "Saved combined output"
                );
                Ok(output_path)
            }
            Err(e) => {
                error!(
                    path = %output_path.display(),
                    error = %e,
                    "Failed to save combined spreadsheet"
                );
                Err(RecordBookError::Write {
                    path: output_path.display().to_string(),
                    source: e,
                })
            }
        }
    }

    fn next_output_path(&self, name: &str) -> PathBuf {
        let file_name = output_file_name(name, &Local::now());
        let mut path = self.output_directory.join(&file_name);

        // Same-second saves get a counter so earlier files are never replaced.
        let stem = file_name.trim_end_matches(".xlsx").to_string();
        let mut counter = 1;
        while path.exists() {
            path = self.output_directory.join(format!("{}_{}.xlsx", stem, counter));
            counter += 1;
        }

        path
    }
}

/// `{name}_{YYYYMMDD_HHMMSS}.xlsx`
pub fn output_file_name(name: &str, timestamp: &DateTime<Local>) -> String {
    format!("{}_{}.xlsx", name, timestamp.format("%Y%m%d_%H%M%S"))
}

fn file_stem(base_name: &str) -> String {
    let stem = Path::new(base_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(base_name);
    sanitize_base_name(stem)
}

/// Replaces only characters that are not allowed in file names. Spaces and
/// underscores are kept as given.
fn sanitize_base_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|ch| match ch {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim_matches(|c: char| c == '.' || c.is_whitespace());

    if sanitized.is_empty() {
        "output".to_string()
    } else {
        sanitized.chars().take(100).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn batch(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn xlsx_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "xlsx"))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let writer = OutputWriter::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.output_directory(), nested);

        // Existing directory is fine.
        assert!(OutputWriter::new(&nested).is_ok());
    }

    #[test]
    fn test_save_batch_writes_file_and_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        let records = batch(json!([{"name": "Smith", "rank": "Sgt"}]));

        let path = writer.save_batch(&records, "batch1").unwrap();

        assert!(path.exists());
        assert!(path.starts_with(temp_dir.path()));
        assert_eq!(writer.records(), records.as_slice());
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();

        let result = writer.save_batch(&[], "empty");

        assert!(matches!(result, Err(RecordBookError::EmptyBatch { .. })));
        assert_eq!(writer.record_count(), 0);
        assert!(xlsx_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_conversion_failure_leaves_accumulator_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        writer.save_batch(&batch(json!([{"a": 1}])), "good").unwrap();

        let result = writer.save_batch(&batch(json!([{"a": 2}, {"a": {"nested": true}}])), "bad");

        assert!(matches!(result, Err(RecordBookError::Conversion { .. })));
        assert_eq!(writer.records(), batch(json!([{"a": 1}])).as_slice());
        assert_eq!(xlsx_files(temp_dir.path()).len(), 1);
    }

    #[test]
    fn test_oversized_column_name_fails_before_accumulating() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        writer.save_batch(&batch(json!([{"a": 1}])), "good").unwrap();

        let mut bad = Record::new();
        bad.insert("k".repeat(40_000), json!("x"));
        let result = writer.save_batch(&[bad], "bad");

        assert!(matches!(
            result,
            Err(RecordBookError::Conversion {
                source: TableError::ColumnNameTooLong { length: 40_000 },
                ..
            })
        ));
        assert_eq!(writer.record_count(), 1);
        assert!(writer.save_combined("all").is_ok());
    }

    #[test]
    fn test_combined_over_column_limit_is_empty_view() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        let wide = |prefix: &str| {
            let mut record = Record::new();
            for i in 0..9_000 {
                record.insert(format!("{}{}", prefix, i), json!(i));
            }
            record
        };

        writer.save_batch(&[wide("a")], "left").unwrap();
        writer.save_batch(&[wide("b")], "right").unwrap();

        assert!(writer.combined_table().is_empty());
        assert!(matches!(
            writer.save_combined("all"),
            Err(RecordBookError::EmptyCombinedView { records: 2 })
        ));
        assert_eq!(xlsx_files(temp_dir.path()).len(), 2);
    }

    #[test]
    fn test_write_failure_still_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");
        let mut writer = OutputWriter::new(&output).unwrap();
        fs::remove_dir_all(&output).unwrap();

        let result = writer.save_batch(&batch(json!([{"a": 1}, {"a": 2}])), "lost");

        assert!(matches!(result, Err(RecordBookError::Write { .. })));
        assert_eq!(writer.record_count(), 2);
    }

    #[test]
    fn test_combined_table_preserves_arrival_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        writer.save_batch(&batch(json!([{"a": 1}])), "first").unwrap();
        writer.save_batch(&batch(json!([{"a": 2, "b": 3}])), "second").unwrap();

        let table = writer.combined_table();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows()[0][0], crate::table::Cell::Number(1.0));
        assert_eq!(table.rows()[1][0], crate::table::Cell::Number(2.0));
    }

    #[test]
    fn test_save_combined_without_records() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path()).unwrap();

        assert!(writer.combined_table().is_empty());
        assert!(matches!(
            writer.save_combined(DEFAULT_COMBINED_NAME),
            Err(RecordBookError::NothingAccumulated)
        ));
        assert!(xlsx_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_save_combined_reports_empty_view() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        writer.save_batch(&[Record::new()], "fieldless").unwrap();

        let result = writer.save_combined(DEFAULT_COMBINED_NAME);

        assert!(matches!(
            result,
            Err(RecordBookError::EmptyCombinedView { records: 1 })
        ));
    }

    #[test]
    fn test_same_second_saves_get_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(temp_dir.path()).unwrap();
        let records = batch(json!([{"a": 1}]));

        let first = writer.save_batch(&records, "dup").unwrap();
        let second = writer.save_batch(&records, "dup").unwrap();

        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_output_file_name_format() {
        let timestamp = Local
            .with_ymd_and_hms(2024, 3, 15, 9, 5, 7)
            .single()
            .unwrap();
        assert_eq!(
            output_file_name("batch1", &timestamp),
            "batch1_20240315_090507.xlsx"
        );
    }

    #[test]
    fn test_base_name_sanitization() {
        assert_eq!(file_stem("scans/page_001.jpg"), "page_001");
        assert_eq!(file_stem("batch1"), "batch1");
        assert_eq!(sanitize_base_name("список:2682"), "список_2682");
        assert_eq!(sanitize_base_name("   "), "output");
        assert_eq!(sanitize_base_name("my report"), "my report");
        assert_eq!(sanitize_base_name("batch_"), "batch_");
        assert_eq!(sanitize_base_name("a/b\tc"), "a_b_c");
        assert_eq!(sanitize_base_name(&"a".repeat(150)).len(), 100);
    }
}
