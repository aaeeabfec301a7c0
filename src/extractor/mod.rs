pub mod output_writer;
pub mod report;
pub mod summary;

pub use output_writer::{output_file_name, OutputWriter, DEFAULT_COMBINED_NAME};
pub use summary::ExportSummary;

use crate::error::{RecordBookError, Result};
use crate::table::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Few-shot material handed to the extraction prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Examples {
    pub example_records: String,
    pub example_json_output: String,
}

/// Everything that distinguishes one kind of extractor from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub schema: Value,
    pub examples: Examples,
    pub description: String,
}

/// Extraction front end configured by an [`ExtractorConfig`]. Owns the
/// [`OutputWriter`] for its output directory.
pub struct Extractor {
    config: ExtractorConfig,
    output: OutputWriter,
}

impl Extractor {
    pub fn new<P: Into<PathBuf>>(output_dir: P, config: ExtractorConfig) -> Result<Self> {
        if config.schema.is_null() {
            return Err(RecordBookError::MissingSchema);
        }

        info!("Initializing {}", config.description);
        let output = OutputWriter::new(output_dir)?;

        Ok(Self { config, output })
    }

    pub fn schema(&self) -> &Value {
        &self.config.schema
    }

    pub fn examples(&self) -> &Examples {
        &self.config.examples
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn output_directory(&self) -> &Path {
        self.output.output_directory()
    }

    pub fn output(&self) -> &OutputWriter {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputWriter {
        &mut self.output
    }

    /// Persists the records extracted from one source file.
    pub fn save_batch(&mut self, records: &[Record], source_name: &str) -> Result<PathBuf> {
        self.output.save_batch(records, source_name)
    }

    pub fn save_combined(&self, base_name: &str) -> Result<PathBuf> {
        self.output.save_combined(base_name)
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.config.description)
    }
}
