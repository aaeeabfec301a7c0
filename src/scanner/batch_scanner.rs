use crate::config::InputConfig;
use crate::error::{RecordBookError, Result};
use crate::table::Record;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A JSON file holding the records extracted from one source document.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
}

impl BatchFile {
    pub fn new(path: PathBuf, relative_path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("batch")
            .to_string();

        Self {
            path,
            relative_path,
            name,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }

    /// Parses the file as a JSON array of objects. An empty array is valid.
    pub fn read_records(&self) -> Result<Vec<Record>> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.invalid(e.to_string()))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(self.invalid(format!(
                    "expected a JSON array of records, found {}",
                    json_kind(&other)
                )))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(self.invalid(format!(
                    "element {} is {}, expected an object",
                    index,
                    json_kind(&other)
                ))),
            })
            .collect()
    }

    fn invalid(&self, message: String) -> RecordBookError {
        RecordBookError::InvalidBatch {
            path: self.path.display().to_string(),
            message,
        }
    }
}

pub struct BatchScanner {
    extensions: Vec<String>,
    recursive: bool,
}

impl BatchScanner {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            recursive: config.recursive,
        }
    }

    /// A file is returned as-is. A directory yields every matching file,
    /// sorted by path.
    pub fn scan<P: AsRef<Path>>(&self, input: P) -> Result<Vec<BatchFile>> {
        let input = input.as_ref();

        if !input.exists() {
            return Err(RecordBookError::InvalidPath {
                path: input.display().to_string(),
            });
        }

        if input.is_file() {
            let relative = input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.to_path_buf());
            return Ok(vec![BatchFile::new(input.to_path_buf(), relative)]);
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut batches = Vec::new();

        for entry in WalkDir::new(input).max_depth(max_depth).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_batch_file(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(input)
                .map(Path::to_path_buf)
                .map_err(|_| RecordBookError::InvalidPath {
                    path: entry.path().display().to_string(),
                })?;
            batches.push(BatchFile::new(entry.path().to_path_buf(), relative));
        }

        if batches.is_empty() {
            warn!(
                path = %input.display(),
                recursive = self.recursive,
                "No batch files found"
            );
            return Err(RecordBookError::NoBatchesFound {
                path: input.display().to_string(),
            });
        }

        batches.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(count = batches.len(), "Found batch files");

        Ok(batches)
    }

    fn is_batch_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_lowercase()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
