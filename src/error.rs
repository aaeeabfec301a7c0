use crate::table::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordBookError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No records provided for {name}")]
    EmptyBatch { name: String },

    #[error("Failed to build table for {name}: {source}")]
    Conversion {
        name: String,
        #[source]
        source: TableError,
    },

    #[error("Failed to write spreadsheet {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("No records have been accumulated")]
    NothingAccumulated,

    #[error("Combined table is empty despite {records} accumulated records")]
    EmptyCombinedView { records: usize },

    #[error("Schema must be provided to the extractor")]
    MissingSchema,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Invalid batch file {path}: {message}")]
    InvalidBatch { path: String, message: String },

    #[error("No batch files found in {path}")]
    NoBatchesFound { path: String },
}

impl RecordBookError {
    /// True for the outcomes that mean "nothing to do" rather than a failure.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            RecordBookError::EmptyBatch { .. } | RecordBookError::NothingAccumulated
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for RecordBookError {
    fn user_message(&self) -> String {
        match self {
            RecordBookError::EmptyBatch { name } => {
                format!("Batch {} contains no records", name)
            }
            RecordBookError::Conversion { name, source } => {
                format!("Records in {} could not be tabulated: {}", name, source)
            }
            RecordBookError::Write { path, source } => {
                format!("Could not write {}: {}", path, source)
            }
            RecordBookError::NothingAccumulated => {
                "No records were collected, so there is nothing to combine".to_string()
            }
            RecordBookError::EmptyCombinedView { records } => {
                format!(
                    "Internal error: {} records were collected but the combined table is empty",
                    records
                )
            }
            RecordBookError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            RecordBookError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            RecordBookError::InvalidBatch { path, message } => {
                format!("Batch file {} is not usable: {}", path, message)
            }
            RecordBookError::NoBatchesFound { path } => {
                format!("No batch files found in {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            RecordBookError::Conversion { .. } => Some(
                "Every record value must be text, a number, a boolean or null. Nested arrays and objects cannot be written to a cell.".to_string()
            ),
            RecordBookError::Write { .. } | RecordBookError::Io(_) => Some(
                "Ensure the output directory exists, is writable and has free space.".to_string()
            ),
            RecordBookError::InvalidBatch { .. } => Some(
                "A batch file must contain a JSON array of objects, e.g. [{\"Surname\": \"Иванов\"}].".to_string()
            ),
            RecordBookError::NoBatchesFound { .. } => Some(
                "Check the input path, use --recursive for nested directories or adjust [input] extensions in the config.".to_string()
            ),
            RecordBookError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            RecordBookError::EmptyCombinedView { .. } => Some(
                "Run again with -vv to log the records that failed to combine.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for RecordBookError {
    fn from(error: toml::de::Error) -> Self {
        RecordBookError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordBookError>;
