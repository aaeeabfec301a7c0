use crate::error::{RecordBookError, Result};
use crate::extractor::DEFAULT_COMBINED_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub recursive: bool,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub combined_name: String,
    pub write_combined: bool,
    #[serde(default = "default_write_report")]
    pub write_report: bool,
}

fn default_write_report() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            extensions: vec!["json".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
            combined_name: DEFAULT_COMBINED_NAME.to_string(),
            write_combined: true,
            write_report: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RecordBookError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RecordBookError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| RecordBookError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["recordbook.toml", ".recordbook.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(recursive) = cli_args.recursive {
            self.input.recursive = recursive;
        }

        if let Some(ref combined_name) = cli_args.combined_name {
            self.output.combined_name = combined_name.clone();
        }

        if let Some(write_combined) = cli_args.write_combined {
            self.output.write_combined = write_combined;
        }

        if let Some(write_report) = cli_args.write_report {
            self.output.write_report = write_report;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| RecordBookError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| RecordBookError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.extensions.is_empty() {
            return Err(RecordBookError::Config {
                message: "At least one input file extension must be specified".to_string(),
            });
        }

        if self.output.combined_name.trim().is_empty() {
            return Err(RecordBookError::Config {
                message: "Combined output name must not be empty".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(RecordBookError::Config {
                message: format!(
                    "Unknown log level '{}' (expected one of: {})",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub recursive: Option<bool>,
    pub combined_name: Option<String>,
    pub write_combined: Option<bool>,
    pub write_report: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_recursive(mut self, recursive: Option<bool>) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_combined_name(mut self, combined_name: Option<String>) -> Self {
        self.combined_name = combined_name;
        self
    }

    pub fn with_write_combined(mut self, write_combined: Option<bool>) -> Self {
        self.write_combined = write_combined;
        self
    }

    pub fn with_write_report(mut self, write_report: Option<bool>) -> Self {
        self.write_report = write_report;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.extensions, vec!["json"]);
        assert_eq!(config.output.combined_name, "combined_output");
        assert!(config.output.write_combined);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.combined_name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.output.combined_name = "all_casualties".to_string();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.output.combined_name, "all_casualties");
        assert_eq!(loaded_config.input.recursive, config.input.recursive);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/nonexistent/recordbook.toml");
        assert!(matches!(result, Err(RecordBookError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_output_dir(Some(PathBuf::from("/tmp/sheets")))
            .with_recursive(Some(false))
            .with_write_combined(Some(false))
            .with_write_report(Some(false));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.output.directory, PathBuf::from("/tmp/sheets"));
        assert!(!config.input.recursive);
        assert!(!config.output.write_combined);
        assert!(!config.output.write_report);
        assert_eq!(config.output.combined_name, "combined_output");
    }

    #[test]
    fn test_report_toggle_defaults_on_when_absent() {
        let config: Config = toml::from_str(
            r#"
            [input]
            recursive = false
            extensions = ["json"]

            [output]
            directory = "sheets"
            combined_name = "list"
            write_combined = true

            [logging]
            level = "info"
            "#,
        )
        .unwrap();

        assert!(config.output.write_report);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[input]"));
        assert!(sample.contains("[output]"));
        assert!(sample.contains("[logging]"));
    }
}
