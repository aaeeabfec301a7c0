use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recordbook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export extracted records to Excel spreadsheets")]
#[command(
    long_about = "RecordBook reads JSON batch files produced by the record extraction step, \
                  writes one timestamped .xlsx file per batch and a combined .xlsx file \
                  covering every record of the run."
)]
#[command(after_help = "EXAMPLES:\n  \
    recordbook extracted/ --output sheets\n  \
    recordbook extracted/page_001.json --no-combined\n  \
    recordbook extracted/ --recursive false --combined-name list_2682\n  \
    recordbook --print-schema")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Batch file or directory of batch files
    #[arg(required_unless_present_any = ["print_schema", "generate_config"])]
    pub input: Option<PathBuf>,

    /// Output directory for spreadsheets
    #[arg(short, long, env = "RECORDBOOK_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Search input directories recursively
    #[arg(short, long, help = "Scan subdirectories for batch files (true/false)")]
    pub recursive: Option<bool>,

    /// Base name of the combined spreadsheet
    #[arg(long)]
    pub combined_name: Option<String>,

    /// Skip the combined spreadsheet
    #[arg(long)]
    pub no_combined: bool,

    /// Skip the markdown run report
    #[arg(long)]
    pub no_report: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the record schema as JSON and exit
    #[arg(long)]
    pub print_schema: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        config.merge_with_cli_args(&self.create_cli_overrides());
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.output.clone())
            .with_recursive(self.recursive)
            .with_combined_name(self.combined_name.clone())
            .with_write_combined(if self.no_combined { Some(false) } else { None })
            .with_write_report(if self.no_report { Some(false) } else { None })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::parse_from([
            "recordbook",
            "extracted",
            "--output",
            "sheets",
            "--recursive",
            "false",
            "--no-combined",
            "--no-report",
        ]);

        let overrides = cli.create_cli_overrides();

        assert_eq!(overrides.output_dir, Some(PathBuf::from("sheets")));
        assert_eq!(overrides.recursive, Some(false));
        assert_eq!(overrides.write_combined, Some(false));
        assert_eq!(overrides.write_report, Some(false));
        assert_eq!(overrides.combined_name, None);
    }

    #[test]
    fn test_input_required_unless_standalone_command() {
        assert!(Cli::try_parse_from(["recordbook", "--output", "sheets"]).is_err());
        assert!(Cli::try_parse_from(["recordbook", "--print-schema"]).is_ok());
        assert!(Cli::try_parse_from(["recordbook", "--generate-config"]).is_ok());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["recordbook", "in", "-q", "-v"]).is_err());

        let cli = Cli::parse_from(["recordbook", "in", "-vv"]);
        assert!(cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 2);
    }
}
