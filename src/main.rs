use clap::Parser;
use recordbook::{
    logging, schemas, Cli, OutputFormatter, OutputMode, RecordBook, RecordBookError,
    UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Standalone commands don't need an input or a config
    if cli.generate_config {
        return handle_generate_config(&cli);
    }
    if cli.print_schema {
        return handle_print_schema();
    }

    let recordbook = match RecordBook::from_cli(&cli) {
        Ok(recordbook) => recordbook,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if let Err(e) = logging::init(
        &recordbook.config().logging.level,
        cli.verbosity_level(),
        cli.quiet,
        recordbook.log_writer(),
    ) {
        eprintln!("Warning: {}", e);
    }

    let Some(input) = cli.input.as_ref() else {
        recordbook
            .output_formatter()
            .error("An input file or directory is required");
        return 1;
    };

    match recordbook.export(input) {
        Ok(summary) => {
            recordbook.output_formatter().print_export_summary(&summary);

            if summary.is_complete() {
                0
            } else {
                2 // Completed with skipped or failed batches
            }
        }
        Err(e) => {
            recordbook.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &RecordBookError) -> i32 {
    match error {
        RecordBookError::NoBatchesFound { .. } => 6,
        RecordBookError::Io(_)
        | RecordBookError::Write { .. }
        | RecordBookError::InvalidPath { .. } => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "recordbook.toml".to_string());

    match RecordBook::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  recordbook <input> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_print_schema() -> i32 {
    match serde_json::to_string_pretty(&schemas::military::schema()) {
        Ok(schema) => {
            println!("{}", schema);
            0
        }
        Err(e) => {
            eprintln!("Failed to serialize schema: {}", e);
            1
        }
    }
}

fn print_startup_error(error: &RecordBookError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "recordbook",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        assert_eq!(handle_generate_config(&cli), 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("combined_name"));
    }

    #[test]
    fn test_exit_codes() {
        let not_found = RecordBookError::NoBatchesFound {
            path: "extracted".to_string(),
        };
        let missing = RecordBookError::InvalidPath {
            path: "missing".to_string(),
        };
        let config = RecordBookError::Config {
            message: "bad".to_string(),
        };

        assert_eq!(exit_code_for(&not_found), 6);
        assert_eq!(exit_code_for(&missing), 7);
        assert_eq!(exit_code_for(&config), 1);
    }
}
