use crate::ui::ProgressLogWriter;
use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber on `writer`. `RUST_LOG` wins over the
/// verbosity flags, which win over the configured level.
pub fn init(
    config_level: &str,
    verbose: u8,
    quiet: bool,
    writer: ProgressLogWriter,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config_level, verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

pub fn filter_directive(config_level: &str, verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => config_level.to_lowercase(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("INFO", 0, false), "recordbook=info");
        assert_eq!(filter_directive("warn", 1, false), "recordbook=debug");
        assert_eq!(filter_directive("warn", 3, false), "recordbook=trace");
        assert_eq!(filter_directive("debug", 2, true), "recordbook=error");
    }
}
