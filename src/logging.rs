//! Tracing setup for vidshelf.
//!
//! `RUST_LOG` wins over the configured level when it is set, so operators can
//! turn on request tracing (`tower_http=debug`) without editing the config.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{Result, VidshelfError};

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Normalize a configured level name. Unknown names fall back to `info`.
fn normalize_level(level: &str) -> &'static str {
    let level = level.trim().to_ascii_lowercase();
    if level == "warning" {
        return "warn";
    }
    KNOWN_LEVELS
        .iter()
        .copied()
        .find(|known| *known == level)
        .unwrap_or("info")
}

/// Filter from `RUST_LOG`, or from the configured level when it is unset or invalid.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(normalize_level(level)))
}

/// Open the log file for appending, creating its directory first.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Log to stdout and to `config.file`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .try_init()
        .map_err(|e| VidshelfError::Config(format!("failed to install logger: {e}")))
}

/// Log to stdout only. Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .try_init();

    if let Err(e) = installed {
        eprintln!("Logger already installed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("trace"), "trace");
        assert_eq!(normalize_level("DEBUG"), "debug");
        assert_eq!(normalize_level(" info "), "info");
        assert_eq!(normalize_level("Warning"), "warn");
        assert_eq!(normalize_level("error"), "error");
    }

    #[test]
    fn test_normalize_level_unknown() {
        assert_eq!(normalize_level("loud"), "info");
        assert_eq!(normalize_level(""), "info");
    }

    #[test]
    fn test_open_log_file_creates_directory_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs/nested/vidshelf.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
