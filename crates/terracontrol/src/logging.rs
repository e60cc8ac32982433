//! Logging system setup and configuration
//!
//! The interactive panel owns the terminal, so it either logs to a file or
//! drops log output entirely; every other command logs to stderr.

use anyhow::{anyhow, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Where formatted log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LogOutput {
    /// Picks the destination for a command, given the configured file.
    pub fn for_command(interactive: bool, settings: &LoggingSettings) -> Self {
        match (&settings.file_path, interactive) {
            (Some(path), _) => LogOutput::File(PathBuf::from(path)),
            (None, true) => LogOutput::Discard,
            (None, false) => LogOutput::Stderr,
        }
    }

    fn writer(&self) -> Result<BoxMakeWriter> {
        Ok(match self {
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::Discard => BoxMakeWriter::new(std::io::sink),
            LogOutput::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        })
    }
}

/// Initialize the logging system
///
/// Installs a global `tracing` subscriber with human-readable or JSON
/// output, writing to the destination picked by [`LogOutput::for_command`].
///
/// # Arguments
/// * `settings` - Logging section of the configuration (level, format)
/// * `output` - Where formatted records are written
///
/// # Returns
/// * `Result<()>` - Success, or an error if the log file cannot be opened
///   or a subscriber is already installed
///
/// # Environment Variables
/// * `RUST_LOG` - Overrides the configured level (e.g., "debug", "panel_core=trace")
///
/// # Examples
/// ```ignore
/// let settings = LoggingSettings::default();
/// setup_logging(&settings, &LogOutput::Stderr)?;
/// ```
pub fn setup_logging(settings: &LoggingSettings, output: &LogOutput) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let writer = output.writer()?;
    let ansi = matches!(output, LogOutput::Stderr);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if settings.json_format {
        registry
            .with(fmt::layer().json().with_target(false).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };
    result.map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    info!("🔧 Logging initialized with level: {}", settings.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_selection() {
        let mut settings = LoggingSettings::default();
        assert_eq!(LogOutput::for_command(true, &settings), LogOutput::Discard);
        assert_eq!(LogOutput::for_command(false, &settings), LogOutput::Stderr);

        settings.file_path = Some("panel.log".to_string());
        assert_eq!(
            LogOutput::for_command(true, &settings),
            LogOutput::File(PathBuf::from("panel.log"))
        );
    }

    #[test]
    fn test_file_writer_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("panel.log");
        LogOutput::File(path.clone()).writer().unwrap();
        assert!(path.exists());
    }
}
