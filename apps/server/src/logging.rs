//! Tracing setup: console on stderr plus a daily rolling log file.
//!
//! stdout belongs to the stdio transport, so nothing here ever writes to it.
//! A log directory that cannot be created downgrades to console-only logging.

use std::path::Path;

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LogSettings;

pub const LOG_FILE_PREFIX: &str = "findata";
pub const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("cannot create log directory: {0}")]
    Directory(#[from] std::io::Error),

    #[error("cannot open log file: {0}")]
    Appender(#[from] InitError),
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_tracing(settings: &LogSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard, file_error) =
        match file_appender(&settings.dir, settings.retention_days) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(format_layer(settings.json, writer, false)), Some(guard), None)
            }
            Err(e) => (None, None, Some(e)),
        };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(settings.json, std::io::stderr, true))
        .with(file_layer)
        .try_init();
    if let Err(e) = installed {
        eprintln!("Tracing already initialized: {}", e);
    }

    if let Some(e) = file_error {
        tracing::warn!(
            "File logging disabled, could not use {}: {}",
            settings.dir.display(),
            e
        );
    }

    guard
}

/// Daily appender writing `<dir>/findata.<YYYY-MM-DD>.log`.
pub fn file_appender(dir: &Path, retention_days: usize) -> Result<RollingFileAppender, LogFileError> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(retention_days.max(1))
        .build(dir)?;
    Ok(appender)
}

fn format_layer<S, W>(json: bool, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_appender_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");

        let mut appender = file_appender(&dir, 7).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("findata."));
        assert!(names[0].ends_with(".log"));
    }

    #[test]
    fn test_unusable_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        assert!(file_appender(&blocker.join("logs"), 7).is_err());
    }
}
