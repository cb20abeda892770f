//! Structured logging and tracing for Strompris
//!
//! This module sets up the tracing subscriber with a daily rolling log file
//! and an optional console layer, and provides the component-scoped
//! [`StructuredLogger`] used across the pipeline.

use crate::config::LoggingConfig;
use crate::error::{Result, StromprisError};
use once_cell::sync::OnceCell;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, Subscriber, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod level;
mod structured;

pub use level::{min_level, parse_log_level};
pub use structured::{LogContext, StructuredLogger, get_logger, get_logger_with_context};

/// Env var that forces console-only logging (no log directory is touched)
pub const DISABLE_FILE_LOG_VAR: &str = "STROMPRIS_DISABLE_FILE_LOG";

// The appender's worker guard must outlive every log call
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Console and file levels after applying the per-sink overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SinkLevels {
    console: Level,
    file: Level,
}

impl SinkLevels {
    fn resolve(config: &LoggingConfig) -> Result<Self> {
        let base = parse_log_level(&config.level)?;
        // A bad override falls back to the base level rather than failing the run
        let or_base = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|s| parse_log_level(s).ok())
                .unwrap_or(base)
        };
        Ok(Self {
            console: or_base(&config.console_level),
            file: or_base(&config.file_level),
        })
    }

    fn most_verbose(self) -> Level {
        min_level(self.console, self.file)
    }
}

/// Initialize logging system based on configuration
///
/// Only the first call does any work; later calls report the first outcome.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        if let Err(e) = install_subscriber(config) {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    match INIT_ERROR.get() {
        Some(err) => Err(StromprisError::config(err.clone())),
        None => Ok(()),
    }
}

fn install_subscriber(config: &LoggingConfig) -> Result<()> {
    let levels = SinkLevels::resolve(config)?;
    let filter = build_env_filter(levels.most_verbose());

    if should_use_console_only() {
        // A subscriber may already be installed (for example by a test harness)
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(sink_layer(std::io::stdout, true, config.json_format, levels.console))
            .try_init();
        info!("Logging initialized - console only at {:?}", levels.console);
        return Ok(());
    }

    let dir = log_directory(&config.file);
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)?;
    }

    // strompris.YYYY-MM-DD.log, one per day of scheduled runs
    let appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("strompris")
        .filename_suffix("log")
        .max_log_files(config.backup_count.max(1) as usize)
        .build(dir)
        .map_err(|e| StromprisError::io(format!("Failed to create log file appender: {}", e)))?;
    let (writer, guard) = non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let console = console_wanted(config)
        .then(|| sink_layer(std::io::stdout, true, config.json_format, levels.console));

    tracing_subscriber::registry()
        .with(filter)
        .with(sink_layer(writer, false, config.json_format, levels.file))
        .with(console)
        .try_init()
        .map_err(|e| StromprisError::config(e.to_string()))?;

    info!(
        "Logging initialized - console: {:?}, file: {:?} in {}",
        levels.console,
        levels.file,
        dir.display()
    );
    Ok(())
}

/// One formatted output with its own level cut-off
fn sink_layer<S, W>(
    writer: W,
    ansi: bool,
    json: bool,
    level: Level,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);
    let cutoff = LevelFilter::from_level(level);
    if json {
        base.json().with_filter(cutoff).boxed()
    } else {
        base.with_filter(cutoff).boxed()
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("strompris={},reqwest=warn,hyper=warn", level).into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os(DISABLE_FILE_LOG_VAR).is_some()
}

/// Scheduled runs have no terminal attached; only echo to stdout when a human is watching
fn console_wanted(config: &LoggingConfig) -> bool {
    config.console_output && std::io::stdout().is_terminal()
}

/// `logging.file` may name a file (its parent is used) or a directory
fn log_directory(file: &str) -> &Path {
    let p = Path::new(file);
    if p.extension().is_some() {
        p.parent().unwrap_or(p)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_from_file_path() {
        assert_eq!(
            log_directory("data/logs/strompris.log"),
            Path::new("data/logs")
        );
        assert_eq!(log_directory("data/logs"), Path::new("data/logs"));
    }

    #[test]
    fn test_sink_levels_overrides() {
        let mut config = LoggingConfig::default();
        config.level = "WARNING".to_string();
        config.file_level = Some("debug".to_string());
        config.console_level = Some("nonsense".to_string());

        let levels = SinkLevels::resolve(&config).unwrap();
        assert_eq!(levels.console, Level::WARN);
        assert_eq!(levels.file, Level::DEBUG);
        assert_eq!(levels.most_verbose(), Level::DEBUG);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging(&LoggingConfig::default()).is_ok());
        assert!(init_logging(&LoggingConfig::default()).is_ok());

        // Logging through the installed subscriber should not panic
        let logger = get_logger("test_component");
        logger.info("Test info message");
        logger.warn("Test warning message");
    }
}
