//! Structured logging and tracing for Gridtariff
//!
//! Console plus daily-rolling file output through the tracing ecosystem,
//! with per-component context loggers.

use crate::config::LoggingConfig;
use crate::error::{GridTariffError, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Keep the non-blocking worker guard alive for the entire process lifetime
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        let init_result = (|| -> Result<()> {
            let level = parse_log_level(&config.level)?;
            let filter = build_env_filter(level);

            if should_use_console_only() {
                init_console_only_logging(filter, config.json_format, level);
                return Ok(());
            }

            init_file_logging(config, filter, level)
        })();

        if let Err(e) = init_result {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(GridTariffError::config(err.clone()));
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gridtariff={},reqwest=warn", level).into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os("GRIDTARIFF_DISABLE_FILE_LOG").is_some()
}

fn init_console_only_logging(filter: EnvFilter, json_format: bool, level: Level) {
    let console_layer = {
        let layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false);
        if json_format {
            layer.json().with_filter(LevelFilter::from_level(level)).boxed()
        } else {
            layer.with_filter(LevelFilter::from_level(level)).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();

    info!("Logging initialized - level: {:?}, console-only", level);
}

fn init_file_logging(config: &LoggingConfig, filter: EnvFilter, level: Level) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter);

    // Set up log file appender with rotation
    let file_appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("gridtariff")
        .filename_suffix("log")
        .max_log_files(config.backup_count as usize)
        .build({
            // If config.file is a file path, use its parent dir; otherwise treat as dir
            let p = Path::new(&config.file);
            if p.extension().is_some() {
                p.parent().unwrap_or(p)
            } else {
                p
            }
        })
        .map_err(|e| GridTariffError::io(format!("Failed to create log file appender: {}", e)))?;

    let (non_blocking_appender, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let file_layer = {
        let base = fmt::layer()
            .with_writer(non_blocking_appender)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false);
        if config.json_format {
            base.json().with_filter(LevelFilter::from_level(level)).boxed()
        } else {
            base.with_filter(LevelFilter::from_level(level)).boxed()
        }
    };

    let subscriber = registry.with(file_layer);

    if config.console_output {
        let console_layer = {
            let base = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false);
            if config.json_format {
                base.json().with_filter(LevelFilter::from_level(level)).boxed()
            } else {
                base.with_filter(LevelFilter::from_level(level)).boxed()
            }
        };
        subscriber.with(console_layer).init();
    } else {
        subscriber.init();
    }

    info!(
        "Logging initialized - level: {:?}, file: {}",
        level, config.file
    );
    Ok(())
}

/// Parse log level string to tracing Level
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(GridTariffError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "poller", "feed", "main")
    pub component: String,

    /// Company display name when the message concerns one company
    pub company: Option<String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            company: None,
        }
    }

    /// Set the company display name
    pub fn with_company(mut self, company: String) -> Self {
        self.company = Some(company);
        self
    }
}

/// Logger that prefixes messages with structured context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    fn format_fields(&self) -> String {
        match &self.context.company {
            Some(company) => format!("{} [{}]", self.context.component, company),
            None => self.context.component.clone(),
        }
    }

    /// Log an info message with context
    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }

    /// Log a warning message with context
    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }

    /// Log an error message with context
    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }

    /// Log a debug message with context
    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }

    /// Log a trace message with context
    pub fn trace(&self, message: &str) {
        let fields = self.format_fields();
        trace!(%fields, "{}", message);
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    let context = LogContext::new(component);
    StructuredLogger::new(context)
}

/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
