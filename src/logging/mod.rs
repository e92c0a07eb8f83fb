//! Logging infrastructure - structured tracing throughout the runtime
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log level, overridable through `RUST_LOG`
//! - Zero-cost when disabled
//! - Console or file output, human-readable or JSON

use std::ffi::OsStr;
use std::io;
use std::path::Path;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

// Re-export tracing macros for use throughout the runtime
pub use tracing::{debug, error, info, trace, warn, Level};

const DEFAULT_LOG_FILE: &str = "weird_runtime.log";

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the background file writer alive for the life of the process
static FILE_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Write to a file instead of stderr
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // WEIRD_LOG_LEVEL: trace, debug, info, warn, error
        if let Some(level) = lookup("WEIRD_LOG_LEVEL") {
            config.level = parse_level(&level);
        }

        // WEIRD_LOG_FILE: path to log file
        if let Some(path) = lookup("WEIRD_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(path);
        }

        config.json_format = lookup("WEIRD_LOG_JSON").is_some();
        config.show_spans = lookup("WEIRD_LOG_SPANS").is_some();

        config
    }

    /// Errors only
    pub fn quiet() -> Self {
        Self {
            level: Level::ERROR,
            ..Self::default()
        }
    }

    /// Every refcount operation, written to a file
    pub fn verbose() -> Self {
        Self {
            level: Level::TRACE,
            file_output: true,
            log_path: Some(DEFAULT_LOG_FILE.to_string()),
            json_format: false,
            show_spans: true,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call has an effect.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "weird_runtime={}",
                config.level.as_str().to_lowercase()
            ))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let writer = make_writer(&config);
        let (json_layer, text_layer) = if config.json_format {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(span_events);
            (Some(layer), None)
        } else {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_span_events(span_events)
                .with_target(true)
                .with_line_number(cfg!(debug_assertions));
            (None, Some(layer))
        };

        // Another subscriber may already be installed (e.g. by the host)
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(text_layer)
            .try_init()
            .ok();
    });
}

fn make_writer(config: &LogConfig) -> BoxMakeWriter {
    let path = match (&config.log_path, config.file_output) {
        (Some(path), true) => Path::new(path),
        _ => return BoxMakeWriter::new(io::stderr),
    };

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    *FILE_GUARD.lock() = Some(guard);
    BoxMakeWriter::new(writer)
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

/// Log runtime initialization
pub fn log_runtime_init() {
    info!(event = "runtime_init", "weird runtime initializing");
}

/// Log runtime shutdown
pub fn log_runtime_shutdown(live_objects: usize, total_created: u64) {
    info!(
        event = "runtime_shutdown",
        live_objects,
        total_created,
        "weird runtime shutting down"
    );
}

/// Log objects still alive at teardown
pub fn log_leaks(leaked: usize) {
    warn!(
        event = "runtime_leak",
        leaked_objects = leaked,
        "objects still referenced at shutdown"
    );
}

/// Log FFI function call
pub fn log_ffi_call(fn_name: &str) {
    trace!(event = "ffi_call", function = fn_name, "FFI function called");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.file_output);

        let quiet = LogConfig::quiet();
        assert_eq!(quiet.level, Level::ERROR);

        let verbose = LogConfig::verbose();
        assert_eq!(verbose.level, Level::TRACE);
        assert_eq!(verbose.log_path.as_deref(), Some(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_config_from_environment() {
        let config = config_from(&[
            ("WEIRD_LOG_LEVEL", "Debug"),
            ("WEIRD_LOG_FILE", "/tmp/weird.log"),
            ("WEIRD_LOG_JSON", "1"),
        ]);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.file_output);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/weird.log"));
        assert!(config.json_format);
        assert!(!config.show_spans);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = config_from(&[("WEIRD_LOG_LEVEL", "chatty")]);
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_init_idempotent() {
        init_with_config(LogConfig::quiet());
        init_with_config(LogConfig::verbose()); // Should not panic
        assert!(is_initialized());
    }
}
