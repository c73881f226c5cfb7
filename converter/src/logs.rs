//! Progress logging for conversion runs.
//!
//! Entries go to stderr, either as indented text or as one JSON object per
//! line. Logging is off until [`Logger::configure`] enables it, so a failed
//! run only prints its error line.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::RwLock;

/// Log level
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// How entries are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logger settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub enabled: bool,
    pub format: LogFormat,
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Writes log entries to stderr
pub struct Logger {
    config: RwLock<LogConfig>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(LogConfig::default()),
        }
    }

    /// Replace the current settings
    pub fn configure(&self, config: LogConfig) {
        let mut current = self.config.write().unwrap_or_else(|e| e.into_inner());
        *current = config;
    }

    pub fn config(&self) -> LogConfig {
        *self.config.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Write an entry if logging is enabled
    pub fn log(&self, entry: LogEntry) {
        let config = self.config();
        if !config.enabled {
            return;
        }
        eprintln!("{}", render(&entry, config.format));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one entry as a single line.
pub fn render(entry: &LogEntry, format: LogFormat) -> String {
    match format {
        LogFormat::Text => {
            let prefix = match entry.level {
                LogLevel::Info => "   ",
                LogLevel::Success => "   ✓",
                LogLevel::Warning => "   ⚠️",
                LogLevel::Error => "   ❌",
            };
            let indent = "   ".repeat(entry.indent as usize);
            format!("{}{} {}", indent, prefix, entry.message)
        }
        LogFormat::Json => {
            serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone())
        }
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}
