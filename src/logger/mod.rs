//! Structured logging system
//!
//! This module provides a small, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via --debug-<tag> flags
//! - Colored console output
//!
//! ## Usage
//!
//! ```rust
//! use safepass_transcoder::logger::{self, LogTag};
//!
//! logger::info(LogTag::Import, "Imported 12 records");
//! logger::debug(LogTag::Reconcile, "Skipped row 4"); // Only if --debug-reconcile
//! ```
//!
//! ## Initialization
//!
//! Binaries install a configuration built by `config_from_args` at startup;
//! library users that never do get Info-level output.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{config_from_args, get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (only with --debug-<tag> or --verbose)
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<tag>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
