//! Logger configuration built from command-line flags
//!
//! Recognized flags:
//! - `--debug-<tag>`: enable debug output for one tag (e.g. `--debug-import`)
//! - `--verbose`: enable verbose output for every tag
//! - `--verbose-<tag>`: enable verbose output for one tag
//! - `--quiet`: only show errors
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with debug output enabled
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled
    pub verbose_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a snapshot of the active logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

/// Replace the active logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build a configuration from an argument list
pub fn config_from_args<S: AsRef<str>>(args: &[S]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args.iter().map(|a| a.as_ref()) {
        if arg == "--quiet" {
            config.min_level = LogLevel::Error;
        } else if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if let Some(key) = arg.strip_prefix("--debug-") {
            if LogTag::from_debug_key(key).is_some() {
                config.debug_tags.insert(key.to_lowercase());
            }
        } else if let Some(key) = arg.strip_prefix("--verbose-") {
            if LogTag::from_debug_key(key).is_some() {
                config.verbose_tags.insert(key.to_lowercase());
                config.debug_tags.insert(key.to_lowercase());
            }
        }
    }

    // --quiet wins over everything else
    if args.iter().any(|a| a.as_ref() == "--quiet") {
        config.min_level = LogLevel::Error;
    } else if !config.verbose_tags.is_empty() && config.min_level < LogLevel::Verbose {
        config.min_level = LogLevel::Verbose;
    } else if !config.debug_tags.is_empty() && config.min_level < LogLevel::Debug {
        config.min_level = LogLevel::Debug;
    }

    config
}

pub(super) fn is_debug_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.debug_tags.contains(&tag.to_debug_key())
}

pub(super) fn is_verbose_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_args_default_to_info() {
        let cfg = config_from_args(&["safepass", "import"]);
        assert_eq!(cfg.min_level, LogLevel::Info);
        assert!(cfg.debug_tags.is_empty());
    }

    #[test]
    fn debug_flags_enable_known_tags_only() {
        let cfg = config_from_args(&["--debug-import", "--debug-nonsense"]);
        assert!(cfg.debug_tags.contains("import"));
        assert!(!cfg.debug_tags.contains("nonsense"));
        assert_eq!(cfg.min_level, LogLevel::Debug);
    }

    #[test]
    fn quiet_overrides_verbose() {
        let cfg = config_from_args(&["--verbose", "--quiet"]);
        assert_eq!(cfg.min_level, LogLevel::Error);
    }
}
