//! Configuration loading and access helpers

use super::schemas::Config;
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
///
/// Lazily falls back to defaults if nothing was loaded, so library callers
/// never have to initialize it.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Parse a configuration file without touching the global instance
///
/// A missing file yields the defaults.
pub fn read_config_file(path: &str) -> Result<Config, String> {
    if !Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

    toml::from_str::<Config>(&contents)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))
}

/// Load configuration from a specific file path
///
/// If the global instance was already initialized (for example by an
/// earlier `with_config` call) its contents are replaced.
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let config = read_config_file(path)?;

    if let Err(fresh) = CONFIG.set(RwLock::new(config)) {
        *config_lock().write() = fresh.into_inner();
    }

    logger::debug(LogTag::Config, &format!("Configuration loaded from '{}'", path));
    Ok(())
}

fn config_lock() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default()))
}

/// Execute a function with read access to the configuration
///
/// # Example
/// ```
/// use safepass_transcoder::config::with_config;
///
/// let threshold = with_config(|cfg| cfg.import.plaintext_threshold);
/// assert!(threshold > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let config = config_lock().read();
    f(&config)
}
