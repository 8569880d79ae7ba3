//! Configuration system
//!
//! TOML-backed settings with embedded defaults, held in a global
//! read-mostly instance. Engine functions receive the relevant table
//! (`ImportConfig` / `ExportConfig`) explicitly; only the service layer and
//! the CLI read the global.

#[macro_use]
mod macros;
mod schemas;
mod utils;

pub use schemas::{Config, ExportConfig, ImportConfig, StorageConfig};
pub use utils::{load_config_from_path, read_config_file, with_config, CONFIG};
