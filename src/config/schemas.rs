//! Configuration schemas - all config structures defined once with defaults
//!
//! Each struct is defined using the config_struct! macro which provides:
//! - Single-source definition (no repetition)
//! - Embedded defaults
//! - Serde support
use crate::config_struct;
use crate::constants::{
    DEFAULT_DATABASE_PATH, DEFAULT_EXPORT_BASENAME, DEFAULT_MAX_PAYLOAD_BYTES,
    DEFAULT_PLACEHOLDER_TITLE, DEFAULT_PLAINTEXT_THRESHOLD, DEFAULT_SHEET_NAME,
    DEFAULT_XML_ENTRY_TAG, DEFAULT_XML_ROOT_TAG,
};

// ============================================================================
// IMPORT CONFIGURATION
// ============================================================================

config_struct! {
    /// Decoding and reconciliation settings
    pub struct ImportConfig {
        /// Secrets shorter than this (and without a `:`) are flagged as plaintext
        plaintext_threshold: usize = DEFAULT_PLAINTEXT_THRESHOLD,
        /// Title used when neither a title nor a url could be resolved
        placeholder_title: String = DEFAULT_PLACEHOLDER_TITLE.to_string(),
        /// Payloads larger than this are rejected before decoding
        max_payload_bytes: usize = DEFAULT_MAX_PAYLOAD_BYTES,
        /// Name of the repeated per-record element in XML imports
        xml_entry_tag: String = DEFAULT_XML_ENTRY_TAG.to_string(),
    }
}

// ============================================================================
// EXPORT CONFIGURATION
// ============================================================================

config_struct! {
    /// Encoding settings
    pub struct ExportConfig {
        file_basename: String = DEFAULT_EXPORT_BASENAME.to_string(),
        sheet_name: String = DEFAULT_SHEET_NAME.to_string(),
        xml_root_tag: String = DEFAULT_XML_ROOT_TAG.to_string(),
        xml_entry_tag: String = DEFAULT_XML_ENTRY_TAG.to_string(),
    }
}

// ============================================================================
// STORAGE CONFIGURATION
// ============================================================================

config_struct! {
    /// Credential store settings (CLI only)
    pub struct StorageConfig {
        database_path: String = DEFAULT_DATABASE_PATH.to_string(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration, one table per concern
    pub struct Config {
        import: ImportConfig = ImportConfig::default(),
        export: ExportConfig = ExportConfig::default(),
        storage: StorageConfig = StorageConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_exchange_conventions() {
        let cfg = Config::default();
        assert_eq!(cfg.import.plaintext_threshold, 100);
        assert_eq!(cfg.import.placeholder_title, "Imported Entry");
        assert_eq!(cfg.export.file_basename, "safepass_export");
        assert_eq!(cfg.export.xml_root_tag, "passwords");
        assert_eq!(cfg.export.xml_entry_tag, "entry");
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg: Config = toml::from_str("[import]\nplaintext_threshold = 50\n").unwrap();
        assert_eq!(cfg.import.plaintext_threshold, 50);
        assert_eq!(cfg.import.placeholder_title, "Imported Entry");
        assert_eq!(cfg.export, ExportConfig::default());
    }
}
