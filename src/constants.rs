//! Global constants used across the transcoder
//!
//! This module contains values that are part of the exchange format itself
//! and therefore not configurable.

// ============================================================================
// IMPORT CONSTANTS
// ============================================================================

/// Title used when a record carries neither a title nor a url
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "Imported Entry";

/// Secrets at or above this length (in characters) are assumed encrypted
pub const DEFAULT_PLAINTEXT_THRESHOLD: usize = 100;

/// Delimiter the encrypted-secret representation places between nonce and ciphertext
pub const ENCRYPTED_SECRET_DELIMITER: char = ':';

/// Annotation appended to notes when a secret looks like plaintext
pub const PLAINTEXT_WARNING: &str =
    "⚠️ WARNING: password imported as plaintext. Re-encrypt it by changing the value.";

/// Upload ceiling applied before decoding (10 MiB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Characters stripped from header names before alias matching
pub const HEADER_STRIP_CHARS: [char; 2] = ['_', '-'];

// ============================================================================
// EXPORT CONSTANTS
// ============================================================================

/// Basename of every export file (`safepass_export.<format>`)
pub const DEFAULT_EXPORT_BASENAME: &str = "safepass_export";

/// Worksheet name used for spreadsheet exports
pub const DEFAULT_SHEET_NAME: &str = "Passwords";

/// XML root element wrapping all entries
pub const DEFAULT_XML_ROOT_TAG: &str = "passwords";

/// XML element wrapping a single record
pub const DEFAULT_XML_ENTRY_TAG: &str = "entry";

// ============================================================================
// CONTENT TYPES
// ============================================================================

pub const CONTENT_TYPE_CSV: &str = "text/csv";
pub const CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CONTENT_TYPE_XLSM: &str = "application/vnd.ms-excel.sheet.macroEnabled.12";
pub const CONTENT_TYPE_XML: &str = "application/xml";

// ============================================================================
// STORAGE CONSTANTS
// ============================================================================

/// Default SQLite database location for the CLI
pub const DEFAULT_DATABASE_PATH: &str = "data/credentials.db";

/// Default configuration file location
pub const CONFIG_FILE_PATH: &str = "data/config.toml";
