//! SafePass credential transcoder
//!
//! Imports password-manager dumps (CSV, XLSX/XLSM, XML) into a canonical
//! credential schema and exports stored credentials back to any of those
//! formats.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod logger;
pub mod store;

pub use credentials::{
    export_credentials, import_credentials, CanonicalCredentialRecord, ExportPayload, FileFormat,
    ImportSummary, RawRecord,
};
pub use errors::{StoreError, TranscodeError, TranscodeResult};
pub use store::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore};
