//! Credential import/export pipeline
//!
//! ```text
//! bytes --decoder--> RawRecord* --reconciler--> CanonicalCredentialRecord* --store
//! store --> CanonicalCredentialRecord* --encoder--> ExportPayload
//! ```
//!
//! Submodules:
//! - `format`: format tags, content types and export filenames
//! - `decoder`: CSV, spreadsheet and XML readers
//! - `aliases`: header alias table and field resolution
//! - `heuristic`: plaintext secret detection
//! - `reconciler`: skip policy and title fallback
//! - `encoder` / `workbook`: export writers
//! - `service`: store-backed import and export

pub mod aliases;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod heuristic;
pub mod reconciler;
pub mod service;
pub mod types;
pub mod workbook;

pub use aliases::{normalize_header, resolve_fields, AliasTable, ResolvedFields, ALIAS_TABLE};
pub use decoder::{decode, decode_tagged};
pub use encoder::{encode, encode_tagged};
pub use format::{DataFormat, FileFormat};
pub use heuristic::{annotate_notes, classify_secret, PlaintextVerdict};
pub use reconciler::{
    reconcile_batch, reconcile_classified, reconcile_record, reconcile_with_table,
};
pub use service::{detect_format, export_credentials, export_records, import_credentials};
pub use types::{
    CanonicalCredentialRecord, CanonicalField, ExportPayload, ImportSummary, RawRecord,
    ReconcileOutcome, ReconciledBatch,
};
