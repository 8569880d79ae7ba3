//! Import and export orchestration
//!
//! Glues the pure pipeline (decode, reconcile, encode) to a `CredentialStore`.

use super::decoder;
use super::encoder;
use super::format::FileFormat;
use super::reconciler::reconcile_batch;
use super::types::{CanonicalCredentialRecord, ExportPayload, ImportSummary};
use crate::config::{ExportConfig, ImportConfig};
use crate::errors::{TranscodeError, TranscodeResult};
use crate::logger::{self, LogTag};
use crate::store::CredentialStore;

/// Resolve a bare extension (`csv`, `.XLSX`) or a filename (`dump.CSV`)
pub fn detect_format(extension_or_filename: &str) -> TranscodeResult<FileFormat> {
    match FileFormat::from_tag(extension_or_filename) {
        Ok(format) => Ok(format),
        Err(err) => {
            if extension_or_filename.trim().contains('.') {
                FileFormat::from_filename(extension_or_filename.trim())
            } else {
                Err(err)
            }
        }
    }
}

/// Decode, reconcile and persist an uploaded payload for `owner`
///
/// Decoding is all-or-nothing. Records are inserted one by one after the
/// whole batch has been reconciled; a store failure stops the import and
/// leaves earlier inserts in place.
pub fn import_credentials<S: CredentialStore + ?Sized>(
    store: &S,
    owner: &str,
    extension_or_filename: &str,
    bytes: &[u8],
    config: &ImportConfig,
) -> TranscodeResult<ImportSummary> {
    let format = detect_format(extension_or_filename)?;

    if bytes.len() > config.max_payload_bytes {
        return Err(TranscodeError::Decode(format!(
            "payload of {} bytes exceeds the {} byte limit",
            bytes.len(),
            config.max_payload_bytes
        )));
    }

    let raws = decoder::decode(bytes, format, &config.xml_entry_tag)?;
    let batch = reconcile_batch(&raws, owner, config);

    for record in &batch.records {
        store.insert(record)?;
    }

    let summary = ImportSummary {
        imported_count: batch.records.len(),
        skipped_count: batch.skipped,
        total_rows: raws.len(),
    };

    logger::info(
        LogTag::Import,
        &format!(
            "Imported {} of {} {} rows for owner {} ({} skipped)",
            summary.imported_count, summary.total_rows, format, owner, summary.skipped_count
        ),
    );

    Ok(summary)
}

/// Encode already-selected records; no store involved
pub fn export_records(
    records: &[CanonicalCredentialRecord],
    format_tag: &str,
    config: &ExportConfig,
) -> TranscodeResult<ExportPayload> {
    encoder::encode_tagged(records, format_tag, config)
}

/// Load every record of `owner` from the store and encode them
///
/// An owner without records is `NothingToExport` whatever the format tag.
pub fn export_credentials<S: CredentialStore + ?Sized>(
    store: &S,
    owner: &str,
    format_tag: &str,
    config: &ExportConfig,
) -> TranscodeResult<ExportPayload> {
    let records = store.find_all_by_owner(owner)?;

    if records.is_empty() {
        logger::warning(
            LogTag::Export,
            &format!("No records to export for owner {}", owner),
        );
        return Err(TranscodeError::NothingToExport);
    }

    let format = FileFormat::from_tag(format_tag)?;
    let payload = encoder::encode(&records, format, config)?;
    logger::info(
        LogTag::Export,
        &format!(
            "Exported {} records for owner {} as {}",
            records.len(),
            owner,
            payload.filename
        ),
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAINTEXT_WARNING;
    use crate::errors::StoreError;
    use crate::store::MemoryCredentialStore;
    use parking_lot::Mutex;

    struct FailingStore {
        fail_after: usize,
        inserted: Mutex<usize>,
    }

    impl CredentialStore for FailingStore {
        fn insert(&self, _record: &CanonicalCredentialRecord) -> Result<(), StoreError> {
            let mut inserted = self.inserted.lock();
            if *inserted >= self.fail_after {
                return Err(StoreError::Backend("disk full".into()));
            }
            *inserted += 1;
            Ok(())
        }

        fn find_all_by_owner(
            &self,
            _owner: &str,
        ) -> Result<Vec<CanonicalCredentialRecord>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }
    }

    #[test]
    fn detects_extensions_and_filenames() {
        assert_eq!(detect_format("csv").unwrap(), FileFormat::Csv);
        assert_eq!(detect_format(".XLSM").unwrap(), FileFormat::Xlsm);
        assert_eq!(detect_format("dump.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(detect_format("backup.2024.xml").unwrap(), FileFormat::Xml);
        assert!(matches!(
            detect_format("json"),
            Err(TranscodeError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format("dump.json"),
            Err(TranscodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn import_counts_kept_and_skipped() {
        let store = MemoryCredentialStore::new();
        let csv = b"Site,User Email,Pwd,comment\nGitHub,me@x.io,abc123,\n,,,just a note\n";
        let summary =
            import_credentials(&store, "alice", "csv", csv, &ImportConfig::default()).unwrap();

        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.message(), "Successfully imported 1 passwords");

        let stored = store.find_all_by_owner("alice").unwrap();
        assert_eq!(stored[0].title, "GitHub");
        assert_eq!(stored[0].email.as_deref(), Some("me@x.io"));
        assert_eq!(stored[0].notes.as_deref(), Some(PLAINTEXT_WARNING));
    }

    #[test]
    fn unsupported_extension_touches_nothing() {
        let store = MemoryCredentialStore::new();
        let err = import_credentials(&store, "alice", "pdf", b"x", &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, TranscodeError::UnsupportedFormat(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_payload_is_rejected_before_decoding() {
        let store = MemoryCredentialStore::new();
        let config = ImportConfig {
            max_payload_bytes: 8,
            ..ImportConfig::default()
        };
        let err = import_credentials(&store, "alice", "csv", b"title\nGitHub\n", &config)
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Decode(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_payload_stores_nothing() {
        let store = MemoryCredentialStore::new();
        let err = import_credentials(
            &store,
            "alice",
            "xml",
            b"<passwords><entry>",
            &ImportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TranscodeError::Decode(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn store_failure_aborts_and_propagates() {
        let store = FailingStore {
            fail_after: 1,
            inserted: Mutex::new(0),
        };
        let csv = b"title,password\na,1\nb,2\nc,3\n";
        let err = import_credentials(&store, "alice", "csv", csv, &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Store(StoreError::Backend(_))));
        assert_eq!(*store.inserted.lock(), 1);
    }

    #[test]
    fn export_of_unknown_owner_is_nothing_to_export() {
        let store = MemoryCredentialStore::new();
        let err = export_credentials(&store, "ghost", "csv", &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, TranscodeError::NothingToExport));
    }

    #[test]
    fn export_checks_emptiness_before_format() {
        let store = MemoryCredentialStore::new();
        let err = export_credentials(&store, "a", "pdf", &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, TranscodeError::NothingToExport));
        let err = export_records(&[], "pdf", &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, TranscodeError::NothingToExport));

        import_credentials(&store, "a", "csv", b"title\nMail\n", &ImportConfig::default())
            .unwrap();
        let err = export_credentials(&store, "a", "pdf", &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, TranscodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn export_propagates_store_errors() {
        let store = FailingStore {
            fail_after: 0,
            inserted: Mutex::new(0),
        };
        let err = export_credentials(&store, "a", "csv", &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, TranscodeError::Store(_)));
    }

    #[test]
    fn export_records_without_store() {
        let store = MemoryCredentialStore::new();
        import_credentials(
            &store,
            "alice",
            "csv",
            b"name,url,password\nMail,https://m.io,iv:ct\n",
            &ImportConfig::default(),
        )
        .unwrap();
        let records = store.find_all_by_owner("alice").unwrap();
        let payload = export_records(&records, "CSV", &ExportConfig::default()).unwrap();
        assert_eq!(payload.content_type, "text/csv");
        assert_eq!(payload.filename, "safepass_export.csv");
    }
}
