//! Record reconciliation
//!
//! Turns one raw record into a canonical credential, or skips it:
//! 1. Resolve the six fields through the alias table
//! 2. Skip when title, url and secret are all absent
//! 3. Title falls back to url, then to the placeholder
//! 4. Plaintext-looking secrets get a warning appended to notes
//!
//! Pure and stateless; persistence happens afterwards in the service layer.

use super::aliases::{AliasTable, ALIAS_TABLE};
use super::heuristic::{annotate_notes, classify_secret, PlaintextVerdict};
use super::types::{CanonicalCredentialRecord, RawRecord, ReconcileOutcome, ReconciledBatch};
use crate::config::ImportConfig;
use crate::logger::{self, LogTag};

// =============================================================================
// SINGLE RECORD
// =============================================================================

/// Reconcile one raw record with the built-in alias table
pub fn reconcile_record(raw: &RawRecord, owner: &str, config: &ImportConfig) -> ReconcileOutcome {
    reconcile_with_table(&ALIAS_TABLE, raw, owner, config)
}

/// Reconcile one raw record against an explicit alias table
pub fn reconcile_with_table(
    table: &AliasTable,
    raw: &RawRecord,
    owner: &str,
    config: &ImportConfig,
) -> ReconcileOutcome {
    match reconcile_classified(table, raw, owner, config) {
        Some((record, _)) => ReconcileOutcome::Kept(record),
        None => ReconcileOutcome::Skipped,
    }
}

/// Kept record together with the plaintext verdict for its secret
///
/// `None` when the record is skipped.
pub fn reconcile_classified(
    table: &AliasTable,
    raw: &RawRecord,
    owner: &str,
    config: &ImportConfig,
) -> Option<(CanonicalCredentialRecord, PlaintextVerdict)> {
    let fields = table.resolve(raw);

    if fields.title.is_none() && fields.url.is_none() && fields.secret.is_none() {
        return None;
    }

    let title = fields
        .title
        .or_else(|| fields.url.clone())
        .unwrap_or_else(|| config.placeholder_title.clone());

    let secret = fields.secret.unwrap_or_default();
    let verdict = classify_secret(&secret, config.plaintext_threshold);
    let notes = match verdict.warning {
        Some(warning) => Some(annotate_notes(fields.notes, warning)),
        None => fields.notes,
    };

    let record = CanonicalCredentialRecord {
        owner: owner.to_string(),
        title,
        email: fields.email,
        username: fields.username,
        secret,
        url: fields.url,
        notes,
    };
    Some((record, verdict))
}

// =============================================================================
// BATCH
// =============================================================================

/// Reconcile a decoded batch, folding outcomes into kept records and a skip count
///
/// Source order is preserved.
pub fn reconcile_batch(
    raws: &[RawRecord],
    owner: &str,
    config: &ImportConfig,
) -> ReconciledBatch {
    let mut batch = ReconciledBatch {
        records: Vec::with_capacity(raws.len()),
        skipped: 0,
        plaintext: 0,
    };

    for (idx, raw) in raws.iter().enumerate() {
        match reconcile_classified(&ALIAS_TABLE, raw, owner, config) {
            Some((record, verdict)) => {
                if verdict.looks_plaintext {
                    batch.plaintext += 1;
                }
                batch.records.push(record);
            }
            None => {
                batch.skipped += 1;
                // Header names only, values may hold secrets
                let headers: Vec<&str> = raw.headers().collect();
                logger::debug(
                    LogTag::Reconcile,
                    &format!(
                        "Skipping record {} without title, url or password (headers: {})",
                        idx + 1,
                        headers.join(", ")
                    ),
                );
            }
        }
    }

    if batch.plaintext > 0 {
        logger::warning(
            LogTag::Reconcile,
            &format!(
                "{} of {} records look like plaintext passwords and were annotated",
                batch.plaintext,
                batch.records.len()
            ),
        );
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAINTEXT_WARNING;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs.iter().map(|(h, v)| (*h, *v)).collect()
    }

    fn kept(outcome: ReconcileOutcome) -> CanonicalCredentialRecord {
        outcome.into_record().expect("record should be kept")
    }

    const ENCRYPTED: &str = concat!(
        "0123456789abcdef0123456789abcdef:",
        "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef"
    );

    #[test]
    fn records_without_title_url_or_secret_are_skipped() {
        let cfg = ImportConfig::default();
        let outcome = reconcile_record(
            &raw(&[("email", "a@b.c"), ("username", "neo"), ("notes", "n")]),
            "owner",
            &cfg,
        );
        assert_eq!(outcome, ReconcileOutcome::Skipped);
        assert_eq!(reconcile_record(&RawRecord::new(), "owner", &cfg), ReconcileOutcome::Skipped);
    }

    #[test]
    fn empty_values_count_as_absent_for_skip_policy() {
        let cfg = ImportConfig::default();
        let outcome = reconcile_record(
            &raw(&[("title", ""), ("url", ""), ("password", ""), ("email", "a@b.c")]),
            "owner",
            &cfg,
        );
        assert!(!outcome.is_kept());
    }

    #[test]
    fn title_falls_back_to_url_then_placeholder() {
        let cfg = ImportConfig::default();

        let record = kept(reconcile_record(
            &raw(&[("link", "https://x.io"), ("password", ENCRYPTED)]),
            "o",
            &cfg,
        ));
        assert_eq!(record.title, "https://x.io");
        assert_eq!(record.url.as_deref(), Some("https://x.io"));

        let record = kept(reconcile_record(&raw(&[("password", ENCRYPTED)]), "o", &cfg));
        assert_eq!(record.title, "Imported Entry");
        assert_eq!(record.url, None);
    }

    #[test]
    fn plaintext_secret_is_annotated() {
        let cfg = ImportConfig::default();
        let record = kept(reconcile_record(
            &raw(&[("title", "Mail"), ("password", "abc123"), ("notes", "personal")]),
            "o",
            &cfg,
        ));
        assert_eq!(record.secret, "abc123");
        assert_eq!(
            record.notes.as_deref(),
            Some(format!("personal\n\n{}", PLAINTEXT_WARNING).as_str())
        );

        let record = kept(reconcile_record(
            &raw(&[("title", "Mail"), ("password", "abc123")]),
            "o",
            &cfg,
        ));
        assert_eq!(record.notes.as_deref(), Some(PLAINTEXT_WARNING));
    }

    #[test]
    fn encrypted_secret_keeps_notes_untouched() {
        let cfg = ImportConfig::default();
        let record = kept(reconcile_record(
            &raw(&[("title", "Bank"), ("encrypted_password", ENCRYPTED)]),
            "o",
            &cfg,
        ));
        assert_eq!(record.notes, None);
        assert_eq!(record.secret, ENCRYPTED);
    }

    #[test]
    fn missing_secret_becomes_empty_without_warning() {
        let cfg = ImportConfig::default();
        let record = kept(reconcile_record(&raw(&[("title", "Wiki")]), "o", &cfg));
        assert_eq!(record.secret, "");
        assert_eq!(record.notes, None);
    }

    #[test]
    fn threshold_comes_from_config() {
        let cfg = ImportConfig {
            plaintext_threshold: 5,
            ..ImportConfig::default()
        };
        let record = kept(reconcile_record(
            &raw(&[("title", "t"), ("password", "abc123")]),
            "o",
            &cfg,
        ));
        assert_eq!(record.notes, None);
    }

    #[test]
    fn owner_is_stamped_on_every_record() {
        let cfg = ImportConfig::default();
        let record = kept(reconcile_record(&raw(&[("title", "t")]), "user-42", &cfg));
        assert_eq!(record.owner, "user-42");
    }

    #[test]
    fn batch_folds_kept_and_skipped_in_order() {
        let cfg = ImportConfig::default();
        let raws = vec![
            raw(&[("title", "first")]),
            raw(&[("email", "lonely@x.io")]),
            raw(&[("url", "https://second.io")]),
        ];
        let batch = reconcile_batch(&raws, "o", &cfg);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.plaintext, 0);
        assert_eq!(batch.total(), 3);
        let titles: Vec<_> = batch.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "https://second.io"]);
    }

    #[test]
    fn classified_outcome_carries_the_verdict() {
        let cfg = ImportConfig::default();
        let (record, verdict) = reconcile_classified(
            &ALIAS_TABLE,
            &raw(&[("title", "Mail"), ("password", "abc123")]),
            "o",
            &cfg,
        )
        .unwrap();
        assert!(verdict.looks_plaintext);
        assert_eq!(record.notes.as_deref(), Some(PLAINTEXT_WARNING));

        let (_, verdict) =
            reconcile_classified(&ALIAS_TABLE, &raw(&[("password", ENCRYPTED)]), "o", &cfg)
                .unwrap();
        assert!(!verdict.looks_plaintext);
        assert!(reconcile_classified(&ALIAS_TABLE, &RawRecord::new(), "o", &cfg).is_none());
    }

    #[test]
    fn batch_counts_flagged_secrets() {
        let cfg = ImportConfig::default();
        let raws = vec![
            raw(&[("title", "a"), ("password", "abc123")]),
            raw(&[("title", "b"), ("password", ENCRYPTED)]),
            raw(&[("title", "c"), ("pwd", "hunter2")]),
            raw(&[("title", "d")]),
        ];
        let batch = reconcile_batch(&raws, "o", &cfg);
        assert_eq!(batch.records.len(), 4);
        assert_eq!(batch.plaintext, 2);
    }
}
