//! Credential import/export types
//!
//! Data structures shared by the decoders, the reconciler and the encoders.

use serde::{Deserialize, Serialize};

// =============================================================================
// RAW RECORDS
// =============================================================================

/// One decoded row or entry, keyed by its original header strings
///
/// Keeps headers in source order. Inserting a header that is already present
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Set a header's value, replacing any earlier value for the same header
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((header, value)),
        }
    }

    /// Set a header's value only if the header is not present yet
    ///
    /// Returns false when an earlier value was kept.
    pub fn insert_if_absent(
        &mut self,
        header: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let header = header.into();
        if self.contains(&header) {
            return false;
        }
        self.fields.push((header, value.into()));
        true
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, header: &str) -> bool {
        self.fields.iter().any(|(h, _)| h == header)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (header, value) in iter {
            record.insert(header, value);
        }
        record
    }
}

// =============================================================================
// CANONICAL SCHEMA
// =============================================================================

/// The six fixed schema slots every record is normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Title,
    Email,
    Username,
    Secret,
    Url,
    Notes,
}

impl CanonicalField {
    /// Export column order, identical across every format
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Title,
        CanonicalField::Email,
        CanonicalField::Username,
        CanonicalField::Secret,
        CanonicalField::Url,
        CanonicalField::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Title => "title",
            CanonicalField::Email => "email",
            CanonicalField::Username => "username",
            CanonicalField::Secret => "secret",
            CanonicalField::Url => "url",
            CanonicalField::Notes => "notes",
        }
    }

    /// Column header written on export
    ///
    /// The secret column keeps the stored field name so exported files
    /// resolve back through the alias table on import.
    pub fn export_header(&self) -> &'static str {
        match self {
            CanonicalField::Secret => "encrypted_password",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A credential normalized to the canonical schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCredentialRecord {
    /// Owner identifier the record belongs to
    pub owner: String,
    pub title: String,
    pub email: Option<String>,
    pub username: Option<String>,
    /// Opaque secret, never interpreted (may be empty)
    #[serde(rename = "encrypted_password")]
    pub secret: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl CanonicalCredentialRecord {
    /// Value of one canonical field, with absent values as empty strings
    pub fn field_value(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Title => &self.title,
            CanonicalField::Email => self.email.as_deref().unwrap_or(""),
            CanonicalField::Username => self.username.as_deref().unwrap_or(""),
            CanonicalField::Secret => &self.secret,
            CanonicalField::Url => self.url.as_deref().unwrap_or(""),
            CanonicalField::Notes => self.notes.as_deref().unwrap_or(""),
        }
    }

    /// All six values in export column order
    pub fn export_row(&self) -> [&str; 6] {
        CanonicalField::ALL.map(|field| self.field_value(field))
    }
}

// =============================================================================
// RECONCILIATION RESULTS
// =============================================================================

/// Result of reconciling a single raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record passed the skip policy
    Kept(CanonicalCredentialRecord),
    /// Record had no title, url or secret
    Skipped,
}

impl ReconcileOutcome {
    pub fn is_kept(&self) -> bool {
        matches!(self, ReconcileOutcome::Kept(_))
    }

    pub fn into_record(self) -> Option<CanonicalCredentialRecord> {
        match self {
            ReconcileOutcome::Kept(record) => Some(record),
            ReconcileOutcome::Skipped => None,
        }
    }
}

/// A batch of raw records folded into kept records and a skip count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledBatch {
    pub records: Vec<CanonicalCredentialRecord>,
    pub skipped: usize,
    /// Kept records whose secret was flagged as plaintext
    pub plaintext: usize,
}

impl ReconciledBatch {
    pub fn total(&self) -> usize {
        self.records.len() + self.skipped
    }
}

// =============================================================================
// IMPORT / EXPORT RESULTS
// =============================================================================

/// Result of a bulk import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records handed to the store
    pub imported_count: usize,
    /// Records discarded by the skip policy
    pub skipped_count: usize,
    /// Raw records decoded from the payload
    pub total_rows: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!("Successfully imported {} passwords", self.imported_count)
    }
}

/// Encoded export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    /// Suggested download name (`safepass_export.<format>`)
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_keeps_order_and_replaces_in_place() {
        let mut record = RawRecord::new();
        record.insert("Site", "a");
        record.insert("Pwd", "b");
        record.insert("Site", "c");
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(pairs, vec![("Site", "c"), ("Pwd", "b")]);
    }

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let mut record = RawRecord::new();
        assert!(record.insert_if_absent("title", "first"));
        assert!(!record.insert_if_absent("title", "second"));
        assert_eq!(record.get("title"), Some("first"));
    }

    #[test]
    fn export_row_fills_absent_fields_with_empty_strings() {
        let record = CanonicalCredentialRecord {
            owner: "u1".into(),
            title: "GitHub".into(),
            email: None,
            username: Some("octo".into()),
            secret: "iv:cipher".into(),
            url: None,
            notes: None,
        };
        assert_eq!(
            record.export_row(),
            ["GitHub", "", "octo", "iv:cipher", "", ""]
        );
    }

    #[test]
    fn export_headers_follow_fixed_order() {
        let headers: Vec<_> = CanonicalField::ALL.iter().map(|f| f.export_header()).collect();
        assert_eq!(
            headers,
            vec!["title", "email", "username", "encrypted_password", "url", "notes"]
        );
    }
}
