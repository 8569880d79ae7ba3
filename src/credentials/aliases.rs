//! Alias resolution for raw headers
//!
//! Maps arbitrary column names onto the six canonical fields through a
//! static, ordered alias table. Resolution is purely structural: it never
//! looks at value content beyond "empty or not".

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{CanonicalField, RawRecord};
use crate::constants::HEADER_STRIP_CHARS;

// =============================================================================
// ALIAS TABLE
// =============================================================================

const TITLE_ALIASES: &[&str] = &[
    "title", "name", "site", "website", "service", "account", "item",
];
const EMAIL_ALIASES: &[&str] = &["email", "e-mail", "mail", "emailaddress", "useremail"];
const USERNAME_ALIASES: &[&str] = &["username", "user", "login", "accountname", "loginname"];
const SECRET_ALIASES: &[&str] = &[
    "password",
    "pass",
    "encryptedpassword",
    "encrypted_password",
    "pwd",
];
const URL_ALIASES: &[&str] = &[
    "url", "website", "site", "web", "link", "address", "host", "domain",
];
const NOTES_ALIASES: &[&str] = &[
    "notes",
    "note",
    "extra",
    "comment",
    "comments",
    "description",
    "memo",
    "grouping",
    "folder",
    "category",
];

/// Process-wide alias table, normalized once
pub static ALIAS_TABLE: Lazy<AliasTable> = Lazy::new(AliasTable::builtin);

/// Ordered alias lists per canonical field
///
/// Order inside a group is precedence: the first alias that matches a
/// non-empty value wins.
#[derive(Debug, Clone)]
pub struct AliasTable {
    groups: Vec<(CanonicalField, Vec<String>)>,
}

impl AliasTable {
    /// The built-in alias groups
    pub fn builtin() -> Self {
        Self::from_groups(&[
            (CanonicalField::Title, TITLE_ALIASES),
            (CanonicalField::Email, EMAIL_ALIASES),
            (CanonicalField::Username, USERNAME_ALIASES),
            (CanonicalField::Secret, SECRET_ALIASES),
            (CanonicalField::Url, URL_ALIASES),
            (CanonicalField::Notes, NOTES_ALIASES),
        ])
    }

    /// Build a table from raw alias lists; aliases are normalized and deduplicated
    pub fn from_groups(groups: &[(CanonicalField, &[&str])]) -> Self {
        let groups = groups
            .iter()
            .map(|(field, aliases)| {
                let mut normalized: Vec<String> = Vec::with_capacity(aliases.len());
                for alias in aliases.iter() {
                    let key = normalize_header(alias);
                    if !key.is_empty() && !normalized.contains(&key) {
                        normalized.push(key);
                    }
                }
                (*field, normalized)
            })
            .collect();
        Self { groups }
    }

    /// Normalized aliases for a field, in precedence order
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.groups
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve all six canonical fields of a raw record
    pub fn resolve(&self, record: &RawRecord) -> ResolvedFields {
        let normalized = normalize_record(record);
        let lookup = |field: CanonicalField| -> Option<String> {
            self.aliases(field).iter().find_map(|alias| {
                normalized
                    .get(alias.as_str())
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string())
            })
        };

        ResolvedFields {
            title: lookup(CanonicalField::Title),
            email: lookup(CanonicalField::Email),
            username: lookup(CanonicalField::Username),
            secret: lookup(CanonicalField::Secret),
            url: lookup(CanonicalField::Url),
            notes: lookup(CanonicalField::Notes),
        }
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Per-field resolution result; `None` means absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub title: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl ResolvedFields {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Title => self.title.as_deref(),
            CanonicalField::Email => self.email.as_deref(),
            CanonicalField::Username => self.username.as_deref(),
            CanonicalField::Secret => self.secret.as_deref(),
            CanonicalField::Url => self.url.as_deref(),
            CanonicalField::Notes => self.notes.as_deref(),
        }
    }
}

/// Resolve a raw record against the built-in alias table
pub fn resolve_fields(record: &RawRecord) -> ResolvedFields {
    ALIAS_TABLE.resolve(record)
}

/// Normalize a header: lower-case, trim, then drop `_`, `-` and whitespace
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !HEADER_STRIP_CHARS.contains(c))
        .collect()
}

/// Normalized header → value; later headers overwrite earlier ones that
/// normalize to the same key
fn normalize_record(record: &RawRecord) -> HashMap<String, &str> {
    let mut normalized = HashMap::with_capacity(record.len());
    for (header, value) in record.iter() {
        normalized.insert(normalize_header(header), value);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs.iter().map(|(h, v)| (*h, *v)).collect()
    }

    #[test]
    fn normalizes_case_whitespace_and_separators() {
        assert_eq!(normalize_header("  User Email "), "useremail");
        assert_eq!(normalize_header("E-Mail"), "email");
        assert_eq!(normalize_header("encrypted_password"), "encryptedpassword");
        assert_eq!(normalize_header("Login\tName"), "loginname");
    }

    #[test]
    fn every_alias_populates_its_field() {
        for field in CanonicalField::ALL {
            for alias in ALIAS_TABLE.aliases(field) {
                let resolved = resolve_fields(&record(&[(alias.as_str(), "value")]));
                assert_eq!(
                    resolved.get(field),
                    Some("value"),
                    "alias '{}' did not resolve to {}",
                    alias,
                    field
                );
            }
        }
    }

    #[test]
    fn raw_alias_spellings_resolve_after_normalization() {
        let resolved = resolve_fields(&record(&[
            ("E-mail", "a@b.c"),
            ("Encrypted_Password", "iv:ct"),
            ("Login Name", "neo"),
        ]));
        assert_eq!(resolved.email.as_deref(), Some("a@b.c"));
        assert_eq!(resolved.secret.as_deref(), Some("iv:ct"));
        assert_eq!(resolved.username.as_deref(), Some("neo"));
    }

    #[test]
    fn mixed_case_headers_with_spaces() {
        let resolved = resolve_fields(&record(&[
            ("Site", "example.com"),
            ("User Email", "me@example.com"),
            ("Pwd", "hunter2"),
        ]));
        assert_eq!(resolved.title.as_deref(), Some("example.com"));
        assert_eq!(resolved.email.as_deref(), Some("me@example.com"));
        assert_eq!(resolved.secret.as_deref(), Some("hunter2"));
    }

    #[test]
    fn first_alias_in_precedence_order_wins() {
        let resolved = resolve_fields(&record(&[("name", "second"), ("title", "first")]));
        assert_eq!(resolved.title.as_deref(), Some("first"));
    }

    #[test]
    fn empty_values_fall_through_to_next_alias() {
        let resolved = resolve_fields(&record(&[("title", ""), ("name", "fallback")]));
        assert_eq!(resolved.title.as_deref(), Some("fallback"));

        let resolved = resolve_fields(&record(&[("password", "")]));
        assert_eq!(resolved.secret, None);
    }

    #[test]
    fn unknown_headers_leave_fields_absent() {
        let resolved = resolve_fields(&record(&[("colour", "blue")]));
        assert_eq!(resolved, ResolvedFields::default());
    }

    #[test]
    fn resolution_is_idempotent() {
        let raw = record(&[("Website", "https://x.io"), ("Memo", "m")]);
        assert_eq!(resolve_fields(&raw), resolve_fields(&raw));
    }

    #[test]
    fn overlapping_aliases_resolve_both_fields() {
        let resolved = resolve_fields(&record(&[("website", "https://x.io")]));
        assert_eq!(resolved.title.as_deref(), Some("https://x.io"));
        assert_eq!(resolved.url.as_deref(), Some("https://x.io"));
    }
}
