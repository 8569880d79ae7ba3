//! Plaintext secret heuristic
//!
//! Stored secrets are expected to look like `<nonce>:<ciphertext>`, which
//! embeds a `:` and is long. A short secret without the delimiter was most
//! likely exported from another manager in clear text. The check only
//! annotates; it never blocks an import.

use crate::constants::{ENCRYPTED_SECRET_DELIMITER, PLAINTEXT_WARNING};

/// Classification of one secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaintextVerdict {
    pub looks_plaintext: bool,
    /// Annotation to attach to the record, present only when flagged
    pub warning: Option<&'static str>,
}

/// Classify a secret against a length threshold (in characters)
pub fn classify_secret(secret: &str, threshold: usize) -> PlaintextVerdict {
    let looks_plaintext = !secret.is_empty()
        && !secret.contains(ENCRYPTED_SECRET_DELIMITER)
        && secret.chars().count() < threshold;

    PlaintextVerdict {
        looks_plaintext,
        warning: looks_plaintext.then_some(PLAINTEXT_WARNING),
    }
}

/// Append a warning to existing notes
///
/// Joined with a blank line; notes that already carry the warning are
/// returned unchanged.
pub fn annotate_notes(notes: Option<String>, warning: &str) -> String {
    match notes {
        Some(existing) if existing.contains(warning) => existing,
        Some(existing) if !existing.is_empty() => format!("{}\n\n{}", existing, warning),
        _ => warning.to_string(),
    }
}
