//! Persistence collaborators for imported credentials
//!
//! The transcoding engine only needs two operations, both synchronous.
//! Errors come back as `StoreError` and are passed through untouched.

mod memory;
mod sqlite;

pub use memory::MemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

use crate::credentials::CanonicalCredentialRecord;
use crate::errors::StoreError;

/// Owner-scoped credential storage
pub trait CredentialStore {
    /// Persist one reconciled record
    fn insert(&self, record: &CanonicalCredentialRecord) -> Result<(), StoreError>;

    /// All records belonging to `owner`, in insertion order
    fn find_all_by_owner(&self, owner: &str) -> Result<Vec<CanonicalCredentialRecord>, StoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn insert(&self, record: &CanonicalCredentialRecord) -> Result<(), StoreError> {
        (**self).insert(record)
    }

    fn find_all_by_owner(&self, owner: &str) -> Result<Vec<CanonicalCredentialRecord>, StoreError> {
        (**self).find_all_by_owner(owner)
    }
}
