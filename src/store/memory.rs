use parking_lot::Mutex;

use super::CredentialStore;
use crate::credentials::CanonicalCredentialRecord;
use crate::errors::StoreError;

/// In-process store backed by a vector
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: Mutex<Vec<CanonicalCredentialRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn insert(&self, record: &CanonicalCredentialRecord) -> Result<(), StoreError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn find_all_by_owner(&self, owner: &str) -> Result<Vec<CanonicalCredentialRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, title: &str) -> CanonicalCredentialRecord {
        CanonicalCredentialRecord {
            owner: owner.into(),
            title: title.into(),
            email: None,
            username: None,
            secret: "iv:ct".into(),
            url: None,
            notes: None,
        }
    }

    #[test]
    fn filters_by_owner_in_insertion_order() {
        let store = MemoryCredentialStore::new();
        store.insert(&record("alice", "one")).unwrap();
        store.insert(&record("bob", "two")).unwrap();
        store.insert(&record("alice", "three")).unwrap();

        let titles: Vec<String> = store
            .find_all_by_owner("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["one", "three"]);
        assert_eq!(store.len(), 3);
        assert!(store.find_all_by_owner("carol").unwrap().is_empty());
    }
}
