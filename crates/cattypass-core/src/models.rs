//! Shared data types for the application.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A saved credential for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default)]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub note: String,
}

impl CredentialRecord {
    /// Create a record from its three fields.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            note: note.into(),
        }
    }

    /// Copy of the record with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.username.trim(),
            self.password.trim(),
            self.note.trim(),
        )
    }
}

/// All saved credentials keyed by site name.
///
/// Keys are case-sensitive and keep their insertion order, which is the order
/// the front-ends display them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialStore {
    records: IndexMap<String, CredentialRecord>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, site: &str) -> Option<&CredentialRecord> {
        self.records.get(site)
    }

    pub fn contains(&self, site: &str) -> bool {
        self.records.contains_key(site)
    }

    /// Insert or overwrite the record for `site`.
    ///
    /// An existing site keeps its position; the old record is replaced whole.
    /// Returns the previous record, if any.
    pub fn insert(
        &mut self,
        site: impl Into<String>,
        record: CredentialRecord,
    ) -> Option<CredentialRecord> {
        self.records.insert(site.into(), record)
    }

    /// Remove `site`, preserving the order of the remaining records.
    pub fn remove(&mut self, site: &str) -> Option<CredentialRecord> {
        self.records.shift_remove(site)
    }

    /// Shallow union: every key of `other` overwrites the same key here.
    pub fn merge(&mut self, other: CredentialStore) {
        self.records.extend(other.records);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CredentialRecord)> {
        self.records.iter()
    }

    pub fn sites(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }
}

impl FromIterator<(String, CredentialRecord)> for CredentialStore {
    fn from_iter<I: IntoIterator<Item = (String, CredentialRecord)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (site, record) in iter {
            store.insert(site, record);
        }
        store
    }
}

impl IntoIterator for CredentialStore {
    type Item = (String, CredentialRecord);
    type IntoIter = indexmap::map::IntoIter<String, CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Result of listing the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Nothing saved yet.
    Empty,
    /// Saved records in display order.
    Records(Vec<(String, CredentialRecord)>),
}

impl Listing {
    /// The records, or an empty vector for [`Listing::Empty`].
    pub fn into_records(self) -> Vec<(String, CredentialRecord)> {
        match self {
            Listing::Empty => Vec::new(),
            Listing::Records(records) => records,
        }
    }
}

impl From<CredentialStore> for Listing {
    fn from(store: CredentialStore) -> Self {
        if store.is_empty() {
            Listing::Empty
        } else {
            Listing::Records(store.into_iter().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let record: CredentialRecord = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert_eq!(record, CredentialRecord::new("", "pw", ""));
    }

    #[test]
    fn overwrite_keeps_position_and_replaces_whole_record() {
        let mut store = CredentialStore::new();
        store.insert("a", CredentialRecord::new("u1", "p1", "n1"));
        store.insert("b", CredentialRecord::new("u2", "p2", ""));
        store.insert("a", CredentialRecord::new("", "p3", ""));

        let sites: Vec<_> = store.sites().cloned().collect();
        assert_eq!(sites, vec!["a", "b"]);
        assert_eq!(store.get("a"), Some(&CredentialRecord::new("", "p3", "")));
    }

    #[test]
    fn site_keys_are_case_sensitive() {
        let mut store = CredentialStore::new();
        store.insert("Mail", CredentialRecord::new("", "p1", ""));
        store.insert("mail", CredentialRecord::new("", "p2", ""));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_overwrites_and_preserves() {
        let mut existing = CredentialStore::new();
        existing.insert("A", CredentialRecord::new("old", "old-pass", "old note"));
        existing.insert("C", CredentialRecord::new("c", "c-pass", ""));

        let mut imported = CredentialStore::new();
        imported.insert("A", CredentialRecord::new("", "new-pass", ""));
        imported.insert("B", CredentialRecord::new("b", "b-pass", ""));

        existing.merge(imported);

        assert_eq!(existing.len(), 3);
        assert_eq!(existing.get("A"), Some(&CredentialRecord::new("", "new-pass", "")));
        assert_eq!(existing.get("B"), Some(&CredentialRecord::new("b", "b-pass", "")));
        assert_eq!(existing.get("C"), Some(&CredentialRecord::new("c", "c-pass", "")));
    }

    #[test]
    fn empty_store_lists_as_empty_signal() {
        assert_eq!(Listing::from(CredentialStore::new()), Listing::Empty);
    }
}
