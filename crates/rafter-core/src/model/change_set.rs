use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::attribute::Attribute;

/// Attribute keys mutated since the work package was loaded.
///
/// Supplied by the host persistence layer. Order is irrelevant; iteration
/// is ascending by key so reports stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    keys: BTreeSet<String>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as changed.
    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn contains_attribute(&self, attribute: Attribute) -> bool {
        self.contains(attribute.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Attribute> for ChangeSet {
    fn from(attribute: Attribute) -> Self {
        std::iter::once(attribute.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_collapse() {
        let changes: ChangeSet = ["subject", "subject", "due_date"].into_iter().collect();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains_attribute(Attribute::DueDate));
        assert!(!changes.contains("start_date"));
    }

    #[test]
    fn iteration_is_sorted() {
        let changes: ChangeSet = ["subject", "done_ratio", "custom_field_2"]
            .into_iter()
            .collect();
        let keys: Vec<&str> = changes.iter().collect();
        assert_eq!(keys, vec!["custom_field_2", "done_ratio", "subject"]);
    }
}
