//! Violation collection for one validation pass.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::model::{Attribute, Role};

/// Where a violation is reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Whole-entity violation, not tied to a field.
    Base,
    Attribute(Attribute),
    /// A person role (`assignee`, `responsible`), distinct from its id column.
    Role(Role),
    /// Any other changed key, e.g. an unknown column or custom field.
    Other(String),
}

impl ErrorKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Base => "base",
            Self::Attribute(attribute) => attribute.as_str(),
            Self::Role(role) => role.as_str(),
            Self::Other(key) => key,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<Attribute> for ErrorKey {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Role> for ErrorKey {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl From<&str> for ErrorKey {
    fn from(key: &str) -> Self {
        match key {
            "base" => Self::Base,
            "assignee" => Self::Role(Role::Assignee),
            "responsible" => Self::Role(Role::Responsible),
            other => other
                .parse::<Attribute>()
                .map_or_else(|_| Self::Other(other.to_string()), Self::Attribute),
        }
    }
}

/// Symbolic violation code for programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSymbol {
    ErrorReadonly,
    Inclusion,
    ErrorUnauthorized,
    ViolatesRelationships,
    CanNotReopenOnClosedVersion,
    InvalidUserAssigned,
}

impl ErrorSymbol {
    /// Code string; doubles as the message catalog key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ErrorReadonly => "error_readonly",
            Self::Inclusion => "inclusion",
            Self::ErrorUnauthorized => "error_unauthorized",
            Self::ViolatesRelationships => "violates_relationships",
            Self::CanNotReopenOnClosedVersion => {
                "error_can_not_reopen_work_package_on_closed_version"
            }
            Self::InvalidUserAssigned => "invalid_user_assigned_to_work_package",
        }
    }
}

impl fmt::Display for ErrorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One rule violation: where, what code, and the display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleViolation {
    pub key: ErrorKey,
    pub symbol: ErrorSymbol,
    pub message: String,
}

/// Append-only violation list, in the order rules reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    violations: Vec<RuleViolation>,
}

impl Errors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. Duplicates are kept.
    pub fn add(&mut self, key: impl Into<ErrorKey>, symbol: ErrorSymbol, message: impl Into<String>) {
        self.violations.push(RuleViolation {
            key: key.into(),
            symbol,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleViolation> {
        self.violations.iter()
    }

    /// Codes reported for `key`, in report order.
    #[must_use]
    pub fn symbols_for(&self, key: impl Into<ErrorKey>) -> Vec<ErrorSymbol> {
        let key = key.into();
        self.violations
            .iter()
            .filter(|v| v.key == key)
            .map(|v| v.symbol)
            .collect()
    }

    /// Messages reported for `key`, in report order.
    #[must_use]
    pub fn messages_for(&self, key: impl Into<ErrorKey>) -> Vec<&str> {
        let key = key.into();
        self.violations
            .iter()
            .filter(|v| v.key == key)
            .map(|v| v.message.as_str())
            .collect()
    }

    /// Distinct keys in order of their first violation.
    #[must_use]
    pub fn keys(&self) -> Vec<&ErrorKey> {
        let mut keys: Vec<&ErrorKey> = Vec::new();
        for violation in &self.violations {
            if !keys.contains(&&violation.key) {
                keys.push(&violation.key);
            }
        }
        keys
    }

    /// Violations grouped by key, keys in order of first violation.
    #[must_use]
    pub fn grouped(&self) -> Vec<(&ErrorKey, Vec<&RuleViolation>)> {
        self.keys()
            .into_iter()
            .map(|key| {
                let group = self.violations.iter().filter(|v| &v.key == key).collect();
                (key, group)
            })
            .collect()
    }

    /// Display lines: base messages as-is, others prefixed with the key.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| match &v.key {
                ErrorKey::Base => v.message.clone(),
                ErrorKey::Attribute(attribute) => format!("{} {}", attribute.label(), v.message),
                key => format!("{key} {}", v.message),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a RuleViolation;
    type IntoIter = std::slice::Iter<'a, RuleViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_duplicates_and_order() {
        let mut errors = Errors::new();
        errors.add(Attribute::DueDate, ErrorSymbol::ErrorReadonly, "a");
        errors.add(ErrorKey::Base, ErrorSymbol::ErrorUnauthorized, "b");
        errors.add(Attribute::DueDate, ErrorSymbol::ErrorReadonly, "a");

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.symbols_for(Attribute::DueDate),
            vec![ErrorSymbol::ErrorReadonly, ErrorSymbol::ErrorReadonly]
        );
        assert_eq!(
            errors.keys(),
            vec![&ErrorKey::Attribute(Attribute::DueDate), &ErrorKey::Base]
        );
    }

    #[test]
    fn key_from_str_resolves_known_names() {
        assert_eq!(ErrorKey::from("base"), ErrorKey::Base);
        assert_eq!(ErrorKey::from("assignee"), ErrorKey::Role(Role::Assignee));
        assert_eq!(
            ErrorKey::from("start_date"),
            ErrorKey::Attribute(Attribute::StartDate)
        );
        assert_eq!(
            ErrorKey::from("author_id"),
            ErrorKey::Other("author_id".into())
        );
    }

    #[test]
    fn grouped_follows_first_violation_order() {
        let mut errors = Errors::new();
        errors.add(Attribute::DueDate, ErrorSymbol::ErrorReadonly, "a");
        errors.add(ErrorKey::Base, ErrorSymbol::ErrorUnauthorized, "b");
        errors.add(Attribute::DueDate, ErrorSymbol::Inclusion, "c");

        let grouped = errors.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, &ErrorKey::Attribute(Attribute::DueDate));
        let messages: Vec<&str> = grouped[0].1.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "c"]);
        assert_eq!(grouped[1].0, &ErrorKey::Base);
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn full_messages_prefix_fields() {
        let mut errors = Errors::new();
        errors.add(Attribute::StartDate, ErrorSymbol::ErrorReadonly, "is locked.");
        errors.add(ErrorKey::Base, ErrorSymbol::ErrorUnauthorized, "Nope.");
        assert_eq!(
            errors.full_messages(),
            vec!["Start date is locked.".to_string(), "Nope.".to_string()]
        );
    }

    #[test]
    fn serializes_as_list() {
        let mut errors = Errors::new();
        errors.add(Role::Assignee, ErrorSymbol::InvalidUserAssigned, "bad");
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([{
                "key": "assignee",
                "symbol": "invalid_user_assigned_to_work_package",
                "message": "bad"
            }])
        );
    }
}
