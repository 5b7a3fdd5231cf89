//! Journal formatter registry.
//!
//! Maps journal detail keys to the formatter that renders them. Keys are
//! registered either exactly (`subject`) or by pattern (`custom_fields_\d+`).
//! A later exact registration for the same key replaces the earlier one;
//! exact keys win over patterns.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// How a journal detail value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterKind {
    /// Reference rendered as `#id`.
    Id,
    /// Number with two decimals.
    Fraction,
    /// Whole number.
    Decimal,
    /// Long text; rendered as "changed" without values.
    Diff,
    Attachment,
    CustomField,
    /// Id resolved to the associated record's name.
    NamedAssociation,
    Datetime,
    Plaintext,
}

impl FormatterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Fraction => "fraction",
            Self::Decimal => "decimal",
            Self::Diff => "diff",
            Self::Attachment => "attachment",
            Self::CustomField => "custom_field",
            Self::NamedAssociation => "named_association",
            Self::Datetime => "datetime",
            Self::Plaintext => "plaintext",
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    exact: Vec<(String, FormatterKind)>,
    patterns: Vec<(Regex, FormatterKind)>,
}

impl FormatterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kind` for each of `keys`, replacing earlier registrations.
    #[must_use]
    pub fn register(mut self, kind: FormatterKind, keys: &[&str]) -> Self {
        for key in keys {
            match self.exact.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = kind,
                None => self.exact.push(((*key).to_string(), kind)),
            }
        }
        self
    }

    /// Register `kind` for every key fully matching `pattern`.
    #[must_use]
    pub fn register_pattern(mut self, kind: FormatterKind, pattern: Regex) -> Self {
        self.patterns.push((pattern, kind));
        self
    }

    /// The formatter for `key`, if any.
    #[must_use]
    pub fn formatter_for(&self, key: &str) -> Option<FormatterKind> {
        self.exact
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, kind)| *kind)
            .or_else(|| {
                self.patterns
                    .iter()
                    .find(|(pattern, _)| pattern.is_match(key))
                    .map(|(_, kind)| *kind)
            })
    }
}

static ATTACHMENT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^attachments_?\d+$").expect("valid regex"));

static CUSTOM_FIELD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^custom_fields_\d+$").expect("valid regex"));

static WORK_PACKAGE_FORMATTERS: LazyLock<FormatterRegistry> = LazyLock::new(|| {
    FormatterRegistry::new()
        .register(FormatterKind::Id, &["parent_id"])
        .register(FormatterKind::Fraction, &["estimated_hours"])
        .register(FormatterKind::Decimal, &["done_ratio"])
        .register(FormatterKind::Diff, &["description"])
        .register_pattern(FormatterKind::Attachment, ATTACHMENT_KEY.clone())
        .register_pattern(FormatterKind::CustomField, CUSTOM_FIELD_KEY.clone())
        .register(
            FormatterKind::NamedAssociation,
            &[
                "parent_id",
                "project_id",
                "status_id",
                "type_id",
                "assigned_to_id",
                "priority_id",
                "category_id",
                "fixed_version_id",
                "planning_element_status_id",
                "author_id",
                "responsible_id",
            ],
        )
        .register(FormatterKind::Datetime, &["start_date", "due_date"])
        .register(FormatterKind::Plaintext, &["subject"])
});

/// The formatter table used for work package journals.
#[must_use]
pub fn work_package_formatters() -> &'static FormatterRegistry {
    &WORK_PACKAGE_FORMATTERS
}
