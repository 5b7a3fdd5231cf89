//! Message catalog for violation and journal texts.
//!
//! Templates use `{name}` placeholders. Built-in English templates can be
//! overridden per key from the `[messages]` table of the project config.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

/// Built-in English templates, keyed by message key.
const DEFAULTS: &[(&str, &str)] = &[
    ("error_readonly", "was attempted to be written but is not writable."),
    ("inclusion", "is not set to one of the allowed values."),
    ("error_unauthorized", "may not be accessed."),
    (
        "violates_relationships",
        "can only be set to {soonest_start} or later so as not to violate the work package's relationships.",
    ),
    (
        "error_can_not_reopen_work_package_on_closed_version",
        "A work package assigned to a closed version cannot be reopened",
    ),
    (
        "invalid_user_assigned_to_work_package",
        "The chosen user is not allowed to be '{property}' for this work package.",
    ),
    ("attributes.assignee", "Assignee"),
    ("attributes.responsible", "Responsible"),
    ("events.work_package_edit", "Work package edited"),
    ("events.work_package_closed", "Work package closed"),
    ("events.work_package_note", "Work package note added"),
    ("journal.changed_from", "**{label}** changed from *{old}* to *{new}*"),
    ("journal.set_to", "**{label}** set to *{new}*"),
    ("journal.deleted", "**{label}** deleted (*{old}*)"),
    ("journal.diff_changed", "**{label}** changed"),
    ("journal.file_added", "**File** *{new}* added"),
    ("journal.file_deleted", "**File** deleted (*{old}*)"),
];

/// Localized message lookup with `{placeholder}` interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    overrides: BTreeMap<String, String>,
}

impl Messages {
    /// Catalog with the built-in templates only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog where `overrides` replace built-in templates key by key.
    #[must_use]
    pub const fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Whether `key` has a built-in template.
    #[must_use]
    pub fn is_known_key(key: &str) -> bool {
        DEFAULTS.iter().any(|(k, _)| *k == key)
    }

    /// Render `key` with `args` substituted.
    ///
    /// Unknown keys render as `translation missing: <key>` so a missing
    /// entry shows up in output instead of failing the pass.
    #[must_use]
    pub fn translate(&self, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .overrides
            .get(key)
            .map(String::as_str)
            .or_else(|| DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, t)| *t));

        match template {
            Some(template) => interpolate(template, args),
            None => format!("translation missing: {key}"),
        }
    }
}

/// Substitute placeholders in one pass; inserted values are never rescanned.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}
