//! Human-readable journal lines.

use chrono::NaiveDate;
use std::str::FromStr;

use rafter_core::Messages;
use rafter_core::model::Attribute;

use crate::detail::{CUSTOM_FIELDS_JOURNAL_PREFIX, JournalDetail};
use crate::formatter::{FormatterKind, FormatterRegistry, work_package_formatters};

/// Resolves ids in journal values to display names.
pub trait NameResolver {
    /// Name of the record `id` referenced by the journal key `key`
    /// (`status_id`, `assigned_to_id`, ...).
    fn association_name(&self, key: &str, id: u64) -> Option<String>;

    fn custom_field_name(&self, id: u64) -> Option<String>;
}

/// Resolver that knows no names; every id renders as itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawIds;

impl NameResolver for RawIds {
    fn association_name(&self, _key: &str, _id: u64) -> Option<String> {
        None
    }

    fn custom_field_name(&self, _id: u64) -> Option<String> {
        None
    }
}

/// Render `detail` with the work package formatter table.
#[must_use]
pub fn render(
    detail: &JournalDetail,
    resolver: &dyn NameResolver,
    messages: &Messages,
) -> Option<String> {
    render_with(work_package_formatters(), detail, resolver, messages)
}

/// Render `detail` with `registry`. Keys without a formatter render nothing.
#[must_use]
pub fn render_with(
    registry: &FormatterRegistry,
    detail: &JournalDetail,
    resolver: &dyn NameResolver,
    messages: &Messages,
) -> Option<String> {
    let Some(kind) = registry.formatter_for(&detail.key) else {
        tracing::debug!(key = %detail.key, "no journal formatter");
        return None;
    };

    let label = label(kind, &detail.key, resolver);
    let line = match kind {
        FormatterKind::Diff => {
            messages.translate("journal.diff_changed", &[("label", label.as_str())])
        }
        FormatterKind::Attachment => match (&detail.old, &detail.new) {
            (_, Some(new)) => messages.translate("journal.file_added", &[("new", new.as_str())]),
            (Some(old), None) => {
                messages.translate("journal.file_deleted", &[("old", old.as_str())])
            }
            (None, None) => return None,
        },
        _ => {
            let value = |raw: &String| format_value(kind, &detail.key, raw, resolver);
            let old = detail.old.as_ref().map(value);
            let new = detail.new.as_ref().map(value);
            let label = label.as_str();
            match (old, new) {
                (Some(old), Some(new)) => messages.translate(
                    "journal.changed_from",
                    &[("label", label), ("old", old.as_str()), ("new", new.as_str())],
                ),
                (None, Some(new)) => {
                    messages.translate("journal.set_to", &[("label", label), ("new", new.as_str())])
                }
                (Some(old), None) => {
                    messages.translate("journal.deleted", &[("label", label), ("old", old.as_str())])
                }
                (None, None) => return None,
            }
        }
    };
    Some(line)
}

fn label(kind: FormatterKind, key: &str, resolver: &dyn NameResolver) -> String {
    if kind == FormatterKind::CustomField {
        let id = key
            .strip_prefix(CUSTOM_FIELDS_JOURNAL_PREFIX)
            .and_then(|id| id.parse().ok());
        if let Some(name) = id.and_then(|id| resolver.custom_field_name(id)) {
            return name;
        }
    }
    Attribute::from_str(key).map_or_else(|_| key.to_string(), |a| a.label().to_string())
}

fn format_value(kind: FormatterKind, key: &str, raw: &str, resolver: &dyn NameResolver) -> String {
    match kind {
        FormatterKind::Id => format!("#{raw}"),
        FormatterKind::Fraction => raw
            .parse::<f64>()
            .map_or_else(|_| raw.to_string(), |v| format!("{v:.2}")),
        FormatterKind::Decimal => raw
            .parse::<f64>()
            .map_or_else(|_| raw.to_string(), |v| format!("{:.0}", v.trunc())),
        FormatterKind::Datetime => NaiveDate::from_str(raw)
            .map_or_else(|_| raw.to_string(), |d| d.format("%Y-%m-%d").to_string()),
        FormatterKind::NamedAssociation => raw
            .parse::<u64>()
            .ok()
            .and_then(|id| resolver.association_name(key, id))
            .unwrap_or_else(|| raw.to_string()),
        FormatterKind::Diff
        | FormatterKind::Attachment
        | FormatterKind::CustomField
        | FormatterKind::Plaintext => raw.to_string(),
    }
}
