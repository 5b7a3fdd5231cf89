//! Journal details computed from a validated change.
//!
//! Values are carried as strings, the way journals store them: ids as
//! decimal numbers, dates as ISO `YYYY-MM-DD`, hours as plain floats.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use rafter_core::model::{Attribute, CUSTOM_FIELD_PREFIX, ChangeSet, WorkPackage};

/// Prefix of journal keys for custom field values.
pub const CUSTOM_FIELDS_JOURNAL_PREFIX: &str = "custom_fields_";

/// Prefix of journal keys for attachments.
pub const ATTACHMENTS_JOURNAL_PREFIX: &str = "attachments_";

/// One changed value in a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDetail {
    pub key: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Journaled value of `attribute` on `wp`.
///
/// `lock_version` is bookkeeping and is never journaled.
#[must_use]
pub fn attribute_value(wp: &WorkPackage, attribute: Attribute) -> Option<String> {
    fn id(value: Option<u64>) -> Option<String> {
        value.map(|v| v.to_string())
    }

    match attribute {
        Attribute::Subject => Some(wp.subject.clone()).filter(|s| !s.is_empty()),
        Attribute::Description => wp.description.clone(),
        Attribute::StatusId => id(wp.status_id()),
        Attribute::TypeId => id(wp.type_id()),
        Attribute::PriorityId => id(wp.priority_id),
        Attribute::CategoryId => id(wp.category_id),
        Attribute::FixedVersionId => id(wp.fixed_version_id()),
        Attribute::LockVersion => None,
        Attribute::ProjectId => id(wp.project_id()),
        Attribute::DoneRatio => wp.done_ratio.map(|v| v.to_string()),
        Attribute::EstimatedHours => wp.estimated_hours.map(|v| v.to_string()),
        Attribute::ParentId => id(wp.parent_id),
        Attribute::AssignedToId => id(wp.assigned_to_id),
        Attribute::ResponsibleId => id(wp.responsible_id),
        Attribute::StartDate => wp.start_date.map(|d| d.to_string()),
        Attribute::DueDate => wp.due_date.map(|d| d.to_string()),
    }
}

/// Details for the change from `before` to `after`.
///
/// Built-in attributes and custom fields are taken from `changes`;
/// `parent_id` is always recalculated and attachments are always compared.
/// Keys whose old and new values are equal are dropped.
#[must_use]
pub fn diff(before: &WorkPackage, after: &WorkPackage, changes: &ChangeSet) -> Vec<JournalDetail> {
    let mut details = Vec::new();

    for attribute in Attribute::ALL {
        let tracked = attribute == Attribute::ParentId || changes.contains_attribute(attribute);
        if !tracked || attribute == Attribute::LockVersion {
            continue;
        }
        push_if_changed(
            &mut details,
            attribute.as_str().to_string(),
            attribute_value(before, attribute),
            attribute_value(after, attribute),
        );
    }

    let custom_field_ids: BTreeSet<u64> = changes
        .iter()
        .filter_map(|key| key.strip_prefix(CUSTOM_FIELD_PREFIX))
        .filter_map(|id| id.parse().ok())
        .collect();
    for id in custom_field_ids {
        push_if_changed(
            &mut details,
            format!("{CUSTOM_FIELDS_JOURNAL_PREFIX}{id}"),
            before.custom_values.get(&id).cloned(),
            after.custom_values.get(&id).cloned(),
        );
    }

    let attachment_ids: BTreeSet<u64> = before
        .attachments
        .iter()
        .chain(&after.attachments)
        .map(|a| a.id)
        .collect();
    for id in attachment_ids {
        let name = |wp: &WorkPackage| {
            wp.attachments
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.filename.clone())
        };
        push_if_changed(
            &mut details,
            format!("{ATTACHMENTS_JOURNAL_PREFIX}{id}"),
            name(before),
            name(after),
        );
    }

    tracing::debug!(details = details.len(), "computed journal details");
    details
}

fn push_if_changed(
    details: &mut Vec<JournalDetail>,
    key: String,
    old: Option<String>,
    new: Option<String>,
) {
    if old != new {
        details.push(JournalDetail { key, old, new });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rafter_core::model::Attachment;

    fn base() -> WorkPackage {
        WorkPackage {
            id: Some(1),
            subject: "Old".into(),
            estimated_hours: Some(2.5),
            ..WorkPackage::default()
        }
    }

    #[test]
    fn only_changed_keys_are_journaled() {
        let before = base();
        let mut after = base();
        after.subject = "New".into();
        after.due_date = NaiveDate::from_ymd_opt(2026, 5, 1);

        let changes: ChangeSet = ["subject"].into_iter().collect();
        let details = diff(&before, &after, &changes);
        assert_eq!(
            details,
            vec![JournalDetail {
                key: "subject".into(),
                old: Some("Old".into()),
                new: Some("New".into()),
            }]
        );
    }

    #[test]
    fn parent_is_always_recalculated() {
        let before = base();
        let mut after = base();
        after.parent_id = Some(9);
        let details = diff(&before, &after, &ChangeSet::new());
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].key, "parent_id");
        assert_eq!(details[0].new.as_deref(), Some("9"));
    }

    #[test]
    fn changed_flag_without_value_change_is_dropped() {
        let changes: ChangeSet = ["estimated_hours", "lock_version"].into_iter().collect();
        assert!(diff(&base(), &base(), &changes).is_empty());
    }

    #[test]
    fn custom_fields_use_journal_prefix() {
        let before = base();
        let mut after = base();
        after.custom_values.insert(3, "high".into());
        let changes: ChangeSet = ["custom_field_3"].into_iter().collect();
        let details = diff(&before, &after, &changes);
        assert_eq!(details[0].key, "custom_fields_3");
        assert_eq!(details[0].old, None);
        assert_eq!(details[0].new.as_deref(), Some("high"));
    }

    #[test]
    fn attachments_added_and_removed() {
        let mut before = base();
        before.attachments.push(Attachment {
            id: 1,
            filename: "old.png".into(),
        });
        let mut after = base();
        after.attachments.push(Attachment {
            id: 2,
            filename: "new.pdf".into(),
        });

        let details = diff(&before, &after, &ChangeSet::new());
        let keys: Vec<&str> = details.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["attachments_1", "attachments_2"]);
        assert_eq!(details[0].old.as_deref(), Some("old.png"));
        assert_eq!(details[1].new.as_deref(), Some("new.pdf"));
    }

    #[test]
    fn values_use_journal_representation() {
        let wp = WorkPackage {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 2),
            done_ratio: Some(40),
            estimated_hours: Some(1.5),
            ..WorkPackage::default()
        };
        assert_eq!(
            attribute_value(&wp, Attribute::StartDate).as_deref(),
            Some("2026-01-02")
        );
        assert_eq!(attribute_value(&wp, Attribute::DoneRatio).as_deref(), Some("40"));
        assert_eq!(
            attribute_value(&wp, Attribute::EstimatedHours).as_deref(),
            Some("1.5")
        );
        assert_eq!(attribute_value(&wp, Attribute::Subject), None);
    }
}
