//! Journals and the activity event metadata derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use rafter_core::Messages;
use rafter_core::model::{UserId, WorkPackage};

use crate::detail::JournalDetail;

/// One saved version of a work package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// 1 for the journal written on creation.
    pub version: u32,
    pub user_id: UserId,
    pub notes: Option<String>,
    pub details: Vec<JournalDetail>,
    pub created_at: DateTime<Utc>,
}

impl Journal {
    #[must_use]
    pub const fn new(version: u32, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            version,
            user_id,
            notes: None,
            details: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<JournalDetail>) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.version == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Note,
    Closed,
    Edit,
}

impl EventType {
    /// Activity type string (`work_package-edit`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "work_package-note",
            Self::Closed => "work_package-closed",
            Self::Edit => "work_package-edit",
        }
    }

    const fn message_key(self) -> &'static str {
        match self {
            Self::Note => "events.work_package_note",
            Self::Closed => "events.work_package_closed",
            Self::Edit => "events.work_package_edit",
        }
    }

    /// Classify the latest change of `wp`.
    ///
    /// A non-initial journal without details only carries a note.
    #[must_use]
    pub fn classify(wp: &WorkPackage, last_journal: Option<&Journal>) -> Self {
        let note_only = last_journal.is_some_and(|j| j.details.is_empty() && !j.is_initial());
        if note_only {
            Self::Note
        } else if wp.is_closed() {
            Self::Closed
        } else {
            Self::Edit
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub title: String,
    pub event_type: EventType,
    pub name: String,
    pub url: String,
}

/// Activity metadata for `wp` after its latest journal.
#[must_use]
pub fn event_meta(
    wp: &WorkPackage,
    last_journal: Option<&Journal>,
    messages: &Messages,
) -> EventMeta {
    let mut title = wp.to_string();
    if let Some(status) = &wp.status {
        title.push_str(&format!(" ({})", status.name));
    }

    let event_type = EventType::classify(wp, last_journal);
    let url = wp
        .id
        .map_or_else(|| "/work_packages".to_string(), |id| format!("/work_packages/{id}"));

    EventMeta {
        title,
        event_type,
        name: messages.translate(event_type.message_key(), &[]),
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rafter_core::model::{Status, WorkPackageType};

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).expect("valid timestamp")
    }

    fn wp(closed: bool) -> WorkPackage {
        WorkPackage {
            id: Some(42),
            subject: "Launch window".into(),
            work_package_type: Some(WorkPackageType {
                id: 1,
                name: "Task".into(),
                custom_fields: Vec::new(),
            }),
            status: Some(Status {
                id: if closed { 5 } else { 1 },
                name: if closed { "Closed" } else { "New" }.into(),
                is_closed: closed,
            }),
            ..WorkPackage::default()
        }
    }

    fn edit() -> Vec<JournalDetail> {
        vec![JournalDetail {
            key: "subject".into(),
            old: Some("a".into()),
            new: Some("b".into()),
        }]
    }

    #[test]
    fn title_and_url() {
        let meta = event_meta(&wp(false), None, &Messages::new());
        assert_eq!(meta.title, "Task #42: Launch window (New)");
        assert_eq!(meta.url, "/work_packages/42");
        assert_eq!(meta.event_type, EventType::Edit);
        assert_eq!(meta.name, "Work package edited");
    }

    #[test]
    fn note_only_journal_is_a_note() {
        let journal = Journal::new(3, 7, at()).with_notes("looks good");
        let meta = event_meta(&wp(true), Some(&journal), &Messages::new());
        assert_eq!(meta.event_type, EventType::Note);
        assert_eq!(meta.event_type.as_str(), "work_package-note");
        assert_eq!(meta.name, "Work package note added");
    }

    #[test]
    fn initial_journal_is_never_a_note() {
        let journal = Journal::new(1, 7, at());
        assert_eq!(
            EventType::classify(&wp(false), Some(&journal)),
            EventType::Edit
        );
    }

    #[test]
    fn closed_status_with_details_is_closed() {
        let journal = Journal::new(2, 7, at()).with_details(edit());
        let meta = event_meta(&wp(true), Some(&journal), &Messages::new());
        assert_eq!(meta.event_type, EventType::Closed);
        assert_eq!(meta.title, "Task #42: Launch window (Closed)");
    }

    #[test]
    fn title_without_status() {
        let mut package = wp(false);
        package.status = None;
        let meta = event_meta(&package, None, &Messages::new());
        assert_eq!(meta.title, "Task #42: Launch window");
    }
}
