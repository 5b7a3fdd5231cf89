//! Built-in work package attribute names.
//!
//! The string form is the snake_case column name used in change sets,
//! update payloads and journal details.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Prefix of the synthetic attribute key generated for each custom field.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_field_";

/// The attributes a work package contract knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Subject,
    Description,
    StatusId,
    TypeId,
    PriorityId,
    CategoryId,
    FixedVersionId,
    LockVersion,
    ProjectId,
    DoneRatio,
    EstimatedHours,
    ParentId,
    AssignedToId,
    ResponsibleId,
    StartDate,
    DueDate,
}

impl Attribute {
    /// All built-in attributes in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Subject,
        Self::Description,
        Self::StatusId,
        Self::TypeId,
        Self::PriorityId,
        Self::CategoryId,
        Self::FixedVersionId,
        Self::LockVersion,
        Self::ProjectId,
        Self::DoneRatio,
        Self::EstimatedHours,
        Self::ParentId,
        Self::AssignedToId,
        Self::ResponsibleId,
        Self::StartDate,
        Self::DueDate,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Description => "description",
            Self::StatusId => "status_id",
            Self::TypeId => "type_id",
            Self::PriorityId => "priority_id",
            Self::CategoryId => "category_id",
            Self::FixedVersionId => "fixed_version_id",
            Self::LockVersion => "lock_version",
            Self::ProjectId => "project_id",
            Self::DoneRatio => "done_ratio",
            Self::EstimatedHours => "estimated_hours",
            Self::ParentId => "parent_id",
            Self::AssignedToId => "assigned_to_id",
            Self::ResponsibleId => "responsible_id",
            Self::StartDate => "start_date",
            Self::DueDate => "due_date",
        }
    }

    /// Human-facing label, used when rendering journal lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::Description => "Description",
            Self::StatusId => "Status",
            Self::TypeId => "Type",
            Self::PriorityId => "Priority",
            Self::CategoryId => "Category",
            Self::FixedVersionId => "Version",
            Self::LockVersion => "Lock version",
            Self::ProjectId => "Project",
            Self::DoneRatio => "Progress (%)",
            Self::EstimatedHours => "Estimated time",
            Self::ParentId => "Parent",
            Self::AssignedToId => "Assignee",
            Self::ResponsibleId => "Responsible",
            Self::StartDate => "Start date",
            Self::DueDate => "Finish date",
        }
    }
}

/// Build the synthetic attribute key for a custom field.
#[must_use]
pub fn custom_field_key(id: u64) -> String {
    format!("{CUSTOM_FIELD_PREFIX}{id}")
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == s.trim())
            .ok_or_else(|| ParseEnumError {
                expected: "attribute",
                got: s.to_string(),
            })
    }
}

impl Serialize for Attribute {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
