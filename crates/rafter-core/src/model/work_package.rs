use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::error::ParseEnumError;

pub type WorkPackageId = u64;
pub type UserId = u64;
pub type ProjectId = u64;
pub type VersionId = u64;

/// A workflow status. Only closedness matters to the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_closed: bool,
}

/// The three version lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Open,
    Locked,
    Closed,
}

impl VersionStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "locked" => Ok(Self::Locked),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "version status",
                got: s.to_string(),
            }),
        }
    }
}

/// A version (milestone) a work package can be scheduled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub name: String,
    #[serde(default)]
    pub status: VersionStatus,
}

impl Version {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == VersionStatus::Closed
    }
}

/// A custom field activated for a work package type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
}

/// Work package type (task, bug, milestone, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPackageType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// The roles a project member can be picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assignee,
    Responsible,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assignee => "assignee",
            Self::Responsible => "responsible",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The project a work package lives in, with its precomputed member lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub possible_assignee_members: Vec<UserId>,
    pub possible_responsible_members: Vec<UserId>,
}

impl Project {
    /// Users that may be chosen for `role` in this project.
    #[must_use]
    pub fn possible_members(&self, role: Role) -> &[UserId] {
        match role {
            Role::Assignee => &self.possible_assignee_members,
            Role::Responsible => &self.possible_responsible_members,
        }
    }
}

/// A file attached to a work package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
}

/// Snapshot of a work package as seen by contracts and journals.
///
/// Associations the contract consults (`assignable_versions`, the
/// project's member lists, `soonest_start`) are loaded by the caller and
/// carried on the snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkPackage {
    pub id: Option<WorkPackageId>,
    pub subject: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    /// Status as loaded, before any in-flight change.
    pub status_was: Option<Status>,
    #[serde(rename = "type")]
    pub work_package_type: Option<WorkPackageType>,
    pub priority_id: Option<u64>,
    pub category_id: Option<u64>,
    pub fixed_version: Option<Version>,
    pub lock_version: u32,
    pub project: Option<Project>,
    pub done_ratio: Option<u8>,
    pub estimated_hours: Option<f64>,
    pub parent_id: Option<WorkPackageId>,
    pub children: Vec<WorkPackageId>,
    pub assigned_to_id: Option<UserId>,
    pub responsible_id: Option<UserId>,
    pub author_id: Option<UserId>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub soonest_start: Option<NaiveDate>,
    pub assignable_versions: Vec<Version>,
    pub custom_values: BTreeMap<u64, String>,
    pub attachments: Vec<Attachment>,
}

impl WorkPackage {
    #[must_use]
    pub fn status_id(&self) -> Option<u64> {
        self.status.as_ref().map(|s| s.id)
    }

    #[must_use]
    pub fn type_id(&self) -> Option<u64> {
        self.work_package_type.as_ref().map(|t| t.id)
    }

    #[must_use]
    pub fn fixed_version_id(&self) -> Option<VersionId> {
        self.fixed_version.as_ref().map(|v| v.id)
    }

    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project.as_ref().map(|p| p.id)
    }

    /// True when the work package has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub const fn soonest_start(&self) -> Option<NaiveDate> {
        self.soonest_start
    }

    /// True when the current status is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.is_closed)
    }

    /// True when this change moves the status from closed to open.
    #[must_use]
    pub fn reopened(&self) -> bool {
        let was_closed = self.status_was.as_ref().is_some_and(|s| s.is_closed);
        was_closed && !self.is_closed()
    }

    #[must_use]
    pub fn assignable_versions(&self) -> &[Version] {
        &self.assignable_versions
    }

    /// Custom fields defined for this work package's type.
    #[must_use]
    pub fn available_custom_fields(&self) -> &[CustomField] {
        self.work_package_type
            .as_ref()
            .map_or(&[], |t| t.custom_fields.as_slice())
    }

    /// Id of the user chosen for `role`.
    #[must_use]
    pub const fn member_id(&self, role: Role) -> Option<UserId> {
        match role {
            Role::Assignee => self.assigned_to_id,
            Role::Responsible => self.responsible_id,
        }
    }
}

impl fmt::Display for WorkPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kind) = &self.work_package_type {
            write!(f, "{} ", kind.name)?;
        }
        match self.id {
            Some(id) => write!(f, "#{id}: {}", self.subject),
            None => f.write_str(&self.subject),
        }
    }
}
