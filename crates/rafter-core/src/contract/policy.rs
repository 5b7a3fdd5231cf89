//! Actors, permissions and the work package capability policy.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::{fmt, str::FromStr};

use crate::error::ParseEnumError;
use crate::model::{ProjectId, UserId, WorkPackage};

/// Project-level permissions relevant to work packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewWorkPackages,
    EditWorkPackages,
    AddWorkPackageNotes,
    ManageSubtasks,
    ManageWorkPackageRelations,
    ViewWorkPackageWatchers,
    AddWorkPackageWatchers,
    DeleteWorkPackageWatchers,
}

impl Permission {
    pub const ALL: [Self; 8] = [
        Self::ViewWorkPackages,
        Self::EditWorkPackages,
        Self::AddWorkPackageNotes,
        Self::ManageSubtasks,
        Self::ManageWorkPackageRelations,
        Self::ViewWorkPackageWatchers,
        Self::AddWorkPackageWatchers,
        Self::DeleteWorkPackageWatchers,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewWorkPackages => "view_work_packages",
            Self::EditWorkPackages => "edit_work_packages",
            Self::AddWorkPackageNotes => "add_work_package_notes",
            Self::ManageSubtasks => "manage_subtasks",
            Self::ManageWorkPackageRelations => "manage_work_package_relations",
            Self::ViewWorkPackageWatchers => "view_work_package_watchers",
            Self::AddWorkPackageWatchers => "add_work_package_watchers",
            Self::DeleteWorkPackageWatchers => "delete_work_package_watchers",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "permission",
                got: s.to_string(),
            })
    }
}

/// The acting principal.
pub trait Actor {
    fn id(&self) -> UserId;

    /// Whether the actor holds `permission` in `project`.
    fn allowed_to(&self, permission: Permission, project: ProjectId) -> bool;
}

/// A user with per-project permission sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    pub admin: bool,
    pub permissions: BTreeMap<ProjectId, BTreeSet<Permission>>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Grant `permissions` in `project`.
    #[must_use]
    pub fn with_permissions(
        mut self,
        project: ProjectId,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.permissions.entry(project).or_default().extend(permissions);
        self
    }

    #[must_use]
    pub const fn admin(mut self) -> Self {
        self.admin = true;
        self
    }
}

impl Actor for User {
    fn id(&self) -> UserId {
        self.id
    }

    fn allowed_to(&self, permission: Permission, project: ProjectId) -> bool {
        self.admin
            || self
                .permissions
                .get(&project)
                .is_some_and(|granted| granted.contains(&permission))
    }
}

/// Things an actor may want to do to a work package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    View,
    Edit,
    Comment,
    ManageSubtasks,
    ManageRelations,
}

impl Capability {
    /// The project permission that grants this capability.
    #[must_use]
    pub const fn permission(self) -> Permission {
        match self {
            Self::View => Permission::ViewWorkPackages,
            Self::Edit => Permission::EditWorkPackages,
            Self::Comment => Permission::AddWorkPackageNotes,
            Self::ManageSubtasks => Permission::ManageSubtasks,
            Self::ManageRelations => Permission::ManageWorkPackageRelations,
        }
    }
}

/// Capability check injected into contracts.
pub trait Policy {
    fn allowed(&self, work_package: &WorkPackage, capability: Capability) -> bool;
}

/// Grants a capability when the actor holds its permission in the work
/// package's project. Work packages without a project grant nothing.
#[derive(Debug, Clone)]
pub struct WorkPackagePolicy<A> {
    actor: A,
}

impl<A: Actor> WorkPackagePolicy<A> {
    pub const fn new(actor: A) -> Self {
        Self { actor }
    }

    pub const fn actor(&self) -> &A {
        &self.actor
    }
}

impl<A: Actor> Policy for WorkPackagePolicy<A> {
    fn allowed(&self, work_package: &WorkPackage, capability: Capability) -> bool {
        work_package
            .project_id()
            .is_some_and(|project| self.actor.allowed_to(capability.permission(), project))
    }
}
