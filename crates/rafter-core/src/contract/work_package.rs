//! The work package contract.
//!
//! Declares which work package attributes a change may touch and which
//! values are acceptable. Rules, in declaration order:
//!
//! | attribute / rule        | writable when              | validator                       |
//! |-------------------------|----------------------------|---------------------------------|
//! | `subject` .. `category_id` | always                  | -                               |
//! | `fixed_version_id`      | always                     | version is assignable           |
//! | *no reopen on closed version* | -                    | whole-entity                    |
//! | `lock_version`, `project_id` | always                | -                               |
//! | `done_ratio`            | leaf and mode `field`      | -                               |
//! | `estimated_hours`       | leaf                       | -                               |
//! | `parent_id`             | always                     | actor may manage subtasks       |
//! | `assigned_to_id`        | always                     | assignee is a possible member   |
//! | `responsible_id`        | always                     | responsible is a possible member|
//! | `start_date`            | leaf                       | not before soonest start        |
//! | `due_date`              | leaf                       | -                               |

use std::sync::LazyLock;

use crate::config::{DoneRatioMode, Settings};
use crate::contract::engine::{self, Contract};
use crate::contract::errors::{ErrorKey, ErrorSymbol, Errors};
use crate::contract::policy::{Capability, Policy, User, WorkPackagePolicy};
use crate::contract::registry::RuleRegistry;
use crate::messages::Messages;
use crate::model::{Attribute, ChangeSet, Role, WorkPackage, custom_field_key};

static WORK_PACKAGE_RULES: LazyLock<RuleRegistry<WorkPackageContract>> = LazyLock::new(|| {
    RuleRegistry::new()
        .attribute(Attribute::Subject)
        .attribute(Attribute::Description)
        .attribute(Attribute::StatusId)
        .attribute(Attribute::TypeId)
        .attribute(Attribute::PriorityId)
        .attribute(Attribute::CategoryId)
        .register(
            Attribute::FixedVersionId,
            None,
            Some(validate_fixed_version_is_assignable),
        )
        .validate_with(
            "no reopen on closed version",
            validate_no_reopen_on_closed_version,
        )
        .attribute(Attribute::LockVersion)
        .attribute(Attribute::ProjectId)
        .register(Attribute::DoneRatio, Some(done_ratio_writable), None)
        .register(Attribute::EstimatedHours, Some(leaf), None)
        .register(
            Attribute::ParentId,
            None,
            Some(validate_user_allowed_to_set_parent),
        )
        .register(Attribute::AssignedToId, None, Some(validate_assignee_visible))
        .register(
            Attribute::ResponsibleId,
            None,
            Some(validate_responsible_visible),
        )
        .register(
            Attribute::StartDate,
            Some(leaf),
            Some(validate_start_not_before_soonest_start),
        )
        .register(Attribute::DueDate, Some(leaf), None)
});

/// Contract for creating or updating one work package on behalf of one actor.
pub struct WorkPackageContract {
    work_package: WorkPackage,
    changes: ChangeSet,
    policy: Box<dyn Policy>,
    settings: Settings,
    messages: Messages,
    errors: Errors,
}

impl WorkPackageContract {
    /// Bind a contract to `work_package` and `user`.
    #[must_use]
    pub fn new(work_package: WorkPackage, changes: ChangeSet, user: User) -> Self {
        Self::with_policy(work_package, changes, WorkPackagePolicy::new(user))
    }

    /// Bind a contract with a custom capability policy.
    #[must_use]
    pub fn with_policy(
        work_package: WorkPackage,
        changes: ChangeSet,
        policy: impl Policy + 'static,
    ) -> Self {
        Self {
            work_package,
            changes,
            policy: Box::new(policy),
            settings: Settings::default(),
            messages: Messages::default(),
            errors: Errors::default(),
        }
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn messages_from(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Run all rules. Returns `true` when no violation was found.
    ///
    /// Each call starts from an empty error set.
    pub fn validate(&mut self) -> bool {
        self.errors = engine::evaluate(&*self);
        if !self.errors.is_empty() {
            tracing::debug!(
                work_package = ?self.work_package.id,
                violations = self.errors.len(),
                "work package contract rejected change"
            );
        }
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn errors(&self) -> &Errors {
        &self.errors
    }

    #[must_use]
    pub const fn work_package(&self) -> &WorkPackage {
        &self.work_package
    }

    /// Give back the bound work package, e.g. to journal it after a pass.
    #[must_use]
    pub fn into_work_package(self) -> WorkPackage {
        self.work_package
    }

    fn add_translated(&self, errors: &mut Errors, key: impl Into<ErrorKey>, symbol: ErrorSymbol) {
        errors.add(key, symbol, self.messages.translate(symbol.as_str(), &[]));
    }

    fn validate_people_visible(&self, errors: &mut Errors, role: Role, id_attribute: Attribute) {
        let Some(project) = &self.work_package.project else {
            return;
        };
        let Some(id) = self.work_package.member_id(role) else {
            return;
        };
        if !self.changes.contains_attribute(id_attribute) {
            return;
        }

        if !project.possible_members(role).contains(&id) {
            let property = self
                .messages
                .translate(&format!("attributes.{}", role.as_str()), &[]);
            let message = self.messages.translate(
                ErrorSymbol::InvalidUserAssigned.as_str(),
                &[("property", property.as_str())],
            );
            errors.add(role, ErrorSymbol::InvalidUserAssigned, message);
        }
    }
}

impl Contract for WorkPackageContract {
    fn registry(&self) -> &'static RuleRegistry<Self> {
        &WORK_PACKAGE_RULES
    }

    fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Registered writable attributes plus one key per custom field of the
    /// work package's type.
    fn writable_attributes(&self) -> Vec<String> {
        let mut attributes = self.registry().writable_attributes(self);
        attributes.extend(
            self.work_package
                .available_custom_fields()
                .iter()
                .map(|field| custom_field_key(field.id)),
        );
        attributes
    }
}

fn leaf(contract: &WorkPackageContract) -> bool {
    contract.work_package.is_leaf()
}

fn done_ratio_writable(contract: &WorkPackageContract) -> bool {
    leaf(contract) && contract.settings.work_package_done_ratio == DoneRatioMode::Field
}

fn validate_fixed_version_is_assignable(contract: &WorkPackageContract, errors: &mut Errors) {
    let wp = &contract.work_package;
    let Some(version_id) = wp.fixed_version_id() else {
        return;
    };
    if !wp.assignable_versions().iter().any(|v| v.id == version_id) {
        contract.add_translated(errors, Attribute::FixedVersionId, ErrorSymbol::Inclusion);
    }
}

fn validate_no_reopen_on_closed_version(contract: &WorkPackageContract, errors: &mut Errors) {
    let wp = &contract.work_package;
    let Some(version) = &wp.fixed_version else {
        return;
    };
    if wp.reopened() && version.is_closed() {
        contract.add_translated(errors, ErrorKey::Base, ErrorSymbol::CanNotReopenOnClosedVersion);
    }
}

fn validate_user_allowed_to_set_parent(contract: &WorkPackageContract, errors: &mut Errors) {
    if !contract.changes.contains_attribute(Attribute::ParentId) {
        return;
    }
    if !contract
        .policy
        .allowed(&contract.work_package, Capability::ManageSubtasks)
    {
        contract.add_translated(errors, ErrorKey::Base, ErrorSymbol::ErrorUnauthorized);
    }
}

fn validate_assignee_visible(contract: &WorkPackageContract, errors: &mut Errors) {
    contract.validate_people_visible(errors, Role::Assignee, Attribute::AssignedToId);
}

fn validate_responsible_visible(contract: &WorkPackageContract, errors: &mut Errors) {
    contract.validate_people_visible(errors, Role::Responsible, Attribute::ResponsibleId);
}

fn validate_start_not_before_soonest_start(contract: &WorkPackageContract, errors: &mut Errors) {
    let wp = &contract.work_package;
    let (Some(start), Some(soonest)) = (wp.start_date, wp.soonest_start()) else {
        return;
    };
    if start < soonest {
        let soonest = soonest.to_string();
        let message = contract.messages.translate(
            ErrorSymbol::ViolatesRelationships.as_str(),
            &[("soonest_start", soonest.as_str())],
        );
        errors.add(Attribute::StartDate, ErrorSymbol::ViolatesRelationships, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::policy::Permission;
    use crate::model::{CustomField, Project, Version, VersionStatus, WorkPackageType};

    fn project() -> Project {
        Project {
            id: 1,
            name: "Apollo".into(),
            possible_assignee_members: vec![10, 11],
            possible_responsible_members: vec![10],
        }
    }

    fn work_package() -> WorkPackage {
        WorkPackage {
            id: Some(100),
            subject: "Build rocket".into(),
            done_ratio: Some(50),
            estimated_hours: Some(6.0),
            project: Some(project()),
            ..WorkPackage::default()
        }
    }

    fn contract(wp: WorkPackage, changes: &[&str]) -> WorkPackageContract {
        WorkPackageContract::new(wp, changes.iter().copied().collect(), User::new(10))
    }

    #[test]
    fn unchanged_work_package_passes() {
        let mut c = contract(work_package(), &[]);
        assert!(c.validate());
        assert!(c.errors().is_empty());
    }

    #[test]
    fn rule_table_has_all_attributes_in_order() {
        let attrs: Vec<Attribute> = WORK_PACKAGE_RULES
            .attribute_rules()
            .map(|rule| rule.attribute)
            .collect();
        assert_eq!(attrs, Attribute::ALL.to_vec());
        assert_eq!(WORK_PACKAGE_RULES.len(), Attribute::ALL.len() + 1);
    }

    #[test]
    fn writable_attributes_append_custom_fields() {
        let mut wp = work_package();
        wp.work_package_type = Some(WorkPackageType {
            id: 1,
            name: "Task".into(),
            custom_fields: vec![
                CustomField {
                    id: 4,
                    name: "Cost center".into(),
                },
                CustomField {
                    id: 9,
                    name: "Risk".into(),
                },
            ],
        });
        let c = contract(wp, &[]);
        let writable = c.writable_attributes();
        assert_eq!(writable.len(), Attribute::ALL.len() + 2);
        assert_eq!(&writable[writable.len() - 2..], ["custom_field_4", "custom_field_9"]);
    }

    #[test]
    fn custom_field_change_is_accepted() {
        let mut wp = work_package();
        wp.work_package_type = Some(WorkPackageType {
            id: 1,
            name: "Task".into(),
            custom_fields: vec![CustomField {
                id: 4,
                name: "Cost center".into(),
            }],
        });
        let mut c = contract(wp, &["custom_field_4"]);
        assert!(c.validate());

        let mut c = contract(work_package(), &["custom_field_4"]);
        assert!(!c.validate());
        assert_eq!(
            c.errors().symbols_for("custom_field_4"),
            vec![ErrorSymbol::ErrorReadonly]
        );
    }

    #[test]
    fn responsible_outside_member_list() {
        let mut wp = work_package();
        wp.responsible_id = Some(11);
        let mut c = contract(wp, &["responsible_id"]);
        assert!(!c.validate());
        assert_eq!(
            c.errors().messages_for(Role::Responsible),
            vec!["The chosen user is not allowed to be 'Responsible' for this work package."]
        );
    }

    #[test]
    fn parent_change_needs_manage_subtasks() {
        let mut wp = work_package();
        wp.parent_id = Some(5);

        let mut denied = contract(wp.clone(), &["parent_id"]);
        assert!(!denied.validate());
        assert_eq!(
            denied.errors().symbols_for(ErrorKey::Base),
            vec![ErrorSymbol::ErrorUnauthorized]
        );

        let user = User::new(10).with_permissions(1, [Permission::ManageSubtasks]);
        let mut allowed = WorkPackageContract::new(wp, ChangeSet::from(Attribute::ParentId), user);
        assert!(allowed.validate());
    }

    #[test]
    fn validate_is_idempotent() {
        let mut wp = work_package();
        wp.fixed_version = Some(Version {
            id: 3,
            name: "1.0".into(),
            status: VersionStatus::Open,
        });
        let mut c = contract(wp, &["fixed_version_id"]);
        assert!(!c.validate());
        let first = c.errors().clone();
        assert!(!c.validate());
        assert_eq!(c.errors(), &first);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn message_overrides_apply() {
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert("inclusion".to_string(), "ist ungültig.".to_string());
        let mut wp = work_package();
        wp.fixed_version = Some(Version {
            id: 3,
            name: "1.0".into(),
            status: VersionStatus::Open,
        });
        let mut c = contract(wp, &[]).messages_from(Messages::with_overrides(overrides));
        c.validate();
        assert_eq!(
            c.errors().messages_for(Attribute::FixedVersionId),
            vec!["ist ungültig."]
        );
    }
}
