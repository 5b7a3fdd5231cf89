pub mod attribute;
pub mod change_set;
pub mod schedule;
pub mod work_package;

pub use attribute::{Attribute, CUSTOM_FIELD_PREFIX, custom_field_key};
pub use change_set::ChangeSet;
pub use work_package::{
    Attachment, CustomField, Project, ProjectId, Role, Status, UserId, Version, VersionId,
    VersionStatus, WorkPackage, WorkPackageId, WorkPackageType,
};
