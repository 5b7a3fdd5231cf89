//! Attribute contracts: rule registry, validation engine and the work
//! package rules.

pub mod engine;
pub mod errors;
pub mod policy;
pub mod registry;
pub mod work_package;

pub use engine::{Contract, evaluate};
pub use errors::{ErrorKey, ErrorSymbol, Errors, RuleViolation};
pub use policy::{Actor, Capability, Permission, Policy, User, WorkPackagePolicy};
pub use registry::{AttributeRule, Rule, RuleRegistry, Validator, WritablePredicate};
pub use work_package::WorkPackageContract;
