//! rafter-core library.
//!
//! Work package model, attribute contracts and the validation engine.
//!
//! # Conventions
//!
//! - **Errors**: validation outcomes are [`contract::Errors`], never `Err`.
//!   Hard faults use `thiserror` enums from [`error`]; file loading adds
//!   `anyhow` context.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`). The library never
//!   installs a subscriber.
//!
//! # Usage
//!
//! ```rust
//! use rafter_core::contract::{Permission, User, WorkPackageContract};
//! use rafter_core::model::{Attribute, ChangeSet, Project, WorkPackage};
//!
//! let wp = WorkPackage {
//!     id: Some(1),
//!     subject: "Ship it".into(),
//!     parent_id: Some(7),
//!     project: Some(Project { id: 3, ..Project::default() }),
//!     ..WorkPackage::default()
//! };
//! let user = User::new(5).with_permissions(3, [Permission::ManageSubtasks]);
//!
//! let mut contract = WorkPackageContract::new(wp, ChangeSet::from(Attribute::ParentId), user);
//! assert!(contract.validate());
//! ```

pub mod config;
pub mod contract;
pub mod error;
pub mod messages;
pub mod model;

pub use config::{DoneRatioMode, Settings};
pub use messages::Messages;
