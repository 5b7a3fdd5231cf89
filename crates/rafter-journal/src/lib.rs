//! rafter-journal library.
//!
//! Turns a validated work package change into journal details, renders
//! them as readable lines and derives activity event metadata.
//!
//! ```rust
//! use rafter_core::Messages;
//! use rafter_core::model::{ChangeSet, WorkPackage};
//! use rafter_journal::{RawIds, diff, render};
//!
//! let before = WorkPackage { subject: "Draft".into(), ..WorkPackage::default() };
//! let after = WorkPackage { subject: "Final".into(), ..before.clone() };
//! let changes: ChangeSet = ["subject"].into_iter().collect();
//!
//! let lines: Vec<String> = diff(&before, &after, &changes)
//!     .iter()
//!     .filter_map(|d| render(d, &RawIds, &Messages::new()))
//!     .collect();
//! assert_eq!(lines, ["**Subject** changed from *Draft* to *Final*"]);
//! ```

pub mod detail;
pub mod event;
pub mod formatter;
pub mod render;

pub use detail::{JournalDetail, diff};
pub use event::{EventMeta, EventType, Journal, event_meta};
pub use formatter::{FormatterKind, FormatterRegistry, work_package_formatters};
pub use render::{NameResolver, RawIds, render, render_with};
