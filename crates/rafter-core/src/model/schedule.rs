//! Soonest-start computation from "follows" relations.
//!
//! # Overview
//!
//! A work package that follows another cannot start before its predecessor
//! ends. Each [`FollowsRelation`] contributes a successor soonest start of
//!
//! ```text
//! (predecessor due date, else predecessor start date) + 1 day + delay days
//! ```
//!
//! The parent's own soonest start is inherited as another lower bound. The
//! soonest start is the latest of all bounds; with no bounds there is none.
//!
//! Callers that load relations from storage compute the value here and
//! store it on [`WorkPackage::soonest_start`](super::work_package::WorkPackage)
//! before building a contract.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A "follows" relation as seen from the successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowsRelation {
    pub predecessor_start: Option<NaiveDate>,
    pub predecessor_due: Option<NaiveDate>,
    /// Extra days of lag between predecessor end and successor start.
    #[serde(default)]
    pub delay: u32,
}

impl FollowsRelation {
    /// Earliest start the relation allows for the successor.
    ///
    /// `None` when the predecessor has no dates at all.
    #[must_use]
    pub fn successor_soonest_start(&self) -> Option<NaiveDate> {
        let anchor = self.predecessor_due.or(self.predecessor_start)?;
        anchor.checked_add_days(Days::new(1 + u64::from(self.delay)))
    }
}

/// Latest lower bound from `relations` and the parent's soonest start.
#[must_use]
pub fn soonest_start(
    relations: &[FollowsRelation],
    parent_soonest_start: Option<NaiveDate>,
) -> Option<NaiveDate> {
    relations
        .iter()
        .filter_map(FollowsRelation::successor_soonest_start)
        .chain(parent_soonest_start)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn due_date_wins_over_start_date() {
        let rel = FollowsRelation {
            predecessor_start: Some(date(2026, 1, 1)),
            predecessor_due: Some(date(2026, 1, 10)),
            delay: 0,
        };
        assert_eq!(rel.successor_soonest_start(), Some(date(2026, 1, 11)));
    }

    #[test]
    fn start_date_used_without_due_date() {
        let rel = FollowsRelation {
            predecessor_start: Some(date(2026, 1, 1)),
            predecessor_due: None,
            delay: 2,
        };
        assert_eq!(rel.successor_soonest_start(), Some(date(2026, 1, 4)));
    }

    #[test]
    fn undated_predecessor_contributes_nothing() {
        let rel = FollowsRelation {
            predecessor_start: None,
            predecessor_due: None,
            delay: 5,
        };
        assert_eq!(rel.successor_soonest_start(), None);
        assert_eq!(soonest_start(&[rel], None), None);
    }

    #[test]
    fn latest_bound_wins() {
        let relations = [
            FollowsRelation {
                predecessor_start: None,
                predecessor_due: Some(date(2026, 2, 1)),
                delay: 0,
            },
            FollowsRelation {
                predecessor_start: None,
                predecessor_due: Some(date(2026, 2, 5)),
                delay: 1,
            },
        ];
        assert_eq!(soonest_start(&relations, None), Some(date(2026, 2, 7)));
        assert_eq!(
            soonest_start(&relations, Some(date(2026, 3, 1))),
            Some(date(2026, 3, 1))
        );
    }

    #[test]
    fn parent_bound_alone() {
        assert_eq!(
            soonest_start(&[], Some(date(2026, 4, 2))),
            Some(date(2026, 4, 2))
        );
        assert_eq!(soonest_start(&[], None), None);
    }
}
