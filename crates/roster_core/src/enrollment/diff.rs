//! Set difference between current and desired enrollment.

use crate::model::course::CourseId;
use std::collections::BTreeSet;

/// Join-row changes needed to move from the current to the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentDiff {
    /// Desired but not current: rows to insert.
    pub additions: BTreeSet<CourseId>,
    /// Current but not desired: rows to delete.
    pub removals: BTreeSet<CourseId>,
}

impl EnrollmentDiff {
    /// Returns whether applying this diff writes nothing.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Computes additions (`desired - current`) and removals (`current - desired`).
pub fn diff_enrollment(
    current: &BTreeSet<CourseId>,
    desired: &BTreeSet<CourseId>,
) -> EnrollmentDiff {
    EnrollmentDiff {
        additions: desired.difference(current).copied().collect(),
        removals: current.difference(desired).copied().collect(),
    }
}
