//! Existence check for enrollment targets.

use super::store::CourseIdSource;
use crate::db::DbResult;
use crate::model::course::CourseId;
use std::collections::BTreeSet;

/// Returns the candidates that have no stored course.
///
/// Loads every stored course id in one read. An empty candidate set returns
/// without touching storage.
pub fn find_missing_courses<S: CourseIdSource + ?Sized>(
    source: &S,
    candidates: &BTreeSet<CourseId>,
) -> DbResult<BTreeSet<CourseId>> {
    if candidates.is_empty() {
        return Ok(BTreeSet::new());
    }

    let existing = source.all_course_ids()?;
    Ok(candidates.difference(&existing).copied().collect())
}
