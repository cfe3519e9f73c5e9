//! Enrollment synchronizer.

use super::diff::diff_enrollment;
use super::store::EnrollmentStore;
use super::validate::find_missing_courses;
use super::{join_ids, EnrollmentError};
use crate::model::course::CourseId;
use crate::model::person::PersonId;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::time::Instant;

/// Join-row changes applied by one `sync_enrollment` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentChange {
    pub added: BTreeSet<CourseId>,
    pub removed: BTreeSet<CourseId>,
}

impl EnrollmentChange {
    /// Returns whether the call wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Reconciles `person_id`'s enrollment with `desired`.
///
/// Steps, in order: read current ids, diff, validate additions against the
/// course table, batch-delete removals, batch-insert additions.
///
/// # Contract
/// - `store` must be bound to the caller's open transaction. This function
///   never commits or rolls back; on `Err` the caller must roll back, which
///   also undoes any deletion already applied.
/// - `desired` equal to the current set performs no writes.
/// - `EnrollmentError::MissingCourses` is returned before any join write.
pub fn sync_enrollment<S: EnrollmentStore + ?Sized>(
    store: &S,
    person_id: PersonId,
    desired: &BTreeSet<CourseId>,
) -> Result<EnrollmentChange, EnrollmentError> {
    let started_at = Instant::now();

    let current = store.enrolled_course_ids(person_id)?;
    let diff = diff_enrollment(&current, desired);
    if diff.is_empty() {
        debug!(
            "event=enrollment_sync module=enrollment status=noop person_id={} courses={}",
            person_id,
            current.len()
        );
        return Ok(EnrollmentChange::default());
    }

    let missing = find_missing_courses(store, &diff.additions)?;
    if !missing.is_empty() {
        warn!(
            "event=enrollment_sync module=enrollment status=rejected person_id={} error_code=course_not_found missing={}",
            person_id,
            join_ids(&missing)
        );
        return Err(EnrollmentError::MissingCourses(missing));
    }

    let deleted = store.delete_enrollments(person_id, &diff.removals)?;
    if deleted != diff.removals.len() {
        warn!(
            "event=enrollment_sync module=enrollment status=row_count_mismatch person_id={} op=delete expected={} actual={}",
            person_id,
            diff.removals.len(),
            deleted
        );
    }

    let inserted = store.insert_enrollments(person_id, &diff.additions)?;
    if inserted != diff.additions.len() {
        warn!(
            "event=enrollment_sync module=enrollment status=row_count_mismatch person_id={} op=insert expected={} actual={}",
            person_id,
            diff.additions.len(),
            inserted
        );
    }

    info!(
        "event=enrollment_sync module=enrollment status=ok person_id={} added={} removed={} duration_ms={}",
        person_id,
        diff.additions.len(),
        diff.removals.len(),
        started_at.elapsed().as_millis()
    );

    Ok(EnrollmentChange {
        added: diff.additions,
        removed: diff.removals,
    })
}

#[cfg(test)]
mod tests {
    use super::sync_enrollment;
    use crate::db::{DbError, DbResult};
    use crate::enrollment::{CourseIdSource, EnrollmentError, EnrollmentStore};
    use crate::model::course::CourseId;
    use crate::model::person::PersonId;
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, BTreeSet};

    /// In-memory join table that counts writes and can fail inserts.
    #[derive(Default)]
    struct FakeStore {
        courses: BTreeSet<CourseId>,
        links: RefCell<BTreeMap<PersonId, BTreeSet<CourseId>>>,
        writes: Cell<usize>,
        fail_insert: bool,
    }

    impl FakeStore {
        fn with(courses: &[CourseId], person_id: PersonId, enrolled: &[CourseId]) -> Self {
            let store = Self {
                courses: courses.iter().copied().collect(),
                ..Self::default()
            };
            store
                .links
                .borrow_mut()
                .insert(person_id, enrolled.iter().copied().collect());
            store
        }

        fn enrolled(&self, person_id: PersonId) -> BTreeSet<CourseId> {
            self.links
                .borrow()
                .get(&person_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl CourseIdSource for FakeStore {
        fn all_course_ids(&self) -> DbResult<BTreeSet<CourseId>> {
            Ok(self.courses.clone())
        }
    }

    impl EnrollmentStore for FakeStore {
        fn enrolled_course_ids(&self, person_id: PersonId) -> DbResult<BTreeSet<CourseId>> {
            Ok(self.enrolled(person_id))
        }

        fn delete_enrollments(
            &self,
            person_id: PersonId,
            course_ids: &BTreeSet<CourseId>,
        ) -> DbResult<usize> {
            self.writes.set(self.writes.get() + 1);
            let mut links = self.links.borrow_mut();
            let entry = links.entry(person_id).or_default();
            let before = entry.len();
            entry.retain(|id| !course_ids.contains(id));
            Ok(before - entry.len())
        }

        fn insert_enrollments(
            &self,
            person_id: PersonId,
            course_ids: &BTreeSet<CourseId>,
        ) -> DbResult<usize> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_insert {
                return Err(DbError::Sqlite(rusqlite::Error::InvalidQuery));
            }
            let mut links = self.links.borrow_mut();
            links
                .entry(person_id)
                .or_default()
                .extend(course_ids.iter().copied());
            Ok(course_ids.len())
        }
    }

    fn set(ids: &[CourseId]) -> BTreeSet<CourseId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn equal_sets_perform_no_writes() {
        let store = FakeStore::with(&[1, 2, 3], 7, &[1, 2, 3]);
        let change = sync_enrollment(&store, 7, &set(&[3, 1, 2])).unwrap();
        assert!(change.is_noop());
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn second_sync_with_same_set_is_noop() {
        let store = FakeStore::with(&[1, 2, 3, 4], 7, &[1]);
        let first = sync_enrollment(&store, 7, &set(&[2, 3])).unwrap();
        assert_eq!(first.added, set(&[2, 3]));
        assert_eq!(first.removed, set(&[1]));

        let writes_after_first = store.writes.get();
        let second = sync_enrollment(&store, 7, &set(&[2, 3])).unwrap();
        assert!(second.is_noop());
        assert_eq!(store.writes.get(), writes_after_first);
    }

    #[test]
    fn missing_course_rejects_before_any_write() {
        let store = FakeStore::with(&[1, 2, 3, 5], 7, &[1, 2, 3]);
        let err = sync_enrollment(&store, 7, &set(&[3, 4, 5])).unwrap_err();
        match err {
            EnrollmentError::MissingCourses(ids) => assert_eq!(ids, set(&[4])),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.writes.get(), 0);
        assert_eq!(store.enrolled(7), set(&[1, 2, 3]));
    }

    #[test]
    fn pure_removal_only_deletes() {
        let store = FakeStore::with(&[1, 2, 3], 7, &[1, 2, 3]);
        let change = sync_enrollment(&store, 7, &set(&[1])).unwrap();
        assert_eq!(change.removed, set(&[2, 3]));
        assert!(change.added.is_empty());
        assert_eq!(store.writes.get(), 1);
        assert_eq!(store.enrolled(7), set(&[1]));
    }

    #[test]
    fn removal_does_not_require_course_to_exist() {
        let store = FakeStore::with(&[1], 7, &[1, 99]);
        let change = sync_enrollment(&store, 7, &set(&[1])).unwrap();
        assert_eq!(change.removed, set(&[99]));
    }

    #[test]
    fn insert_failure_surfaces_as_storage_error() {
        let mut store = FakeStore::with(&[1, 2, 3, 4], 7, &[1, 2]);
        store.fail_insert = true;
        let err = sync_enrollment(&store, 7, &set(&[3, 4])).unwrap_err();
        assert!(matches!(err, EnrollmentError::Storage(_)));
    }

    #[test]
    fn other_people_are_untouched() {
        let store = FakeStore::with(&[1, 2], 7, &[1]);
        store.links.borrow_mut().insert(8, set(&[1, 2]));
        sync_enrollment(&store, 7, &set(&[])).unwrap();
        assert_eq!(store.enrolled(8), set(&[1, 2]));
    }
}
