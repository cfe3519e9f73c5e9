//! Enrollment synchronization between a person and the course table.
//!
//! # Responsibility
//! - Reconcile one person's `person_course` rows with a desired course set
//!   using the minimal deletions and insertions.
//! - Reject enrollment in courses that do not exist.
//!
//! # Invariants
//! - Every statement runs on the store handed in by the caller; this module
//!   never begins, commits or rolls back a transaction.
//! - Only rows with the given `person_id` are read or written.
//! - No join row is written when any addition targets a missing course.

use crate::db::DbError;
use crate::model::course::CourseId;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod diff;
mod store;
mod sync;
mod validate;

pub use diff::{diff_enrollment, EnrollmentDiff};
pub(crate) use store::load_enrolled_course_ids;
pub use store::{CourseIdSource, EnrollmentStore, SqliteEnrollmentStore};
pub use sync::{sync_enrollment, EnrollmentChange};
pub use validate::find_missing_courses;

/// Failure classes surfaced by enrollment synchronization.
#[derive(Debug)]
pub enum EnrollmentError {
    /// A read or write against `person_course` or `course` failed.
    Storage(DbError),
    /// Desired course ids that have no `course` row.
    MissingCourses(BTreeSet<CourseId>),
}

impl Display for EnrollmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::MissingCourses(ids) => write!(
                f,
                "course not found, trying to join a course that doesn't exist: {}",
                join_ids(ids)
            ),
        }
    }
}

impl Error for EnrollmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::MissingCourses(_) => None,
        }
    }
}

impl From<DbError> for EnrollmentError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for EnrollmentError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

pub(crate) fn join_ids(ids: &BTreeSet<CourseId>) -> String {
    ids.iter()
        .map(CourseId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
