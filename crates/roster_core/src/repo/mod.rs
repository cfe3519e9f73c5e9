//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for people and courses.
//! - Own transaction boundaries for multi-statement writes.
//!
//! # Invariants
//! - Multi-row writes run in one `Immediate` transaction and either commit
//!   fully or are rolled back by dropping the transaction.
//! - Repository APIs return semantic errors (`PersonNotFound`,
//!   `CourseNotFound`, `MissingCourses`) in addition to DB transport errors.

use crate::db::DbError;
use crate::enrollment::{join_ids, EnrollmentError};
use crate::model::course::{CourseId, CourseValidationError};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_repo;
pub mod person_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by person and course persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    CourseValidation(CourseValidationError),
    /// No person row matches the name pair.
    PersonNotFound {
        first_name: String,
        last_name: String,
    },
    CourseNotFound(CourseId),
    /// Enrollment targets with no stored course.
    MissingCourses(BTreeSet<CourseId>),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CourseValidation(err) => write!(f, "{err}"),
            Self::PersonNotFound { .. } => write!(f, "person not found"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::MissingCourses(ids) => write!(
                f,
                "course not found, trying to join a course that doesn't exist: {}",
                join_ids(ids)
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted roster data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::CourseValidation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CourseValidationError> for RepoError {
    fn from(value: CourseValidationError) -> Self {
        Self::CourseValidation(value)
    }
}

impl From<EnrollmentError> for RepoError {
    fn from(value: EnrollmentError) -> Self {
        match value {
            EnrollmentError::Storage(err) => Self::Db(err),
            EnrollmentError::MissingCourses(ids) => Self::MissingCourses(ids),
        }
    }
}
