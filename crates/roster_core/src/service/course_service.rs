//! Course use-case service.

use crate::model::course::{Course, CourseId, CourseValidationError};
use crate::repo::course_repo::CourseRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for course use-cases.
#[derive(Debug)]
pub enum CourseServiceError {
    Invalid(CourseValidationError),
    CourseNotFound(CourseId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CourseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent course state: {details}"),
        }
    }
}

impl Error for CourseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CourseServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CourseNotFound(id) => Self::CourseNotFound(id),
            RepoError::CourseValidation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Course service facade over repository implementations.
pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one course and returns the stored record.
    pub fn create_course(&self, name: &str) -> Result<Course, CourseServiceError> {
        let id = self.repo.create_course(name)?;
        self.repo
            .get_course(id)?
            .ok_or(CourseServiceError::InconsistentState(
                "created course not found in read-back",
            ))
    }

    pub fn get_course(&self, id: CourseId) -> Result<Course, CourseServiceError> {
        self.repo
            .get_course(id)?
            .ok_or(CourseServiceError::CourseNotFound(id))
    }

    pub fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.repo.list_courses()?)
    }

    pub fn rename_course(&self, id: CourseId, name: &str) -> Result<Course, CourseServiceError> {
        Ok(self.repo.rename_course(id, name)?)
    }

    /// Deletes a course and unlinks it from every person.
    pub fn delete_course(&mut self, id: CourseId) -> Result<usize, CourseServiceError> {
        Ok(self.repo.delete_course(id)?)
    }
}
