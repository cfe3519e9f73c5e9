//! Person use-case service.
//!
//! # Responsibility
//! - Parse `"First Last"` lookup names and validate write drafts.
//! - Map repository failures to use-case errors callers can branch on.
//!
//! # Invariants
//! - Drafts are normalized before reaching the repository.
//! - Course id lists with duplicates never reach enrollment sync.

use crate::model::course::CourseId;
use crate::model::person::{split_full_name, Person, PersonDraft, PersonId, PersonValidationError};
use crate::repo::person_repo::{PersonListQuery, PersonRepository};
use crate::repo::RepoError;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for person use-cases.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Draft or lookup name failed validation.
    Invalid(PersonValidationError),
    /// Age filter is negative.
    InvalidAgeFilter(i64),
    /// No person matches the lookup name.
    PersonNotFound(String),
    /// Enrollment targets with no stored course.
    CourseNotFound(BTreeSet<CourseId>),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::InvalidAgeFilter(age) => write!(f, "age must be greater than 0, got {age}"),
            Self::PersonNotFound(_) => write!(f, "person not found"),
            Self::CourseNotFound(_) => write!(
                f,
                "course not found, trying to join a course that doesn't exist"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for PersonServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PersonNotFound {
                first_name,
                last_name,
            } => Self::PersonNotFound(format!("{first_name} {last_name}")),
            RepoError::MissingCourses(ids) => Self::CourseNotFound(ids),
            other => Self::Repo(other),
        }
    }
}

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a person enrolled in `draft.courses`; returns the new id.
    pub fn create_person(&mut self, draft: PersonDraft) -> Result<PersonId, PersonServiceError> {
        let draft = draft.normalized()?;
        Ok(self.repo.create_person(&draft)?)
    }

    /// Gets one person by `"First Last"`.
    pub fn get_person(&self, full_name: &str) -> Result<Person, PersonServiceError> {
        let (first_name, last_name) = split_full_name(full_name)?;
        self.repo
            .get_person_by_name(&first_name, &last_name)?
            .ok_or_else(|| PersonServiceError::PersonNotFound(full_name.trim().to_string()))
    }

    /// Lists people with optional `"First Last"` and age filters.
    pub fn list_people(
        &self,
        full_name: Option<&str>,
        age: Option<i64>,
    ) -> Result<Vec<Person>, PersonServiceError> {
        if let Some(age) = age {
            if age < 0 {
                return Err(PersonServiceError::InvalidAgeFilter(age));
            }
        }

        let name = match full_name {
            Some(value) if !value.trim().is_empty() => Some(split_full_name(value)?),
            _ => None,
        };

        Ok(self.repo.list_people(&PersonListQuery { name, age })?)
    }

    /// Replaces attributes and enrollment of the person named `full_name`.
    ///
    /// Name-addressed: see `repo::person_repo` for the non-unique name caveat.
    pub fn update_person(
        &mut self,
        full_name: &str,
        draft: PersonDraft,
    ) -> Result<Person, PersonServiceError> {
        let (first_name, last_name) = split_full_name(full_name)?;
        let draft = draft.normalized()?;
        Ok(self
            .repo
            .update_person_by_name(&first_name, &last_name, &draft)?)
    }

    /// Deletes the person named `full_name`; returns deleted row count.
    pub fn delete_person(&mut self, full_name: &str) -> Result<usize, PersonServiceError> {
        let (first_name, last_name) = split_full_name(full_name)?;
        let deleted = self.repo.delete_person_by_name(&first_name, &last_name)?;
        if deleted == 0 {
            return Err(PersonServiceError::PersonNotFound(full_name.trim().to_string()));
        }
        Ok(deleted)
    }
}
