//! Person domain model.
//!
//! # Responsibility
//! - Define the stored person record and the write draft used by
//!   create/update paths.
//! - Validate drafts before they reach storage.
//!
//! # Invariants
//! - `role` is either `professor` or `student`.
//! - `age` is strictly positive.
//! - `courses` holds unique course ids.
//!
//! # Identity caveat
//! Update and delete paths address a person by `first_name` + `last_name`.
//! That pair is not unique; see `repo::person_repo` for the consequences.

use crate::model::course::CourseId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Row id of the `person` table.
pub type PersonId = i64;

/// Enumerated person role, stored as lowercase text in `person.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Professor,
    Student,
}

impl PersonRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professor => "professor",
            Self::Student => "student",
        }
    }
}

impl Display for PersonRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonRole {
    type Err = PersonValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "professor" => Ok(Self::Professor),
            "student" => Ok(Self::Student),
            other => Err(PersonValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// Stored person record with its enrolled course ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub role: PersonRole,
    pub age: i64,
    /// Enrolled course ids, ascending.
    pub courses: Vec<CourseId>,
}

/// Full attribute set for create and update.
///
/// Updates replace every field; there is no partial patch form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub role: PersonRole,
    pub age: i64,
    pub courses: Vec<CourseId>,
}

impl PersonDraft {
    /// Validates the draft and normalizes the name pair.
    ///
    /// Names are re-parsed as one `"First Last"` string, so a first or last
    /// name containing whitespace is rejected just like a malformed lookup
    /// name would be.
    pub fn normalized(self) -> Result<Self, PersonValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(PersonValidationError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(PersonValidationError::MissingLastName);
        }
        if self.age <= 0 {
            return Err(PersonValidationError::NonPositiveAge(self.age));
        }
        if !are_unique(&self.courses) {
            return Err(PersonValidationError::DuplicateCourseIds);
        }

        let (first_name, last_name) =
            split_full_name(&format!("{} {}", self.first_name, self.last_name))?;
        Ok(Self {
            first_name,
            last_name,
            ..self
        })
    }

    /// Desired enrollment as a set.
    pub fn course_set(&self) -> BTreeSet<CourseId> {
        self.courses.iter().copied().collect()
    }
}

/// Validation failure for person write input or name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    MissingFirstName,
    MissingLastName,
    InvalidRole(String),
    NonPositiveAge(i64),
    DuplicateCourseIds,
    /// Lookup name is blank.
    EmptyName,
    /// Lookup name is not exactly two whitespace-separated words.
    MalformedName,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFirstName => write!(f, "first name is required"),
            Self::MissingLastName => write!(f, "last name is required"),
            Self::InvalidRole(value) => {
                write!(f, "invalid person type `{value}`; expected professor|student")
            }
            Self::NonPositiveAge(age) => write!(f, "age must be greater than 0, got {age}"),
            Self::DuplicateCourseIds => write!(f, "class IDs must be unique"),
            Self::EmptyName => write!(f, "name is empty"),
            Self::MalformedName => write!(f, "must have a first and last name"),
        }
    }
}

impl Error for PersonValidationError {}

/// Splits `"First Last"` into its two parts.
pub fn split_full_name(name: &str) -> Result<(String, String), PersonValidationError> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(PersonValidationError::EmptyName),
        [first, last] => Ok(((*first).to_string(), (*last).to_string())),
        _ => Err(PersonValidationError::MalformedName),
    }
}

fn are_unique(ids: &[CourseId]) -> bool {
    let mut seen = BTreeSet::new();
    ids.iter().all(|id| seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::{split_full_name, PersonDraft, PersonRole, PersonValidationError};

    fn draft() -> PersonDraft {
        PersonDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: PersonRole::Professor,
            age: 36,
            courses: vec![1, 2],
        }
    }

    #[test]
    fn split_full_name_requires_exactly_two_parts() {
        assert_eq!(
            split_full_name("  Ada   Lovelace ").unwrap(),
            ("Ada".to_string(), "Lovelace".to_string())
        );
        assert_eq!(
            split_full_name("Ada").unwrap_err(),
            PersonValidationError::MalformedName
        );
        assert_eq!(
            split_full_name("Ada King Lovelace").unwrap_err(),
            PersonValidationError::MalformedName
        );
        assert_eq!(
            split_full_name("   ").unwrap_err(),
            PersonValidationError::EmptyName
        );
    }

    #[test]
    fn role_parses_known_values_only() {
        assert_eq!("student".parse::<PersonRole>().unwrap(), PersonRole::Student);
        assert!(matches!(
            "janitor".parse::<PersonRole>(),
            Err(PersonValidationError::InvalidRole(value)) if value == "janitor"
        ));
    }

    #[test]
    fn normalized_rejects_duplicate_course_ids() {
        let mut input = draft();
        input.courses = vec![3, 4, 3];
        let err = input.normalized().unwrap_err();
        assert_eq!(err, PersonValidationError::DuplicateCourseIds);
        assert_eq!(err.to_string(), "class IDs must be unique");
    }

    #[test]
    fn normalized_rejects_non_positive_age_and_blank_names() {
        let mut input = draft();
        input.age = 0;
        assert_eq!(
            input.normalized().unwrap_err(),
            PersonValidationError::NonPositiveAge(0)
        );

        let mut input = draft();
        input.last_name = " ".to_string();
        assert_eq!(
            input.normalized().unwrap_err(),
            PersonValidationError::MissingLastName
        );
    }

    #[test]
    fn normalized_trims_names_and_rejects_embedded_spaces() {
        let mut input = draft();
        input.first_name = " Ada ".to_string();
        assert_eq!(input.normalized().unwrap().first_name, "Ada");

        let mut input = draft();
        input.first_name = "Ada King".to_string();
        assert_eq!(
            input.normalized().unwrap_err(),
            PersonValidationError::MalformedName
        );
    }
}
