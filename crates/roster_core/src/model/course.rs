//! Course domain model.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row id of the `course` table.
pub type CourseId = i64;

/// Stored course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

/// Validation failure for course write input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Name is empty after trim.
    EmptyName,
}

impl Display for CourseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "course name must not be empty"),
        }
    }
}

impl Error for CourseValidationError {}

/// Trims and validates a course name.
pub fn normalize_course_name(name: &str) -> Result<String, CourseValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CourseValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_course_name, CourseValidationError};

    #[test]
    fn course_name_is_trimmed() {
        assert_eq!(normalize_course_name("  Algebra ").unwrap(), "Algebra");
    }

    #[test]
    fn blank_course_name_is_rejected() {
        assert_eq!(
            normalize_course_name(" \t ").unwrap_err(),
            CourseValidationError::EmptyName
        );
    }
}
