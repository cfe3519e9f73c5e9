//! Command dispatch from parsed arguments to core services.
//!
//! # Responsibility
//! - Run one command against an open connection and render JSON output.
//! - Classify failures into exit codes.

use crate::config::{Command, CourseCommand, PersonCommand, PersonFields};
use roster_core::{
    CourseService, CourseServiceError, PersonDraft, PersonRole, PersonService,
    PersonServiceError, PersonValidationError, SqliteCourseRepository, SqlitePersonRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

/// Failure classes mapped to process exit codes.
#[derive(Debug)]
pub enum CommandError {
    /// Input rejected before touching storage.
    InvalidInput(String),
    /// Addressed person or course, or an enrollment target, does not exist.
    NotFound(String),
    /// Storage or output failure.
    Internal(String),
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Internal(_) => ExitCode::from(1),
            Self::InvalidInput(_) => ExitCode::from(2),
            Self::NotFound(_) => ExitCode::from(3),
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "bad request: {message}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl From<PersonServiceError> for CommandError {
    fn from(value: PersonServiceError) -> Self {
        let message = value.to_string();
        match value {
            PersonServiceError::Invalid(_) | PersonServiceError::InvalidAgeFilter(_) => {
                Self::InvalidInput(message)
            }
            PersonServiceError::PersonNotFound(_) | PersonServiceError::CourseNotFound(_) => {
                Self::NotFound(message)
            }
            PersonServiceError::Repo(_) => Self::Internal(message),
        }
    }
}

impl From<CourseServiceError> for CommandError {
    fn from(value: CourseServiceError) -> Self {
        let message = value.to_string();
        match value {
            CourseServiceError::Invalid(_) => Self::InvalidInput(message),
            CourseServiceError::CourseNotFound(_) => Self::NotFound(message),
            CourseServiceError::Repo(_) | CourseServiceError::InconsistentState(_) => {
                Self::Internal(message)
            }
        }
    }
}

impl From<PersonValidationError> for CommandError {
    fn from(value: PersonValidationError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

/// Runs `command` and returns its JSON output.
pub fn run(conn: &mut Connection, command: Command) -> Result<Value, CommandError> {
    match command {
        Command::Ping => Ok(json!({
            "ping": roster_core::ping(),
            "version": roster_core::core_version(),
        })),
        Command::Course(command) => run_course(conn, command),
        Command::Person(command) => run_person(conn, command),
    }
}

fn run_course(conn: &mut Connection, command: CourseCommand) -> Result<Value, CommandError> {
    let mut service = CourseService::new(SqliteCourseRepository::new(conn));
    match command {
        CourseCommand::List => to_json(&service.list_courses()?),
        CourseCommand::Get { id } => to_json(&service.get_course(id)?),
        CourseCommand::Add { name } => to_json(&service.create_course(&name)?.id),
        CourseCommand::Rename { id, name } => to_json(&service.rename_course(id, &name)?),
        CourseCommand::Delete { id } => {
            service.delete_course(id)?;
            Ok(json!("course successfully deleted"))
        }
    }
}

fn run_person(conn: &mut Connection, command: PersonCommand) -> Result<Value, CommandError> {
    let mut service = PersonService::new(SqlitePersonRepository::new(conn));
    match command {
        PersonCommand::List { name, age } => to_json(&service.list_people(name.as_deref(), age)?),
        PersonCommand::Get { name } => to_json(&service.get_person(&name)?),
        PersonCommand::Add(fields) => to_json(&service.create_person(draft_from(fields)?)?),
        PersonCommand::Update { name, fields } => {
            to_json(&service.update_person(&name, draft_from(fields)?)?)
        }
        PersonCommand::Delete { name } => {
            service.delete_person(&name)?;
            Ok(json!("person successfully deleted"))
        }
    }
}

fn draft_from(fields: PersonFields) -> Result<PersonDraft, CommandError> {
    Ok(PersonDraft {
        first_name: fields.first_name,
        last_name: fields.last_name,
        role: fields.role.trim().parse::<PersonRole>()?,
        age: fields.age,
        courses: fields.courses,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(|err| CommandError::Internal(err.to_string()))
}
