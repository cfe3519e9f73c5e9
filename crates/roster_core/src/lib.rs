//! Core domain logic for the roster: people, courses and enrollment.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod enrollment;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use enrollment::{
    diff_enrollment, find_missing_courses, sync_enrollment, CourseIdSource, EnrollmentChange,
    EnrollmentDiff, EnrollmentError, EnrollmentStore, SqliteEnrollmentStore,
};
pub use logging::{default_log_level, init_logging, init_logging_to, logging_status, LogTarget};
pub use model::course::{Course, CourseId, CourseValidationError};
pub use model::person::{
    split_full_name, Person, PersonDraft, PersonId, PersonRole, PersonValidationError,
};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::person_repo::{
    PersonListQuery, PersonRecordStore, PersonRepository, SqlitePersonRepository,
};
pub use repo::{RepoError, RepoResult};
pub use service::course_service::{CourseService, CourseServiceError};
pub use service::person_service::{PersonService, PersonServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
