//! Course repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide single-row CRUD over the `course` table.
//! - Remove a course's enrollment rows together with the course.
//!
//! # Invariants
//! - Course names are trimmed and non-empty before any write.
//! - `delete_course` removes `person_course` rows and the `course` row in one
//!   transaction.

use crate::model::course::{normalize_course_name, Course, CourseId};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Repository interface for course operations.
pub trait CourseRepository {
    /// Creates one course and returns its row id.
    fn create_course(&self, name: &str) -> RepoResult<CourseId>;
    /// Gets one course by id.
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Lists all courses ordered by id.
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    /// Replaces the course name.
    fn rename_course(&self, id: CourseId, name: &str) -> RepoResult<Course>;
    /// Deletes the course and its enrollment rows; returns deleted course rows.
    fn delete_course(&mut self, id: CourseId) -> RepoResult<usize>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn create_course(&self, name: &str) -> RepoResult<CourseId> {
        let name = normalize_course_name(name)?;
        self.conn
            .execute("INSERT INTO course (name) VALUES (?1);", [name.as_str()])?;
        let id = self.conn.last_insert_rowid();
        info!("event=course_create module=repo status=ok course_id={id}");
        Ok(id)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let course = self
            .conn
            .query_row(
                "SELECT id, name FROM course WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Course {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(course)
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM course ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(Course {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(courses)
    }

    fn rename_course(&self, id: CourseId, name: &str) -> RepoResult<Course> {
        let name = normalize_course_name(name)?;
        let changed = self.conn.execute(
            "UPDATE course SET name = ?1 WHERE id = ?2;",
            params![name.as_str(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::CourseNotFound(id));
        }

        Ok(Course { id, name })
    }

    fn delete_course(&mut self, id: CourseId) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let unlinked = tx.execute("DELETE FROM person_course WHERE course_id = ?1;", [id])?;
        let deleted = tx.execute("DELETE FROM course WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::CourseNotFound(id));
        }
        tx.commit()?;

        info!(
            "event=course_delete module=repo status=ok course_id={} unlinked={}",
            id, unlinked
        );
        Ok(deleted)
    }
}
