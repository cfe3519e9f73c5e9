//! Storage seam for enrollment synchronization and its SQLite implementation.

use crate::db::DbResult;
use crate::model::course::CourseId;
use crate::model::person::PersonId;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeSet;

/// Read access to the full set of stored course ids.
pub trait CourseIdSource {
    fn all_course_ids(&self) -> DbResult<BTreeSet<CourseId>>;
}

/// Join-table operations required by `sync_enrollment`.
///
/// Implementations must run every call inside the caller's unit of work so
/// nothing becomes visible before the caller commits.
pub trait EnrollmentStore: CourseIdSource {
    /// Course ids currently linked to `person_id`.
    fn enrolled_course_ids(&self, person_id: PersonId) -> DbResult<BTreeSet<CourseId>>;
    /// Deletes `(person_id, course_id)` rows for every id in one statement.
    fn delete_enrollments(
        &self,
        person_id: PersonId,
        course_ids: &BTreeSet<CourseId>,
    ) -> DbResult<usize>;
    /// Inserts one `(person_id, course_id)` row per id in one statement.
    fn insert_enrollments(
        &self,
        person_id: PersonId,
        course_ids: &BTreeSet<CourseId>,
    ) -> DbResult<usize>;
}

/// SQLite-backed enrollment store.
///
/// Built from a `&Transaction` (through deref to `Connection`) on write
/// paths so every statement joins the open unit of work.
pub struct SqliteEnrollmentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CourseIdSource for SqliteEnrollmentStore<'_> {
    fn all_course_ids(&self) -> DbResult<BTreeSet<CourseId>> {
        let mut stmt = self.conn.prepare("SELECT id FROM course;")?;
        let mut rows = stmt.query([])?;
        let mut ids = BTreeSet::new();
        while let Some(row) = rows.next()? {
            ids.insert(row.get(0)?);
        }
        Ok(ids)
    }
}

impl EnrollmentStore for SqliteEnrollmentStore<'_> {
    fn enrolled_course_ids(&self, person_id: PersonId) -> DbResult<BTreeSet<CourseId>> {
        load_enrolled_course_ids(self.conn, person_id)
    }

    fn delete_enrollments(
        &self,
        person_id: PersonId,
        course_ids: &BTreeSet<CourseId>,
    ) -> DbResult<usize> {
        if course_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = (0..course_ids.len())
            .map(|idx| format!("?{}", idx + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "DELETE FROM person_course
             WHERE person_id = ?1
               AND course_id IN ({placeholders});"
        );

        let changed = self
            .conn
            .execute(&sql, params_from_iter(bind_values(person_id, course_ids)))?;
        Ok(changed)
    }

    fn insert_enrollments(
        &self,
        person_id: PersonId,
        course_ids: &BTreeSet<CourseId>,
    ) -> DbResult<usize> {
        if course_ids.is_empty() {
            return Ok(0);
        }

        let rows = (0..course_ids.len())
            .map(|idx| format!("(?1, ?{})", idx + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO person_course (person_id, course_id) VALUES {rows};");

        let changed = self
            .conn
            .execute(&sql, params_from_iter(bind_values(person_id, course_ids)))?;
        Ok(changed)
    }
}

/// Loads enrolled course ids for one person, ascending.
pub(crate) fn load_enrolled_course_ids(
    conn: &Connection,
    person_id: PersonId,
) -> DbResult<BTreeSet<CourseId>> {
    let mut stmt = conn.prepare(
        "SELECT course_id
         FROM person_course
         WHERE person_id = ?1;",
    )?;
    let mut rows = stmt.query([person_id])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get(0)?);
    }
    Ok(ids)
}

fn bind_values(person_id: PersonId, course_ids: &BTreeSet<CourseId>) -> Vec<Value> {
    let mut values = Vec::with_capacity(course_ids.len() + 1);
    values.push(Value::Integer(person_id));
    values.extend(course_ids.iter().map(|id| Value::Integer(*id)));
    values
}
