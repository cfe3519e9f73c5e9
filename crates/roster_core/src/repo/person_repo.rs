//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide person create/get/list/update/delete over the `person` table.
//! - Wrap every person write and its enrollment synchronization in one
//!   `Immediate` transaction.
//!
//! # Invariants
//! - A failed write leaves `person` and `person_course` exactly as before.
//! - Every stored enrollment targets a course that existed at commit time.
//!
//! # Identity caveat
//! Get, update and delete resolve a person by `first_name` + `last_name`.
//! The pair is not a unique key:
//! - `update_person_by_name` rewrites the attributes of *every* row with the
//!   old name, then synchronizes the enrollment of the lowest-id row carrying
//!   the new name.
//! - `delete_person_by_name` deletes only the lowest-id match.
//!
//! This mirrors the public name-addressed API and is kept as-is; switching to
//! id-keyed resolution would change observable behavior.

use crate::db::DbResult;
use crate::enrollment::{load_enrolled_course_ids, sync_enrollment, SqliteEnrollmentStore};
use crate::model::person::{Person, PersonDraft, PersonId, PersonRole};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    type,
    age
FROM person";

/// Filter options for listing people.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListQuery {
    /// Case-insensitive `(first_name, last_name)` match.
    pub name: Option<(String, String)>,
    /// Exact age match.
    pub age: Option<i64>,
}

/// Repository interface for person operations.
pub trait PersonRepository {
    /// Inserts a person and enrolls them in `draft.courses`.
    fn create_person(&mut self, draft: &PersonDraft) -> RepoResult<PersonId>;
    /// Gets the lowest-id person with an exact name match.
    fn get_person_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Option<Person>>;
    /// Lists people matching the optional filters, ordered by id.
    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>>;
    /// Replaces attributes and enrollment of the person addressed by name.
    fn update_person_by_name(
        &mut self,
        first_name: &str,
        last_name: &str,
        draft: &PersonDraft,
    ) -> RepoResult<Person>;
    /// Deletes the person addressed by name and all their enrollment rows.
    fn delete_person_by_name(&mut self, first_name: &str, last_name: &str) -> RepoResult<usize>;
}

/// Row-level operations on the `person` table.
///
/// Borrow it from a `&Transaction` so the statements join the caller's unit
/// of work.
pub struct PersonRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> PersonRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts one person row and returns its id.
    pub fn insert(&self, draft: &PersonDraft) -> DbResult<PersonId> {
        self.conn.execute(
            "INSERT INTO person (first_name, last_name, type, age)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.first_name.as_str(),
                draft.last_name.as_str(),
                draft.role.as_str(),
                draft.age,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrites attributes of every row named `first_name last_name`.
    ///
    /// Returns the number of rows changed.
    pub fn update_attributes(
        &self,
        first_name: &str,
        last_name: &str,
        draft: &PersonDraft,
    ) -> DbResult<usize> {
        let changed = self.conn.execute(
            "UPDATE person
             SET
                first_name = ?1,
                last_name = ?2,
                type = ?3,
                age = ?4
             WHERE first_name = ?5
               AND last_name = ?6;",
            params![
                draft.first_name.as_str(),
                draft.last_name.as_str(),
                draft.role.as_str(),
                draft.age,
                first_name,
                last_name,
            ],
        )?;
        Ok(changed)
    }

    /// Resolves a name to the lowest matching id.
    pub fn lookup_identity(&self, first_name: &str, last_name: &str) -> DbResult<Option<PersonId>> {
        let id = self
            .conn
            .query_row(
                "SELECT id
                 FROM person
                 WHERE first_name = ?1
                   AND last_name = ?2
                 ORDER BY id ASC
                 LIMIT 1;",
                params![first_name, last_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Deletes enrollment rows and then the person row for `person_id`.
    ///
    /// Returns the number of person rows deleted.
    pub fn delete_record(&self, person_id: PersonId) -> DbResult<usize> {
        self.conn
            .execute("DELETE FROM person_course WHERE person_id = ?1;", [person_id])?;
        let deleted = self
            .conn
            .execute("DELETE FROM person WHERE id = ?1;", [person_id])?;
        Ok(deleted)
    }

    /// Loads one person by id with enrolled courses.
    pub fn load(&self, person_id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([person_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(self.conn, row)?));
        }
        Ok(None)
    }
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&mut self, draft: &PersonDraft) -> RepoResult<PersonId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let person_id = PersonRecordStore::new(&tx).insert(draft)?;
        let change = sync_enrollment(
            &SqliteEnrollmentStore::new(&tx),
            person_id,
            &draft.course_set(),
        )?;
        tx.commit()?;

        info!(
            "event=person_create module=repo status=ok person_id={} courses={}",
            person_id,
            change.added.len()
        );
        Ok(person_id)
    }

    fn get_person_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Option<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE first_name = ?1
               AND last_name = ?2
             ORDER BY id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![first_name, last_name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>> {
        let mut sql = format!("{PERSON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some((first_name, last_name)) = query.name.as_ref() {
            sql.push_str(" AND LOWER(first_name) = LOWER(?) AND LOWER(last_name) = LOWER(?)");
            bind_values.push(Value::Text(first_name.clone()));
            bind_values.push(Value::Text(last_name.clone()));
        }

        if let Some(age) = query.age {
            sql.push_str(" AND age = ?");
            bind_values.push(Value::Integer(age));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(self.conn, row)?);
        }
        Ok(people)
    }

    fn update_person_by_name(
        &mut self,
        first_name: &str,
        last_name: &str,
        draft: &PersonDraft,
    ) -> RepoResult<Person> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let records = PersonRecordStore::new(&tx);

        let changed = records.update_attributes(first_name, last_name, draft)?;
        if changed == 0 {
            return Err(RepoError::PersonNotFound {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            });
        }

        let person_id = records
            .lookup_identity(&draft.first_name, &draft.last_name)?
            .ok_or_else(|| {
                RepoError::InvalidData("updated person not found by new name".to_string())
            })?;

        let change = sync_enrollment(
            &SqliteEnrollmentStore::new(&tx),
            person_id,
            &draft.course_set(),
        )?;

        let person = records.load(person_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("person {person_id} missing after update"))
        })?;
        tx.commit()?;

        info!(
            "event=person_update module=repo status=ok person_id={} rows={} added={} removed={}",
            person_id,
            changed,
            change.added.len(),
            change.removed.len()
        );
        Ok(person)
    }

    fn delete_person_by_name(&mut self, first_name: &str, last_name: &str) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let records = PersonRecordStore::new(&tx);

        let person_id = records
            .lookup_identity(first_name, last_name)?
            .ok_or_else(|| RepoError::PersonNotFound {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })?;
        let deleted = records.delete_record(person_id)?;
        tx.commit()?;

        info!("event=person_delete module=repo status=ok person_id={person_id}");
        Ok(deleted)
    }
}

fn parse_person_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Person> {
    let id: PersonId = row.get("id")?;
    let type_text: String = row.get("type")?;
    let role = type_text.parse::<PersonRole>().map_err(|_| {
        RepoError::InvalidData(format!("invalid person type `{type_text}` in person.type"))
    })?;

    Ok(Person {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        role,
        age: row.get("age")?,
        courses: load_enrolled_course_ids(conn, id)?.into_iter().collect(),
    })
}
