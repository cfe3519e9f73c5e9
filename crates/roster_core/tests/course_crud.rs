use roster_core::db::open_db_in_memory;
use roster_core::{
    CourseService, CourseServiceError, CourseValidationError, PersonDraft, PersonRepository,
    PersonRole, SqliteCourseRepository, SqlitePersonRepository,
};
use rusqlite::Connection;

#[test]
fn create_get_and_list_courses() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::new(&mut conn));

    let algebra = service.create_course("  Algebra ").unwrap();
    let biology = service.create_course("Biology").unwrap();
    assert_eq!(algebra.name, "Algebra");

    assert_eq!(service.get_course(biology.id).unwrap(), biology);
    assert_eq!(service.list_courses().unwrap(), vec![algebra, biology]);
}

#[test]
fn blank_course_name_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::new(&mut conn));
    let err = service.create_course("   ").unwrap_err();
    assert!(matches!(
        err,
        CourseServiceError::Invalid(CourseValidationError::EmptyName)
    ));
}

#[test]
fn unknown_course_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CourseService::new(SqliteCourseRepository::new(&mut conn));
    assert!(matches!(
        service.get_course(42),
        Err(CourseServiceError::CourseNotFound(42))
    ));
    assert!(matches!(
        service.rename_course(42, "Anything"),
        Err(CourseServiceError::CourseNotFound(42))
    ));
    assert!(matches!(
        service.delete_course(42),
        Err(CourseServiceError::CourseNotFound(42))
    ));
}

#[test]
fn rename_course_replaces_name() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::new(&mut conn));
    let course = service.create_course("Algebra").unwrap();

    let renamed = service.rename_course(course.id, "Linear Algebra").unwrap();
    assert_eq!(renamed.name, "Linear Algebra");
    assert_eq!(service.get_course(course.id).unwrap().name, "Linear Algebra");
}

#[test]
fn delete_course_unlinks_enrolled_people() {
    let mut conn = open_db_in_memory().unwrap();
    let (kept, dropped) = {
        let service = CourseService::new(SqliteCourseRepository::new(&mut conn));
        (
            service.create_course("Kept").unwrap().id,
            service.create_course("Dropped").unwrap().id,
        )
    };
    {
        let mut people = SqlitePersonRepository::new(&mut conn);
        people
            .create_person(&PersonDraft {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                role: PersonRole::Student,
                age: 20,
                courses: vec![kept, dropped],
            })
            .unwrap();
    }

    {
        let mut service = CourseService::new(SqliteCourseRepository::new(&mut conn));
        assert_eq!(service.delete_course(dropped).unwrap(), 1);
    }

    let people = SqlitePersonRepository::new(&mut conn);
    let ada = people.get_person_by_name("Ada", "Lovelace").unwrap().unwrap();
    assert_eq!(ada.courses, vec![kept]);
    assert_eq!(join_rows_for_course(&conn, dropped), 0);
}

fn join_rows_for_course(conn: &Connection, course_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM person_course WHERE course_id = ?1;",
        [course_id],
        |row| row.get(0),
    )
    .unwrap()
}
