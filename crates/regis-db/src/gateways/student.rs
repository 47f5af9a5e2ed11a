//! Student gateway.

use libsql::Connection;
use regis_core::entities::Student;
use regis_core::enums::EntityType;
use regis_core::errors::CoreError;

use super::{count_rows, delete_by_id, upsert_returning_id};
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_bool, get_opt_i32, get_opt_string, opt_bool, opt_date, opt_id, opt_int, opt_real,
    opt_text, parse_optional_date, text,
};

const SELECT_COLS: &str = "id, first_name, last_name, user_name, email, entry_year, graduate_year, \
     major, tuition_fee, paid_tuition_fee, birth_date, home_student, sex";

fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: Some(row.get::<i64>(0)?),
        first_name: row.get::<String>(1)?,
        last_name: row.get::<String>(2)?,
        user_name: row.get::<String>(3)?,
        email: row.get::<String>(4)?,
        entry_year: get_opt_i32(row, 5)?,
        graduate_year: get_opt_i32(row, 6)?,
        major: get_opt_string(row, 7)?,
        tuition_fee: row.get::<Option<f64>>(8)?,
        paid_tuition_fee: row.get::<Option<f64>>(9)?,
        birth_date: parse_optional_date(get_opt_string(row, 10)?.as_deref())?,
        home_student: get_opt_bool(row, 11)?,
        sex: get_opt_string(row, 12)?,
    })
}

async fn query_students(
    conn: &Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<Vec<Student>, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let mut students = Vec::new();
    while let Some(row) = rows.next().await? {
        students.push(row_to_student(&row)?);
    }
    Ok(students)
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Student>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM students WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    rows.next()
        .await?
        .map(|row| row_to_student(&row))
        .transpose()
}

/// Like [`find_by_id`], but a missing student is `NotFound`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if no student has this id.
pub async fn require(conn: &Connection, id: i64) -> Result<Student, DatabaseError> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| CoreError::entity_not_found(EntityType::Student, id).into())
}

/// Insert, or upsert by id when `student.id` is set.
///
/// # Errors
///
/// Returns `CoreError::Conflict` on a duplicate username or email.
pub async fn save(conn: &Connection, student: &Student) -> Result<Student, DatabaseError> {
    let sql = format!(
        "INSERT INTO students ({SELECT_COLS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            user_name = excluded.user_name,
            email = excluded.email,
            entry_year = excluded.entry_year,
            graduate_year = excluded.graduate_year,
            major = excluded.major,
            tuition_fee = excluded.tuition_fee,
            paid_tuition_fee = excluded.paid_tuition_fee,
            birth_date = excluded.birth_date,
            home_student = excluded.home_student,
            sex = excluded.sex
         RETURNING id"
    );
    let params = vec![
        opt_id(student.id),
        text(&student.first_name),
        text(&student.last_name),
        text(&student.user_name),
        text(&student.email),
        opt_int(student.entry_year),
        opt_int(student.graduate_year),
        opt_text(student.major.as_deref()),
        opt_real(student.tuition_fee),
        opt_real(student.paid_tuition_fee),
        opt_date(student.birth_date),
        opt_bool(student.home_student),
        opt_text(student.sex.as_deref()),
    ];
    let id = upsert_returning_id(conn, EntityType::Student, &sql, params).await?;
    Ok(Student {
        id: Some(id),
        ..student.clone()
    })
}

/// Delete by id. Registrations and grades of the student cascade.
///
/// # Errors
///
/// Returns `DatabaseError` if the statement fails.
pub async fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    delete_by_id(conn, EntityType::Student, "students", id).await
}

/// Whether another student (not `excluding`) already uses `user_name`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn exists_by_user_name(
    conn: &Connection,
    user_name: &str,
    excluding: Option<i64>,
) -> Result<bool, DatabaseError> {
    exists_by_column(conn, "user_name", user_name, excluding).await
}

/// Whether another student (not `excluding`) already uses `email`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn exists_by_email(
    conn: &Connection,
    email: &str,
    excluding: Option<i64>,
) -> Result<bool, DatabaseError> {
    exists_by_column(conn, "email", email, excluding).await
}

async fn exists_by_column(
    conn: &Connection,
    column: &str,
    value: &str,
    excluding: Option<i64>,
) -> Result<bool, DatabaseError> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM students WHERE {column} = ?1 AND (?2 IS NULL OR id <> ?2))"
    );
    let mut rows = conn.query(&sql, vec![text(value), opt_id(excluding)]).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)? != 0)
}

/// All students ordered by id.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn list(conn: &Connection) -> Result<Vec<Student>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM students ORDER BY id");
    query_students(conn, &sql, Vec::new()).await
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn count(conn: &Connection) -> Result<u64, DatabaseError> {
    count_rows(conn, "students").await
}
