//! Grade gateway.

use libsql::Connection;
use regis_core::entities::Grade;
use regis_core::enums::EntityType;
use regis_core::errors::CoreError;
use regis_core::snapshot::GradeSnapshot;

use super::{delete_by_id, module, persisted_id, student, upsert_returning_id};
use crate::error::DatabaseError;
use crate::helpers::{get_i32, opt_id};

const SELECT_COLS: &str = "id, student_id, module_id, score";

fn row_to_snapshot(row: &libsql::Row) -> Result<GradeSnapshot, DatabaseError> {
    Ok(GradeSnapshot {
        id: row.get::<i64>(0)?,
        student_id: row.get::<i64>(1)?,
        module_id: row.get::<i64>(2)?,
        score: get_i32(row, 3)?,
    })
}

async fn query_snapshots(
    conn: &Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<Vec<GradeSnapshot>, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let mut snapshots = Vec::new();
    while let Some(row) = rows.next().await? {
        snapshots.push(row_to_snapshot(&row)?);
    }
    Ok(snapshots)
}

/// Rebuild a full grade from its ids and score.
///
/// # Errors
///
/// Returns `CoreError::NotFound` naming the student or module if either
/// reference is dangling.
pub async fn resolve(conn: &Connection, snapshot: GradeSnapshot) -> Result<Grade, DatabaseError> {
    let student = student::require(conn, snapshot.student_id).await?;
    let module = module::require(conn, snapshot.module_id).await?;
    Ok(Grade {
        id: Some(snapshot.id),
        student,
        module,
        score: snapshot.score,
    })
}

async fn resolve_all(
    conn: &Connection,
    snapshots: Vec<GradeSnapshot>,
) -> Result<Vec<Grade>, DatabaseError> {
    let mut grades = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        grades.push(resolve(conn, snapshot).await?);
    }
    Ok(grades)
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Grade>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE id = ?1");
    match query_snapshots(conn, &sql, vec![libsql::Value::Integer(id)])
        .await?
        .into_iter()
        .next()
    {
        Some(snapshot) => resolve(conn, snapshot).await.map(Some),
        None => Ok(None),
    }
}

/// Like [`find_by_id`], but a missing grade is `NotFound`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if no grade has this id.
pub async fn require(conn: &Connection, id: i64) -> Result<Grade, DatabaseError> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| CoreError::entity_not_found(EntityType::Grade, id).into())
}

/// The stored score of a student on a module, without resolving either side.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn score_for(
    conn: &Connection,
    student_id: i64,
    module_id: i64,
) -> Result<Option<i32>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT score FROM grades WHERE student_id = ?1 AND module_id = ?2",
            [student_id, module_id],
        )
        .await?;
    rows.next().await?.map(|row| get_i32(&row, 0)).transpose()
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_student_and_module(
    conn: &Connection,
    student_id: i64,
    module_id: i64,
) -> Result<Option<Grade>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE student_id = ?1 AND module_id = ?2");
    let snapshots = query_snapshots(
        conn,
        &sql,
        vec![
            libsql::Value::Integer(student_id),
            libsql::Value::Integer(module_id),
        ],
    )
    .await?;
    match snapshots.into_iter().next() {
        Some(snapshot) => resolve(conn, snapshot).await.map(Some),
        None => Ok(None),
    }
}

/// Insert, or upsert by id when `grade.id` is set.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the student or module has no id,
/// or `CoreError::Conflict` if the pair already has a different grade row.
pub async fn save(conn: &Connection, grade: &Grade) -> Result<Grade, DatabaseError> {
    let student_id = persisted_id(grade.student.id, EntityType::Student)?;
    let module_id = persisted_id(grade.module.id, EntityType::Module)?;
    let id = upsert_returning_id(
        conn,
        EntityType::Grade,
        "INSERT INTO grades (id, student_id, module_id, score) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            student_id = excluded.student_id,
            module_id = excluded.module_id,
            score = excluded.score
         RETURNING id",
        vec![
            opt_id(grade.id),
            libsql::Value::Integer(student_id),
            libsql::Value::Integer(module_id),
            libsql::Value::Integer(i64::from(grade.score)),
        ],
    )
    .await?;
    Ok(Grade {
        id: Some(id),
        ..grade.clone()
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the statement fails.
pub async fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    delete_by_id(conn, EntityType::Grade, "grades", id).await
}

/// Grades of one student.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn for_student(conn: &Connection, student_id: i64) -> Result<Vec<Grade>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE student_id = ?1 ORDER BY id");
    let snapshots = query_snapshots(conn, &sql, vec![libsql::Value::Integer(student_id)]).await?;
    resolve_all(conn, snapshots).await
}

/// Grades on one module.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn for_module(conn: &Connection, module_id: i64) -> Result<Vec<Grade>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE module_id = ?1 ORDER BY id");
    let snapshots = query_snapshots(conn, &sql, vec![libsql::Value::Integer(module_id)]).await?;
    resolve_all(conn, snapshots).await
}

/// Raw scores of one student, in id order.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn scores_for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<i32>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE student_id = ?1 ORDER BY id");
    let snapshots = query_snapshots(conn, &sql, vec![libsql::Value::Integer(student_id)]).await?;
    Ok(snapshots.into_iter().map(|g| g.score).collect())
}

/// Raw scores on one module, in id order.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn scores_for_module(
    conn: &Connection,
    module_id: i64,
) -> Result<Vec<i32>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM grades WHERE module_id = ?1 ORDER BY id");
    let snapshots = query_snapshots(conn, &sql, vec![libsql::Value::Integer(module_id)]).await?;
    Ok(snapshots.into_iter().map(|g| g.score).collect())
}
