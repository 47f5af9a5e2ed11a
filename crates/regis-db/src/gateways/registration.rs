//! Registration gateway.
//!
//! Rows hold only ids. Loading a registration resolves both references
//! through the student and module gateways.

use libsql::Connection;
use regis_core::entities::Registration;
use regis_core::enums::EntityType;
use regis_core::errors::CoreError;
use regis_core::snapshot::RegistrationSnapshot;

use super::{delete_by_id, module, persisted_id, student, upsert_returning_id};
use crate::error::DatabaseError;
use crate::helpers::opt_id;

const SELECT_COLS: &str = "id, student_id, module_id";

fn row_to_snapshot(row: &libsql::Row) -> Result<RegistrationSnapshot, DatabaseError> {
    Ok(RegistrationSnapshot {
        id: row.get::<i64>(0)?,
        student_id: row.get::<i64>(1)?,
        module_id: row.get::<i64>(2)?,
    })
}

/// Rebuild a full registration from its ids.
///
/// # Errors
///
/// Returns `CoreError::NotFound` naming the student or module if either
/// reference is dangling.
pub async fn resolve(
    conn: &Connection,
    snapshot: RegistrationSnapshot,
) -> Result<Registration, DatabaseError> {
    let student = student::require(conn, snapshot.student_id).await?;
    let module = module::require(conn, snapshot.module_id).await?;
    Ok(Registration {
        id: Some(snapshot.id),
        student,
        module,
    })
}

async fn query_resolved(
    conn: &Connection,
    sql: &str,
    id: i64,
) -> Result<Vec<Registration>, DatabaseError> {
    let mut rows = conn.query(sql, [id]).await?;
    let mut snapshots = Vec::new();
    while let Some(row) = rows.next().await? {
        snapshots.push(row_to_snapshot(&row)?);
    }
    let mut registrations = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        registrations.push(resolve(conn, snapshot).await?);
    }
    Ok(registrations)
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_id(
    conn: &Connection,
    id: i64,
) -> Result<Option<Registration>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM registrations WHERE id = ?1");
    Ok(query_resolved(conn, &sql, id).await?.into_iter().next())
}

/// Like [`find_by_id`], but a missing registration is `NotFound`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if no registration has this id.
pub async fn require(conn: &Connection, id: i64) -> Result<Registration, DatabaseError> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| CoreError::entity_not_found(EntityType::Registration, id).into())
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_student_and_module(
    conn: &Connection,
    student_id: i64,
    module_id: i64,
) -> Result<Option<Registration>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM registrations WHERE student_id = ?1 AND module_id = ?2"
    );
    let mut rows = conn.query(&sql, [student_id, module_id]).await?;
    let Some(row) = rows.next().await? else {
        return Ok(None);
    };
    let snapshot = row_to_snapshot(&row)?;
    resolve(conn, snapshot).await.map(Some)
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn exists_by_student_and_module(
    conn: &Connection,
    student_id: i64,
    module_id: i64,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE student_id = ?1 AND module_id = ?2)",
            [student_id, module_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)? != 0)
}

/// Insert, or upsert by id when `registration.id` is set.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the student or module has no id,
/// or `CoreError::Conflict` if the pair is already registered.
pub async fn save(
    conn: &Connection,
    registration: &Registration,
) -> Result<Registration, DatabaseError> {
    let student_id = persisted_id(registration.student.id, EntityType::Student)?;
    let module_id = persisted_id(registration.module.id, EntityType::Module)?;
    let id = upsert_returning_id(
        conn,
        EntityType::Registration,
        "INSERT INTO registrations (id, student_id, module_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            student_id = excluded.student_id,
            module_id = excluded.module_id
         RETURNING id",
        vec![
            opt_id(registration.id),
            libsql::Value::Integer(student_id),
            libsql::Value::Integer(module_id),
        ],
    )
    .await?;
    Ok(Registration {
        id: Some(id),
        ..registration.clone()
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the statement fails.
pub async fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    delete_by_id(conn, EntityType::Registration, "registrations", id).await
}

/// Registrations of one student.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<Registration>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM registrations WHERE student_id = ?1 ORDER BY id");
    query_resolved(conn, &sql, student_id).await
}

/// Registrations on one module.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn for_module(
    conn: &Connection,
    module_id: i64,
) -> Result<Vec<Registration>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM registrations WHERE module_id = ?1 ORDER BY id");
    query_resolved(conn, &sql, module_id).await
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn count_for_module(conn: &Connection, module_id: i64) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM registrations WHERE module_id = ?1",
            [module_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let n = row.get::<i64>(0)?;
    u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{sample_module, sample_student, test_db};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn save_resolves_both_sides() {
        let db = test_db().await;
        let s = student::save(db.conn(), &sample_student("alovelace")).await.unwrap();
        let m = module::save(db.conn(), &sample_module("COMP0010")).await.unwrap();

        let saved = save(db.conn(), &Registration::new(s.clone(), m.clone()))
            .await
            .unwrap();
        let loaded = require(db.conn(), saved.id.unwrap()).await.unwrap();
        assert_eq!(loaded.student, s);
        assert_eq!(loaded.module, m);
        assert!(
            exists_by_student_and_module(db.conn(), s.id.unwrap(), m.id.unwrap())
                .await
                .unwrap()
        );
        assert_eq!(count_for_module(db.conn(), m.id.unwrap()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unsaved_student_is_rejected() {
        let db = test_db().await;
        let m = module::save(db.conn(), &sample_module("COMP0010")).await.unwrap();
        let err = save(db.conn(), &Registration::new(sample_student("ghost"), m))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn resolve_names_the_dangling_reference() {
        let db = test_db().await;
        let m = module::save(db.conn(), &sample_module("COMP0010")).await.unwrap();
        let err = resolve(
            db.conn(),
            RegistrationSnapshot {
                id: 1,
                student_id: 42,
                module_id: m.id.unwrap(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Student not found with id 42");
    }

    #[tokio::test]
    async fn student_delete_cascades() {
        let db = test_db().await;
        let s = student::save(db.conn(), &sample_student("alovelace")).await.unwrap();
        let m = module::save(db.conn(), &sample_module("COMP0010")).await.unwrap();
        save(db.conn(), &Registration::new(s.clone(), m.clone()))
            .await
            .unwrap();

        student::delete(db.conn(), s.id.unwrap()).await.unwrap();
        assert!(for_module(db.conn(), m.id.unwrap()).await.unwrap().is_empty());
    }
}
