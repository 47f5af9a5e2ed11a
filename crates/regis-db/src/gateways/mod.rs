//! Entity gateways: find / save / delete for each record kind.
//!
//! Every function takes a `&libsql::Connection` so it can run on the shared
//! connection or inside a `libsql::Transaction` (which derefs to one).
//! `save` inserts when the entity has no id and upserts that exact id
//! otherwise, so restoring a deleted row brings back its original identity.

pub mod grade;
pub mod module;
pub mod registration;
pub mod student;

use libsql::Connection;
use regis_core::enums::EntityType;
use regis_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::is_unique_violation;

/// Translate a UNIQUE violation into a domain conflict.
fn constraint_error(entity: EntityType, e: libsql::Error) -> DatabaseError {
    if is_unique_violation(&e) {
        CoreError::Conflict(format!("{} conflicts with an existing record", entity.label())).into()
    } else {
        e.into()
    }
}

/// Run an `INSERT ... RETURNING id` statement and return the id.
async fn upsert_returning_id(
    conn: &Connection,
    entity: EntityType,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(sql, params)
        .await
        .map_err(|e| constraint_error(entity, e))?;
    let row = rows
        .next()
        .await
        .map_err(|e| constraint_error(entity, e))?
        .ok_or(DatabaseError::NoResult)?;
    let id = row.get::<i64>(0)?;
    tracing::debug!(entity = %entity, id, "saved");
    Ok(id)
}

/// Delete one row by id. Returns whether a row was removed.
async fn delete_by_id(
    conn: &Connection,
    entity: EntityType,
    table: &str,
    id: i64,
) -> Result<bool, DatabaseError> {
    let affected = conn
        .execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])
        .await?;
    tracing::debug!(entity = %entity, id, affected, "deleted");
    Ok(affected > 0)
}

/// Count all rows in a table.
async fn count_rows(conn: &Connection, table: &str) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let n = row.get::<i64>(0)?;
    u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
}

/// The id of an entity that must already be stored.
fn persisted_id(id: Option<i64>, entity: EntityType) -> Result<i64, DatabaseError> {
    id.ok_or_else(|| {
        DatabaseError::InvalidState(format!("{} has not been persisted", entity.label()))
    })
}
