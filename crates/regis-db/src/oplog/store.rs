//! Operation log store.
//!
//! Append-only: rows are inserted and read, never updated or deleted (the
//! schema's triggers enforce this). Listings are newest first by timestamp,
//! with the id breaking ties inside one millisecond.

use libsql::Connection;
use regis_core::entities::{NewOperationLog, OperationLog};
use regis_core::enums::EntityType;

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_opt_string, opt_id, opt_text, parse_datetime, parse_enum, text,
};

const SELECT_COLS: &str = "id, operation_type, entity_type, entity_id, timestamp, username, \
     description, previous_state, new_state, reverted_log_id";

fn row_to_log(row: &libsql::Row) -> Result<OperationLog, DatabaseError> {
    Ok(OperationLog {
        id: row.get::<i64>(0)?,
        operation_type: parse_enum(&row.get::<String>(1)?)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<i64>(3)?,
        timestamp: parse_datetime(&row.get::<String>(4)?)?,
        username: row.get::<String>(5)?,
        description: row.get::<String>(6)?,
        previous_state: get_opt_string(row, 7)?,
        new_state: get_opt_string(row, 8)?,
        reverted_log_id: row.get::<Option<i64>>(9)?,
    })
}

async fn query_logs(
    conn: &Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<Vec<OperationLog>, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let mut logs = Vec::new();
    while let Some(row) = rows.next().await? {
        logs.push(row_to_log(&row)?);
    }
    Ok(logs)
}

/// Persist a new entry and return it with its assigned id.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the before/after sides do not fit
/// the operation kind, or `DatabaseError` if the INSERT fails.
pub async fn append(
    conn: &Connection,
    entry: &NewOperationLog,
) -> Result<OperationLog, DatabaseError> {
    if !entry.has_valid_states() {
        return Err(DatabaseError::InvalidState(format!(
            "{} entry for {} {} has inconsistent states",
            entry.operation_type, entry.entity_type, entry.entity_id
        )));
    }

    let mut rows = conn
        .query(
            "INSERT INTO operation_logs (operation_type, entity_type, entity_id, timestamp,
                 username, description, previous_state, new_state, reverted_log_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id",
            vec![
                text(entry.operation_type.as_str()),
                text(entry.entity_type.as_str()),
                libsql::Value::Integer(entry.entity_id),
                text(&format_timestamp(&entry.timestamp)),
                text(&entry.username),
                text(&entry.description),
                opt_text(entry.previous_state.as_deref()),
                opt_text(entry.new_state.as_deref()),
                opt_id(entry.reverted_log_id),
            ],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let id = row.get::<i64>(0)?;

    // Stored timestamps carry millisecond precision; return what was stored.
    let mut log = entry.clone().persisted(id);
    log.timestamp = parse_datetime(&format_timestamp(&entry.timestamp))?;
    Ok(log)
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_id(conn: &Connection, id: i64) -> Result<Option<OperationLog>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM operation_logs WHERE id = ?1");
    Ok(query_logs(conn, &sql, vec![libsql::Value::Integer(id)])
        .await?
        .into_iter()
        .next())
}

/// The newest `limit` entries, newest first.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn recent(conn: &Connection, limit: u32) -> Result<Vec<OperationLog>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM operation_logs ORDER BY timestamp DESC, id DESC LIMIT ?1"
    );
    query_logs(conn, &sql, vec![libsql::Value::Integer(i64::from(limit))]).await
}

/// Every entry touching one entity, newest first.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn for_entity(
    conn: &Connection,
    entity_type: EntityType,
    entity_id: i64,
) -> Result<Vec<OperationLog>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM operation_logs
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC"
    );
    query_logs(
        conn,
        &sql,
        vec![text(entity_type.as_str()), libsql::Value::Integer(entity_id)],
    )
    .await
}

/// Every entry, oldest first.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn all_oldest_first(conn: &Connection) -> Result<Vec<OperationLog>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM operation_logs ORDER BY timestamp ASC, id ASC");
    query_logs(conn, &sql, Vec::new()).await
}

/// The REVERT entry that undid `log_id`, if any.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn revert_of(
    conn: &Connection,
    log_id: i64,
) -> Result<Option<OperationLog>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM operation_logs WHERE reverted_log_id = ?1");
    Ok(query_logs(conn, &sql, vec![libsql::Value::Integer(log_id)])
        .await?
        .into_iter()
        .next())
}
