//! Module gateway.

use libsql::Connection;
use regis_core::entities::Module;
use regis_core::enums::EntityType;
use regis_core::errors::CoreError;

use super::{delete_by_id, upsert_returning_id};
use crate::error::DatabaseError;
use crate::helpers::{bool_int, get_opt_i32, opt_id, opt_int, text};

const SELECT_COLS: &str = "id, code, name, mnc, department, required_year, prerequisite_id";

fn row_to_module(row: &libsql::Row) -> Result<Module, DatabaseError> {
    Ok(Module {
        id: Some(row.get::<i64>(0)?),
        code: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        mnc: row.get::<i64>(3)? != 0,
        department: row.get::<String>(4)?,
        required_year: get_opt_i32(row, 5)?,
        prerequisite_id: row.get::<Option<i64>>(6)?,
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Module>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM modules WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    rows.next().await?.map(|row| row_to_module(&row)).transpose()
}

/// Like [`find_by_id`], but a missing module is `NotFound`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if no module has this id.
pub async fn require(conn: &Connection, id: i64) -> Result<Module, DatabaseError> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| CoreError::entity_not_found(EntityType::Module, id).into())
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_by_code(conn: &Connection, code: &str) -> Result<Option<Module>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM modules WHERE code = ?1");
    let mut rows = conn.query(&sql, [code]).await?;
    rows.next().await?.map(|row| row_to_module(&row)).transpose()
}

/// Insert, or upsert by id when `module.id` is set.
///
/// # Errors
///
/// Returns `CoreError::Conflict` on a duplicate code.
pub async fn save(conn: &Connection, module: &Module) -> Result<Module, DatabaseError> {
    let sql = format!(
        "INSERT INTO modules ({SELECT_COLS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            code = excluded.code,
            name = excluded.name,
            mnc = excluded.mnc,
            department = excluded.department,
            required_year = excluded.required_year,
            prerequisite_id = excluded.prerequisite_id
         RETURNING id"
    );
    let params = vec![
        opt_id(module.id),
        text(&module.code),
        text(&module.name),
        bool_int(module.mnc),
        text(&module.department),
        opt_int(module.required_year),
        opt_id(module.prerequisite_id),
    ];
    let id = upsert_returning_id(conn, EntityType::Module, &sql, params).await?;
    Ok(Module {
        id: Some(id),
        ..module.clone()
    })
}

/// Delete by id. Registrations and grades cascade; modules naming this one as
/// prerequisite lose the reference.
///
/// # Errors
///
/// Returns `DatabaseError` if the statement fails.
pub async fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    delete_by_id(conn, EntityType::Module, "modules", id).await
}

/// Whether another module (not `excluding`) already uses `code`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn exists_by_code(
    conn: &Connection,
    code: &str,
    excluding: Option<i64>,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM modules WHERE code = ?1 AND (?2 IS NULL OR id <> ?2))",
            vec![text(code), opt_id(excluding)],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)? != 0)
}

/// All modules ordered by code.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn list(conn: &Connection) -> Result<Vec<Module>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM modules ORDER BY code");
    let mut rows = conn.query(&sql, ()).await?;
    let mut modules = Vec::new();
    while let Some(row) = rows.next().await? {
        modules.push(row_to_module(&row)?);
    }
    Ok(modules)
}
