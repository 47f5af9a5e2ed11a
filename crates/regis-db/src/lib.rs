//! # regis-db
//!
//! libSQL storage for regis records and the operation log.
//!
//! Holds the entity gateways (students, modules, registrations, grades), the
//! append-only operation log store, the operation log service with its revert
//! engine, and the business actions that pair every mutation with its log
//! entry inside one transaction.

pub mod actions;
pub mod clock;
pub mod error;
pub mod gateways;
pub mod helpers;
mod migrations;
pub mod oplog;
pub mod service;
pub mod stats;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, Transaction};

/// Central database handle for all regis state.
///
/// Wraps a libSQL database and its single connection.
pub struct RegisDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RegisDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let regis_db = Self { db, conn };
        regis_db.run_migrations().await?;
        tracing::debug!(path, "opened database");
        Ok(regis_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Begin a transaction on the shared connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `BEGIN` fails (e.g. a transaction is already open).
    pub async fn begin(&self) -> Result<Transaction, DatabaseError> {
        Ok(self.conn.transaction().await?)
    }
}

/// Commit `tx` if `result` is `Ok`, roll it back otherwise.
///
/// The original error wins over a rollback failure, which is only logged.
///
/// # Errors
///
/// Returns the error in `result`, or `DatabaseError` if the commit fails.
pub async fn commit_or_rollback<T>(
    tx: Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(%rollback, "rollback failed after {error}");
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regis_core::entities::Student;

    async fn test_db() -> RegisDb {
        RegisDb::open_local(":memory:").await.unwrap()
    }

    async fn count(db: &RegisDb, table: &str) -> i64 {
        let mut rows = db
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let tables = ["students", "modules", "registrations", "grades", "operation_logs"];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regis.db");
        let path = path.to_str().unwrap();

        {
            let db = RegisDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO modules (code, name, department) VALUES ('COMP0010', 'SE', 'CS')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = RegisDb::open_local(path).await.unwrap();
        assert_eq!(count(&db, "modules").await, 1);
    }

    #[tokio::test]
    async fn operation_logs_reject_update_and_delete() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO operation_logs (operation_type, entity_type, entity_id, timestamp,
                     username, description, new_state)
                 VALUES ('CREATE', 'STUDENT', 1, '2026-01-01T00:00:00.000Z', 'anonymous',
                     'Created student', '{}')",
                (),
            )
            .await
            .unwrap();

        let update = db
            .conn()
            .execute("UPDATE operation_logs SET description = 'edited'", ())
            .await;
        assert!(update.is_err(), "log rows must not be editable");

        let delete = db.conn().execute("DELETE FROM operation_logs", ()).await;
        assert!(delete.is_err(), "log rows must not be deletable");
        assert_eq!(count(&db, "operation_logs").await, 1);
    }

    #[tokio::test]
    async fn operation_logs_require_one_side() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO operation_logs (operation_type, entity_type, entity_id, timestamp,
                     username, description)
                 VALUES ('UPDATE', 'GRADE', 1, '2026-01-01T00:00:00.000Z', 'anonymous', 'nothing')",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn operation_logs_reject_unknown_kinds() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO operation_logs (operation_type, entity_type, entity_id, timestamp,
                     username, description, new_state)
                 VALUES ('CREATE', 'COURSE', 1, '2026-01-01T00:00:00.000Z', 'anonymous',
                     'x', '{}')",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rollback_discards_work() {
        let db = test_db().await;
        let tx = db.begin().await.unwrap();
        let student = Student {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            user_name: "alovelace".into(),
            email: "ada@example.ac.uk".into(),
            ..Student::default()
        };
        crate::gateways::student::save(&tx, &student).await.unwrap();

        let result: Result<(), DatabaseError> = Err(DatabaseError::NoResult);
        assert!(commit_or_rollback(tx, result).await.is_err());
        assert_eq!(count(&db, "students").await, 0);
    }

    #[tokio::test]
    async fn commit_keeps_work() {
        let db = test_db().await;
        let tx = db.begin().await.unwrap();
        tx.execute(
            "INSERT INTO modules (code, name, department) VALUES ('COMP0010', 'SE', 'CS')",
            (),
        )
        .await
        .unwrap();
        commit_or_rollback(tx, Ok(())).await.unwrap();
        assert_eq!(count(&db, "modules").await, 1);
    }
}
