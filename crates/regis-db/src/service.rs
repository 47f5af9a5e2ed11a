//! Service layer pairing record mutations with operation log entries.
//!
//! `RegisService` wraps `RegisDb` (raw database access) and the monotonic
//! clock that stamps log entries. Business actions, statistics, and the
//! operation log entry points are implemented as `impl RegisService` blocks
//! in their own modules.

use libsql::Connection;

use crate::RegisDb;
use crate::clock::{Clock, MonotonicClock};
use crate::error::DatabaseError;
use crate::oplog::OperationLogService;

/// Orchestrates record mutations with the operation log.
///
/// Every mutating action follows this protocol:
/// 1. Begin transaction
/// 2. Validate and mutate through the entity gateway
/// 3. Append the operation log entry (inside the transaction)
/// 4. Commit, or roll back both on any error
pub struct RegisService {
    db: RegisDb,
    clock: MonotonicClock,
}

impl RegisService {
    /// Open a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RegisDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `RegisDb` using the system clock.
    #[must_use]
    pub fn from_db(db: RegisDb) -> Self {
        Self::with_clock(db, MonotonicClock::system())
    }

    /// Create from an existing `RegisDb` with a custom clock (for testing).
    #[must_use]
    pub fn with_clock(db: RegisDb, clock: MonotonicClock) -> Self {
        Self { db, clock }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RegisDb {
        &self.db
    }

    /// Access the clock that stamps log entries.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    /// The operation log service bound to `conn`.
    ///
    /// Pass a transaction to record inside it, or `self.db().conn()` to
    /// record in autocommit mode.
    #[must_use]
    pub fn oplog<'a>(&'a self, conn: &'a Connection) -> OperationLogService<'a> {
        OperationLogService::new(conn, &self.clock)
    }
}
