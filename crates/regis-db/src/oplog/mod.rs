//! Operation log service: record, list, export, and revert.
//!
//! [`OperationLogService`] is bound to one connection, so business actions
//! can record their entry inside the same transaction as the mutation it
//! documents. Every entry is stamped with the explicit [`Principal`] and the
//! service's monotonic clock; nothing is read from ambient state.

mod revert;
pub mod store;

pub use revert::REVERTED_PREFIX;

use std::path::Path;

use libsql::Connection;
use regis_core::entities::{NewOperationLog, OperationLog};
use regis_core::enums::{EntityType, OperationType};
use regis_core::errors::CoreError;
use regis_core::principal::Principal;
use regis_core::snapshot::{self, Snapshot};

use crate::clock::Clock;
use crate::commit_or_rollback;
use crate::error::DatabaseError;
use crate::service::RegisService;

/// Records operations and reverts them, on one connection or transaction.
pub struct OperationLogService<'a> {
    conn: &'a Connection,
    clock: &'a dyn Clock,
}

impl<'a> OperationLogService<'a> {
    pub fn new(conn: &'a Connection, clock: &'a dyn Clock) -> Self {
        Self { conn, clock }
    }

    async fn record<T: Snapshot>(
        &self,
        principal: &Principal,
        operation_type: OperationType,
        entity_id: i64,
        previous_state: Option<&T>,
        new_state: Option<&T>,
        description: String,
    ) -> Result<OperationLog, DatabaseError> {
        let entry = NewOperationLog {
            operation_type,
            entity_type: T::ENTITY,
            entity_id,
            timestamp: self.clock.now(),
            username: principal.username().to_string(),
            description,
            previous_state: snapshot::encode_opt(previous_state)?,
            new_state: snapshot::encode_opt(new_state)?,
            reverted_log_id: None,
        };
        let log = store::append(self.conn, &entry).await?;
        tracing::info!(
            log_id = log.id,
            operation = %log.operation_type,
            entity = %log.entity_type,
            entity_id = log.entity_id,
            username = %log.username,
            "recorded operation"
        );
        Ok(log)
    }

    /// Record the creation of `new_state`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Encode` if the snapshot cannot be serialized, or
    /// `DatabaseError` if the insert fails.
    pub async fn log_creation<T: Snapshot>(
        &self,
        principal: &Principal,
        entity_id: i64,
        new_state: &T,
        description: impl Into<String>,
    ) -> Result<OperationLog, DatabaseError> {
        self.record(
            principal,
            OperationType::Create,
            entity_id,
            None,
            Some(new_state),
            description.into(),
        )
        .await
    }

    /// Record a change from `previous_state` to `new_state`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Encode` if either snapshot cannot be serialized, or
    /// `DatabaseError` if the insert fails.
    pub async fn log_update<T: Snapshot>(
        &self,
        principal: &Principal,
        entity_id: i64,
        previous_state: &T,
        new_state: &T,
        description: impl Into<String>,
    ) -> Result<OperationLog, DatabaseError> {
        self.record(
            principal,
            OperationType::Update,
            entity_id,
            Some(previous_state),
            Some(new_state),
            description.into(),
        )
        .await
    }

    /// Record the deletion of an entity whose last state was `previous_state`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Encode` if the snapshot cannot be serialized, or
    /// `DatabaseError` if the insert fails.
    pub async fn log_deletion<T: Snapshot>(
        &self,
        principal: &Principal,
        entity_id: i64,
        previous_state: &T,
        description: impl Into<String>,
    ) -> Result<OperationLog, DatabaseError> {
        self.record(
            principal,
            OperationType::Delete,
            entity_id,
            Some(previous_state),
            None,
            description.into(),
        )
        .await
    }

    /// The newest `limit` entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn recent_operations(&self, limit: u32) -> Result<Vec<OperationLog>, DatabaseError> {
        store::recent(self.conn, limit).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no entry has this id.
    pub async fn operation(&self, log_id: i64) -> Result<OperationLog, DatabaseError> {
        store::find_by_id(self.conn, log_id)
            .await?
            .ok_or_else(|| CoreError::operation_not_found(log_id).into())
    }

    /// Deep copy through the snapshot codec.
    ///
    /// Use this to capture a "before" snapshot prior to editing a value in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the value does not survive the roundtrip.
    pub fn copy_of<T: Snapshot>(value: &T) -> Result<T, DatabaseError> {
        Ok(snapshot::copy_of(value)?)
    }

    /// Write the whole log, oldest first, as JSON Lines. Returns the number
    /// of entries written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or the file write fails.
    pub async fn export_operations(&self, path: &Path) -> Result<usize, DatabaseError> {
        let logs = store::all_oldest_first(self.conn).await?;
        serde_jsonlines::write_json_lines(path, &logs)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        tracing::info!(entries = logs.len(), path = %path.display(), "exported operation log");
        Ok(logs.len())
    }
}

impl RegisService {
    /// Newest `limit` entries of the operation log.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn recent_operations(&self, limit: u32) -> Result<Vec<OperationLog>, DatabaseError> {
        self.oplog(self.db().conn()).recent_operations(limit).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no entry has this id.
    pub async fn operation(&self, log_id: i64) -> Result<OperationLog, DatabaseError> {
        self.oplog(self.db().conn()).operation(log_id).await
    }

    /// Every entry touching one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn operations_for(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Vec<OperationLog>, DatabaseError> {
        store::for_entity(self.db().conn(), entity_type, entity_id).await
    }

    /// Undo the operation recorded as `log_id` and record the undo, atomically.
    ///
    /// # Errors
    ///
    /// See [`OperationLogService::revert_operation`]. Nothing is committed on error.
    pub async fn revert_operation(
        &self,
        principal: &Principal,
        log_id: i64,
    ) -> Result<OperationLog, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.oplog(&tx).revert_operation(principal, log_id).await;
        commit_or_rollback(tx, result).await
    }

    /// Write the whole log, oldest first, as JSON Lines.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or the file write fails.
    pub async fn export_operations(&self, path: &Path) -> Result<usize, DatabaseError> {
        self.oplog(self.db().conn()).export_operations(path).await
    }
}
