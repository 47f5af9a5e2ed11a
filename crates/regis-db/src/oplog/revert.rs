//! Revert engine.
//!
//! Dispatch is a single table keyed by `(OperationType, EntityType)`:
//!
//! | operation | action |
//! |---|---|
//! | CREATE | delete the entity by id; missing means `NotFound` |
//! | UPDATE, DELETE | decode `previous_state`, resolve its references, save it |
//! | REVERT | rejected, terminal |
//!
//! The entity is mutated first and the REVERT entry appended second, both on
//! the caller's connection, so inside a transaction either both land or
//! neither does.

use libsql::Connection;
use regis_core::entities::{NewOperationLog, OperationLog};
use regis_core::enums::{EntityType, OperationType};
use regis_core::errors::CoreError;
use regis_core::principal::Principal;
use regis_core::snapshot::EntitySnapshot;

use super::{OperationLogService, store};
use crate::error::DatabaseError;
use crate::gateways::{grade, module, registration, student};

/// Prefix of every REVERT entry's description.
pub const REVERTED_PREFIX: &str = "Reverted: ";

impl OperationLogService<'_> {
    /// Undo the operation recorded as `log_id` and append a REVERT entry.
    ///
    /// The REVERT entry keeps the original's entity kind and id, and copies its
    /// `previous_state`/`new_state` verbatim. Each entry can be reverted once.
    ///
    /// Run this inside a transaction; [`crate::service::RegisService::revert_operation`]
    /// does.
    ///
    /// # Errors
    ///
    /// - `CoreError::NotFound` if the entry, the entity to delete, or a
    ///   referenced student/module is missing.
    /// - `CoreError::NotRevertible` if the entry is itself a REVERT.
    /// - `CoreError::Conflict` if the entry was already reverted, or restoring
    ///   collides with a unique key.
    /// - `CoreError::CorruptState` if the stored state cannot be parsed.
    pub async fn revert_operation(
        &self,
        principal: &Principal,
        log_id: i64,
    ) -> Result<OperationLog, DatabaseError> {
        let original = self.operation(log_id).await?;

        if !original.operation_type.is_revertible() {
            tracing::warn!(log_id, operation = %original.operation_type, "rejected revert");
            return Err(CoreError::NotRevertible(original.operation_type).into());
        }
        if let Some(undo) = store::revert_of(self.conn, log_id).await? {
            tracing::warn!(log_id, undo_id = undo.id, "rejected repeated revert");
            return Err(
                CoreError::Conflict(format!("Operation {log_id} has already been reverted")).into(),
            );
        }

        apply_inverse(self.conn, &original).await?;

        let entry = NewOperationLog {
            operation_type: OperationType::Revert,
            entity_type: original.entity_type,
            entity_id: original.entity_id,
            timestamp: self.clock.now(),
            username: principal.username().to_string(),
            description: format!("{REVERTED_PREFIX}{}", original.description),
            previous_state: original.previous_state.clone(),
            new_state: original.new_state.clone(),
            reverted_log_id: Some(original.id),
        };
        let log = store::append(self.conn, &entry).await?;
        tracing::info!(
            log_id = log.id,
            reverted = original.id,
            operation = %original.operation_type,
            entity = %original.entity_type,
            entity_id = original.entity_id,
            username = %log.username,
            "reverted operation"
        );
        Ok(log)
    }
}

/// Apply the inverse of `original` to the entity it documents.
async fn apply_inverse(conn: &Connection, original: &OperationLog) -> Result<(), DatabaseError> {
    let id = original.entity_id;
    match (original.operation_type, original.entity_type) {
        (OperationType::Create, EntityType::Student) => {
            removed(student::delete(conn, id).await?, EntityType::Student, id)
        }
        (OperationType::Create, EntityType::Module) => {
            removed(module::delete(conn, id).await?, EntityType::Module, id)
        }
        (OperationType::Create, EntityType::Registration) => removed(
            registration::delete(conn, id).await?,
            EntityType::Registration,
            id,
        ),
        (OperationType::Create, EntityType::Grade) => {
            removed(grade::delete(conn, id).await?, EntityType::Grade, id)
        }
        (OperationType::Update | OperationType::Delete, kind) => {
            let state = original.previous_state.as_deref().ok_or_else(|| {
                CoreError::CorruptState(format!("operation {} has no previous state", original.id))
            })?;
            restore(conn, EntitySnapshot::decode(kind, state)?).await
        }
        (OperationType::Revert, _) => {
            Err(CoreError::NotRevertible(original.operation_type).into())
        }
    }
}

fn removed(deleted: bool, kind: EntityType, id: i64) -> Result<(), DatabaseError> {
    if deleted {
        Ok(())
    } else {
        Err(CoreError::entity_not_found(kind, id).into())
    }
}

/// Persist a decoded snapshot, resolving cross-references to live rows.
async fn restore(conn: &Connection, snapshot: EntitySnapshot) -> Result<(), DatabaseError> {
    match snapshot {
        EntitySnapshot::Student(s) => {
            student::save(conn, &s).await?;
        }
        EntitySnapshot::Module(m) => {
            if let Some(prerequisite_id) = m.prerequisite_id {
                module::require(conn, prerequisite_id).await?;
            }
            module::save(conn, &m).await?;
        }
        EntitySnapshot::Registration(r) => {
            let rebuilt = registration::resolve(conn, r).await?;
            registration::save(conn, &rebuilt).await?;
        }
        EntitySnapshot::Grade(g) => {
            let rebuilt = grade::resolve(conn, g).await?;
            grade::save(conn, &rebuilt).await?;
        }
    }
    Ok(())
}
