//! Cross-cutting error types for regis.
//!
//! `CoreError` carries the domain failure taxonomy shared by the gateways,
//! the operation log service, and the business actions. Storage failures are
//! defined in `regis-db` and wrap this type.

use thiserror::Error;

use crate::eligibility::Ineligible;
use crate::enums::{EntityType, OperationType};

/// Errors that can be raised by any regis crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A looked-up entity or log entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request collides with existing state (uniqueness, eligibility).
    #[error("{0}")]
    Conflict(String),

    /// A caller precondition does not hold (e.g. grading an unregistered student).
    #[error("{0}")]
    Precondition(String),

    /// A snapshot could not be encoded. Always a programming error.
    #[error("Unable to serialize operation state: {0}")]
    Encode(String),

    /// Stored operation state could not be parsed back into its shape.
    #[error("Unable to parse stored operation state: {0}")]
    CorruptState(String),

    /// The log entry's operation kind has no inverse.
    #[error("Operation type cannot be reverted: {0}")]
    NotRevertible(OperationType),
}

impl CoreError {
    /// `"<Entity> not found with id <id>"`.
    #[must_use]
    pub fn entity_not_found(entity: EntityType, id: i64) -> Self {
        Self::NotFound(format!("{} not found with id {id}", entity.label()))
    }

    /// `"Operation not found with id <id>"`.
    #[must_use]
    pub fn operation_not_found(id: i64) -> Self {
        Self::NotFound(format!("Operation not found with id {id}"))
    }
}

impl From<Ineligible> for CoreError {
    fn from(e: Ineligible) -> Self {
        Self::Conflict(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_entity() {
        assert_eq!(
            CoreError::entity_not_found(EntityType::Student, 7).to_string(),
            "Student not found with id 7"
        );
        assert_eq!(
            CoreError::operation_not_found(3).to_string(),
            "Operation not found with id 3"
        );
    }

    #[test]
    fn ineligible_becomes_conflict() {
        let err: CoreError = Ineligible::MissingEntryYear.into();
        assert!(matches!(err, CoreError::Conflict(_)));
    }
}
