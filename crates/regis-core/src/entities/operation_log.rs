use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, OperationType};

/// An immutable audit record of one administrative mutation.
///
/// `previous_state` and `new_state` hold snapshot text produced by the
/// snapshot codec. They are never both absent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OperationLog {
    pub id: i64,
    pub operation_type: OperationType,
    pub entity_type: EntityType,
    /// May reference an entity that no longer exists.
    pub entity_id: i64,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub description: String,
    pub previous_state: Option<String>,
    pub new_state: Option<String>,
    /// For `Revert` entries, the id of the entry that was undone.
    pub reverted_log_id: Option<i64>,
}

/// An operation log entry before the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOperationLog {
    pub operation_type: OperationType,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub description: String,
    pub previous_state: Option<String>,
    pub new_state: Option<String>,
    pub reverted_log_id: Option<i64>,
}

impl NewOperationLog {
    /// Attach the id assigned on persist.
    #[must_use]
    pub fn persisted(self, id: i64) -> OperationLog {
        OperationLog {
            id,
            operation_type: self.operation_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            timestamp: self.timestamp,
            username: self.username,
            description: self.description,
            previous_state: self.previous_state,
            new_state: self.new_state,
            reverted_log_id: self.reverted_log_id,
        }
    }

    /// Whether the before/after sides are consistent with the operation kind.
    ///
    /// `Create` has no before side, `Delete` has no after side, and no entry
    /// may lack both.
    #[must_use]
    pub const fn has_valid_states(&self) -> bool {
        let has_prev = self.previous_state.is_some();
        let has_new = self.new_state.is_some();
        match self.operation_type {
            OperationType::Create => !has_prev && has_new,
            OperationType::Delete => has_prev && !has_new,
            OperationType::Update | OperationType::Revert => has_prev || has_new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: OperationType, prev: Option<&str>, new: Option<&str>) -> NewOperationLog {
        NewOperationLog {
            operation_type: op,
            entity_type: EntityType::Grade,
            entity_id: 1,
            timestamp: Utc::now(),
            username: "anonymous".into(),
            description: "test".into(),
            previous_state: prev.map(String::from),
            new_state: new.map(String::from),
            reverted_log_id: None,
        }
    }

    #[test]
    fn state_sides_follow_operation_kind() {
        assert!(entry(OperationType::Create, None, Some("{}")).has_valid_states());
        assert!(!entry(OperationType::Create, Some("{}"), Some("{}")).has_valid_states());
        assert!(entry(OperationType::Delete, Some("{}"), None).has_valid_states());
        assert!(!entry(OperationType::Delete, Some("{}"), Some("{}")).has_valid_states());
        assert!(entry(OperationType::Update, Some("{}"), Some("{}")).has_valid_states());
        assert!(entry(OperationType::Revert, None, Some("{}")).has_valid_states());
        assert!(!entry(OperationType::Revert, None, None).has_valid_states());
    }

    #[test]
    fn persisted_keeps_every_field() {
        let new = entry(OperationType::Update, Some("a"), Some("b"));
        let log = new.clone().persisted(42);
        assert_eq!(log.id, 42);
        assert_eq!(log.previous_state, new.previous_state);
        assert_eq!(log.new_state, new.new_state);
        assert_eq!(log.timestamp, new.timestamp);
    }
}
