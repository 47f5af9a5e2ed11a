//! Operation and entity kinds recorded in the operation log.
//!
//! Both enums serialize as their uppercase symbolic names (`"CREATE"`,
//! `"STUDENT"`), never as numeric codes, so historical rows stay readable
//! after the enums grow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// OperationType
// ---------------------------------------------------------------------------

/// Kind of mutation an operation log entry documents.
///
/// ```text
/// CREATE ─┐
/// UPDATE ─┼─ revert ─→ REVERT (terminal)
/// DELETE ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Create,
    Update,
    Delete,
    Revert,
}

impl OperationType {
    pub const ALL: [Self; 4] = [Self::Create, Self::Update, Self::Delete, Self::Revert];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Revert => "REVERT",
        }
    }

    /// Whether an entry of this kind may be reverted. `Revert` is terminal.
    #[must_use]
    pub const fn is_revertible(self) -> bool {
        !matches!(self, Self::Revert)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entities whose mutations are tracked in the operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Student,
    Module,
    Registration,
    Grade,
}

impl EntityType {
    pub const ALL: [Self; 4] = [Self::Student, Self::Module, Self::Registration, Self::Grade];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Module => "MODULE",
            Self::Registration => "REGISTRATION",
            Self::Grade => "GRADE",
        }
    }

    /// Human-readable name used in error messages ("Student not found ...").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Module => "Module",
            Self::Registration => "Registration",
            Self::Grade => "Grade",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity type '{s}'"))
    }
}
