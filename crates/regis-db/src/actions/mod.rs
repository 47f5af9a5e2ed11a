//! Business actions over students, modules, registrations, and grades.
//!
//! Each mutating action is an `impl RegisService` method that opens one
//! transaction, validates, mutates through the gateways, records the matching
//! operation log entry, and commits. Any error rolls the whole unit back.

pub mod grade;
pub mod module;
pub mod registration;
pub mod student;

use crate::error::DatabaseError;

/// The id a gateway `save` just assigned.
fn assigned_id(id: Option<i64>) -> Result<i64, DatabaseError> {
    id.ok_or(DatabaseError::NoResult)
}
