//! Snapshot codec: entity state to and from stored text.
//!
//! Every stored shape implements [`Snapshot`], which pins it to the
//! [`EntityType`] it is recorded under. Encoding is field-named JSON, so a
//! decoder never depends on field order. Decoding is dispatched by
//! `EntityType` through [`EntitySnapshot::decode`], the single table that
//! maps a stored kind to its shape.
//!
//! Registrations and grades are stored as the lightweight
//! [`RegistrationSnapshot`] and [`GradeSnapshot`] records carrying only ids
//! for their cross-references; students and modules are stored whole.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entities::{Grade, Module, Registration, Student};
use crate::enums::EntityType;
use crate::errors::CoreError;

/// A shape that can be written to and rebuilt from the operation log.
pub trait Snapshot: Serialize + DeserializeOwned + JsonSchema {
    /// Entity kind this shape is stored under.
    const ENTITY: EntityType;
}

impl Snapshot for Student {
    const ENTITY: EntityType = EntityType::Student;
}

impl Snapshot for Module {
    const ENTITY: EntityType = EntityType::Module;
}

impl Snapshot for RegistrationSnapshot {
    const ENTITY: EntityType = EntityType::Registration;
}

impl Snapshot for GradeSnapshot {
    const ENTITY: EntityType = EntityType::Grade;
}

/// Minimal record of a registration: its id and the ids it references.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegistrationSnapshot {
    pub id: i64,
    pub student_id: i64,
    pub module_id: i64,
}

/// Minimal record of a grade: its id, the ids it references, and the score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeSnapshot {
    pub id: i64,
    pub student_id: i64,
    pub module_id: i64,
    pub score: i32,
}

fn persisted_id(id: Option<i64>, entity: EntityType) -> Result<i64, CoreError> {
    id.ok_or_else(|| CoreError::Encode(format!("{} has not been persisted", entity.label())))
}

impl TryFrom<&Registration> for RegistrationSnapshot {
    type Error = CoreError;

    fn try_from(registration: &Registration) -> Result<Self, Self::Error> {
        Ok(Self {
            id: persisted_id(registration.id, EntityType::Registration)?,
            student_id: persisted_id(registration.student.id, EntityType::Student)?,
            module_id: persisted_id(registration.module.id, EntityType::Module)?,
        })
    }
}

impl TryFrom<&Grade> for GradeSnapshot {
    type Error = CoreError;

    fn try_from(grade: &Grade) -> Result<Self, Self::Error> {
        Ok(Self {
            id: persisted_id(grade.id, EntityType::Grade)?,
            student_id: persisted_id(grade.student.id, EntityType::Student)?,
            module_id: persisted_id(grade.module.id, EntityType::Module)?,
            score: grade.score,
        })
    }
}

/// Encode a snapshot to its stored text form.
///
/// # Errors
///
/// Returns `CoreError::Encode` if serialization fails.
pub fn encode<T: Snapshot>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string(value).map_err(|e| CoreError::Encode(format!("{}: {e}", T::ENTITY)))
}

/// Encode an optional snapshot. `None` passes through as `None`.
///
/// # Errors
///
/// Returns `CoreError::Encode` if serialization fails.
pub fn encode_opt<T: Snapshot>(value: Option<&T>) -> Result<Option<String>, CoreError> {
    value.map(encode).transpose()
}

/// Decode stored text into the requested shape.
///
/// # Errors
///
/// Returns `CoreError::CorruptState` if the text does not parse as `T`.
pub fn decode<T: Snapshot>(text: &str) -> Result<T, CoreError> {
    serde_json::from_str(text)
        .map_err(|e| CoreError::CorruptState(format!("{} state: {e}", T::ENTITY)))
}

/// Deep-copy a value by encoding and decoding it.
///
/// # Errors
///
/// Returns `CoreError::Encode` or `CoreError::CorruptState` if either half of
/// the roundtrip fails.
pub fn copy_of<T: Snapshot>(value: &T) -> Result<T, CoreError> {
    decode(&encode(value)?)
}

/// Tagged union over every stored snapshot shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySnapshot {
    Student(Student),
    Module(Module),
    Registration(RegistrationSnapshot),
    Grade(GradeSnapshot),
}

impl EntitySnapshot {
    /// Decode stored text using the shape registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CorruptState` if the text does not parse as the
    /// shape for `kind`.
    pub fn decode(kind: EntityType, text: &str) -> Result<Self, CoreError> {
        Ok(match kind {
            EntityType::Student => Self::Student(decode(text)?),
            EntityType::Module => Self::Module(decode(text)?),
            EntityType::Registration => Self::Registration(decode(text)?),
            EntityType::Grade => Self::Grade(decode(text)?),
        })
    }

    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Student(_) => EntityType::Student,
            Self::Module(_) => EntityType::Module,
            Self::Registration(_) => EntityType::Registration,
            Self::Grade(_) => EntityType::Grade,
        }
    }

    /// Identifier of the snapshotted entity, if it had one.
    #[must_use]
    pub const fn entity_id(&self) -> Option<i64> {
        match self {
            Self::Student(s) => s.id,
            Self::Module(m) => m.id,
            Self::Registration(r) => Some(r.id),
            Self::Grade(g) => Some(g.id),
        }
    }
}

/// JSON Schema of the shape stored under `kind`.
#[must_use]
pub fn schema_for(kind: EntityType) -> schemars::Schema {
    match kind {
        EntityType::Student => schemars::schema_for!(Student),
        EntityType::Module => schemars::schema_for!(Module),
        EntityType::Registration => schemars::schema_for!(RegistrationSnapshot),
        EntityType::Grade => schemars::schema_for!(GradeSnapshot),
    }
}
