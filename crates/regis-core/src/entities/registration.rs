use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Module, Student};

/// A student's enrolment on a module, with both sides resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Registration {
    pub id: Option<i64>,
    pub student: Student,
    pub module: Module,
}

impl Registration {
    #[must_use]
    pub const fn new(student: Student, module: Module) -> Self {
        Self {
            id: None,
            student,
            module,
        }
    }
}
