use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Module, Student};

/// A student's score on a module, with both sides resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Grade {
    pub id: Option<i64>,
    pub student: Student,
    pub module: Module,
    pub score: i32,
}

impl Grade {
    #[must_use]
    pub const fn new(student: Student, module: Module, score: i32) -> Self {
        Self {
            id: None,
            student,
            module,
            score,
        }
    }
}
