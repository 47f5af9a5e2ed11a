use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An enrolled student. `id` is `None` until the row is first saved.
///
/// Snapshots of a student are complete copies of these scalar fields; the
/// student's registrations and grades are never nested inside.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Student {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub entry_year: Option<i32>,
    pub graduate_year: Option<i32>,
    pub major: Option<String>,
    pub tuition_fee: Option<f64>,
    pub paid_tuition_fee: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub home_student: Option<bool>,
    pub sex: Option<String>,
}

impl Student {
    /// Tuition still owed, when a fee is set.
    #[must_use]
    pub fn outstanding_tuition(&self) -> Option<f64> {
        self.tuition_fee
            .map(|fee| (fee - self.paid_tuition_fee.unwrap_or(0.0)).max(0.0))
    }
}
