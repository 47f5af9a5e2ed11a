use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A taught module. The prerequisite is held by id so a snapshot never
/// traverses into another module's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Module {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    /// Mandatory non-condonable.
    pub mnc: bool,
    pub department: String,
    pub required_year: Option<i32>,
    pub prerequisite_id: Option<i64>,
}
