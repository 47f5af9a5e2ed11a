//! Entity structs for all regis domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for snapshot roundtrip and
//! schema validation.

mod grade;
mod module;
mod operation_log;
mod registration;
mod student;

pub use grade::Grade;
pub use module::Module;
pub use operation_log::{NewOperationLog, OperationLog};
pub use registration::Registration;
pub use student::Student;
