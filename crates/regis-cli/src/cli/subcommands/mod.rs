mod grade;
mod log;
mod module;
mod stats;
mod student;

pub use grade::GradeCommands;
pub use log::LogCommands;
pub use module::{ModuleCommands, ModuleFields, ModulePatch};
pub use stats::StatsCommands;
pub use student::{StudentCommands, StudentFields, StudentPatch};
