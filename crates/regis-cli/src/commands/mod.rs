pub mod dispatch;
pub mod grade;
pub mod log;
pub mod module;
pub mod registration;
pub mod schema;
pub mod stats;
pub mod student;
