use clap::Subcommand;

/// Statistics commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StatsCommands {
    /// Average score, GPA, and outstanding tuition of a student.
    Student { id: i64 },
    /// Registration and pass rates of a module.
    Module { id: i64 },
}
