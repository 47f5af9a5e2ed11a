use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{
    GradeCommands, LogCommands, ModuleCommands, StatsCommands, StudentCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Students.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Modules.
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },
    /// Register a student on a module (eligibility rules apply).
    Register(RegistrationArgs),
    /// Remove a student's registration on a module.
    Unregister(RegistrationArgs),
    /// List registrations of a student or on a module.
    Registrations(OwnerArgs),
    /// Grades.
    Grade {
        #[command(subcommand)]
        action: GradeCommands,
    },
    /// Grade statistics.
    Stats {
        #[command(subcommand)]
        action: StatsCommands,
    },
    /// Operation log: list, revert, export.
    Log {
        #[command(subcommand)]
        action: LogCommands,
    },
    /// Dump the JSON Schema of a stored shape.
    Schema(SchemaArgs),
}

/// Arguments for `regis register` and `regis unregister`.
#[derive(Clone, Debug, Args)]
pub struct RegistrationArgs {
    #[arg(long)]
    pub student: i64,
    #[arg(long)]
    pub module: i64,
}

/// Exactly one of a student or a module.
#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct OwnerArgs {
    #[arg(long)]
    pub student: Option<i64>,
    #[arg(long)]
    pub module: Option<i64>,
}

/// Shapes whose schema `regis schema` can print.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaShape {
    Student,
    Module,
    Registration,
    Grade,
    OperationLog,
}

/// Arguments for `regis schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub shape: SchemaShape,
}
