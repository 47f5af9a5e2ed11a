use clap::{Args, Subcommand};

/// Module commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ModuleCommands {
    /// Create a module.
    Create(ModuleFields),
    /// Update a module. Omitted fields keep their current value.
    Update {
        id: i64,
        #[command(flatten)]
        changes: ModulePatch,
    },
    /// Delete a module with its registrations and grades.
    Delete { id: i64 },
    /// Get a module by ID.
    Get { id: i64 },
    /// List modules.
    List,
}

/// Every field of a new module.
#[derive(Clone, Debug, Args)]
pub struct ModuleFields {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub department: String,
    /// Mandatory non-condonable
    #[arg(long)]
    pub mnc: bool,
    /// Lowest year of study allowed to register
    #[arg(long)]
    pub required_year: Option<i32>,
    /// Module ID that must be passed first
    #[arg(long)]
    pub prerequisite: Option<i64>,
}

/// Fields to change on an existing module.
#[derive(Clone, Debug, Default, Args)]
pub struct ModulePatch {
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub mnc: Option<bool>,
    #[arg(long, conflicts_with = "no_required_year")]
    pub required_year: Option<i32>,
    /// Drop the year requirement
    #[arg(long)]
    pub no_required_year: bool,
    #[arg(long, conflicts_with = "no_prerequisite")]
    pub prerequisite: Option<i64>,
    /// Drop the prerequisite
    #[arg(long)]
    pub no_prerequisite: bool,
}
