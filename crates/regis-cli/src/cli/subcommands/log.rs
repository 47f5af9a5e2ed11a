use std::path::PathBuf;

use clap::Subcommand;
use regis_core::enums::EntityType;

/// Operation log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LogCommands {
    /// List recent operations, newest first.
    List {
        /// Only operations on this entity kind (requires --id)
        #[arg(long, requires = "id")]
        entity: Option<EntityType>,
        /// Only operations on this entity ID (requires --entity)
        #[arg(long, requires = "entity")]
        id: Option<i64>,
    },
    /// Undo a logged operation and record the undo.
    Revert { id: i64 },
    /// Write the whole log, oldest first, as JSON Lines.
    Export { path: PathBuf },
}
