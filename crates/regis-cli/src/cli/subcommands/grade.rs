use clap::Subcommand;

/// Grade commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GradeCommands {
    /// Record a registered student's score, replacing any existing one.
    Record {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        module: i64,
        #[arg(long, allow_negative_numbers = true)]
        score: i32,
    },
    /// Change the score of a grade.
    Update {
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        score: i32,
    },
    /// Delete a grade.
    Delete { id: i64 },
    /// List grades of a student or on a module.
    List {
        #[arg(long, required_unless_present = "module", conflicts_with = "module")]
        student: Option<i64>,
        #[arg(long)]
        module: Option<i64>,
    },
}
