use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Student commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// Create a student.
    Create(StudentFields),
    /// Update a student. Omitted fields keep their current value.
    Update {
        id: i64,
        #[command(flatten)]
        changes: StudentPatch,
    },
    /// Delete a student with their registrations and grades.
    Delete { id: i64 },
    /// Get a student by ID.
    Get { id: i64 },
    /// List students.
    List,
}

/// Every field of a new student.
#[derive(Clone, Debug, Args)]
pub struct StudentFields {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub user_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub entry_year: Option<i32>,
    #[arg(long)]
    pub graduate_year: Option<i32>,
    #[arg(long)]
    pub major: Option<String>,
    #[arg(long)]
    pub tuition_fee: Option<f64>,
    #[arg(long)]
    pub paid_tuition_fee: Option<f64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub home_student: Option<bool>,
    #[arg(long)]
    pub sex: Option<String>,
}

/// Fields to change on an existing student.
#[derive(Clone, Debug, Default, Args)]
pub struct StudentPatch {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub user_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub entry_year: Option<i32>,
    #[arg(long)]
    pub graduate_year: Option<i32>,
    #[arg(long)]
    pub major: Option<String>,
    #[arg(long)]
    pub tuition_fee: Option<f64>,
    #[arg(long)]
    pub paid_tuition_fee: Option<f64>,
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub home_student: Option<bool>,
    #[arg(long)]
    pub sex: Option<String>,
}
