use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::GlobalFlags;
pub use root_commands::Commands;

/// Top-level CLI parser for the `regis` binary.
#[derive(Debug, Parser)]
#[command(
    name = "regis",
    version,
    about = "Student records administration with an audited, revertible operation log"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Acting user recorded on every logged operation (defaults to config, then anonymous)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Database file path, or ":memory:" (overrides config)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            user: self.user.clone(),
            db: self.db.clone(),
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;
    use regis_core::enums::EntityType;

    use super::{Cli, Commands};
    use crate::cli::subcommands::{GradeCommands, LogCommands, StudentCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "regis", "--user", "registrar", "--db", ":memory:", "--limit", "10", "--verbose",
            "log", "list",
        ])
        .unwrap();

        let flags = cli.global_flags();
        assert_eq!(flags.user.as_deref(), Some("registrar"));
        assert_eq!(flags.db.as_deref(), Some(":memory:"));
        assert_eq!(flags.limit, Some(10));
        assert!(flags.verbose);
        assert!(matches!(
            cli.command,
            Commands::Log {
                action: LogCommands::List { .. }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["regis", "student", "list", "--quiet", "-u", "admin"])
            .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.user.as_deref(), Some("admin"));
        assert!(matches!(
            cli.command,
            Commands::Student {
                action: StudentCommands::List
            }
        ));
    }

    #[test]
    fn log_list_accepts_entity_filter() {
        let cli = Cli::try_parse_from([
            "regis", "log", "list", "--entity", "grade", "--id", "4",
        ])
        .unwrap();
        let Commands::Log {
            action: LogCommands::List { entity, id },
        } = cli.command
        else {
            panic!("expected log list");
        };
        assert_eq!(entity, Some(EntityType::Grade));
        assert_eq!(id, Some(4));
    }

    #[test]
    fn log_list_entity_requires_id() {
        assert!(Cli::try_parse_from(["regis", "log", "list", "--entity", "grade"]).is_err());
    }

    #[test]
    fn grade_list_needs_exactly_one_owner() {
        assert!(Cli::try_parse_from(["regis", "grade", "list"]).is_err());
        assert!(
            Cli::try_parse_from(["regis", "grade", "list", "--student", "1", "--module", "2"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["regis", "grade", "list", "--module", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Grade {
                action: GradeCommands::List {
                    student: None,
                    module: Some(2)
                }
            }
        ));
    }

    #[test]
    fn student_create_parses_optional_fields() {
        let cli = Cli::try_parse_from([
            "regis",
            "student",
            "create",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--user-name",
            "alovelace",
            "--email",
            "ada@example.ac.uk",
            "--entry-year",
            "2025",
            "--birth-date",
            "2004-12-10",
            "--home-student",
            "true",
        ])
        .unwrap();
        let Commands::Student {
            action: StudentCommands::Create(fields),
        } = cli.command
        else {
            panic!("expected student create");
        };
        assert_eq!(fields.entry_year, Some(2025));
        assert_eq!(fields.home_student, Some(true));
        assert_eq!(
            fields.birth_date.map(|d| d.to_string()).as_deref(),
            Some("2004-12-10")
        );
    }
}
