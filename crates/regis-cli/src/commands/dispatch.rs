use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        Commands::Student { action } => commands::student::handle(action, ctx).await,
        Commands::Module { action } => commands::module::handle(action, ctx).await,
        Commands::Register(args) => commands::registration::register(&args, ctx).await,
        Commands::Unregister(args) => commands::registration::unregister(&args, ctx).await,
        Commands::Registrations(args) => commands::registration::list(&args, ctx).await,
        Commands::Grade { action } => commands::grade::handle(action, ctx).await,
        Commands::Stats { action } => commands::stats::handle(&action, ctx).await,
        Commands::Log { action } => commands::log::handle(action, ctx).await,
        Commands::Schema(args) => commands::schema::handle(&args),
    }
}
