use crate::cli::subcommands::StatsCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis stats`.
pub async fn handle(action: &StatsCommands, ctx: &AppContext) -> anyhow::Result<()> {
    match action {
        StatsCommands::Student { id } => output(&ctx.service.student_statistics(*id).await?),
        StatsCommands::Module { id } => output(&ctx.service.module_statistics(*id).await?),
    }
}
