use anyhow::Context;
use serde_json::json;

use crate::cli::subcommands::LogCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis log`.
pub async fn handle(action: LogCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        LogCommands::List { entity, id } => {
            let limit = ctx.config.general.default_limit;
            let operations = match (entity, id) {
                (Some(entity), Some(id)) => {
                    let mut operations = service.operations_for(entity, id).await?;
                    operations.truncate(usize::try_from(limit)?);
                    operations
                }
                _ => service.recent_operations(limit).await?,
            };
            output(&json!({ "operations": operations }))
        }
        LogCommands::Revert { id } => {
            let revert = service.revert_operation(&ctx.principal, id).await?;
            output(&revert)
        }
        LogCommands::Export { path } => {
            let entries = service
                .export_operations(&path)
                .await
                .with_context(|| format!("failed to export operation log to {}", path.display()))?;
            output(&json!({ "path": path, "entries": entries }))
        }
    }
}
