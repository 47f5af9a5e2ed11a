use regis_core::entities::Module;
use serde_json::json;

use crate::cli::subcommands::{ModuleCommands, ModuleFields, ModulePatch};
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis module`.
pub async fn handle(action: ModuleCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        ModuleCommands::Create(fields) => {
            let module = service
                .create_module(&ctx.principal, &new_module(fields))
                .await?;
            output(&module)
        }
        ModuleCommands::Update { id, changes } => {
            let current = service.get_module(id).await?;
            let module = service
                .update_module(&ctx.principal, id, &apply_patch(current, changes))
                .await?;
            output(&module)
        }
        ModuleCommands::Delete { id } => {
            service.delete_module(&ctx.principal, id).await?;
            output(&json!({ "deleted": { "entity": "MODULE", "id": id } }))
        }
        ModuleCommands::Get { id } => output(&service.get_module(id).await?),
        ModuleCommands::List => output(&json!({ "modules": service.list_modules().await? })),
    }
}

fn new_module(fields: ModuleFields) -> Module {
    Module {
        id: None,
        code: fields.code,
        name: fields.name,
        mnc: fields.mnc,
        department: fields.department,
        required_year: fields.required_year,
        prerequisite_id: fields.prerequisite,
    }
}

fn apply_patch(current: Module, patch: ModulePatch) -> Module {
    let required_year = if patch.no_required_year {
        None
    } else {
        patch.required_year.or(current.required_year)
    };
    let prerequisite_id = if patch.no_prerequisite {
        None
    } else {
        patch.prerequisite.or(current.prerequisite_id)
    };
    Module {
        id: current.id,
        code: patch.code.unwrap_or(current.code),
        name: patch.name.unwrap_or(current.name),
        mnc: patch.mnc.unwrap_or(current.mnc),
        department: patch.department.unwrap_or(current.department),
        required_year,
        prerequisite_id,
    }
}
