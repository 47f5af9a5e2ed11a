use serde_json::json;

use crate::cli::subcommands::GradeCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis grade`.
pub async fn handle(action: GradeCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        GradeCommands::Record {
            student,
            module,
            score,
        } => output(
            &service
                .record_grade(&ctx.principal, student, module, score)
                .await?,
        ),
        GradeCommands::Update { id, score } => {
            output(&service.update_grade(&ctx.principal, id, score).await?)
        }
        GradeCommands::Delete { id } => {
            service.delete_grade(&ctx.principal, id).await?;
            output(&json!({ "deleted": { "entity": "GRADE", "id": id } }))
        }
        GradeCommands::List { student, module } => {
            let grades = match (student, module) {
                (Some(student_id), _) => service.grades_for_student(student_id).await?,
                (None, Some(module_id)) => service.grades_for_module(module_id).await?,
                (None, None) => anyhow::bail!("one of --student or --module is required"),
            };
            output(&json!({ "grades": grades }))
        }
    }
}
