use serde_json::json;

use crate::cli::root_commands::{OwnerArgs, RegistrationArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis register`.
pub async fn register(args: &RegistrationArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let registration = ctx
        .service
        .register(&ctx.principal, args.student, args.module)
        .await?;
    output(&registration)
}

/// Handle `regis unregister`.
pub async fn unregister(args: &RegistrationArgs, ctx: &AppContext) -> anyhow::Result<()> {
    ctx.service
        .unregister(&ctx.principal, args.student, args.module)
        .await?;
    output(&json!({
        "unregistered": { "student_id": args.student, "module_id": args.module }
    }))
}

/// Handle `regis registrations`.
pub async fn list(args: &OwnerArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let registrations = match (args.student, args.module) {
        (Some(student_id), _) => ctx.service.registrations_for_student(student_id).await?,
        (None, Some(module_id)) => ctx.service.registrations_for_module(module_id).await?,
        (None, None) => anyhow::bail!("one of --student or --module is required"),
    };
    output(&json!({ "registrations": registrations }))
}
