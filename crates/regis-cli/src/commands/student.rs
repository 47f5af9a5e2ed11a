use regis_core::entities::Student;
use serde_json::json;

use crate::cli::subcommands::{StudentCommands, StudentFields, StudentPatch};
use crate::context::AppContext;
use crate::output::output;

/// Handle `regis student`.
pub async fn handle(action: StudentCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        StudentCommands::Create(fields) => {
            let student = service
                .create_student(&ctx.principal, &new_student(fields))
                .await?;
            output(&student)
        }
        StudentCommands::Update { id, changes } => {
            let current = service.get_student(id).await?;
            let student = service
                .update_student(&ctx.principal, id, &apply_patch(current, changes))
                .await?;
            output(&student)
        }
        StudentCommands::Delete { id } => {
            service.delete_student(&ctx.principal, id).await?;
            output(&json!({ "deleted": { "entity": "STUDENT", "id": id } }))
        }
        StudentCommands::Get { id } => output(&service.get_student(id).await?),
        StudentCommands::List => output(&json!({ "students": service.list_students().await? })),
    }
}

fn new_student(fields: StudentFields) -> Student {
    Student {
        id: None,
        first_name: fields.first_name,
        last_name: fields.last_name,
        user_name: fields.user_name,
        email: fields.email,
        entry_year: fields.entry_year,
        graduate_year: fields.graduate_year,
        major: fields.major,
        tuition_fee: fields.tuition_fee,
        paid_tuition_fee: fields.paid_tuition_fee,
        birth_date: fields.birth_date,
        home_student: fields.home_student,
        sex: fields.sex,
    }
}

fn apply_patch(current: Student, patch: StudentPatch) -> Student {
    Student {
        id: current.id,
        first_name: patch.first_name.unwrap_or(current.first_name),
        last_name: patch.last_name.unwrap_or(current.last_name),
        user_name: patch.user_name.unwrap_or(current.user_name),
        email: patch.email.unwrap_or(current.email),
        entry_year: patch.entry_year.or(current.entry_year),
        graduate_year: patch.graduate_year.or(current.graduate_year),
        major: patch.major.or(current.major),
        tuition_fee: patch.tuition_fee.or(current.tuition_fee),
        paid_tuition_fee: patch.paid_tuition_fee.or(current.paid_tuition_fee),
        birth_date: patch.birth_date.or(current.birth_date),
        home_student: patch.home_student.or(current.home_student),
        sex: patch.sex.or(current.sex),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use regis_core::entities::Student;

    use super::apply_patch;
    use crate::cli::subcommands::StudentPatch;

    #[test]
    fn patch_overrides_only_given_fields() {
        let current = Student {
            id: Some(3),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            user_name: "alovelace".into(),
            email: "ada@example.ac.uk".into(),
            major: Some("Mathematics".into()),
            ..Student::default()
        };
        let patch = StudentPatch {
            email: Some("ada@new.example".into()),
            paid_tuition_fee: Some(1000.0),
            ..StudentPatch::default()
        };

        let patched = apply_patch(current.clone(), patch);
        assert_eq!(
            patched,
            Student {
                email: "ada@new.example".into(),
                paid_tuition_fee: Some(1000.0),
                ..current
            }
        );
    }
}
