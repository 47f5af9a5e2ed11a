use libsql::Connection;
use regis_core::entities::Module;
use regis_core::errors::CoreError;
use regis_core::principal::Principal;

use super::assigned_id;
use crate::commit_or_rollback;
use crate::error::DatabaseError;
use crate::gateways::module;
use crate::oplog::OperationLogService;
use crate::service::RegisService;

/// Trim the department, check the code is free, and check the prerequisite
/// exists and is not the module itself.
async fn validated(
    conn: &Connection,
    candidate: &Module,
    excluding: Option<i64>,
) -> Result<Module, DatabaseError> {
    let department = candidate.department.trim();
    if department.is_empty() {
        return Err(CoreError::Conflict("Module department is required".into()).into());
    }
    if module::exists_by_code(conn, &candidate.code, excluding).await? {
        return Err(
            CoreError::Conflict(format!("Module code already exists: {}", candidate.code)).into(),
        );
    }
    if let Some(prerequisite_id) = candidate.prerequisite_id {
        if excluding == Some(prerequisite_id) {
            return Err(CoreError::Conflict("Module cannot be its own prerequisite".into()).into());
        }
        module::require(conn, prerequisite_id).await?;
    }
    Ok(Module {
        department: department.to_string(),
        ..candidate.clone()
    })
}

impl RegisService {
    /// Create a module and log the creation.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Conflict` if `module.id` is set, the code is taken,
    /// or the department is blank. Returns `CoreError::NotFound` if the
    /// prerequisite does not exist.
    pub async fn create_module(
        &self,
        principal: &Principal,
        module: &Module,
    ) -> Result<Module, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.create_module_in(&tx, principal, module).await;
        commit_or_rollback(tx, result).await
    }

    async fn create_module_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        candidate: &Module,
    ) -> Result<Module, DatabaseError> {
        if candidate.id.is_some() {
            return Err(
                CoreError::Conflict("Module ID must be null for new module creation".into()).into(),
            );
        }
        let candidate = validated(conn, candidate, None).await?;

        let saved = module::save(conn, &candidate).await?;
        let id = assigned_id(saved.id)?;
        self.oplog(conn)
            .log_creation(principal, id, &saved, format!("Created module {}", saved.code))
            .await?;
        Ok(saved)
    }

    /// Replace every field of module `id` with `changes` and log the update.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module or the new prerequisite
    /// does not exist, or `CoreError::Conflict` on a taken code, blank
    /// department, or self-prerequisite.
    pub async fn update_module(
        &self,
        principal: &Principal,
        id: i64,
        changes: &Module,
    ) -> Result<Module, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.update_module_in(&tx, principal, id, changes).await;
        commit_or_rollback(tx, result).await
    }

    async fn update_module_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
        changes: &Module,
    ) -> Result<Module, DatabaseError> {
        let existing = module::require(conn, id).await?;
        let before = OperationLogService::copy_of(&existing)?;

        let candidate = Module {
            id: Some(id),
            ..changes.clone()
        };
        let candidate = validated(conn, &candidate, Some(id)).await?;

        let saved = module::save(conn, &candidate).await?;
        self.oplog(conn)
            .log_update(
                principal,
                id,
                &before,
                &saved,
                format!("Updated module {}", saved.code),
            )
            .await?;
        Ok(saved)
    }

    /// Delete module `id` and log the deletion. Registrations and grades on
    /// it go with it; modules that required it lose their prerequisite.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module does not exist.
    pub async fn delete_module(&self, principal: &Principal, id: i64) -> Result<(), DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.delete_module_in(&tx, principal, id).await;
        commit_or_rollback(tx, result).await
    }

    async fn delete_module_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let existing = module::require(conn, id).await?;
        module::delete(conn, id).await?;
        self.oplog(conn)
            .log_deletion(principal, id, &existing, format!("Deleted module {}", existing.code))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module does not exist.
    pub async fn get_module(&self, id: i64) -> Result<Module, DatabaseError> {
        module::require(self.db().conn(), id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_modules(&self) -> Result<Vec<Module>, DatabaseError> {
        module::list(self.db().conn()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::test_support::helpers::{count_rows, sample_module, test_service};
    use pretty_assertions::assert_eq;
    use regis_core::enums::OperationType;

    #[tokio::test]
    async fn create_trims_department_and_logs() {
        let svc = test_service().await;
        let p = Principal::named("registrar");
        let saved = svc
            .create_module(
                &p,
                &Module {
                    department: "  Physics ".into(),
                    ..sample_module("PHY101")
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.department, "Physics");

        let logs = svc.recent_operations(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].description, "Created module PHY101");
    }

    #[tokio::test]
    async fn blank_department_is_conflict() {
        let svc = test_service().await;
        let err = svc
            .create_module(
                &Principal::anonymous(),
                &Module {
                    department: "   ".into(),
                    ..sample_module("PHY101")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);
        assert_eq!(err.to_string(), "Module department is required");
        assert_eq!(count_rows(svc.db(), "modules").await, 0);
    }

    #[tokio::test]
    async fn duplicate_code_is_conflict() {
        let svc = test_service().await;
        let p = Principal::anonymous();
        svc.create_module(&p, &sample_module("CS101")).await.unwrap();
        let err = svc.create_module(&p, &sample_module("CS101")).await.unwrap_err();
        assert_eq!(err.to_string(), "Module code already exists: CS101");
        assert_eq!(count_rows(svc.db(), "operation_logs").await, 1);
    }

    #[tokio::test]
    async fn missing_prerequisite_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_module(
                &Principal::anonymous(),
                &Module {
                    prerequisite_id: Some(99),
                    ..sample_module("CS201")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[tokio::test]
    async fn self_prerequisite_is_conflict() {
        let svc = test_service().await;
        let p = Principal::anonymous();
        let saved = svc.create_module(&p, &sample_module("CS101")).await.unwrap();
        let id = saved.id.unwrap();
        let err = svc
            .update_module(
                &p,
                id,
                &Module {
                    prerequisite_id: Some(id),
                    ..saved
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);
    }

    #[tokio::test]
    async fn update_keeps_own_code_and_reverts() {
        let svc = test_service().await;
        let p = Principal::anonymous();
        let original = svc.create_module(&p, &sample_module("CS101")).await.unwrap();
        let id = original.id.unwrap();

        let updated = svc
            .update_module(
                &p,
                id,
                &Module {
                    required_year: Some(2),
                    ..original.clone()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.required_year, Some(2));

        let log = &svc.recent_operations(1).await.unwrap()[0];
        assert_eq!(log.operation_type, OperationType::Update);
        assert_eq!(log.description, "Updated module CS101");

        svc.revert_operation(&p, log.id).await.unwrap();
        assert_eq!(svc.get_module(id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn delete_clears_dependent_prerequisites() {
        let svc = test_service().await;
        let p = Principal::anonymous();
        let base = svc.create_module(&p, &sample_module("CS101")).await.unwrap();
        let advanced = svc
            .create_module(
                &p,
                &Module {
                    prerequisite_id: base.id,
                    ..sample_module("CS201")
                },
            )
            .await
            .unwrap();

        svc.delete_module(&p, base.id.unwrap()).await.unwrap();
        let reloaded = svc.get_module(advanced.id.unwrap()).await.unwrap();
        assert_eq!(reloaded.prerequisite_id, None);
        assert_eq!(svc.list_modules().await.unwrap().len(), 1);

        let log = &svc.recent_operations(1).await.unwrap()[0];
        assert_eq!(log.description, "Deleted module CS101");
    }

    #[tokio::test]
    async fn delete_revert_needs_its_prerequisite() {
        let svc = test_service().await;
        let p = Principal::anonymous();
        let base = svc.create_module(&p, &sample_module("CS101")).await.unwrap();
        let advanced = svc
            .create_module(
                &p,
                &Module {
                    prerequisite_id: base.id,
                    ..sample_module("CS201")
                },
            )
            .await
            .unwrap();

        svc.delete_module(&p, advanced.id.unwrap()).await.unwrap();
        let deleted = svc.recent_operations(1).await.unwrap()[0].id;
        svc.delete_module(&p, base.id.unwrap()).await.unwrap();

        let err = svc.revert_operation(&p, deleted).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(
            err.to_string(),
            format!("Module not found with id {}", base.id.unwrap())
        );
        assert_eq!(count_rows(svc.db(), "modules").await, 0);
        assert_eq!(count_rows(svc.db(), "operation_logs").await, 4);
    }
}
