use chrono::Datelike;
use libsql::Connection;
use regis_core::eligibility::{self, Prerequisite};
use regis_core::entities::{Module, Registration, Student};
use regis_core::errors::CoreError;
use regis_core::principal::Principal;
use regis_core::snapshot::RegistrationSnapshot;

use crate::commit_or_rollback;
use crate::error::DatabaseError;
use crate::gateways::{grade, module, registration, student};
use crate::service::RegisService;

impl RegisService {
    /// Register a student on a module and log the registration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if either side does not exist, or
    /// `CoreError::Conflict` if the student is already registered or fails
    /// the eligibility rules.
    pub async fn register(
        &self,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
    ) -> Result<Registration, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.register_in(&tx, principal, student_id, module_id).await;
        commit_or_rollback(tx, result).await
    }

    async fn register_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
    ) -> Result<Registration, DatabaseError> {
        let student = student::require(conn, student_id).await?;
        let module = module::require(conn, module_id).await?;
        if registration::exists_by_student_and_module(conn, student_id, module_id).await? {
            return Err(CoreError::Conflict("Student already registered for module".into()).into());
        }
        self.check_eligibility(conn, &student, &module).await?;

        let saved = registration::save(conn, &Registration::new(student, module)).await?;
        let snapshot = RegistrationSnapshot::try_from(&saved)?;
        self.oplog(conn)
            .log_creation(
                principal,
                snapshot.id,
                &snapshot,
                format!("Registered {} to {}", saved.student.user_name, saved.module.code),
            )
            .await?;
        Ok(saved)
    }

    async fn check_eligibility(
        &self,
        conn: &Connection,
        student: &Student,
        module: &Module,
    ) -> Result<(), DatabaseError> {
        let prerequisite_module = match module.prerequisite_id {
            Some(prerequisite_id) => module::find_by_id(conn, prerequisite_id).await?,
            None => None,
        };
        let prerequisite = match (&prerequisite_module, student.id) {
            (Some(prerequisite), Some(student_id)) => {
                let score = match prerequisite.id {
                    Some(prerequisite_id) => {
                        grade::score_for(conn, student_id, prerequisite_id).await?
                    }
                    None => None,
                };
                Some(Prerequisite {
                    module: prerequisite,
                    score,
                })
            }
            _ => None,
        };

        let current_year = self.clock().now().year();
        eligibility::evaluate(student, module, prerequisite.as_ref(), current_year)
            .map_err(|reason| {
                tracing::debug!(
                    student = %student.user_name,
                    module = %module.code,
                    %reason,
                    "registration rejected"
                );
                CoreError::from(reason).into()
            })
    }

    /// Remove a student's registration on a module and log the removal.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if either side does not exist, or
    /// `CoreError::Precondition` if the student is not registered.
    pub async fn unregister(
        &self,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
    ) -> Result<(), DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.unregister_in(&tx, principal, student_id, module_id).await;
        commit_or_rollback(tx, result).await
    }

    async fn unregister_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
    ) -> Result<(), DatabaseError> {
        student::require(conn, student_id).await?;
        module::require(conn, module_id).await?;
        let existing = registration::find_by_student_and_module(conn, student_id, module_id)
            .await?
            .ok_or_else(|| CoreError::Precondition("Student is not registered for module".into()))?;
        let snapshot = RegistrationSnapshot::try_from(&existing)?;

        registration::delete(conn, snapshot.id).await?;
        self.oplog(conn)
            .log_deletion(
                principal,
                snapshot.id,
                &snapshot,
                format!(
                    "Unregistered {} from {}",
                    existing.student.user_name, existing.module.code
                ),
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist.
    pub async fn registrations_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Registration>, DatabaseError> {
        let conn = self.db().conn();
        student::require(conn, student_id).await?;
        registration::for_student(conn, student_id).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module does not exist.
    pub async fn registrations_for_module(
        &self,
        module_id: i64,
    ) -> Result<Vec<Registration>, DatabaseError> {
        let conn = self.db().conn();
        module::require(conn, module_id).await?;
        registration::for_module(conn, module_id).await
    }
}
