use libsql::Connection;
use regis_core::entities::Grade;
use regis_core::errors::CoreError;
use regis_core::principal::Principal;
use regis_core::snapshot::GradeSnapshot;

use crate::commit_or_rollback;
use crate::error::DatabaseError;
use crate::gateways::{grade, module, registration, student};
use crate::service::RegisService;

impl RegisService {
    /// Set a registered student's score on a module, creating the grade if
    /// none exists yet. Logs CREATE for a new grade and UPDATE otherwise.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if either side does not exist, or
    /// `CoreError::Precondition` if the student is not registered.
    pub async fn record_grade(
        &self,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
        score: i32,
    ) -> Result<Grade, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self
            .record_grade_in(&tx, principal, student_id, module_id, score)
            .await;
        commit_or_rollback(tx, result).await
    }

    async fn record_grade_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        student_id: i64,
        module_id: i64,
        score: i32,
    ) -> Result<Grade, DatabaseError> {
        let student = student::require(conn, student_id).await?;
        let module = module::require(conn, module_id).await?;
        if !registration::exists_by_student_and_module(conn, student_id, module_id).await? {
            return Err(CoreError::Precondition(
                "Student must be registered before receiving a grade".into(),
            )
            .into());
        }

        let existing = grade::find_by_student_and_module(conn, student_id, module_id).await?;
        let previous = existing.as_ref().map(GradeSnapshot::try_from).transpose()?;
        let target = match existing {
            Some(grade) => Grade { score, ..grade },
            None => Grade::new(student, module, score),
        };

        let saved = grade::save(conn, &target).await?;
        let after = GradeSnapshot::try_from(&saved)?;
        let oplog = self.oplog(conn);
        let (user_name, code) = (&saved.student.user_name, &saved.module.code);
        match previous {
            None => {
                oplog
                    .log_creation(
                        principal,
                        after.id,
                        &after,
                        format!("Created grade for {user_name} in {code}"),
                    )
                    .await?;
            }
            Some(before) => {
                oplog
                    .log_update(
                        principal,
                        after.id,
                        &before,
                        &after,
                        format!("Updated grade for {user_name} in {code}"),
                    )
                    .await?;
            }
        }
        Ok(saved)
    }

    /// Change the score of grade `id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the grade does not exist.
    pub async fn update_grade(
        &self,
        principal: &Principal,
        id: i64,
        score: i32,
    ) -> Result<Grade, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.update_grade_in(&tx, principal, id, score).await;
        commit_or_rollback(tx, result).await
    }

    async fn update_grade_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
        score: i32,
    ) -> Result<Grade, DatabaseError> {
        let existing = grade::require(conn, id).await?;
        let before = GradeSnapshot::try_from(&existing)?;

        let saved = grade::save(conn, &Grade { score, ..existing }).await?;
        let after = GradeSnapshot::try_from(&saved)?;
        self.oplog(conn)
            .log_update(principal, id, &before, &after, format!("Updated grade {id}"))
            .await?;
        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the grade does not exist.
    pub async fn delete_grade(&self, principal: &Principal, id: i64) -> Result<(), DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.delete_grade_in(&tx, principal, id).await;
        commit_or_rollback(tx, result).await
    }

    async fn delete_grade_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let existing = grade::require(conn, id).await?;
        let before = GradeSnapshot::try_from(&existing)?;
        grade::delete(conn, id).await?;
        self.oplog(conn)
            .log_deletion(principal, id, &before, format!("Deleted grade {id}"))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the grade does not exist.
    pub async fn get_grade(&self, id: i64) -> Result<Grade, DatabaseError> {
        grade::require(self.db().conn(), id).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist.
    pub async fn grades_for_student(&self, student_id: i64) -> Result<Vec<Grade>, DatabaseError> {
        let conn = self.db().conn();
        student::require(conn, student_id).await?;
        grade::for_student(conn, student_id).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module does not exist.
    pub async fn grades_for_module(&self, module_id: i64) -> Result<Vec<Grade>, DatabaseError> {
        let conn = self.db().conn();
        module::require(conn, module_id).await?;
        grade::for_module(conn, module_id).await
    }
}
