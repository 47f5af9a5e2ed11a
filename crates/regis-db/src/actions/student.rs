use libsql::Connection;
use regis_core::entities::Student;
use regis_core::errors::CoreError;
use regis_core::principal::Principal;

use super::assigned_id;
use crate::commit_or_rollback;
use crate::error::DatabaseError;
use crate::gateways::student;
use crate::oplog::OperationLogService;
use crate::service::RegisService;

/// Reject a username or email already held by another student.
async fn ensure_unique(
    conn: &Connection,
    candidate: &Student,
    excluding: Option<i64>,
) -> Result<(), DatabaseError> {
    if student::exists_by_user_name(conn, &candidate.user_name, excluding).await? {
        return Err(
            CoreError::Conflict(format!("Username already taken: {}", candidate.user_name)).into(),
        );
    }
    if student::exists_by_email(conn, &candidate.email, excluding).await? {
        return Err(
            CoreError::Conflict(format!("Email already registered: {}", candidate.email)).into(),
        );
    }
    Ok(())
}

impl RegisService {
    /// Create a student and log the creation.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Conflict` if `student.id` is set or the username or
    /// email is taken.
    pub async fn create_student(
        &self,
        principal: &Principal,
        student: &Student,
    ) -> Result<Student, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.create_student_in(&tx, principal, student).await;
        commit_or_rollback(tx, result).await
    }

    async fn create_student_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        student: &Student,
    ) -> Result<Student, DatabaseError> {
        if student.id.is_some() {
            return Err(CoreError::Conflict(
                "Student ID must be null for new student creation".into(),
            )
            .into());
        }
        ensure_unique(conn, student, None).await?;

        let saved = student::save(conn, student).await?;
        let id = assigned_id(saved.id)?;
        self.oplog(conn)
            .log_creation(
                principal,
                id,
                &saved,
                format!("Created student {} {}", saved.first_name, saved.last_name),
            )
            .await?;
        Ok(saved)
    }

    /// Replace every field of student `id` with `changes` and log the update.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist, or
    /// `CoreError::Conflict` if the new username or email is taken.
    pub async fn update_student(
        &self,
        principal: &Principal,
        id: i64,
        changes: &Student,
    ) -> Result<Student, DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.update_student_in(&tx, principal, id, changes).await;
        commit_or_rollback(tx, result).await
    }

    async fn update_student_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
        changes: &Student,
    ) -> Result<Student, DatabaseError> {
        let existing = student::require(conn, id).await?;
        let before = OperationLogService::copy_of(&existing)?;

        let updated = Student {
            id: Some(id),
            ..changes.clone()
        };
        ensure_unique(conn, &updated, Some(id)).await?;

        let saved = student::save(conn, &updated).await?;
        self.oplog(conn)
            .log_update(
                principal,
                id,
                &before,
                &saved,
                format!("Updated student {}", saved.user_name),
            )
            .await?;
        Ok(saved)
    }

    /// Delete student `id` and log the deletion. Their registrations and
    /// grades go with them.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist.
    pub async fn delete_student(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let tx = self.db().begin().await?;
        let result = self.delete_student_in(&tx, principal, id).await;
        commit_or_rollback(tx, result).await
    }

    async fn delete_student_in(
        &self,
        conn: &Connection,
        principal: &Principal,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let existing = student::require(conn, id).await?;
        student::delete(conn, id).await?;
        self.oplog(conn)
            .log_deletion(
                principal,
                id,
                &existing,
                format!("Deleted student {}", existing.user_name),
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist.
    pub async fn get_student(&self, id: i64) -> Result<Student, DatabaseError> {
        student::require(self.db().conn(), id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students(&self) -> Result<Vec<Student>, DatabaseError> {
        student::list(self.db().conn()).await
    }
}
