//! Statistics queries over stored grades and registrations.

use regis_core::errors::CoreError;
use regis_core::stats::{ModuleStatistics, StudentStatistics};

use crate::error::DatabaseError;
use crate::gateways::{grade, module, registration, student};
use crate::service::RegisService;

impl RegisService {
    /// Average score, GPA, and outstanding tuition of one student.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the student does not exist, or
    /// `CoreError::Precondition` if they have no grades.
    pub async fn student_statistics(&self, id: i64) -> Result<StudentStatistics, DatabaseError> {
        let conn = self.db().conn();
        let student = student::require(conn, id).await?;
        let scores = grade::scores_for_student(conn, id).await?;
        if scores.is_empty() {
            return Err(CoreError::Precondition("Student has no grades recorded".into()).into());
        }
        Ok(StudentStatistics::compute(student, &scores))
    }

    /// Enrolment and pass-rate summary of one module.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the module does not exist.
    pub async fn module_statistics(&self, id: i64) -> Result<ModuleStatistics, DatabaseError> {
        let conn = self.db().conn();
        let module = module::require(conn, id).await?;
        let registration_count = registration::count_for_module(conn, id).await?;
        let total_students = student::count(conn).await?;
        let scores = grade::scores_for_module(conn, id).await?;
        Ok(ModuleStatistics::compute(
            module,
            registration_count,
            total_students,
            &scores,
        ))
    }
}
