//! Shared test utilities for regis-db tests.

pub(crate) mod helpers {
    use chrono::{Datelike, Utc};
    use regis_core::entities::{Module, Student};

    use crate::RegisDb;
    use crate::service::RegisService;

    /// Open an in-memory database with migrations applied.
    pub async fn test_db() -> RegisDb {
        RegisDb::open_local(":memory:").await.unwrap()
    }

    /// Create an in-memory `RegisService` on the system clock.
    pub async fn test_service() -> RegisService {
        RegisService::from_db(test_db().await)
    }

    /// An unsaved student whose email derives from `user_name`.
    pub fn sample_student(user_name: &str) -> Student {
        Student {
            id: None,
            first_name: "Test".into(),
            last_name: user_name.to_uppercase(),
            user_name: user_name.into(),
            email: format!("{user_name}@example.ac.uk"),
            entry_year: Some(Utc::now().year()),
            ..Student::default()
        }
    }

    /// An unsaved module with no year or prerequisite requirement.
    pub fn sample_module(code: &str) -> Module {
        Module {
            id: None,
            code: code.into(),
            name: format!("Module {code}"),
            mnc: false,
            department: "Computer Science".into(),
            required_year: None,
            prerequisite_id: None,
        }
    }

    /// Raw row count of a table.
    pub async fn count_rows(db: &RegisDb, table: &str) -> i64 {
        let mut rows = db
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }
}
