//! Grade statistics for students and modules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Module, Student};

/// Score at or above which a module grade counts toward the pass rate.
pub const MODULE_PASS_SCORE: i32 = 60;

/// Mean of `scores`, or `None` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    Some(total as f64 / scores.len() as f64)
}

/// Grade points on a 4.0 scale using common UK bands.
#[must_use]
pub fn gpa_points(score: i32) -> f64 {
    match score {
        70.. => 4.0,
        60..=69 => 3.3,
        50..=59 => 2.7,
        40..=49 => 2.0,
        _ => 0.0,
    }
}

/// Mean grade points across `scores`, or `None` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gpa(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total: f64 = scores.iter().copied().map(gpa_points).sum();
    Some(total / scores.len() as f64)
}

/// Profile and grade summary for one student.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StudentStatistics {
    pub student: Student,
    pub grade_count: u64,
    pub average_score: Option<f64>,
    pub gpa: Option<f64>,
    pub outstanding_tuition: Option<f64>,
}

impl StudentStatistics {
    #[must_use]
    pub fn compute(student: Student, scores: &[i32]) -> Self {
        let outstanding_tuition = student.outstanding_tuition();
        Self {
            student,
            grade_count: scores.len() as u64,
            average_score: average(scores),
            gpa: gpa(scores),
            outstanding_tuition,
        }
    }
}

/// Enrolment and grade summary for one module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModuleStatistics {
    pub module: Module,
    pub registration_count: u64,
    pub total_students: u64,
    /// Share of all students registered on the module.
    pub selection_rate: f64,
    pub total_grades: u64,
    pub passing_grades: u64,
    pub pass_rate: Option<f64>,
    pub average_grade: Option<f64>,
}

impl ModuleStatistics {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(
        module: Module,
        registration_count: u64,
        total_students: u64,
        scores: &[i32],
    ) -> Self {
        let selection_rate = if total_students == 0 {
            0.0
        } else {
            registration_count as f64 / total_students as f64
        };
        let total_grades = scores.len() as u64;
        let passing_grades = scores.iter().filter(|&&s| s >= MODULE_PASS_SCORE).count() as u64;
        let pass_rate = (total_grades > 0).then(|| passing_grades as f64 / total_grades as f64);

        Self {
            module,
            registration_count,
            total_students,
            selection_rate,
            total_grades,
            passing_grades,
            pass_rate,
            average_grade: average(scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 4.0)]
    #[case(70, 4.0)]
    #[case(69, 3.3)]
    #[case(60, 3.3)]
    #[case(59, 2.7)]
    #[case(50, 2.7)]
    #[case(49, 2.0)]
    #[case(40, 2.0)]
    #[case(39, 0.0)]
    #[case(-5, 0.0)]
    fn gpa_bands(#[case] score: i32, #[case] points: f64) {
        assert!((gpa_points(score) - points).abs() < f64::EPSILON);
    }

    #[test]
    fn average_and_gpa_of_empty_are_none() {
        assert_eq!(average(&[]), None);
        assert_eq!(gpa(&[]), None);
    }

    #[test]
    fn average_of_scores() {
        assert_eq!(average(&[70, 80, 90]), Some(80.0));
    }

    #[test]
    fn module_statistics_rates() {
        let stats = ModuleStatistics::compute(Module::default(), 2, 8, &[55, 60, 75, 90]);
        assert!((stats.selection_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(stats.total_grades, 4);
        assert_eq!(stats.passing_grades, 3);
        assert_eq!(stats.pass_rate, Some(0.75));
        assert_eq!(stats.average_grade, Some(70.0));
    }

    #[test]
    fn module_statistics_without_students_or_grades() {
        let stats = ModuleStatistics::compute(Module::default(), 0, 0, &[]);
        assert!(stats.selection_rate.abs() < f64::EPSILON);
        assert_eq!(stats.pass_rate, None);
        assert_eq!(stats.average_grade, None);
    }

    #[test]
    fn student_statistics_outstanding_tuition() {
        let student = Student {
            tuition_fee: Some(9250.0),
            paid_tuition_fee: Some(4000.0),
            ..Student::default()
        };
        let stats = StudentStatistics::compute(student, &[40, 70]);
        assert_eq!(stats.outstanding_tuition, Some(5250.0));
        assert_eq!(stats.average_score, Some(55.0));
        assert_eq!(stats.gpa, Some(3.0));
    }
}
