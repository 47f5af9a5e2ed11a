//! Module-registration eligibility rules.
//!
//! A pure evaluator: the caller resolves the prerequisite module and the
//! student's score on it, supplies the current calendar year, and gets back
//! either `Ok(())` or the first rule that failed. Rules run in order:
//!
//! 1. Year gate: the student's year of study (`max(1, current - entry + 1)`)
//!    must reach the module's required year. A missing entry year cannot be
//!    evaluated and is rejected.
//! 2. Prerequisite: the student must hold a grade of at least [`PASS_MARK`]
//!    on the module's prerequisite.

use thiserror::Error;

use crate::entities::{Module, Student};

/// Lowest passing score, inclusive.
pub const PASS_MARK: i32 = 40;

/// Why a student may not register for a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligible {
    #[error("Student entry year is missing for year validation")]
    MissingEntryYear,

    #[error("Student year {student_year} is below required year {required_year}")]
    YearBelowRequired {
        student_year: i32,
        required_year: i32,
    },

    #[error("Student must complete prerequisite module {code} with a passing grade")]
    PrerequisiteNotMet { code: String },
}

/// The prerequisite side of a check, as resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite<'a> {
    pub module: &'a Module,
    /// The student's recorded score on `module`, if any.
    pub score: Option<i32>,
}

/// Year of study for a student who entered in `entry_year`. Never below 1.
#[must_use]
pub fn student_year(entry_year: i32, current_year: i32) -> i32 {
    current_year
        .saturating_sub(entry_year)
        .saturating_add(1)
        .max(1)
}

/// Decide whether `student` may register for `module`.
///
/// `prerequisite` must describe `module.prerequisite_id` when one is
/// declared. A declared prerequisite with nothing resolved is treated as not
/// met.
///
/// # Errors
///
/// Returns the first failed rule as an [`Ineligible`].
pub fn evaluate(
    student: &Student,
    module: &Module,
    prerequisite: Option<&Prerequisite<'_>>,
    current_year: i32,
) -> Result<(), Ineligible> {
    if let Some(required_year) = module.required_year {
        let entry_year = student.entry_year.ok_or(Ineligible::MissingEntryYear)?;
        let year = student_year(entry_year, current_year);
        if year < required_year {
            return Err(Ineligible::YearBelowRequired {
                student_year: year,
                required_year,
            });
        }
    }

    if let Some(prerequisite_id) = module.prerequisite_id {
        let Some(prerequisite) = prerequisite else {
            return Err(Ineligible::PrerequisiteNotMet {
                code: prerequisite_id.to_string(),
            });
        };
        if !prerequisite.score.is_some_and(|score| score >= PASS_MARK) {
            return Err(Ineligible::PrerequisiteNotMet {
                code: prerequisite.module.code.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const YEAR: i32 = 2026;

    fn student(entry_year: Option<i32>) -> Student {
        Student {
            id: Some(1),
            user_name: "jdoe".into(),
            entry_year,
            ..Student::default()
        }
    }

    fn module(required_year: Option<i32>, prerequisite_id: Option<i64>) -> Module {
        Module {
            id: Some(2),
            code: "COMP0020".into(),
            name: "Advanced Topics".into(),
            department: "CS".into(),
            required_year,
            prerequisite_id,
            ..Module::default()
        }
    }

    fn prereq_module() -> Module {
        Module {
            id: Some(9),
            code: "COMP0010".into(),
            name: "Foundations".into(),
            department: "CS".into(),
            ..Module::default()
        }
    }

    #[rstest]
    #[case(2026, 1)]
    #[case(2025, 2)]
    #[case(2023, 4)]
    #[case(2030, 1)]
    #[case(i32::MAX, 1)]
    #[case(i32::MIN, i32::MAX)]
    fn student_year_is_clamped(#[case] entry: i32, #[case] expected: i32) {
        assert_eq!(student_year(entry, YEAR), expected);
    }

    #[test]
    fn second_year_meets_year_two_requirement() {
        let result = evaluate(&student(Some(YEAR - 1)), &module(Some(2), None), None, YEAR);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn second_year_below_year_three_requirement() {
        let err = evaluate(&student(Some(YEAR - 1)), &module(Some(3), None), None, YEAR)
            .unwrap_err();
        assert_eq!(
            err,
            Ineligible::YearBelowRequired {
                student_year: 2,
                required_year: 3
            }
        );
        assert_eq!(err.to_string(), "Student year 2 is below required year 3");
    }

    #[test]
    fn missing_entry_year_rejected_only_when_year_gated() {
        assert_eq!(
            evaluate(&student(None), &module(Some(1), None), None, YEAR),
            Err(Ineligible::MissingEntryYear)
        );
        assert_eq!(evaluate(&student(None), &module(None, None), None, YEAR), Ok(()));
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(0), false)]
    #[case(Some(35), false)]
    #[case(Some(39), false)]
    #[case(Some(40), true)]
    #[case(Some(85), true)]
    fn prerequisite_pass_mark_is_inclusive(#[case] score: Option<i32>, #[case] ok: bool) {
        let prereq = prereq_module();
        let resolved = Prerequisite {
            module: &prereq,
            score,
        };
        let result = evaluate(&student(Some(YEAR)), &module(None, Some(9)), Some(&resolved), YEAR);
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn failed_prerequisite_names_module_code() {
        let prereq = prereq_module();
        let resolved = Prerequisite {
            module: &prereq,
            score: Some(35),
        };
        let err = evaluate(&student(Some(YEAR)), &module(None, Some(9)), Some(&resolved), YEAR)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Student must complete prerequisite module COMP0010 with a passing grade"
        );
    }

    #[test]
    fn unresolved_prerequisite_is_not_met() {
        let err = evaluate(&student(Some(YEAR)), &module(None, Some(9)), None, YEAR).unwrap_err();
        assert!(matches!(err, Ineligible::PrerequisiteNotMet { .. }));
    }

    #[test]
    fn year_gate_checked_before_prerequisite() {
        let err = evaluate(&student(Some(YEAR)), &module(Some(2), Some(9)), None, YEAR)
            .unwrap_err();
        assert!(matches!(err, Ineligible::YearBelowRequired { .. }));
    }
}
