//! Codec roundtrip and JsonSchema validation tests for every snapshot shape.

use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use regis_core::entities::*;
use regis_core::enums::*;
use regis_core::snapshot::{self, GradeSnapshot, RegistrationSnapshot};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Codec roundtrip
            let text = snapshot::encode(&val).unwrap();
            let recovered: $ty = snapshot::decode(&text).unwrap();
            assert_eq!(
                recovered,
                val,
                "codec roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    student_full_roundtrip,
    Student,
    Student {
        id: Some(12),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        user_name: "ghopper".into(),
        email: "grace.hopper@example.ac.uk".into(),
        entry_year: Some(2024),
        graduate_year: Some(2027),
        major: Some("Computer Science".into()),
        tuition_fee: Some(9250.5),
        paid_tuition_fee: Some(1200.25),
        birth_date: NaiveDate::from_ymd_opt(2005, 12, 9),
        home_student: Some(true),
        sex: Some("F".into()),
    }
);

roundtrip_and_validate!(
    student_sparse_roundtrip,
    Student,
    Student {
        id: Some(3),
        first_name: "Alan".into(),
        last_name: "Turing".into(),
        user_name: "aturing".into(),
        email: "alan@example.ac.uk".into(),
        ..Student::default()
    }
);

roundtrip_and_validate!(
    module_roundtrip,
    Module,
    Module {
        id: Some(5),
        code: "COMP0010".into(),
        name: "Software Engineering".into(),
        mnc: true,
        department: "Computer Science".into(),
        required_year: Some(2),
        prerequisite_id: Some(4),
    }
);

roundtrip_and_validate!(
    registration_snapshot_roundtrip,
    RegistrationSnapshot,
    RegistrationSnapshot {
        id: 21,
        student_id: 12,
        module_id: 5,
    }
);

roundtrip_and_validate!(
    grade_snapshot_roundtrip,
    GradeSnapshot,
    GradeSnapshot {
        id: 33,
        student_id: 12,
        module_id: 5,
        score: 72,
    }
);

#[test]
fn operation_log_serializes_kinds_symbolically() {
    let log = OperationLog {
        id: 1,
        operation_type: OperationType::Revert,
        entity_type: EntityType::Registration,
        entity_id: 21,
        timestamp: Utc::now(),
        username: "anonymous".into(),
        description: "Reverted: Registered ghopper to COMP0010".into(),
        previous_state: None,
        new_state: Some(r#"{"id":21,"student_id":12,"module_id":5}"#.into()),
        reverted_log_id: Some(1),
    };
    let json = serde_json::to_value(&log).unwrap();
    assert_eq!(json["operation_type"], "REVERT");
    assert_eq!(json["entity_type"], "REGISTRATION");

    let back: OperationLog = serde_json::from_value(json).unwrap();
    assert_eq!(back, log);
}

#[test]
fn schema_for_every_entity_kind_is_an_object() {
    for kind in EntityType::ALL {
        let schema = serde_json::to_value(snapshot::schema_for(kind)).unwrap();
        assert_eq!(schema["type"], "object", "schema for {kind}");
    }
}
