use crate::{
    bytecode::{constant::MethodRef, op_code::OpCode, recorder::CallRecorder},
    closure::JobClosure,
    value::JobValue,
};

use super::{
    errors::{AnalysisError, ArithOp, ExtractionError, UnsupportedOperand},
    extract,
    interpreter::{interpret, Interpretation},
    operand::{Operand, RecordedCall},
};

fn replay(closure: &JobClosure) -> Result<Interpretation, AnalysisError> {
    let layout = extract::extract(closure.body())?;
    interpret(&layout, closure.captures())
}

#[test]
fn records_a_static_invocation_with_literal_arguments() {
    let closure = CallRecorder::new()
        .push_value("backup")
        .push_value(3)
        .invoke_static(
            "jobs::Maintenance",
            "run",
            &["alloc::string::String", "i32"],
        )
        .finish().unwrap();

    let outcome = replay(&closure).unwrap();
    assert_eq!(outcome.top_level_invocations, 1);
    assert_eq!(
        outcome.call,
        Some(RecordedCall {
            receiver: None,
            method: MethodRef::new(
                "jobs::Maintenance",
                "run",
                &["alloc::string::String", "i32"],
            ),
            args: vec![
                Operand::Literal(JobValue::from("backup")),
                Operand::Literal(JobValue::from(3)),
            ],
        })
    );
}

#[test]
fn substitutes_captured_values_by_slot() {
    let closure = CallRecorder::new()
        .capture(7i64)
        .capture("nightly")
        .invoke_static(
            "jobs::Maintenance",
            "run",
            &["i64", "alloc::string::String"],
        )
        .finish().unwrap();

    let outcome = replay(&closure).unwrap();
    let call = outcome.call.unwrap();
    assert_eq!(
        call.args,
        vec![
            Operand::Literal(JobValue::Long(7)),
            Operand::Literal(JobValue::from("nightly")),
        ]
    );
}

#[test]
fn instance_invocation_keeps_its_receiver_beneath_the_arguments() {
    let closure = CallRecorder::new()
        .capture(JobValue::Object {
            class_name: "mail::Mailer".to_string(),
            data: serde_json::json!({}),
        })
        .push_value("hello")
        .invoke("mail::Mailer", "send", &["alloc::string::String"])
        .finish().unwrap();

    let call = replay(&closure).unwrap().call.unwrap();
    assert!(matches!(
        call.receiver.as_deref(),
        Some(Operand::Literal(JobValue::Object { .. }))
    ));
    assert_eq!(call.args.len(), 1);
}

#[test]
fn counts_every_statement_position_invocation() {
    let closure = CallRecorder::new()
        .push_value(1)
        .invoke_static("jobs::Maintenance", "run", &["i32"])
        .pop()
        .push_value(2)
        .invoke_static("jobs::Maintenance", "run", &["i32"])
        .finish().unwrap();

    let outcome = replay(&closure).unwrap();
    assert_eq!(outcome.top_level_invocations, 2);
}

#[test]
fn arithmetic_is_rejected_with_the_operation_named() {
    let closure = CallRecorder::new()
        .push_value(1)
        .push_value(2)
        .add()
        .invoke_static("jobs::Maintenance", "run", &["i32"])
        .finish().unwrap();

    assert_eq!(
        replay(&closure),
        Err(AnalysisError::Parse {
            cause: UnsupportedOperand::Arithmetic(ArithOp::Add)
        })
    );
}

#[test]
fn control_flow_is_rejected() {
    let closure = CallRecorder::new()
        .push_value(true)
        .jump_if_false(9)
        .push_value(1)
        .invoke_static("jobs::Maintenance", "run", &["i32"])
        .finish().unwrap();

    assert_eq!(
        replay(&closure),
        Err(AnalysisError::Parse {
            cause: UnsupportedOperand::ControlFlow {
                op: OpCode::OpJumpNotTruthy
            }
        })
    );
}

#[test]
fn nested_closures_are_rejected() {
    let closure = CallRecorder::new().nested_closure().finish().unwrap();
    assert_eq!(
        replay(&closure),
        Err(AnalysisError::Parse {
            cause: UnsupportedOperand::NestedClosure
        })
    );
}

#[test]
fn out_of_range_capture_slot_is_a_structural_error() {
    // Hand-assemble a body that loads a slot the closure never captured.
    let recorded = CallRecorder::new()
        .capture(1)
        .invoke_static("jobs::Maintenance", "run", &["i32"])
        .finish().unwrap();
    let stripped = JobClosure::new(std::sync::Arc::new(recorded.body().clone()), Vec::new());

    assert_eq!(
        replay(&stripped),
        Err(AnalysisError::Extraction(
            ExtractionError::BadCaptureSlot {
                slot: 0,
                available: 0,
            }
        ))
    );
}

#[test]
fn static_field_chains_extend_their_access_path() {
    let closure = CallRecorder::new()
        .get_static("config::Defaults", "STORAGE")
        .get_field("bucket")
        .invoke_static(
            "jobs::Maintenance",
            "run",
            &["alloc::string::String"],
        )
        .finish().unwrap();

    let call = replay(&closure).unwrap().call.unwrap();
    match &call.args[0] {
        Operand::StaticField { field, path } => {
            assert_eq!(field.class_name, "config::Defaults");
            assert_eq!(field.field_name, "STORAGE");
            assert_eq!(path, &["bucket".to_string()]);
        }
        other => panic!("expected a static-field operand, got {:?}", other),
    }
}

#[test]
fn constructed_arguments_fold_into_object_values() {
    let closure = CallRecorder::new()
        .push_value("acme")
        .push_value(250)
        .new_object("billing::Invoice", 2)
        .invoke_static("jobs::Billing", "issue", &["billing::Invoice"])
        .finish().unwrap();

    let call = replay(&closure).unwrap().call.unwrap();
    assert_eq!(
        call.args[0],
        Operand::Literal(JobValue::Object {
            class_name: "billing::Invoice".to_string(),
            data: serde_json::json!(["acme", 250]),
        })
    );
}
