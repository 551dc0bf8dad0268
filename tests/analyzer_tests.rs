use recall::analysis::{JobAnalyzer, TypeToken};
use recall::bytecode::recorder::CallRecorder;
use recall::value::JobValue;
use serde::Serialize;

#[derive(Serialize)]
struct Mailer {
    smtp_host: String,
}

#[test]
fn static_invocation_targets_the_declaring_class() {
    let closure = CallRecorder::new()
        .push_value("backup")
        .push_value(3)
        .invoke_static(
            "jobs::Maintenance",
            "run",
            &["alloc::string::String", "i32"],
        )
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.target_class_name, "jobs::Maintenance");
    assert_eq!(descriptor.static_field_name, None);
    assert_eq!(descriptor.method_name, "run");
    assert_eq!(descriptor.parameters.len(), 2);
    assert_eq!(descriptor.parameters[0].class_name, "alloc::string::String");
    assert_eq!(descriptor.parameters[0].value, JobValue::from("backup"));
    assert_eq!(descriptor.parameters[1].class_name, "i32");
    assert_eq!(descriptor.parameters[1].value, JobValue::from(3));
}

#[test]
fn captured_receiver_targets_its_concrete_type() {
    let mailer = Mailer {
        smtp_host: "mail.example.com".to_string(),
    };
    let closure = CallRecorder::new()
        .capture_receiver(&mailer)
        .unwrap()
        .push_value("welcome")
        .invoke("mail::Mailer", "send", &["alloc::string::String"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(
        descriptor.target_class_name,
        std::any::type_name::<Mailer>()
    );
    assert_eq!(descriptor.static_field_name, None);
    assert_eq!(descriptor.method_name, "send");
}

#[test]
fn static_field_receiver_is_recorded_by_name() {
    let closure = CallRecorder::new()
        .get_static("io::Console", "STDOUT")
        .push_value("hello world")
        .invoke("io::Console", "println", &["alloc::string::String"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.target_class_name, "io::Console");
    assert_eq!(descriptor.static_field_name, Some("STDOUT".to_string()));
    assert_eq!(descriptor.method_name, "println");
}

#[test]
fn static_field_chain_joins_segments_with_dots() {
    let closure = CallRecorder::new()
        .get_static("config::Defaults", "STORAGE")
        .get_field("bucket")
        .push_value(true)
        .invoke("storage::Bucket", "purge", &["bool"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.target_class_name, "config::Defaults");
    assert_eq!(
        descriptor.static_field_name,
        Some("STORAGE.bucket".to_string())
    );
}

#[test]
fn injected_target_resolves_through_the_supplied_token() {
    let closure = CallRecorder::new()
        .injected_target()
        .push_value(42i64)
        .invoke("billing::InvoiceService", "settle", &["i64"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new()
        .to_descriptor_for_target(&closure, &TypeToken::from("billing::InvoiceService"))
        .unwrap();
    assert_eq!(descriptor.target_class_name, "billing::InvoiceService");
    assert_eq!(descriptor.static_field_name, None);
    assert_eq!(descriptor.parameters[0].value, JobValue::Long(42));
}

#[test]
fn integers_widen_to_long_when_declared_wider() {
    let closure = CallRecorder::new()
        .push_value(3)
        .invoke_static("jobs::Maintenance", "sleep", &["i64"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.parameters[0].class_name, "i64");
    assert_eq!(descriptor.parameters[0].value, JobValue::Long(3));
}

#[test]
fn floats_widen_to_double_when_declared_wider() {
    let closure = CallRecorder::new()
        .push_value(2.5f32)
        .invoke_static("jobs::Maintenance", "throttle", &["f64"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.parameters[0].value, JobValue::Double(2.5));
}

#[test]
fn path_helper_folds_into_the_joined_path() {
    let closure = CallRecorder::new()
        .push_value("/var/reports")
        .capture("2026-08.csv")
        .invoke_static(
            "std::path::PathBuf",
            "from",
            &["alloc::string::String", "alloc::string::String"],
        )
        .invoke_static("jobs::Export", "upload", &["alloc::string::String"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(
        descriptor.parameters[0].value,
        JobValue::from("/var/reports/2026-08.csv")
    );
}

#[test]
fn concat_helper_folds_mixed_literals_and_captures() {
    let closure = CallRecorder::new()
        .push_value("tenant-")
        .capture(17)
        .invoke_static(
            "alloc::string::String",
            "concat",
            &["alloc::string::String", "i32"],
        )
        .invoke_static("jobs::Export", "upload", &["alloc::string::String"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.parameters[0].value, JobValue::from("tenant-17"));
}

#[test]
fn constructed_argument_carries_its_fields_in_order() {
    let closure = CallRecorder::new()
        .push_value("acme")
        .push_value(250)
        .new_object("billing::Invoice", 2)
        .invoke_static("jobs::Billing", "issue", &["billing::Invoice"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(
        descriptor.parameters[0].value,
        JobValue::Object {
            class_name: "billing::Invoice".to_string(),
            data: serde_json::json!(["acme", 250]),
        }
    );
}

#[test]
fn projected_integer_fields_narrow_to_a_declared_i32() {
    let closure = CallRecorder::new()
        .capture(JobValue::Object {
            class_name: "billing::Invoice".to_string(),
            data: serde_json::json!({ "id": 42 }),
        })
        .get_field("id")
        .invoke_static("jobs::Billing", "notify", &["i32"])
        .finish()
        .unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(descriptor.parameters[0].class_name, "i32");
    assert_eq!(descriptor.parameters[0].value, JobValue::Int(42));
}

#[test]
fn static_field_argument_becomes_a_deferred_reference() {
    let closure = CallRecorder::new()
        .get_static("jobs::Context", "NONE")
        .invoke_static("jobs::Maintenance", "run", &["jobs::Context"])
        .finish().unwrap();

    let descriptor = JobAnalyzer::new().to_descriptor(&closure).unwrap();
    assert_eq!(
        descriptor.parameters[0].value,
        JobValue::StaticRef {
            class_name: "jobs::Context".to_string(),
            field_name: "NONE".to_string(),
        }
    );
}

#[test]
fn capture_values_do_not_change_the_closure_shape() {
    let analyzer = JobAnalyzer::new();
    for run in 0..5 {
        let closure = CallRecorder::new()
            .capture(run)
            .invoke_static("jobs::Maintenance", "run", &["i32"])
            .finish().unwrap();
        let descriptor = analyzer.to_descriptor(&closure).unwrap();
        assert_eq!(descriptor.parameters[0].value, JobValue::Int(run));
    }
    assert_eq!(analyzer.cache().len(), 1);
}
