//! Eager evaluation of helper expressions consumed by the recorded call.
//!
//! Only a closed set of pure helpers can be folded into a literal; anything
//! else would need the caller's runtime state and is rejected.

use serde_json::json;

use crate::value::JobValue;

use super::{
    errors::UnsupportedOperand,
    operand::{static_field_path, Operand, RecordedCall},
};

/// Reduces an argument operand to the concrete value it will carry in the
/// descriptor.
pub fn resolve_helper(operand: &Operand) -> Result<JobValue, UnsupportedOperand> {
    match operand {
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Element => Err(UnsupportedOperand::ElementNotDirect),
        Operand::InjectedTarget => Err(UnsupportedOperand::KindMismatch {
            expected: "serializable".to_string(),
            found: "the injected target".to_string(),
        }),
        Operand::StaticField { field, path } => Ok(JobValue::StaticRef {
            class_name: field.class_name.clone(),
            field_name: static_field_path(field, path),
        }),
        Operand::CallResult(call) => eval_call(call),
    }
}

/// Folds a helper invocation. Instance helpers would need a live receiver,
/// so only the known static helpers fold.
pub fn eval_call(call: &RecordedCall) -> Result<JobValue, UnsupportedOperand> {
    if call.receiver.is_some() {
        return Err(UnsupportedOperand::UnknownHelper {
            class_name: call.method.class_name.clone(),
            method_name: call.method.method_name.clone(),
        });
    }
    let args = call
        .args
        .iter()
        .map(resolve_helper)
        .collect::<Result<Vec<_>, _>>()?;
    eval_static(&call.method.class_name, &call.method.method_name, &args)
}

fn eval_static(
    class_name: &str,
    method_name: &str,
    args: &[JobValue],
) -> Result<JobValue, UnsupportedOperand> {
    match (class_name, method_name) {
        ("std::path::PathBuf", "from") => {
            let joined = args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join("/");
            Ok(JobValue::Str(joined))
        }
        ("alloc::string::String", "concat") => {
            let mut joined = String::new();
            for arg in args {
                joined.push_str(&arg.to_string());
            }
            Ok(JobValue::Str(joined))
        }
        _ => Err(UnsupportedOperand::UnknownHelper {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
        }),
    }
}

/// Folds a constructor call into an object value carrying its arguments in
/// declaration order.
pub fn construct(class_name: &str, args: Vec<JobValue>) -> JobValue {
    let data = args.iter().map(JobValue::to_plain_json).collect::<Vec<_>>();
    JobValue::Object {
        class_name: class_name.to_string(),
        data: json!(data),
    }
}

/// Reads a named field out of a captured object value.
pub fn project_field(value: &JobValue, field_name: &str) -> Result<JobValue, UnsupportedOperand> {
    match value {
        JobValue::Object { class_name, data } => match data.get(field_name) {
            Some(field) => Ok(from_plain_json(field)),
            None => Err(UnsupportedOperand::MissingField {
                class_name: class_name.clone(),
                field_name: field_name.to_string(),
            }),
        },
        other => Err(UnsupportedOperand::MissingField {
            class_name: other.type_name().to_string(),
            field_name: field_name.to_string(),
        }),
    }
}

fn from_plain_json(value: &serde_json::Value) -> JobValue {
    match value {
        serde_json::Value::Null => JobValue::Null,
        serde_json::Value::Bool(b) => JobValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => JobValue::Long(i),
            None => JobValue::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => JobValue::Str(s.clone()),
        nested => JobValue::Object {
            class_name: std::any::type_name::<serde_json::Value>().to_string(),
            data: nested.clone(),
        },
    }
}
