use crate::{
    jobs::{builder::DescriptorBuilder, JobDescriptor, JobParameter},
    value::{is_narrow_type, is_primitive_type, JobValue},
};

use super::{
    errors::{AnalysisError, UnsupportedOperand},
    helper_eval,
    operand::{static_field_path, Operand, RecordedCall},
};

/// Whether the closure under validation is allowed to load the iteration
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementMode {
    /// Single-job derivation; element loads are an error.
    Reject,
    /// Stream derivation; element positions are recorded for later binding.
    Record,
}

/// A recorded call whose receiver and arguments have all been checked. For
/// streams it doubles as the reusable template: element positions stay
/// unbound until [`ValidatedCall::instantiate`] fills them per item.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCall {
    target_class_name: String,
    static_field_name: Option<String>,
    method_name: String,
    parameters: Vec<JobParameter>,
    element_positions: Vec<(usize, String)>,
}

impl ValidatedCall {
    pub fn into_descriptor(self) -> JobDescriptor {
        DescriptorBuilder::new(self.target_class_name, self.method_name)
            .static_field(self.static_field_name)
            .parameters(self.parameters)
            .build()
    }

    /// Binds one iteration element into every recorded element position and
    /// builds the per-item descriptor. The element value goes through the
    /// same argument checks as any other value.
    pub fn instantiate(&self, element: &JobValue) -> Result<JobDescriptor, AnalysisError> {
        let mut parameters = self.parameters.clone();
        for (position, declared) in &self.element_positions {
            let checked = check_argument(declared, element.clone())?;
            parameters[*position].value = checked;
        }
        Ok(
            DescriptorBuilder::new(self.target_class_name.clone(), self.method_name.clone())
                .static_field(self.static_field_name.clone())
                .parameters(parameters)
                .build(),
        )
    }
}

/// Checks the single recorded call against the descriptor model: resolves
/// its receiver to a target class, reduces every argument to a concrete
/// value, and enforces the declared parameter types.
pub fn validate(
    call: RecordedCall,
    mode: ElementMode,
    target: Option<&str>,
) -> Result<ValidatedCall, AnalysisError> {
    let (target_class_name, static_field_name) = resolve_receiver(&call, target)?;

    let declared_types = &call.method.param_types;
    if declared_types.len() != call.args.len() {
        return Err(UnsupportedOperand::ArityMismatch {
            method_name: call.method.method_name.clone(),
            declared: declared_types.len(),
            supplied: call.args.len(),
        }
        .into());
    }

    let mut parameters = Vec::with_capacity(call.args.len());
    let mut element_positions = Vec::new();
    for (position, (declared, operand)) in declared_types.iter().zip(&call.args).enumerate() {
        match operand {
            Operand::Element => match mode {
                ElementMode::Reject => {
                    return Err(UnsupportedOperand::ElementOutsideStream.into());
                }
                ElementMode::Record => {
                    element_positions.push((position, declared.clone()));
                    parameters.push(JobParameter {
                        class_name: declared.clone(),
                        value: JobValue::Null,
                    });
                }
            },
            other => {
                let value = helper_eval::resolve_helper(other)?;
                let checked = check_argument(declared, value)?;
                parameters.push(JobParameter {
                    class_name: declared.clone(),
                    value: checked,
                });
            }
        }
    }

    Ok(ValidatedCall {
        target_class_name,
        static_field_name,
        method_name: call.method.method_name.clone(),
        parameters,
        element_positions,
    })
}

fn resolve_receiver(
    call: &RecordedCall,
    target: Option<&str>,
) -> Result<(String, Option<String>), AnalysisError> {
    let receiver = match &call.receiver {
        None => return Ok((call.method.class_name.clone(), None)),
        Some(receiver) => receiver.as_ref(),
    };
    match receiver {
        Operand::Literal(value) if !value.is_null() => {
            Ok((value.type_name().to_string(), None))
        }
        Operand::StaticField { field, path } => Ok((
            field.class_name.clone(),
            Some(static_field_path(field, path)),
        )),
        Operand::InjectedTarget => match target {
            Some(class_name) => Ok((class_name.to_string(), None)),
            None => Err(UnsupportedOperand::MissingInjectedTarget.into()),
        },
        Operand::CallResult(inner) => {
            let value = helper_eval::eval_call(inner)?;
            Ok((value.type_name().to_string(), None))
        }
        _ => Err(UnsupportedOperand::UnsupportedReceiver.into()),
    }
}

/// Enforces the declared parameter type against a concrete value. Integers
/// widen to `i64` and floats to `f64` when the declaration asks for the
/// wider kind; the narrow kinds are rejected outright.
pub fn check_argument(declared: &str, value: JobValue) -> Result<JobValue, AnalysisError> {
    if is_narrow_type(declared) {
        return Err(UnsupportedOperand::NarrowPrimitive(declared.to_string()).into());
    }
    if matches!(
        value,
        JobValue::Byte(_) | JobValue::Short(_) | JobValue::Char(_)
    ) {
        return Err(UnsupportedOperand::NarrowPrimitive(value.type_name().to_string()).into());
    }
    if value.is_null() {
        if is_primitive_type(declared) {
            return Err(UnsupportedOperand::KindMismatch {
                expected: declared.to_string(),
                found: "null".to_string(),
            }
            .into());
        }
        return Err(AnalysisError::NullArgument {
            class_name: declared.to_string(),
        });
    }

    match declared {
        "bool" => match value {
            JobValue::Bool(_) => Ok(value),
            other => Err(kind_mismatch(declared, &other)),
        },
        "i32" => match value {
            JobValue::Int(_) => Ok(value),
            // Fields projected out of serialized objects carry the wide kind.
            JobValue::Long(wide) => match i32::try_from(wide) {
                Ok(narrowed) => Ok(JobValue::Int(narrowed)),
                Err(_) => Err(kind_mismatch(declared, &JobValue::Long(wide))),
            },
            other => Err(kind_mismatch(declared, &other)),
        },
        "i64" => match value {
            JobValue::Long(_) => Ok(value),
            JobValue::Int(i) => Ok(JobValue::Long(i64::from(i))),
            other => Err(kind_mismatch(declared, &other)),
        },
        "f32" => match value {
            JobValue::Float(_) => Ok(value),
            other => Err(kind_mismatch(declared, &other)),
        },
        "f64" => match value {
            JobValue::Double(_) => Ok(value),
            JobValue::Float(f) => Ok(JobValue::Double(f64::from(f))),
            other => Err(kind_mismatch(declared, &other)),
        },
        // Reference types accept any serializable value; primitives box.
        _ => Ok(value),
    }
}

fn kind_mismatch(declared: &str, found: &JobValue) -> AnalysisError {
    UnsupportedOperand::KindMismatch {
        expected: declared.to_string(),
        found: found.type_name().to_string(),
    }
    .into()
}
