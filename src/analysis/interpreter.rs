use crate::value::JobValue;

use super::{
    errors::{AnalysisError, ExtractionError, UnsupportedOperand},
    extract::{Instruction, InstructionLayout},
    helper_eval,
    operand::{Operand, RecordedCall},
};

/// Outcome of replaying a closure body over the symbolic stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    /// The first invocation left at statement position.
    pub call: Option<RecordedCall>,
    /// How many invocations were left at statement position in total.
    pub top_level_invocations: usize,
}

/// Replays the instruction layout over a stack of symbolic operands,
/// substituting the closure's captured values. Bodies are linear by
/// construction, so replay is a single forward pass; anything the descriptor
/// model cannot express is rejected here rather than carried forward.
pub fn interpret(
    layout: &InstructionLayout,
    captures: &[JobValue],
) -> Result<Interpretation, AnalysisError> {
    let mut stack: Vec<Operand> = Vec::new();
    let mut result = Interpretation {
        call: None,
        top_level_invocations: 0,
    };

    for (index, instruction) in layout.instructions.iter().enumerate() {
        match instruction {
            Instruction::Const(value) => stack.push(Operand::Literal(value.clone())),
            Instruction::GetCaptured(slot) => {
                let value =
                    captures
                        .get(*slot)
                        .ok_or_else(|| ExtractionError::BadCaptureSlot {
                            slot: *slot,
                            available: captures.len(),
                        })?;
                stack.push(Operand::Literal(value.clone()));
            }
            Instruction::GetElement => stack.push(Operand::Element),
            Instruction::GetTarget => stack.push(Operand::InjectedTarget),
            Instruction::GetStatic(field) => stack.push(Operand::StaticField {
                field: field.clone(),
                path: Vec::new(),
            }),
            Instruction::GetField(field_name) => {
                let receiver = pop(&mut stack, index)?;
                stack.push(access_field(receiver, field_name)?);
            }
            Instruction::New {
                class_name,
                arg_count,
            } => {
                let args = pop_args(&mut stack, *arg_count, index)?;
                let values = args
                    .iter()
                    .map(helper_eval::resolve_helper)
                    .collect::<Result<Vec<_>, _>>()?;
                stack.push(Operand::Literal(helper_eval::construct(
                    class_name, values,
                )));
            }
            Instruction::Invoke(method) => {
                let args = pop_args(&mut stack, method.param_types.len(), index)?;
                let receiver = pop(&mut stack, index)?;
                stack.push(Operand::CallResult(RecordedCall {
                    receiver: Some(Box::new(receiver)),
                    method: method.clone(),
                    args,
                }));
            }
            Instruction::InvokeStatic(method) => {
                let args = pop_args(&mut stack, method.param_types.len(), index)?;
                stack.push(Operand::CallResult(RecordedCall {
                    receiver: None,
                    method: method.clone(),
                    args,
                }));
            }
            Instruction::Pop => {
                if let Operand::CallResult(call) = pop(&mut stack, index)? {
                    finalize(&mut result, call);
                }
            }
            Instruction::Return => {
                if let Some(Operand::CallResult(call)) = stack.pop() {
                    finalize(&mut result, call);
                }
            }
            Instruction::Arith(op) => {
                return Err(UnsupportedOperand::Arithmetic(*op).into());
            }
            Instruction::Jump(op) => {
                return Err(UnsupportedOperand::ControlFlow { op: *op }.into());
            }
            Instruction::NestedClosure => {
                return Err(UnsupportedOperand::NestedClosure.into());
            }
        }
    }

    Ok(result)
}

fn finalize(result: &mut Interpretation, call: RecordedCall) {
    result.top_level_invocations += 1;
    if result.call.is_none() {
        result.call = Some(call);
    }
}

fn pop(stack: &mut Vec<Operand>, index: usize) -> Result<Operand, AnalysisError> {
    stack
        .pop()
        .ok_or_else(|| ExtractionError::StackUnderflow { index }.into())
}

/// Pops `count` operands and restores their source order.
fn pop_args(
    stack: &mut Vec<Operand>,
    count: usize,
    index: usize,
) -> Result<Vec<Operand>, AnalysisError> {
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        args.push(pop(stack, index)?);
    }
    args.reverse();
    Ok(args)
}

fn access_field(receiver: Operand, field_name: &str) -> Result<Operand, AnalysisError> {
    match receiver {
        Operand::StaticField { field, mut path } => {
            path.push(field_name.to_string());
            Ok(Operand::StaticField { field, path })
        }
        Operand::Literal(value) => Ok(Operand::Literal(helper_eval::project_field(
            &value, field_name,
        )?)),
        Operand::CallResult(call) => {
            let value = helper_eval::eval_call(&call)?;
            Ok(Operand::Literal(helper_eval::project_field(
                &value, field_name,
            )?))
        }
        Operand::Element => Err(UnsupportedOperand::ElementNotDirect.into()),
        Operand::InjectedTarget => Err(UnsupportedOperand::UnsupportedReceiver.into()),
    }
}
