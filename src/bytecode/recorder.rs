use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::{
    bytecode::{
        body::ClosureBody,
        constant::{Constant, FieldRef, MethodRef},
        op_code::{make, Instructions, OpCode},
    },
    closure::JobClosure,
    value::JobValue,
};

/// A recording that cannot be encoded: some slot or pool index exceeds its
/// operand width. Reported by [`CallRecorder::finish`]; the first overflow
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("a closure cannot capture more than 256 values")]
    TooManyCaptures,
    #[error("a closure body cannot hold more than 65536 constants")]
    ConstantPoolFull,
    #[error("an object cannot be constructed from more than 255 arguments")]
    TooManyConstructorArgs,
}

/// Records one call expression as a branch-free instruction stream, at the
/// point of declaration. This is the structural replacement for inspecting a
/// compiled closure body: the caller spells out `target.method(args)` one
/// operation at a time and gets back an analyzable [`JobClosure`].
///
/// The recorder is the only producer of closure bodies in this crate, but
/// analysis never assumes that: bodies are re-validated as untrusted input.
#[derive(Debug, Default)]
pub struct CallRecorder {
    instructions: Instructions,
    constants: Vec<Constant>,
    captures: Vec<JobValue>,
    error: Option<RecordError>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, op: OpCode, operands: &[usize]) {
        let instruction = make(op, operands);
        self.instructions.extend_from_slice(&instruction);
    }

    fn add_constant(&mut self, constant: Constant) -> usize {
        self.constants.push(constant);
        let index = self.constants.len() - 1;
        if index > u16::MAX as usize {
            self.fail(RecordError::ConstantPoolFull);
        }
        index
    }

    fn fail(&mut self, error: RecordError) {
        self.error.get_or_insert(error);
    }

    /// Push a literal argument value.
    pub fn push_value(mut self, value: impl Into<JobValue>) -> Self {
        match value.into() {
            JobValue::Bool(true) => self.emit(OpCode::OpTrue, &[]),
            JobValue::Bool(false) => self.emit(OpCode::OpFalse, &[]),
            JobValue::Null => self.emit(OpCode::OpNull, &[]),
            value => {
                let index = self.add_constant(Constant::Value(value));
                self.emit(OpCode::OpConst, &[index]);
            }
        }
        self
    }

    /// Capture an outer variable; its current value is stored in the closure.
    pub fn capture(mut self, value: impl Into<JobValue>) -> Self {
        let slot = self.captures.len();
        if slot > u8::MAX as usize {
            self.fail(RecordError::TooManyCaptures);
        }
        self.captures.push(value.into());
        self.emit(OpCode::OpGetCaptured, &[slot]);
        self
    }

    /// Capture the receiver instance the call is made on.
    pub fn capture_receiver<T: Serialize>(self, receiver: &T) -> serde_json::Result<Self> {
        let value = JobValue::object(receiver)?;
        Ok(self.capture(value))
    }

    /// Placeholder for the per-element value substituted by the stream adapter.
    pub fn element(mut self) -> Self {
        self.emit(OpCode::OpGetElement, &[]);
        self
    }

    /// Placeholder for a receiver resolved by an external locator at run time.
    pub fn injected_target(mut self) -> Self {
        self.emit(OpCode::OpGetTarget, &[]);
        self
    }

    /// Read a static field of `class_name`.
    pub fn get_static(mut self, class_name: &str, field_name: &str) -> Self {
        let index = self.add_constant(Constant::Field(FieldRef::new(class_name, field_name)));
        self.emit(OpCode::OpGetStatic, &[index]);
        self
    }

    /// Access a field of the operand on top of the stack.
    pub fn get_field(mut self, field_name: &str) -> Self {
        let index = self.add_constant(Constant::Name(field_name.to_string()));
        self.emit(OpCode::OpGetField, &[index]);
        self
    }

    /// Construct an argument object from the top `arg_count` operands.
    pub fn new_object(mut self, class_name: &str, arg_count: usize) -> Self {
        if arg_count > u8::MAX as usize {
            self.fail(RecordError::TooManyConstructorArgs);
        }
        let index = self.add_constant(Constant::Name(class_name.to_string()));
        self.emit(OpCode::OpNew, &[index, arg_count]);
        self
    }

    /// Record an instance-method invocation; pops one argument per declared
    /// parameter type, and the receiver beneath them.
    pub fn invoke(mut self, class_name: &str, method_name: &str, param_types: &[&str]) -> Self {
        let index =
            self.add_constant(Constant::Method(MethodRef::new(class_name, method_name, param_types)));
        self.emit(OpCode::OpInvoke, &[index]);
        self
    }

    /// Record a static-method invocation.
    pub fn invoke_static(
        mut self,
        class_name: &str,
        method_name: &str,
        param_types: &[&str],
    ) -> Self {
        let index =
            self.add_constant(Constant::Method(MethodRef::new(class_name, method_name, param_types)));
        self.emit(OpCode::OpInvokeStatic, &[index]);
        self
    }

    /// Statement boundary: discards the value on top of the stack.
    pub fn pop(mut self) -> Self {
        self.emit(OpCode::OpPop, &[]);
        self
    }

    // Arithmetic and control flow are recorded verbatim; analysis rejects
    // them with pointed messages rather than attempting partial support.

    pub fn add(mut self) -> Self {
        self.emit(OpCode::OpAdd, &[]);
        self
    }

    pub fn sub(mut self) -> Self {
        self.emit(OpCode::OpSub, &[]);
        self
    }

    pub fn mul(mut self) -> Self {
        self.emit(OpCode::OpMul, &[]);
        self
    }

    pub fn div(mut self) -> Self {
        self.emit(OpCode::OpDiv, &[]);
        self
    }

    pub fn jump(mut self, target: usize) -> Self {
        self.emit(OpCode::OpJump, &[target]);
        self
    }

    pub fn jump_if_false(mut self, target: usize) -> Self {
        self.emit(OpCode::OpJumpNotTruthy, &[target]);
        self
    }

    /// A nested closure body; analysis rejects it.
    pub fn nested_closure(mut self) -> Self {
        self.emit(OpCode::OpClosure, &[0, 0]);
        self
    }

    /// Finish recording, appending the implicit return. A recording that
    /// overflowed an operand width is refused here, never truncated.
    pub fn finish(mut self) -> Result<JobClosure, RecordError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.emit(OpCode::OpReturn, &[]);
        Ok(JobClosure::new(
            Arc::new(ClosureBody {
                instructions: self.instructions,
                constants: self.constants,
            }),
            self.captures,
        ))
    }
}
