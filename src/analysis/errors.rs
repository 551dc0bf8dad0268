use std::fmt;

use thiserror::Error;

use crate::bytecode::op_code::OpCode;

/// Raised when a closure body cannot be decoded or replayed structurally.
/// These indicate a malformed body, not bad user input; the recorder never
/// produces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("closure body has no instructions")]
    EmptyBody,
    #[error("unknown opcode {byte:#04x} at offset {offset}")]
    UnknownOpCode { byte: u8, offset: usize },
    #[error("truncated operand for {op} at offset {offset}")]
    TruncatedOperand { op: OpCode, offset: usize },
    #[error("constant {index} is missing or has the wrong kind for {op}")]
    BadConstant { op: OpCode, index: usize },
    #[error("captured slot {slot} is out of range ({available} values captured)")]
    BadCaptureSlot { slot: usize, available: usize },
    #[error("operand stack underflow at instruction {index}")]
    StackUnderflow { index: usize },
}

/// An operand or construction the analyzer cannot model. Always surfaced to
/// callers wrapped in [`AnalysisError::Parse`], so that bad input and
/// internal failures stay distinguishable through the cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedOperand {
    #[error("parameter type {0} is not supported; use bool, i32, i64, f32, f64 or a serializable reference type")]
    NarrowPrimitive(String),
    #[error("{0} two numbers inside a job closure is not supported; compute the result before recording the job")]
    Arithmetic(ArithOp),
    #[error("control flow ({op}) inside a job closure is not supported")]
    ControlFlow { op: OpCode },
    #[error("nested closures are not supported; record the inner call as its own job")]
    NestedClosure,
    #[error("cannot evaluate {class_name}::{method_name} while deriving a job descriptor")]
    UnknownHelper {
        class_name: String,
        method_name: String,
    },
    #[error("no field named {field_name} on the captured {class_name} value")]
    MissingField {
        class_name: String,
        field_name: String,
    },
    #[error("expected a {expected} argument but found {found}")]
    KindMismatch { expected: String, found: String },
    #[error("{method_name} takes {declared} parameters but {supplied} were supplied")]
    ArityMismatch {
        method_name: String,
        declared: usize,
        supplied: usize,
    },
    #[error("the iteration element may only be passed directly as an argument")]
    ElementNotDirect,
    #[error("this closure loads an iteration element; derive it through to_descriptor_stream")]
    ElementOutsideStream,
    #[error("cannot determine the receiver of the recorded call")]
    UnsupportedReceiver,
    #[error("this closure expects an injected target; derive it through to_descriptor_for_target")]
    MissingInjectedTarget,
}

/// The rejected arithmetic operation, spelled the way the message reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ArithOp::Add => "adding",
            ArithOp::Sub => "subtracting",
            ArithOp::Mul => "multiplying",
            ArithOp::Div => "dividing",
        };
        write!(f, "{}", verb)
    }
}

/// Everything analysis can fail with. Every error is raised synchronously,
/// before any descriptor is built, so callers never observe a partially
/// valid descriptor and never persist an unreplayable job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("only one operation is supported per job")]
    MultipleInvocations { found: usize },
    #[error("error parsing closure")]
    Parse {
        #[from]
        cause: UnsupportedOperand,
    },
    #[error("null passed for the {class_name} parameter of a job; refusing to create a job that cannot run")]
    NullArgument { class_name: String },
}
