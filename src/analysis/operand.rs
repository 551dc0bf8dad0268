use crate::{
    bytecode::constant::{FieldRef, MethodRef},
    value::JobValue,
};

/// Symbolic stand-in for a runtime value while a closure body is replayed.
/// Operands are created and consumed within one analysis pass and never
/// escape the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(JobValue),
    /// The iteration variable of a stream template.
    Element,
    /// The receiver placeholder of an injected-target closure.
    InjectedTarget,
    /// A static field, possibly extended by instance-field segments.
    StaticField { field: FieldRef, path: Vec<String> },
    /// The pending result of an invocation.
    CallResult(RecordedCall),
}

/// An invocation replayed on the symbolic stack: its receiver, method, and
/// argument operands in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub receiver: Option<Box<Operand>>,
    pub method: MethodRef,
    pub args: Vec<Operand>,
}

/// Dotted access path of a static-field chain.
pub fn static_field_path(field: &FieldRef, path: &[String]) -> String {
    let mut joined = field.field_name.clone();
    for segment in path {
        joined.push('.');
        joined.push_str(segment);
    }
    joined
}
