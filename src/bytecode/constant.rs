use crate::value::JobValue;

/// One entry in a closure body's constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// A literal value pushed by `OpConst`.
    Value(JobValue),
    /// A bare name: the class of `OpNew`, or the field of `OpGetField`.
    Name(String),
    /// A static-field reference for `OpGetStatic`.
    Field(FieldRef),
    /// An invoked operation for `OpInvoke`/`OpInvokeStatic`.
    Method(MethodRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub class_name: String,
    pub field_name: String,
}

impl FieldRef {
    pub fn new(class_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            field_name: field_name.into(),
        }
    }
}

/// The analog of a method descriptor: the declared parameter type names are
/// where each job parameter's declared class name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub class_name: String,
    pub method_name: String,
    pub param_types: Vec<String>,
}

impl MethodRef {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        param_types: &[&str],
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            param_types: param_types.iter().map(|t| t.to_string()).collect(),
        }
    }
}
