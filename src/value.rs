use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A runtime value carried by a job parameter or captured by a closure.
///
/// The narrow kinds (`Byte`, `Short`, `Char`) are representable so that the
/// validator can reject them with a precise cause instead of a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JobValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Byte(i8),
    Short(i16),
    Char(char),
    /// A captured struct, carried as its serialized form.
    Object {
        class_name: String,
        data: serde_json::Value,
    },
    /// A static-field value passed as an argument; resolved at execution time.
    StaticRef {
        class_name: String,
        field_name: String,
    },
}

impl JobValue {
    /// Capture a struct argument by serializing it.
    pub fn object<T: Serialize>(value: &T) -> serde_json::Result<JobValue> {
        Ok(JobValue::Object {
            class_name: std::any::type_name::<T>().to_string(),
            data: serde_json::to_value(value)?,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JobValue::Null)
    }

    /// The fully qualified name of this value's type.
    pub fn type_name(&self) -> &str {
        match self {
            JobValue::Null => "null",
            JobValue::Bool(_) => "bool",
            JobValue::Int(_) => "i32",
            JobValue::Long(_) => "i64",
            JobValue::Float(_) => "f32",
            JobValue::Double(_) => "f64",
            JobValue::Str(_) => "alloc::string::String",
            JobValue::Byte(_) => "i8",
            JobValue::Short(_) => "i16",
            JobValue::Char(_) => "char",
            JobValue::Object { class_name, .. } => class_name,
            JobValue::StaticRef { class_name, .. } => class_name,
        }
    }

    /// The untagged JSON form, used for constructed-object data.
    pub fn to_plain_json(&self) -> serde_json::Value {
        match self {
            JobValue::Null => serde_json::Value::Null,
            JobValue::Bool(b) => json!(b),
            JobValue::Int(i) => json!(i),
            JobValue::Long(l) => json!(l),
            JobValue::Float(f) => json!(f),
            JobValue::Double(d) => json!(d),
            JobValue::Str(s) => json!(s),
            JobValue::Byte(b) => json!(b),
            JobValue::Short(s) => json!(s),
            JobValue::Char(c) => json!(c),
            JobValue::Object { data, .. } => data.clone(),
            JobValue::StaticRef {
                class_name,
                field_name,
            } => json!({ "class_name": class_name, "field_name": field_name }),
        }
    }
}

impl fmt::Display for JobValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobValue::Null => write!(f, "null"),
            JobValue::Bool(b) => write!(f, "{}", b),
            JobValue::Int(i) => write!(f, "{}", i),
            JobValue::Long(l) => write!(f, "{}", l),
            JobValue::Float(v) => write!(f, "{}", v),
            JobValue::Double(v) => write!(f, "{}", v),
            JobValue::Str(s) => write!(f, "{}", s),
            JobValue::Byte(b) => write!(f, "{}", b),
            JobValue::Short(s) => write!(f, "{}", s),
            JobValue::Char(c) => write!(f, "{}", c),
            JobValue::Object { data, .. } => write!(f, "{}", data),
            JobValue::StaticRef {
                class_name,
                field_name,
            } => write!(f, "{}::{}", class_name, field_name),
        }
    }
}

impl From<bool> for JobValue {
    fn from(value: bool) -> Self {
        JobValue::Bool(value)
    }
}

impl From<i32> for JobValue {
    fn from(value: i32) -> Self {
        JobValue::Int(value)
    }
}

impl From<i64> for JobValue {
    fn from(value: i64) -> Self {
        JobValue::Long(value)
    }
}

impl From<f32> for JobValue {
    fn from(value: f32) -> Self {
        JobValue::Float(value)
    }
}

impl From<f64> for JobValue {
    fn from(value: f64) -> Self {
        JobValue::Double(value)
    }
}

impl From<i8> for JobValue {
    fn from(value: i8) -> Self {
        JobValue::Byte(value)
    }
}

impl From<i16> for JobValue {
    fn from(value: i16) -> Self {
        JobValue::Short(value)
    }
}

impl From<char> for JobValue {
    fn from(value: char) -> Self {
        JobValue::Char(value)
    }
}

impl From<&str> for JobValue {
    fn from(value: &str) -> Self {
        JobValue::Str(value.to_string())
    }
}

impl From<String> for JobValue {
    fn from(value: String) -> Self {
        JobValue::Str(value)
    }
}

/// Primitive kinds pass by value; everything else is a reference type.
pub fn is_primitive_type(name: &str) -> bool {
    matches!(
        name,
        "bool" | "i8" | "i16" | "i32" | "i64" | "f32" | "f64" | "char"
    )
}

/// The narrow primitive kinds the analyzer does not model.
pub fn is_narrow_type(name: &str) -> bool {
    matches!(name, "i8" | "i16" | "char")
}
