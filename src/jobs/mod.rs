pub mod builder;

use serde::{Deserialize, Serialize};

use crate::value::JobValue;

/// One argument of the recorded call: the declared parameter type and the
/// value to replay it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameter {
    pub class_name: String,
    pub value: JobValue,
}

/// The serializable record of a deferred call: enough to re-invoke the exact
/// operation later, possibly in another process. A returned descriptor is
/// always fully validated; in particular a reference-typed parameter never
/// carries null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub target_class_name: String,
    /// Set when the receiver is reached through a static field rather than a
    /// captured instance.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub static_field_name: Option<String>,
    pub method_name: String,
    pub parameters: Vec<JobParameter>,
}
