use super::{JobDescriptor, JobParameter};

/// Assembles a validated call into a [`JobDescriptor`]. Pure and
/// deterministic; performs no validation of its own.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    target_class_name: String,
    static_field_name: Option<String>,
    method_name: String,
    parameters: Vec<JobParameter>,
}

impl DescriptorBuilder {
    pub fn new(target_class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            target_class_name: target_class_name.into(),
            static_field_name: None,
            method_name: method_name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn static_field(mut self, field_name: Option<String>) -> Self {
        self.static_field_name = field_name;
        self
    }

    pub fn parameter(mut self, parameter: JobParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: Vec<JobParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn build(self) -> JobDescriptor {
        JobDescriptor {
            target_class_name: self.target_class_name,
            static_field_name: self.static_field_name,
            method_name: self.method_name,
            parameters: self.parameters,
        }
    }
}
