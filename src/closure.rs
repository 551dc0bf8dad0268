use std::sync::Arc;

use crate::{bytecode::body::ClosureBody, value::JobValue};

/// A capturing call expression, recorded at declaration time. The body is
/// shared and immutable; the captured values belong to this instance.
///
/// Analysis treats the closure as read-only input: it is replayed
/// symbolically, never executed.
#[derive(Debug, Clone)]
pub struct JobClosure {
    body: Arc<ClosureBody>,
    captures: Vec<JobValue>,
}

impl JobClosure {
    pub fn new(body: Arc<ClosureBody>, captures: Vec<JobValue>) -> Self {
        Self { body, captures }
    }

    pub fn body(&self) -> &ClosureBody {
        &self.body
    }

    pub fn captures(&self) -> &[JobValue] {
        &self.captures
    }
}
