//! Turns a recorded job closure into a serializable job descriptor.
//!
//! Derivation is a fixed pipeline: the closure body is decoded into an
//! instruction layout (cached by shape), replayed over a symbolic stack, and
//! the single recorded invocation is validated and assembled. Every failure
//! is reported before a descriptor exists, so nothing unreplayable is ever
//! handed to storage.

pub mod errors;
pub mod extract;
pub mod helper_eval;
pub mod interpreter;
pub mod layout_cache;
pub mod operand;
pub mod validate;

#[cfg(test)]
mod interpreter_test;

use std::sync::Arc;

use crate::{closure::JobClosure, jobs::JobDescriptor, value::JobValue};

use errors::AnalysisError;
use layout_cache::LayoutCache;
use validate::{ElementMode, ValidatedCall};

/// Names the type a deferred call will be dispatched on when the closure was
/// recorded against an injected target rather than a captured receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeToken(String);

impl TypeToken {
    pub fn of<T>() -> Self {
        TypeToken(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeToken {
    fn from(name: &str) -> Self {
        TypeToken(name.to_string())
    }
}

impl From<String> for TypeToken {
    fn from(name: String) -> Self {
        TypeToken(name)
    }
}

/// Derives job descriptors from recorded closures. Cheap to clone; clones
/// share one layout cache.
#[derive(Debug, Clone, Default)]
pub struct JobAnalyzer {
    cache: Arc<LayoutCache>,
}

impl JobAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an analyzer over an externally shared cache.
    pub fn with_cache(cache: Arc<LayoutCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Derives the descriptor for a closure that captures its own receiver
    /// (or calls a static operation).
    pub fn to_descriptor(&self, closure: &JobClosure) -> Result<JobDescriptor, AnalysisError> {
        self.analyze(closure, None, ElementMode::Reject)
            .map(ValidatedCall::into_descriptor)
    }

    /// Derives the descriptor for a closure recorded against an injected
    /// target, dispatched on `target` at execution time.
    pub fn to_descriptor_for_target(
        &self,
        closure: &JobClosure,
        target: &TypeToken,
    ) -> Result<JobDescriptor, AnalysisError> {
        self.analyze(closure, Some(target.as_str()), ElementMode::Reject)
            .map(ValidatedCall::into_descriptor)
    }

    /// Derives one descriptor per item. The closure is analyzed once up
    /// front; items are bound lazily as the iterator is driven, so a bad
    /// element fails its own descriptor without touching the rest.
    pub fn to_descriptor_stream<I, T>(
        &self,
        closure: &JobClosure,
        items: I,
    ) -> Result<impl Iterator<Item = Result<JobDescriptor, AnalysisError>>, AnalysisError>
    where
        I: IntoIterator<Item = T>,
        T: Into<JobValue>,
    {
        let validated = self.analyze(closure, None, ElementMode::Record)?;
        Ok(items
            .into_iter()
            .map(move |item| validated.instantiate(&item.into())))
    }

    /// Stream derivation for an injected-target closure.
    pub fn to_descriptor_stream_for_target<I, T>(
        &self,
        closure: &JobClosure,
        target: &TypeToken,
        items: I,
    ) -> Result<impl Iterator<Item = Result<JobDescriptor, AnalysisError>>, AnalysisError>
    where
        I: IntoIterator<Item = T>,
        T: Into<JobValue>,
    {
        let validated = self.analyze(closure, Some(target.as_str()), ElementMode::Record)?;
        Ok(items
            .into_iter()
            .map(move |item| validated.instantiate(&item.into())))
    }

    fn analyze(
        &self,
        closure: &JobClosure,
        target: Option<&str>,
        mode: ElementMode,
    ) -> Result<ValidatedCall, AnalysisError> {
        let layout = self.cache.get_or_extract(closure.body())?;
        let outcome = interpreter::interpret(&layout, closure.captures())?;

        if outcome.top_level_invocations != 1 {
            return Err(AnalysisError::MultipleInvocations {
                found: outcome.top_level_invocations,
            });
        }
        let call = match outcome.call {
            Some(call) => call,
            None => {
                return Err(AnalysisError::MultipleInvocations { found: 0 });
            }
        };

        tracing::debug!(
            class = %call.method.class_name,
            method = %call.method.method_name,
            args = call.args.len(),
            "derived job call"
        );
        validate::validate(call, mode, target)
    }
}
