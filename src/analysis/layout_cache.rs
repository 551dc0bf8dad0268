use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use sha2::{Digest, Sha256};

use crate::bytecode::{body::ClosureBody, constant::Constant};

use super::{
    errors::ExtractionError,
    extract::{extract, InstructionLayout},
};

/// Structural identity of a closure body.
pub type ShapeKey = [u8; 32];

/// Shared cache of decoded instruction layouts, keyed by closure shape, so
/// repeated analysis of the same call site skips decoding.
///
/// Population is safe under concurrent first access: the entry API locks only
/// the shard owning the missing key, so contention on one key never blocks
/// unrelated keys and a shape is decoded at most once per race winner. The
/// cache is sized by distinct call sites and never evicts.
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: DashMap<ShapeKey, Arc<InstructionLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn get_or_extract(
        &self,
        body: &ClosureBody,
    ) -> Result<Arc<InstructionLayout>, ExtractionError> {
        let key = shape_key(body);
        if let Some(layout) = self.layouts.get(&key) {
            tracing::trace!(shape = %short_hex(&key), "layout cache hit");
            return Ok(layout.clone());
        }

        match self.layouts.entry(key) {
            Entry::Occupied(occupied) => Ok(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                tracing::trace!(shape = %short_hex(&key), "layout cache miss");
                let layout = Arc::new(extract(body)?);
                vacant.insert(layout.clone());
                Ok(layout)
            }
        }
    }
}

/// Hashes the instruction bytes and a canonical encoding of the constant
/// pool. Captured values are not part of a closure's shape.
pub fn shape_key(body: &ClosureBody) -> ShapeKey {
    let mut hasher = Sha256::new();
    hasher.update(&body.instructions);
    for constant in &body.constants {
        hash_constant(&mut hasher, constant);
    }
    hasher.finalize().into()
}

fn hash_constant(hasher: &mut Sha256, constant: &Constant) {
    match constant {
        Constant::Value(value) => {
            hasher.update([0u8]);
            hasher.update(format!("{:?}", value));
        }
        Constant::Name(name) => {
            hasher.update([1u8]);
            hasher.update(name);
        }
        Constant::Field(field) => {
            hasher.update([2u8]);
            hasher.update(&field.class_name);
            hasher.update([0u8]);
            hasher.update(&field.field_name);
        }
        Constant::Method(method) => {
            hasher.update([3u8]);
            hasher.update(&method.class_name);
            hasher.update([0u8]);
            hasher.update(&method.method_name);
            for param_type in &method.param_types {
                hasher.update([0u8]);
                hasher.update(param_type);
            }
        }
    }
}

fn short_hex(key: &ShapeKey) -> String {
    key[..4].iter().map(|b| format!("{:02x}", b)).collect()
}
