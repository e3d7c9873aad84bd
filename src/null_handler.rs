//! Null-source policy.
//!
//! When a null value reaches a converter that does not accept nulls, or no
//! converter at all, the service asks its handlers in order: user handlers
//! first, then [`EmptyOptionalHandler`], then [`NullStaysNull`]. The first
//! handler whose `matches` returns `true` decides the result.

use typeconv_core::{Optional, TypeDescriptor, Value, builtins};

/// Decides what a null source becomes for a given target.
pub trait NullHandler: Send + Sync {
    /// Does this handler apply to a null declared as `source` (if any)
    /// headed for `target`?
    fn matches(&self, source: Option<&TypeDescriptor<'_>>, target: &TypeDescriptor<'_>) -> bool;

    /// Result for a null source. `None` keeps it null.
    fn convert_null(
        &self,
        source: Option<&TypeDescriptor<'_>>,
        target: &TypeDescriptor<'_>,
    ) -> Option<Value>;
}

/// Null to an `optional` target yields an empty [`Optional`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOptionalHandler;

impl NullHandler for EmptyOptionalHandler {
    fn matches(&self, _: Option<&TypeDescriptor<'_>>, target: &TypeDescriptor<'_>) -> bool {
        target.raw_type() == builtins::OPTIONAL
    }

    fn convert_null(
        &self,
        _: Option<&TypeDescriptor<'_>>,
        target: &TypeDescriptor<'_>,
    ) -> Option<Value> {
        Some(Value::with_type(target.type_hash(), Optional::empty()))
    }
}

/// Catch-all: null stays null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStaysNull;

impl NullHandler for NullStaysNull {
    fn matches(&self, _: Option<&TypeDescriptor<'_>>, _: &TypeDescriptor<'_>) -> bool {
        true
    }

    fn convert_null(&self, _: Option<&TypeDescriptor<'_>>, _: &TypeDescriptor<'_>) -> Option<Value> {
        None
    }
}
