//! ConverterResolver - cached, thread-safe strategy lookup.
//!
//! Sits in front of a [`ConverterRegistry`] and memoizes every lookup outcome
//! per [`ConvertiblePair`], including negative ones. Any registration or
//! removal clears the whole cache.
//!
//! # Locking
//!
//! Two `parking_lot` read-write locks, always taken registry first, then cache:
//!
//! - writers hold the registry write lock while mutating and clearing the cache
//! - the miss path holds the registry read lock across `find` and the cache
//!   insert, so an outcome computed before a clear can never be stored after it
//! - cache hits take the cache read lock only
//!
//! On a miss, strategy predicates (`ConditionalConverter::matches`,
//! `ConverterFactory::get_converter`) run while the registry read lock is held.
//! They must not call back into the resolver: `parking_lot` read locks are not
//! recursive, so a re-entrant `resolve` deadlocks once a writer is queued.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use typeconv_core::{ConvertiblePair, RegistrationError, TypeDescriptor};

use crate::{ConverterAdapter, ConverterRegistry};

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub enum ResolvedConverter {
    /// A registered strategy.
    Adapter(Arc<ConverterAdapter>),
    /// No strategy registered, but the source is assignable to the target:
    /// the value is returned unchanged.
    NoOp,
}

impl ResolvedConverter {
    /// Is this the pass-through strategy?
    pub fn is_no_op(&self) -> bool {
        matches!(self, ResolvedConverter::NoOp)
    }
}

/// Memoized lookup outcome.
#[derive(Debug, Clone)]
enum CachedConverter {
    Found(ResolvedConverter),
    NoMatch,
}

impl CachedConverter {
    fn resolved(self) -> Option<ResolvedConverter> {
        match self {
            CachedConverter::Found(resolved) => Some(resolved),
            CachedConverter::NoMatch => None,
        }
    }
}

/// Thread-safe registry plus lookup cache.
#[derive(Debug, Default)]
pub struct ConverterResolver {
    registry: RwLock<ConverterRegistry>,
    cache: RwLock<FxHashMap<ConvertiblePair, CachedConverter>>,
}

impl ConverterResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy and invalidate the cache.
    pub fn add(&self, adapter: ConverterAdapter) -> Result<(), RegistrationError> {
        let mut registry = self.registry.write();
        registry.add(adapter)?;
        self.cache.write().clear();
        Ok(())
    }

    /// Remove the strategies for exactly `pair` and invalidate the cache.
    pub fn remove(&self, pair: ConvertiblePair) -> bool {
        let mut registry = self.registry.write();
        let removed = registry.remove(pair);
        self.cache.write().clear();
        removed
    }

    /// Resolve the strategy for `source -> target`.
    ///
    /// Returns [`ResolvedConverter::NoOp`] when nothing is registered but the
    /// source is assignable to the target, and `None` when neither holds.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(
        &self,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Option<ResolvedConverter> {
        let key = ConvertiblePair::new(source.type_hash(), target.type_hash());

        let cached = self.cache.read().get(&key).cloned();
        if let Some(cached) = cached {
            tracing::trace!(pair = ?key, "converter cache hit");
            return cached.resolved();
        }

        let registry = self.registry.read();
        tracing::trace!(pair = ?key, "converter cache miss");
        let resolved = match registry.find(source, target) {
            Some(adapter) => Some(ResolvedConverter::Adapter(adapter)),
            None if source.is_assignable_to(target) => Some(ResolvedConverter::NoOp),
            None => None,
        };
        let entry = match &resolved {
            Some(resolved) => CachedConverter::Found(resolved.clone()),
            None => CachedConverter::NoMatch,
        };
        self.cache.write().insert(key, entry);
        drop(registry);

        resolved
    }

    /// Number of cached outcomes.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Run `f` against the registry under its read lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&ConverterRegistry) -> R) -> R {
        f(&self.registry.read())
    }
}
