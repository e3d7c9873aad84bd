//! ConverterRegistry - strategy storage and hierarchy search.
//!
//! Strategies are indexed by every [`ConvertiblePair`] they declare. Several
//! strategies may share a pair; the most recently added one is consulted
//! first, so re-registering a pair overrides the previous strategy without
//! forgetting it. Strategies declaring no pair at all are kept as *globals*
//! and are consulted only after the pair index found nothing.
//!
//! # Search Order
//!
//! [`ConverterRegistry::find`] tries, in order:
//!
//! 1. the exact `(source, target)` pair
//! 2. every `(source ancestor, target ancestor)` pair, source-major, both
//!    hierarchies most specific first
//! 3. global strategies in insertion order
//!
//! Within one pair the strategies get a strict pass and then a fallback pass
//! (see [`ConverterAdapter::matches_fallback`]).
//!
//! The registry is not synchronized; [`ConverterResolver`](crate::ConverterResolver)
//! wraps it in a lock.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use typeconv_core::{ConvertiblePair, RegistrationError, TypeDescriptor};

use crate::ConverterAdapter;

/// Strategies registered for one pair, newest first.
#[derive(Debug, Default)]
struct PairConverters {
    converters: VecDeque<Arc<ConverterAdapter>>,
}

impl PairConverters {
    fn add(&mut self, adapter: Arc<ConverterAdapter>) {
        self.converters.push_front(adapter);
    }

    fn get(
        &self,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Option<&Arc<ConverterAdapter>> {
        self.converters
            .iter()
            .find(|c| !c.is_conditional() || c.matches(source, target))
            .or_else(|| {
                self.converters
                    .iter()
                    .find(|c| c.matches_fallback(source, target))
            })
    }
}

/// Pair index plus global strategies.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    pairs: FxHashMap<ConvertiblePair, PairConverters>,
    globals: Vec<Arc<ConverterAdapter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under each pair it declares, or as a global.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UnconditionalGlobal`] when the strategy declares no
    /// pairs and has no condition.
    pub fn add(&mut self, adapter: ConverterAdapter) -> Result<(), RegistrationError> {
        match adapter.convertible_types() {
            None => {
                if !adapter.is_conditional() {
                    return Err(RegistrationError::UnconditionalGlobal);
                }
                tracing::debug!(converter = ?adapter, "registered global converter");
                self.globals.push(Arc::new(adapter));
            }
            Some(pairs) => {
                let adapter = Arc::new(adapter);
                for pair in pairs {
                    tracing::debug!(?pair, converter = ?adapter, "registered converter");
                    self.pairs.entry(pair).or_default().add(Arc::clone(&adapter));
                }
            }
        }
        Ok(())
    }

    /// Drop every strategy registered for exactly this pair.
    ///
    /// Returns `true` if anything was removed. Globals are never affected.
    pub fn remove(&mut self, pair: ConvertiblePair) -> bool {
        let removed = self.pairs.remove(&pair).is_some();
        if removed {
            tracing::debug!(?pair, "removed converters");
        }
        removed
    }

    /// Find the strategy for `source -> target`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn find(
        &self,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Option<Arc<ConverterAdapter>> {
        let exact = ConvertiblePair::new(source.type_hash(), target.type_hash());
        if let Some(found) = self.find_for_pair(exact, source, target) {
            return Some(found);
        }

        let target_candidates = target.hierarchy();
        for source_candidate in source.hierarchy() {
            for target_candidate in &target_candidates {
                let pair = ConvertiblePair::new(source_candidate, *target_candidate);
                if pair == exact {
                    continue;
                }
                if let Some(found) = self.find_for_pair(pair, source, target) {
                    return Some(found);
                }
            }
        }

        self.globals
            .iter()
            .find(|g| g.matches(source, target))
            .cloned()
    }

    fn find_for_pair(
        &self,
        pair: ConvertiblePair,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Option<Arc<ConverterAdapter>> {
        let found = self.pairs.get(&pair)?.get(source, target)?;
        tracing::trace!(?pair, converter = ?found, "matched converter");
        Some(Arc::clone(found))
    }

    /// Number of indexed pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Number of global strategies.
    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    /// Is a strategy registered for exactly this pair?
    pub fn contains_pair(&self, pair: ConvertiblePair) -> bool {
        self.pairs.contains_key(&pair)
    }

    /// Nothing registered?
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.globals.is_empty()
    }
}
