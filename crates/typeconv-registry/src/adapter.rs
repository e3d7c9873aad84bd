//! Uniform wrapper over the three strategy shapes.
//!
//! The registry stores every strategy as an [`ConverterAdapter`] so lookups can
//! ask one question ("do you apply to `(source, target)`?") regardless of how
//! the strategy was written.
//!
//! ## Matching
//!
//! | shape     | strict match                                         | fallback match                          |
//! |-----------|------------------------------------------------------|-----------------------------------------|
//! | `Simple`  | target equals the declared target, then condition    | target's raw template is the declared (template) target, then condition |
//! | `Factory` | factory condition, then a converter exists for the target, then its condition | a converter exists for the target |
//! | `Generic` | condition, or always when unconditional              | never                                   |

use std::fmt;

use typeconv_core::{BoxError, ConvertiblePair, TypeDescriptor, Value};

use crate::{Converter, ConverterFactory, GenericConverter};

/// A registered strategy.
pub enum ConverterAdapter {
    /// A single-pair [`Converter`].
    Simple {
        /// Declared `(source, target)`.
        pair: ConvertiblePair,
        /// The wrapped converter.
        converter: Box<dyn Converter>,
    },
    /// A [`ConverterFactory`] for a target family.
    Factory {
        /// Declared `(source, target family)`.
        pair: ConvertiblePair,
        /// The wrapped factory.
        factory: Box<dyn ConverterFactory>,
    },
    /// A [`GenericConverter`].
    Generic(Box<dyn GenericConverter>),
}

impl ConverterAdapter {
    /// Wrap a single-pair converter.
    pub fn simple(pair: ConvertiblePair, converter: impl Converter + 'static) -> Self {
        ConverterAdapter::Simple {
            pair,
            converter: Box::new(converter),
        }
    }

    /// Wrap a factory.
    pub fn factory(pair: ConvertiblePair, factory: impl ConverterFactory + 'static) -> Self {
        ConverterAdapter::Factory {
            pair,
            factory: Box::new(factory),
        }
    }

    /// Wrap a generic converter.
    pub fn generic(converter: impl GenericConverter + 'static) -> Self {
        ConverterAdapter::Generic(Box::new(converter))
    }

    /// Pairs this adapter is indexed under; `None` for globals.
    pub fn convertible_types(&self) -> Option<Vec<ConvertiblePair>> {
        match self {
            ConverterAdapter::Simple { pair, .. } | ConverterAdapter::Factory { pair, .. } => {
                Some(vec![*pair])
            }
            ConverterAdapter::Generic(converter) => converter.convertible_types(),
        }
    }

    /// Does this adapter need a `matches` check before use?
    ///
    /// Simple and factory adapters always do, since the target they are
    /// indexed under may be an ancestor of the requested target.
    pub fn is_conditional(&self) -> bool {
        match self {
            ConverterAdapter::Simple { .. } | ConverterAdapter::Factory { .. } => true,
            ConverterAdapter::Generic(converter) => converter.as_conditional().is_some(),
        }
    }

    /// Strict applicability check.
    pub fn matches(&self, source: &TypeDescriptor<'_>, target: &TypeDescriptor<'_>) -> bool {
        match self {
            ConverterAdapter::Simple { pair, converter } => {
                pair.target() == target.type_hash()
                    && converter
                        .as_conditional()
                        .is_none_or(|c| c.matches(source, target))
            }
            ConverterAdapter::Factory { factory, .. } => {
                if let Some(condition) = factory.as_conditional()
                    && !condition.matches(source, target)
                {
                    return false;
                }
                match factory.get_converter(target) {
                    Some(converter) => converter
                        .as_conditional()
                        .is_none_or(|c| c.matches(source, target)),
                    None => false,
                }
            }
            ConverterAdapter::Generic(converter) => converter
                .as_conditional()
                .is_none_or(|c| c.matches(source, target)),
        }
    }

    /// Relaxed check used after no strict match was found for a pair.
    pub fn matches_fallback(
        &self,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> bool {
        match self {
            ConverterAdapter::Simple { pair, converter } => {
                let declared_is_template = target
                    .universe()
                    .get(pair.target())
                    .is_some_and(|e| e.is_template());
                declared_is_template
                    && target.raw_type() == pair.target()
                    && converter
                        .as_conditional()
                        .is_none_or(|c| c.matches(source, target))
            }
            ConverterAdapter::Factory { factory, .. } => factory.get_converter(target).is_some(),
            ConverterAdapter::Generic(_) => false,
        }
    }

    /// Does this adapter accept a null source?
    ///
    /// Only generic converters see nulls; for the other shapes the service
    /// applies its null policy instead.
    pub fn handles_null_source(&self) -> bool {
        matches!(self, ConverterAdapter::Generic(_))
    }

    /// Run the strategy.
    ///
    /// Simple and factory adapters return `Ok(None)` for a null source.
    pub fn convert(
        &self,
        value: Option<&Value>,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Result<Option<Value>, BoxError> {
        match self {
            ConverterAdapter::Simple { converter, .. } => match value {
                Some(value) => converter.convert(value),
                None => Ok(None),
            },
            ConverterAdapter::Factory { pair, factory } => {
                let Some(value) = value else {
                    return Ok(None);
                };
                let converter = factory.get_converter(target).ok_or_else(|| {
                    format!(
                        "factory for {} has no converter for target [{}]",
                        pair.describe(target.universe()),
                        target.name()
                    )
                })?;
                converter.convert(value)
            }
            ConverterAdapter::Generic(converter) => converter.convert(value, source, target),
        }
    }
}

impl fmt::Debug for ConverterAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterAdapter::Simple { pair, .. } => f.debug_tuple("Simple").field(pair).finish(),
            ConverterAdapter::Factory { pair, .. } => f.debug_tuple("Factory").field(pair).finish(),
            ConverterAdapter::Generic(converter) => f
                .debug_struct("Generic")
                .field("convertible_types", &converter.convertible_types())
                .field("conditional", &converter.as_conditional().is_some())
                .finish(),
        }
    }
}
