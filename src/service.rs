//! The conversion service: registration, capability queries and conversion.
//!
//! # Example
//!
//! ```
//! use typeconv::ConversionService;
//! use typeconv_core::{Value, builtins};
//!
//! let service = ConversionService::builder().with_defaults().build().unwrap();
//!
//! let out = service.convert(Some(Value::new(String::from("42"))), builtins::INT32).unwrap();
//! assert_eq!(out.unwrap().downcast::<i32>().unwrap(), 42);
//!
//! let err = service.convert(Some(Value::new(String::from("abc"))), builtins::INT32).unwrap_err();
//! assert!(err.is_conversion_failed());
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use typeconv_core::{
    BoxError, ConversionError, ConvertiblePair, NullToPrimitiveError, Reflect, RegistrationError,
    TypeDescriptor, TypeHash, TypeUniverse, Value,
};
use typeconv_registry::{
    Converter, ConverterAdapter, ConverterFactory, ConverterResolver, FnConverter,
    GenericConverter, ResolvedConverter,
};

use crate::defaults;
use crate::null_handler::{EmptyOptionalHandler, NullHandler, NullStaysNull};

/// Cause attached when a strategy returned a value of the wrong Rust type
/// for [`ConversionService::convert_into`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("converter produced a value of type [{actual}] where [{expected}] was requested")]
pub struct UnexpectedResultType {
    /// Requested type name.
    pub expected: &'static str,
    /// Type name of the produced value.
    pub actual: String,
}

/// Registry of conversion strategies plus the policy for applying them.
///
/// All methods take `&self`; the service can be shared across threads behind
/// an `Arc` while converters are added or removed.
pub struct ConversionService {
    universe: Arc<TypeUniverse>,
    resolver: ConverterResolver,
    /// User handlers first, then the built-in fallbacks.
    null_handlers: Vec<Box<dyn NullHandler>>,
}

impl ConversionService {
    /// Create a service over `universe` with no converters registered.
    pub fn new(universe: impl Into<Arc<TypeUniverse>>) -> Self {
        Self::with_null_handlers(universe.into(), Vec::new())
    }

    /// Start building a service.
    pub fn builder() -> ConversionServiceBuilder {
        ConversionServiceBuilder::default()
    }

    fn with_null_handlers(
        universe: Arc<TypeUniverse>,
        mut null_handlers: Vec<Box<dyn NullHandler>>,
    ) -> Self {
        null_handlers.push(Box::new(EmptyOptionalHandler));
        null_handlers.push(Box::new(NullStaysNull));
        Self {
            universe,
            resolver: ConverterResolver::new(),
            null_handlers,
        }
    }

    /// The type universe this service converts within.
    pub fn universe(&self) -> &Arc<TypeUniverse> {
        &self.universe
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a typed conversion function for `S -> T`.
    pub fn add_converter<S, T, E, F>(&self, f: F) -> Result<(), RegistrationError>
    where
        S: Reflect,
        T: Reflect,
        E: Into<BoxError> + 'static,
        F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
    {
        let pair = ConvertiblePair::new(S::type_hash(), T::type_hash());
        self.resolver
            .add(ConverterAdapter::simple(pair, FnConverter::new(f)))
    }

    /// Register a converter for an explicit `source -> target` pair.
    pub fn add_converter_for(
        &self,
        source: TypeHash,
        target: TypeHash,
        converter: impl Converter + 'static,
    ) -> Result<(), RegistrationError> {
        let pair = ConvertiblePair::new(source, target);
        self.resolver.add(ConverterAdapter::simple(pair, converter))
    }

    /// Register a factory for `source -> target family`.
    pub fn add_converter_factory(
        &self,
        source: TypeHash,
        target: TypeHash,
        factory: impl ConverterFactory + 'static,
    ) -> Result<(), RegistrationError> {
        let pair = ConvertiblePair::new(source, target);
        self.resolver.add(ConverterAdapter::factory(pair, factory))
    }

    /// Register a generic converter.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UnconditionalGlobal`] when it declares no pairs and
    /// is not conditional.
    pub fn add_generic_converter(
        &self,
        converter: impl GenericConverter + 'static,
    ) -> Result<(), RegistrationError> {
        self.resolver.add(ConverterAdapter::generic(converter))
    }

    /// Remove every converter registered for exactly `source -> target`.
    pub fn remove_convertible(&self, source: TypeHash, target: TypeHash) -> bool {
        self.resolver.remove(ConvertiblePair::new(source, target))
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Can values of `source` be converted to `target`?
    ///
    /// An absent source (a null value) is always convertible. Unregistered
    /// types are not.
    pub fn can_convert(&self, source: Option<TypeHash>, target: TypeHash) -> bool {
        let Some(source) = source else {
            return true;
        };
        match (self.universe.descriptor(source), self.universe.descriptor(target)) {
            (Some(source), Some(target)) => self.resolver.resolve(&source, &target).is_some(),
            _ => false,
        }
    }

    /// Would converting `source` to `target` hand back the value unchanged?
    pub fn can_bypass_convert(&self, source: Option<TypeHash>, target: TypeHash) -> bool {
        let Some(source) = source else {
            return true;
        };
        match (self.universe.descriptor(source), self.universe.descriptor(target)) {
            (Some(source), Some(target)) => self
                .resolver
                .resolve(&source, &target)
                .is_some_and(|r| r.is_no_op()),
            _ => false,
        }
    }

    // ==========================================================================
    // Conversion
    // ==========================================================================

    /// Convert `value` to `target`, taking the source type from the value.
    pub fn convert(
        &self,
        value: Option<Value>,
        target: TypeHash,
    ) -> Result<Option<Value>, ConversionError> {
        let source = value.as_ref().map(Value::type_hash);
        self.convert_to(value, target, source)
    }

    /// Convert `value` to the Rust type `T`.
    pub fn convert_into<T: Reflect>(&self, value: Option<Value>) -> Result<Option<T>, ConversionError> {
        let source_type = value
            .as_ref()
            .map(|v| self.universe.name_of(v.type_hash()));
        let rendered = render(value.as_ref());

        let Some(converted) = self.convert(value, T::type_hash())? else {
            return Ok(None);
        };
        converted.downcast::<T>().map(Some).map_err(|other| {
            let actual = self.universe.name_of(other.type_hash());
            ConversionError::failed(
                source_type,
                T::type_name(),
                rendered,
                UnexpectedResultType {
                    expected: T::type_name(),
                    actual,
                },
            )
        })
    }

    /// Convert `value`, declared as `source`, to `target`.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::MissingSourceType`] for a non-null value without
    ///   a source type
    /// - [`ConversionError::SourceTypeMismatch`] when the value is not an
    ///   instance of `source`
    /// - [`ConversionError::UnknownType`] for unregistered types
    /// - [`ConversionError::ConversionFailed`] when the strategy fails, or a
    ///   null result meets a primitive target
    /// - [`ConversionError::ConverterNotFound`] when nothing applies
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert_to(
        &self,
        value: Option<Value>,
        target: TypeHash,
        source: Option<TypeHash>,
    ) -> Result<Option<Value>, ConversionError> {
        let target = self.descriptor(target)?;

        let Some(source) = source else {
            if let Some(value) = value {
                return Err(ConversionError::MissingSourceType {
                    value: format!("{value:?}"),
                });
            }
            let result = self.convert_null(None, &target);
            return self.handle_result(None, &target, result);
        };
        let source = self.descriptor(source)?;

        if let Some(value) = &value
            && !source.is_instance(value)
        {
            return Err(ConversionError::SourceTypeMismatch {
                source_type: source.name().to_owned(),
                value: format!("{value:?}"),
            });
        }

        match self.resolver.resolve(&source, &target) {
            Some(ResolvedConverter::NoOp) => self.handle_result(Some(&source), &target, value),
            Some(ResolvedConverter::Adapter(adapter)) => {
                if value.is_none() && !adapter.handles_null_source() {
                    let result = self.convert_null(Some(&source), &target);
                    return self.handle_result(Some(&source), &target, result);
                }
                let result = adapter
                    .convert(value.as_ref(), &source, &target)
                    .map_err(|cause| wrap_failure(&source, &target, value.as_ref(), cause))?;
                self.handle_result(Some(&source), &target, result)
            }
            None => self.handle_converter_not_found(value, &source, &target),
        }
    }

    fn handle_converter_not_found(
        &self,
        value: Option<Value>,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Result<Option<Value>, ConversionError> {
        let Some(value) = value else {
            let result = self.convert_null(Some(source), target);
            return self.handle_result(Some(source), target, result);
        };
        if target.is_assignable_from(source) && target.is_instance(&value) {
            return Ok(Some(value));
        }
        tracing::debug!(source = source.name(), target = target.name(), "no converter found");
        Err(ConversionError::not_found(source.name(), target.name()))
    }

    fn handle_result(
        &self,
        source: Option<&TypeDescriptor<'_>>,
        target: &TypeDescriptor<'_>,
        result: Option<Value>,
    ) -> Result<Option<Value>, ConversionError> {
        if result.is_none() && target.is_primitive() {
            return Err(ConversionError::failed(
                source.map(|s| s.name().to_owned()),
                target.name(),
                "null",
                NullToPrimitiveError {
                    target_type: target.name().to_owned(),
                },
            ));
        }
        Ok(result)
    }

    fn convert_null(
        &self,
        source: Option<&TypeDescriptor<'_>>,
        target: &TypeDescriptor<'_>,
    ) -> Option<Value> {
        self.null_handlers
            .iter()
            .find(|h| h.matches(source, target))
            .and_then(|h| h.convert_null(source, target))
    }

    fn descriptor(&self, hash: TypeHash) -> Result<TypeDescriptor<'_>, ConversionError> {
        self.universe
            .descriptor(hash)
            .ok_or(ConversionError::UnknownType { type_hash: hash })
    }

    /// Number of cached lookup outcomes.
    pub fn cached_converters(&self) -> usize {
        self.resolver.cached_len()
    }
}

impl fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pairs, globals) = self
            .resolver
            .with_registry(|r| (r.pair_count(), r.global_count()));
        f.debug_struct("ConversionService")
            .field("universe", &self.universe)
            .field("pairs", &pairs)
            .field("globals", &globals)
            .field("cached", &self.resolver.cached_len())
            .finish()
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => String::from("null"),
    }
}

/// Wrap a strategy error, passing through failures the strategy already
/// reported as [`ConversionError::ConversionFailed`].
fn wrap_failure(
    source: &TypeDescriptor<'_>,
    target: &TypeDescriptor<'_>,
    value: Option<&Value>,
    cause: BoxError,
) -> ConversionError {
    match cause.downcast::<ConversionError>() {
        Ok(err) if err.is_conversion_failed() => *err,
        Ok(err) => ConversionError::failed(
            Some(source.name().to_owned()),
            target.name(),
            render(value),
            *err,
        ),
        Err(cause) => ConversionError::failed(
            Some(source.name().to_owned()),
            target.name(),
            render(value),
            cause,
        ),
    }
}

/// Builder for [`ConversionService`].
#[derive(Default)]
pub struct ConversionServiceBuilder {
    universe: Option<Arc<TypeUniverse>>,
    defaults: bool,
    null_handlers: Vec<Box<dyn NullHandler>>,
}

impl ConversionServiceBuilder {
    /// Use this universe. Defaults to [`TypeUniverse::with_builtins`].
    pub fn universe(mut self, universe: impl Into<Arc<TypeUniverse>>) -> Self {
        self.universe = Some(universe.into());
        self
    }

    /// Register the default converter set (see [`defaults`]).
    pub fn with_defaults(mut self) -> Self {
        self.defaults = true;
        self
    }

    /// Add a null handler, consulted before the built-in ones in the order
    /// handlers were added.
    pub fn null_handler(mut self, handler: impl NullHandler + 'static) -> Self {
        self.null_handlers.push(Box::new(handler));
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<ConversionService, RegistrationError> {
        let universe = self
            .universe
            .unwrap_or_else(|| Arc::new(TypeUniverse::with_builtins()));
        let service = ConversionService::with_null_handlers(universe, self.null_handlers);
        if self.defaults {
            defaults::register_defaults(&service)?;
        }
        Ok(service)
    }
}

impl fmt::Debug for ConversionServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionServiceBuilder")
            .field("universe", &self.universe)
            .field("defaults", &self.defaults)
            .field("null_handlers", &self.null_handlers.len())
            .finish()
    }
}
