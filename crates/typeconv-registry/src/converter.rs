//! Strategy traits implemented by converter authors.
//!
//! Three shapes are accepted by the registry:
//!
//! - [`Converter`] - one fixed `(source, target)` pair, registered explicitly
//! - [`ConverterFactory`] - one declared pair whose target is a family
//!   (`enum`, `number`, ...); hands out a concrete [`Converter`] per exact target
//! - [`GenericConverter`] - declares its own pairs, or none at all when it is
//!   conditional, and sees the full source/target descriptors
//!
//! Any of them may narrow its applicability further by returning a
//! [`ConditionalConverter`] from `as_conditional`.
//!
//! # Example
//!
//! ```
//! use typeconv_core::{BoxError, Value};
//! use typeconv_registry::{Converter, FnConverter};
//!
//! // Untyped: any closure over `&Value`.
//! let shout = |value: &Value| -> Result<Option<Value>, BoxError> {
//!     let text = value.downcast_ref::<String>().ok_or("not a string")?;
//!     Ok(Some(Value::new(text.to_uppercase())))
//! };
//! let out = shout.convert(&Value::new(String::from("hi"))).unwrap().unwrap();
//! assert_eq!(out.downcast::<String>().unwrap(), "HI");
//!
//! // Typed: the source is downcast for you.
//! let parse = FnConverter::new(|s: &String| s.parse::<i32>());
//! let out = parse.convert(&Value::new(String::from("42"))).unwrap().unwrap();
//! assert_eq!(out.downcast::<i32>().unwrap(), 42);
//! ```

use std::marker::PhantomData;

use thiserror::Error;
use typeconv_core::{BoxError, ConvertiblePair, Reflect, TypeDescriptor, TypeHash, Value};

/// Extra applicability check on top of a strategy's declared pairs.
pub trait ConditionalConverter: Send + Sync {
    /// Should the strategy be used for this `(source, target)`?
    fn matches(&self, source: &TypeDescriptor<'_>, target: &TypeDescriptor<'_>) -> bool;
}

/// A single-pair converter over non-null values.
pub trait Converter: Send + Sync {
    /// Convert a non-null source value.
    ///
    /// Returning `Ok(None)` produces a null result.
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError>;

    /// Optional applicability condition.
    fn as_conditional(&self) -> Option<&dyn ConditionalConverter> {
        None
    }
}

impl<F> Converter for F
where
    F: Fn(&Value) -> Result<Option<Value>, BoxError> + Send + Sync,
{
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        (self)(value)
    }
}

/// Produces converters for the exact target within a target family.
pub trait ConverterFactory: Send + Sync {
    /// Get a converter producing values of exactly `target`.
    ///
    /// `None` means the factory cannot serve this target.
    fn get_converter(&self, target: &TypeDescriptor<'_>) -> Option<Box<dyn Converter>>;

    /// Optional applicability condition.
    fn as_conditional(&self) -> Option<&dyn ConditionalConverter> {
        None
    }
}

/// A self-describing converter that sees full type descriptors.
pub trait GenericConverter: Send + Sync {
    /// Pairs this converter handles.
    ///
    /// `None` registers it as a global converter; that is only allowed when
    /// `as_conditional` returns a condition.
    fn convertible_types(&self) -> Option<Vec<ConvertiblePair>>;

    /// Convert `value` (possibly null) from `source` to `target`.
    fn convert(
        &self,
        value: Option<&Value>,
        source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Result<Option<Value>, BoxError>;

    /// Optional applicability condition.
    fn as_conditional(&self) -> Option<&dyn ConditionalConverter> {
        None
    }
}

/// Raised by [`FnConverter`] when the source value is not of its Rust input type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a value of type [{expected}], found a value of type {actual}")]
pub struct SourceValueMismatch {
    /// Expected source type name.
    pub expected: &'static str,
    /// Runtime type hash of the value received.
    pub actual: TypeHash,
}

/// Typed [`Converter`] built from a `Fn(&S) -> Result<T, E>` closure.
pub struct FnConverter<S, T, E, F> {
    f: F,
    _marker: PhantomData<fn(&S) -> Result<T, E>>,
}

impl<S, T, E, F> FnConverter<S, T, E, F>
where
    S: Reflect,
    T: Reflect,
    E: Into<BoxError>,
    F: Fn(&S) -> Result<T, E> + Send + Sync,
{
    /// Wrap a typed conversion function.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }

    /// The pair this converter declares: `(S, T)`.
    pub fn pair() -> ConvertiblePair {
        ConvertiblePair::new(S::type_hash(), T::type_hash())
    }
}

impl<S, T, E, F> Converter for FnConverter<S, T, E, F>
where
    S: Reflect,
    T: Reflect,
    E: Into<BoxError>,
    F: Fn(&S) -> Result<T, E> + Send + Sync,
{
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let source = value.downcast_ref::<S>().ok_or_else(|| SourceValueMismatch {
            expected: S::type_name(),
            actual: value.type_hash(),
        })?;
        let converted = (self.f)(source).map_err(Into::into)?;
        Ok(Some(Value::new(converted)))
    }
}
