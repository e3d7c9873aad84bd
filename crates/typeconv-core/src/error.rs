//! Error types for the conversion engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ConversionError          - raised by conversion calls
//! ├── ConversionFailed     - a strategy ran and failed (or null hit a primitive)
//! ├── ConverterNotFound    - nothing registered and no bypass applicable
//! ├── MissingSourceType    - usage: non-null value without a source type
//! ├── SourceTypeMismatch   - usage: value is not an instance of the source type
//! └── UnknownType          - usage: type hash not present in the universe
//!
//! RegistrationError        - raised while configuring types or converters
//! ├── UnconditionalGlobal
//! └── DuplicateType
//! ```
//!
//! Usage errors are programmer bugs: callers are expected to recover from
//! `ConverterNotFound` or `ConversionFailed` only.

use thiserror::Error;

use crate::TypeHash;

/// Boxed error returned by conversion strategies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by conversion calls.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A strategy was invoked and failed, or a null result met a primitive target.
    #[error(
        "failed to convert from type [{}] to type [{target_type}] for value [{value}]: {cause}",
        .source_type.as_deref().unwrap_or("null")
    )]
    ConversionFailed {
        /// Source type name; `None` when the source was absent.
        source_type: Option<String>,
        /// Target type name.
        target_type: String,
        /// Debug rendering of the offending value (`null` when absent).
        value: String,
        /// Underlying failure.
        #[source]
        cause: BoxError,
    },

    /// No strategy is registered and the value cannot be passed through.
    #[error("no converter found capable of converting from type [{source_type}] to type [{target_type}]")]
    ConverterNotFound {
        /// Source type name.
        source_type: String,
        /// Target type name.
        target_type: String,
    },

    /// A non-null value was passed without a source type.
    #[error("source type must be present when the value [{value}] is not null")]
    MissingSourceType {
        /// Debug rendering of the value.
        value: String,
    },

    /// The value is not an instance of the claimed source type.
    #[error("value [{value}] is not an instance of source type [{source_type}]")]
    SourceTypeMismatch {
        /// Claimed source type name.
        source_type: String,
        /// Debug rendering of the value.
        value: String,
    },

    /// The type hash is not registered in the universe.
    #[error("type {type_hash} is not registered")]
    UnknownType {
        /// The unknown hash.
        type_hash: TypeHash,
    },
}

impl ConversionError {
    /// Create a conversion failure.
    pub fn failed(
        source_type: Option<String>,
        target_type: impl Into<String>,
        value: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        ConversionError::ConversionFailed {
            source_type,
            target_type: target_type.into(),
            value: value.into(),
            cause: cause.into(),
        }
    }

    /// Create a converter-not-found error.
    pub fn not_found(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        ConversionError::ConverterNotFound {
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }

    /// Did a strategy run and fail?
    pub fn is_conversion_failed(&self) -> bool {
        matches!(self, ConversionError::ConversionFailed { .. })
    }

    /// Was no strategy found?
    pub fn is_converter_not_found(&self) -> bool {
        matches!(self, ConversionError::ConverterNotFound { .. })
    }

    /// Is this a caller bug rather than a conversion outcome?
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ConversionError::MissingSourceType { .. }
                | ConversionError::SourceTypeMismatch { .. }
                | ConversionError::UnknownType { .. }
        )
    }
}

/// Cause attached to a [`ConversionError::ConversionFailed`] when a null value
/// would be assigned to a primitive target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a null value cannot be assigned to primitive type [{target_type}]")]
pub struct NullToPrimitiveError {
    /// The primitive target type name.
    pub target_type: String,
}

/// Errors raised while registering types or converters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A converter declared no convertible pairs without being conditional.
    #[error("only conditional converters may declare no convertible types")]
    UnconditionalGlobal,

    /// A type with the same hash is already registered.
    #[error("type '{name}' is already registered")]
    DuplicateType {
        /// The type name.
        name: String,
    },
}
