//! typeconv - a generic type-conversion engine.
//!
//! Given a runtime [`Value`] and a target type, the [`ConversionService`] finds
//! the conversion strategy registered for the pair, falling back along both
//! type hierarchies when no exact pair is registered, caches the outcome, and
//! applies a null-source policy and a primitive-target check around it.
//!
//! # Crates
//!
//! - `typeconv-core` - type identity, the type universe, values and errors
//! - `typeconv-registry` - strategy traits, adapters, registry and cache
//! - `typeconv` (this crate) - the service, null handlers and default converters
//!
//! # Example
//!
//! ```
//! use typeconv::prelude::*;
//!
//! let mut universe = TypeUniverse::with_builtins();
//! let animal = universe.register(TypeEntry::class("Animal")).unwrap();
//! let dog = universe.register(TypeEntry::class("Dog").with_base(animal)).unwrap();
//!
//! let service = ConversionService::builder()
//!     .universe(universe)
//!     .with_defaults()
//!     .build()
//!     .unwrap();
//! service
//!     .add_converter_for(animal, builtins::STRING, |v: &Value| -> Result<Option<Value>, BoxError> {
//!         Ok(Some(Value::new(format!("animal {v:?}"))))
//!     })
//!     .unwrap();
//!
//! // No (Dog, string) converter: the (Animal, string) one is found through the hierarchy.
//! let rex = Value::with_type(dog, String::from("Rex"));
//! let text = service.convert(Some(rex), builtins::STRING).unwrap().unwrap();
//! assert_eq!(text.downcast::<String>().unwrap(), "animal \"Rex\"");
//!
//! assert_eq!(service.convert_into::<i32>(Some(Value::new(String::from("42")))).unwrap(), Some(42));
//! ```

pub mod defaults;
mod null_handler;
mod service;

pub use null_handler::{EmptyOptionalHandler, NullHandler, NullStaysNull};
pub use service::{ConversionService, ConversionServiceBuilder, UnexpectedResultType};

pub use typeconv_core::{
    BoxError, ConversionError, ConvertiblePair, EnumConstant, Optional, Reflect,
    RegistrationError, TypeDescriptor, TypeEntry, TypeHash, TypeUniverse, Value, builtins,
};
pub use typeconv_registry::{
    ConditionalConverter, Converter, ConverterFactory, FnConverter, GenericConverter,
};

/// Common imports.
pub mod prelude {
    pub use crate::{
        BoxError, ConditionalConverter, ConversionError, ConversionService, Converter,
        ConverterFactory, ConvertiblePair, EnumConstant, GenericConverter, NullHandler, Optional,
        Reflect, TypeDescriptor, TypeEntry, TypeHash, TypeUniverse, Value, builtins,
    };
}
