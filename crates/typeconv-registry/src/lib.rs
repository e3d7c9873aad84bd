//! Converter registry for the typeconv conversion engine.
//!
//! - [`Converter`], [`ConverterFactory`], [`GenericConverter`],
//!   [`ConditionalConverter`] - the strategy shapes converter authors implement
//! - [`ConverterAdapter`] - one dispatchable wrapper over all three shapes
//! - [`ConverterRegistry`] - pair index, hierarchy search and global strategies
//! - [`ConverterResolver`] - thread-safe, cached front of the registry
//!
//! # Example
//!
//! ```
//! use typeconv_core::{ConvertiblePair, TypeUniverse, Value, builtins};
//! use typeconv_registry::{ConverterAdapter, ConverterResolver, FnConverter, ResolvedConverter};
//!
//! let universe = TypeUniverse::with_builtins();
//! let resolver = ConverterResolver::new();
//! resolver
//!     .add(ConverterAdapter::simple(
//!         ConvertiblePair::new(builtins::STRING, builtins::INT32),
//!         FnConverter::new(|s: &String| s.parse::<i32>()),
//!     ))
//!     .unwrap();
//!
//! let string = universe.descriptor(builtins::STRING).unwrap();
//! let int = universe.descriptor(builtins::INT32).unwrap();
//! let Some(ResolvedConverter::Adapter(adapter)) = resolver.resolve(&string, &int) else {
//!     panic!("expected a registered converter");
//! };
//! let out = adapter
//!     .convert(Some(&Value::new(String::from("42"))), &string, &int)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(out.downcast::<i32>().unwrap(), 42);
//! ```

mod adapter;
mod converter;
mod registry;
mod resolver;

pub use adapter::ConverterAdapter;
pub use converter::{
    ConditionalConverter, Converter, ConverterFactory, FnConverter, GenericConverter,
    SourceValueMismatch,
};
pub use registry::ConverterRegistry;
pub use resolver::{ConverterResolver, ResolvedConverter};
