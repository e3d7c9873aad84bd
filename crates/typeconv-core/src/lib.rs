//! Core types for the typeconv conversion engine.
//!
//! This crate holds everything the converter registry and the conversion
//! service share:
//!
//! - [`TypeHash`] and [`builtins`] - deterministic type identity
//! - [`TypeEntry`], [`TypeFlags`], [`TypeUniverse`] - the registered types and
//!   their hierarchy
//! - [`TypeDescriptor`] - a borrowed view answering assignability and shape queries
//! - [`Reflect`], [`Value`] - type-erased runtime values
//! - [`ConvertiblePair`] - the `(source, target)` key
//! - [`ConversionError`], [`RegistrationError`] - error types

mod descriptor;
mod entry;
mod error;
mod pair;
mod reflect;
mod type_hash;
mod universe;
mod value;

pub use descriptor::TypeDescriptor;
pub use entry::{EnumMember, TypeEntry, TypeFlags};
pub use error::{BoxError, ConversionError, NullToPrimitiveError, RegistrationError};
pub use pair::ConvertiblePair;
pub use reflect::Reflect;
pub use type_hash::{TypeHash, builtins, hash_constants};
pub use universe::TypeUniverse;
pub use value::{EnumConstant, Optional, Value};
