//! Static type identity for Rust types.
//!
//! [`Reflect`] ties a Rust type to the [`TypeHash`] of the entry describing it in
//! a [`TypeUniverse`](crate::TypeUniverse). Values built with
//! [`Value::new`](crate::Value::new) take their runtime type from it.
//!
//! # Example
//!
//! ```
//! use typeconv_core::{Reflect, TypeHash};
//!
//! #[derive(Debug)]
//! struct Dog {
//!     name: String,
//! }
//!
//! typeconv_core::reflect!(Dog, "Dog");
//!
//! assert_eq!(Dog::type_hash(), TypeHash::from_name("Dog"));
//! ```

use std::any::Any;
use std::fmt::Debug;

use crate::{TypeHash, builtins};

/// Trait for Rust types that carry a conversion-engine type identity.
pub trait Reflect: Any + Send + Sync + Debug {
    /// Get the type hash for this type.
    fn type_hash() -> TypeHash;

    /// Get the type name, as registered in the universe.
    fn type_name() -> &'static str;
}

/// Implement [`Reflect`] for a type, hashing the given name.
#[macro_export]
macro_rules! reflect {
    ($ty:ty, $name:expr) => {
        impl $crate::Reflect for $ty {
            fn type_hash() -> $crate::TypeHash {
                $crate::TypeHash::from_name($name)
            }

            fn type_name() -> &'static str {
                $name
            }
        }
    };
}

macro_rules! impl_reflect_builtin {
    ($($ty:ty => $hash:expr, $name:literal);* $(;)?) => {
        $(
            impl Reflect for $ty {
                fn type_hash() -> TypeHash {
                    $hash
                }

                fn type_name() -> &'static str {
                    $name
                }
            }
        )*
    };
}

impl_reflect_builtin! {
    bool => builtins::BOOL, "bool";
    char => builtins::CHAR, "char";
    i8 => builtins::INT8, "int8";
    i16 => builtins::INT16, "int16";
    i32 => builtins::INT32, "int";
    i64 => builtins::INT64, "int64";
    u8 => builtins::UINT8, "uint8";
    u16 => builtins::UINT16, "uint16";
    u32 => builtins::UINT32, "uint";
    u64 => builtins::UINT64, "uint64";
    f32 => builtins::FLOAT, "float";
    f64 => builtins::DOUBLE, "double";
    String => builtins::STRING, "string";
}
