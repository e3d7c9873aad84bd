//! Type-erased runtime values.
//!
//! A [`Value`] owns a boxed Rust value together with the [`TypeHash`] of its
//! runtime type. The hash, not the Rust `TypeId`, is what the engine dispatches
//! on, so a value can be tagged with a universe type that has no dedicated Rust
//! type (`array<Dog>`, a script-defined enum, ...).
//!
//! Absent values are modelled as `Option<Value>` throughout the engine.

use std::any::Any;
use std::fmt;

use crate::{Reflect, TypeHash, builtins};

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

fn debug_as<T: Any + fmt::Debug>(
    value: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<opaque>"),
    }
}

/// A runtime value tagged with its type.
pub struct Value {
    type_hash: TypeHash,
    inner: Box<dyn Any + Send + Sync>,
    debug: DebugFn,
}

impl Value {
    /// Wrap a value whose type identity comes from [`Reflect`].
    pub fn new<T: Reflect>(value: T) -> Self {
        Self::with_type(T::type_hash(), value)
    }

    /// Wrap a value under an explicit runtime type.
    pub fn with_type<T: Any + Send + Sync + fmt::Debug>(type_hash: TypeHash, value: T) -> Self {
        Self {
            type_hash,
            inner: Box::new(value),
            debug: debug_as::<T>,
        }
    }

    /// Runtime type of this value.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Check whether the boxed Rust value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the boxed Rust value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the boxed Rust value out as a `T`, or get the value back untouched.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        let Value {
            type_hash,
            inner,
            debug,
        } = self;
        match inner.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(inner) => Err(Value {
                type_hash,
                inner,
                debug,
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.inner, f)
    }
}

/// Payload of `optional<T>` values.
#[derive(Debug, Default)]
pub struct Optional(pub Option<Value>);

impl Optional {
    /// An empty optional.
    pub fn empty() -> Self {
        Self(None)
    }

    /// An optional holding `value`.
    pub fn of(value: Value) -> Self {
        Self(Some(value))
    }

    /// Is this optional empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Take the held value out.
    pub fn into_inner(self) -> Option<Value> {
        self.0
    }
}

impl Reflect for Optional {
    fn type_hash() -> TypeHash {
        builtins::OPTIONAL
    }

    fn type_name() -> &'static str {
        "optional"
    }
}

/// Payload of values of universe-declared enum types.
///
/// The enum type itself is carried by the [`Value`]'s type hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    /// Member name.
    pub name: String,
    /// Member ordinal.
    pub ordinal: i64,
}

impl EnumConstant {
    /// Create an enum constant.
    pub fn new(name: impl Into<String>, ordinal: i64) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }
}
