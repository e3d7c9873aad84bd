//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that uniquely identifies a
//! type known to the conversion engine. Hashes are computed from type names, so:
//!
//! - A hash can be computed before the type is registered (forward references)
//! - The same name always produces the same hash
//! - Template instances (`array<int>`, `map<string, int>`) hash from their
//!   template and argument hashes, without formatting a name
//!
//! # Examples
//!
//! ```
//! use typeconv_core::{TypeHash, builtins};
//!
//! let int_hash = TypeHash::from_name("int");
//! assert_eq!(int_hash, builtins::INT32);
//!
//! let ints = TypeHash::from_template_instance(builtins::ARRAY, &[builtins::INT32]);
//! let longs = TypeHash::from_template_instance(builtins::ARRAY, &[builtins::INT64]);
//! assert_ne!(ints, longs);
//! ```

use std::fmt;

use xxhash_rust::const_xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for chained components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Argument position mixing constants.
    /// Each template argument position gets a unique constant so argument order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    ///
    /// Usable in `const` context, which is how [`builtins`] are defined.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ const_xxh64::xxh64(name.as_bytes(), 0))
    }

    /// Create a template instance hash from a template hash and its argument hashes.
    ///
    /// Argument order matters: `map<int, string>` and `map<string, int>` differ.
    #[inline]
    pub fn from_template_instance(template: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = template.0;
        for (i, arg) in args.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps argument order significant (XOR alone would commute)
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Check if this is the empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Well-known hashes for the types every [`TypeUniverse`](crate::TypeUniverse)
/// can be seeded with via `with_builtins()`.
pub mod builtins {
    use super::TypeHash;

    /// Universal root type. Every type is assignable to `object`.
    pub const OBJECT: TypeHash = TypeHash::from_name("object");

    /// `bool`
    pub const BOOL: TypeHash = TypeHash::from_name("bool");
    /// `char`
    pub const CHAR: TypeHash = TypeHash::from_name("char");

    /// `int8`
    pub const INT8: TypeHash = TypeHash::from_name("int8");
    /// `int16`
    pub const INT16: TypeHash = TypeHash::from_name("int16");
    /// `int` (32-bit signed integer)
    pub const INT32: TypeHash = TypeHash::from_name("int");
    /// `int64`
    pub const INT64: TypeHash = TypeHash::from_name("int64");
    /// `uint8`
    pub const UINT8: TypeHash = TypeHash::from_name("uint8");
    /// `uint16`
    pub const UINT16: TypeHash = TypeHash::from_name("uint16");
    /// `uint` (32-bit unsigned integer)
    pub const UINT32: TypeHash = TypeHash::from_name("uint");
    /// `uint64`
    pub const UINT64: TypeHash = TypeHash::from_name("uint64");
    /// `float` (32-bit)
    pub const FLOAT: TypeHash = TypeHash::from_name("float");
    /// `double` (64-bit)
    pub const DOUBLE: TypeHash = TypeHash::from_name("double");

    /// `string`, a nullable reference type.
    pub const STRING: TypeHash = TypeHash::from_name("string");

    /// Interface implemented by every numeric primitive.
    pub const NUMBER: TypeHash = TypeHash::from_name("number");

    /// Family root shared by all enum types.
    pub const ENUM: TypeHash = TypeHash::from_name("enum");

    /// `array<T>` template.
    pub const ARRAY: TypeHash = TypeHash::from_name("array");
    /// `map<K, V>` template.
    pub const MAP: TypeHash = TypeHash::from_name("map");
    /// `optional<T>` template.
    pub const OPTIONAL: TypeHash = TypeHash::from_name("optional");

    /// Integer primitives, narrowest first within each signedness.
    pub const INTEGERS: [TypeHash; 8] = [INT8, INT16, INT32, INT64, UINT8, UINT16, UINT32, UINT64];

    /// All numeric primitives.
    pub const NUMERICS: [TypeHash; 10] = [
        INT8, INT16, INT32, INT64, UINT8, UINT16, UINT32, UINT64, FLOAT, DOUBLE,
    ];
}
