//! Borrowed descriptor view over a registered type.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{EnumMember, TypeEntry, TypeHash, TypeUniverse, Value, builtins};

/// A registered type, viewed together with the universe that knows its
/// relationships.
///
/// Descriptors are cheap to copy. Equality and hashing use the type hash only.
#[derive(Clone, Copy)]
pub struct TypeDescriptor<'a> {
    entry: &'a TypeEntry,
    universe: &'a TypeUniverse,
}

impl<'a> TypeDescriptor<'a> {
    pub(crate) fn new(entry: &'a TypeEntry, universe: &'a TypeUniverse) -> Self {
        Self { entry, universe }
    }

    /// Type hash.
    pub fn type_hash(&self) -> TypeHash {
        self.entry.type_hash
    }

    /// Type name.
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    /// Underlying registry entry.
    pub fn entry(&self) -> &'a TypeEntry {
        self.entry
    }

    /// Universe this descriptor belongs to.
    pub fn universe(&self) -> &'a TypeUniverse {
        self.universe
    }

    /// Non-nullable primitive?
    pub fn is_primitive(&self) -> bool {
        self.entry.is_primitive()
    }

    /// Numeric primitive?
    pub fn is_numeric(&self) -> bool {
        self.entry.is_numeric()
    }

    /// Enum type?
    pub fn is_enum(&self) -> bool {
        self.entry.is_enum()
    }

    /// Raw template for template instances, otherwise this type.
    pub fn raw_type(&self) -> TypeHash {
        self.entry.template.unwrap_or(self.entry.type_hash)
    }

    /// Element type of `array<T>` / `optional<T>`, value type of `map<K, V>`.
    ///
    /// `None` when this is not a container or the component is not registered.
    pub fn component_type(&self) -> Option<TypeDescriptor<'a>> {
        let index = match self.entry.template? {
            builtins::MAP => 1,
            _ => 0,
        };
        let component = *self.entry.type_args.get(index)?;
        self.universe.descriptor(component)
    }

    /// Key type of `map<K, V>`.
    pub fn key_type(&self) -> Option<TypeDescriptor<'a>> {
        if self.entry.template != Some(builtins::MAP) {
            return None;
        }
        let key = *self.entry.type_args.first()?;
        self.universe.descriptor(key)
    }

    /// Declared enum members (empty for non-enums).
    pub fn enum_members(&self) -> &'a [EnumMember] {
        &self.entry.members
    }

    /// Ordered ancestors, most specific first, ending in `object`.
    pub fn hierarchy(&self) -> Vec<TypeHash> {
        self.universe.class_hierarchy(self.entry.type_hash)
    }

    /// Can a value of this type be used where `other` is expected?
    pub fn is_assignable_to(&self, other: &TypeDescriptor<'_>) -> bool {
        self.universe.is_assignable(self.type_hash(), other.type_hash())
    }

    /// Can a value of `other` be used where this type is expected?
    pub fn is_assignable_from(&self, other: &TypeDescriptor<'_>) -> bool {
        self.universe.is_assignable(other.type_hash(), self.type_hash())
    }

    /// Is `value`'s runtime type assignable to this type?
    pub fn is_instance(&self, value: &Value) -> bool {
        self.universe.is_assignable(value.type_hash(), self.type_hash())
    }
}

impl PartialEq for TypeDescriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.type_hash() == other.type_hash()
    }
}

impl Eq for TypeDescriptor<'_> {}

impl Hash for TypeDescriptor<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_hash().hash(state);
    }
}

impl fmt::Debug for TypeDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.entry.name).finish()
    }
}

impl fmt::Display for TypeDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entry.name)
    }
}
