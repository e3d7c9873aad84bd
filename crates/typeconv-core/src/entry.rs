//! Type entries stored in the [`TypeUniverse`](crate::TypeUniverse).
//!
//! A [`TypeEntry`] is the engine's view of one runtime type: its identity,
//! its place in the class hierarchy (single base class plus interfaces),
//! template shape (for `array<T>`, `map<K, V>`, `optional<T>`) and, for enums,
//! the declared members.

use bitflags::bitflags;

use crate::{TypeHash, builtins};

bitflags! {
    /// Shape and nullability traits of a type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        /// Non-nullable value type. Assigning null to it is always an error.
        const PRIMITIVE = 1 << 0;
        /// Numeric primitive (integer or floating point).
        const NUMERIC = 1 << 1;
        /// Interface type. Appears in hierarchies but has no base class.
        const INTERFACE = 1 << 2;
        /// Enumeration type with declared members.
        const ENUM = 1 << 3;
        /// Generic family with unresolved type parameters (`array`, `map`, ...).
        const TEMPLATE = 1 << 4;
        /// Abstract type; never the runtime type of a value.
        const ABSTRACT = 1 << 5;
    }
}

/// A declared enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Declaration position.
    pub ordinal: i64,
}

impl EnumMember {
    /// Create a new enum member.
    pub fn new(name: impl Into<String>, ordinal: i64) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }
}

/// Registry entry describing one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    /// Type name (`"int"`, `"Dog"`, `"array<Dog>"`).
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Shape and nullability traits.
    pub flags: TypeFlags,

    // === Hierarchy ===
    /// Base class (single inheritance).
    pub base: Option<TypeHash>,
    /// Implemented interfaces, in declaration order.
    pub interfaces: Vec<TypeHash>,

    // === Template Info ===
    /// Template this type was instantiated from.
    pub template: Option<TypeHash>,
    /// Type arguments for template instances.
    pub type_args: Vec<TypeHash>,

    /// Enum members, in declaration order.
    pub members: Vec<EnumMember>,
}

impl TypeEntry {
    /// Create a new entry with the given name and flags.
    ///
    /// The type hash is derived from the name.
    pub fn new(name: impl Into<String>, flags: TypeFlags) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            flags,
            base: None,
            interfaces: Vec::new(),
            template: None,
            type_args: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Create a class (nullable reference type) entry.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::empty())
    }

    /// Create an interface entry.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::INTERFACE | TypeFlags::ABSTRACT)
    }

    /// Create a non-nullable primitive entry.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::PRIMITIVE)
    }

    /// Create a numeric primitive entry implementing `number`.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::PRIMITIVE | TypeFlags::NUMERIC).with_interface(builtins::NUMBER)
    }

    /// Create an enum entry with no members.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::ENUM)
    }

    /// Create a generic family entry (`array`, `map`, ...).
    pub fn template(name: impl Into<String>) -> Self {
        Self::new(name, TypeFlags::TEMPLATE | TypeFlags::ABSTRACT)
    }

    /// Create a template instance entry.
    ///
    /// The hash comes from the template and argument hashes, not from `name`,
    /// so it matches [`TypeHash::from_template_instance`].
    pub fn template_instance(
        name: impl Into<String>,
        template: TypeHash,
        type_args: Vec<TypeHash>,
    ) -> Self {
        Self {
            name: name.into(),
            type_hash: TypeHash::from_template_instance(template, &type_args),
            flags: TypeFlags::empty(),
            base: None,
            interfaces: Vec::new(),
            template: Some(template),
            type_args,
            members: Vec::new(),
        }
    }

    // === Builder Methods ===

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add an enum member. Ordinals follow declaration order.
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        let ordinal = self.members.len() as i64;
        self.members.push(EnumMember::new(name, ordinal));
        self
    }

    /// Add extra flags.
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    // === Queries ===

    /// Non-nullable primitive?
    pub fn is_primitive(&self) -> bool {
        self.flags.contains(TypeFlags::PRIMITIVE)
    }

    /// Numeric primitive?
    pub fn is_numeric(&self) -> bool {
        self.flags.contains(TypeFlags::NUMERIC)
    }

    /// Interface?
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeFlags::INTERFACE)
    }

    /// Enum?
    pub fn is_enum(&self) -> bool {
        self.flags.contains(TypeFlags::ENUM)
    }

    /// Generic family with unresolved parameters?
    pub fn is_template(&self) -> bool {
        self.flags.contains(TypeFlags::TEMPLATE)
    }

    /// Instance of a template?
    pub fn is_template_instance(&self) -> bool {
        self.template.is_some()
    }

    /// Instance of the `array` template?
    pub fn is_array(&self) -> bool {
        self.template == Some(builtins::ARRAY)
    }

    /// Look up an enum member by name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}
