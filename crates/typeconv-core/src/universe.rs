//! TypeUniverse - the set of types known to the conversion engine.
//!
//! The universe plays the part of a reflection service: it answers identity,
//! hierarchy, assignability and generic-shape questions about registered types.
//! The converter registry never stores parent/child links itself; it asks the
//! universe for an ordered ancestor list on each search.
//!
//! # Hierarchy Order
//!
//! [`TypeUniverse::class_hierarchy`] returns the type itself first, then its
//! base class chain, then interfaces, then the `enum` family root for enums,
//! and always ends in `object`. A base class is inserted directly after the type
//! that declares it; interfaces are appended in discovery order. For
//! `array<E>` the walk runs over `E` and every ancestor `X` is reported as
//! `array<X>`, followed by `array<object>` and the raw `array` template.
//!
//! This order decides which converter wins when several are registered along
//! a hierarchy, so it must stay deterministic.
//!
//! # Thread Safety
//!
//! `TypeUniverse` is populated single-threaded and then shared read-only
//! (typically behind an `Arc`) by the conversion service.
//!
//! # Example
//!
//! ```
//! use typeconv_core::{TypeEntry, TypeUniverse, TypeHash, builtins};
//!
//! let mut universe = TypeUniverse::with_builtins();
//! let animal = universe.register(TypeEntry::class("Animal")).unwrap();
//! let dog = universe.register(TypeEntry::class("Dog").with_base(animal)).unwrap();
//!
//! assert_eq!(universe.class_hierarchy(dog), vec![dog, animal, builtins::OBJECT]);
//! assert!(universe.is_assignable(dog, animal));
//! assert!(!universe.is_assignable(animal, dog));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{RegistrationError, TypeDescriptor, TypeEntry, TypeHash, builtins};

/// Registered types indexed by hash and by name.
#[derive(Default)]
pub struct TypeUniverse {
    /// Entries by hash (primary storage).
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Name -> hash reverse index.
    by_name: FxHashMap<String, TypeHash>,
}

impl TypeUniverse {
    /// Create an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a universe seeded with `object`, the primitives, `string`,
    /// `number`, `enum` and the `array`/`map`/`optional` templates.
    pub fn with_builtins() -> Self {
        let mut universe = Self::new();
        universe.register_builtins();
        universe
    }

    /// Register the builtin types. Already-present builtins are left untouched.
    pub fn register_builtins(&mut self) {
        let entries = [
            TypeEntry::class("object"),
            TypeEntry::primitive("bool"),
            TypeEntry::primitive("char"),
            TypeEntry::interface("number"),
            TypeEntry::numeric("int8"),
            TypeEntry::numeric("int16"),
            TypeEntry::numeric("int"),
            TypeEntry::numeric("int64"),
            TypeEntry::numeric("uint8"),
            TypeEntry::numeric("uint16"),
            TypeEntry::numeric("uint"),
            TypeEntry::numeric("uint64"),
            TypeEntry::numeric("float"),
            TypeEntry::numeric("double"),
            TypeEntry::class("string"),
            TypeEntry::class("enum").with_flags(crate::TypeFlags::ABSTRACT),
            TypeEntry::template("array"),
            TypeEntry::template("map"),
            TypeEntry::template("optional"),
        ];
        for entry in entries {
            if !self.types.contains_key(&entry.type_hash) {
                self.insert(entry);
            }
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type and return its hash.
    pub fn register(&mut self, entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        if self.types.contains_key(&entry.type_hash) {
            return Err(RegistrationError::DuplicateType { name: entry.name });
        }
        Ok(self.insert(entry))
    }

    /// Register `array<component>`, or return the existing hash.
    pub fn register_array(&mut self, component: TypeHash) -> TypeHash {
        self.register_instance(builtins::ARRAY, vec![component])
    }

    /// Register `map<key, value>`, or return the existing hash.
    pub fn register_map(&mut self, key: TypeHash, value: TypeHash) -> TypeHash {
        self.register_instance(builtins::MAP, vec![key, value])
    }

    /// Register `optional<inner>`, or return the existing hash.
    pub fn register_optional(&mut self, inner: TypeHash) -> TypeHash {
        self.register_instance(builtins::OPTIONAL, vec![inner])
    }

    fn register_instance(&mut self, template: TypeHash, args: Vec<TypeHash>) -> TypeHash {
        let hash = TypeHash::from_template_instance(template, &args);
        if self.types.contains_key(&hash) {
            return hash;
        }
        let arg_names: Vec<String> = args.iter().map(|a| self.name_of(*a)).collect();
        let name = format!("{}<{}>", self.name_of(template), arg_names.join(", "));
        self.insert(TypeEntry::template_instance(name, template, args))
    }

    fn insert(&mut self, entry: TypeEntry) -> TypeHash {
        let hash = entry.type_hash;
        self.by_name.insert(entry.name.clone(), hash);
        self.types.insert(hash, entry);
        hash
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get an entry by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Get an entry by name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeEntry> {
        self.by_name.get(name).and_then(|hash| self.types.get(hash))
    }

    /// Check if a type is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Is the universe empty?
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get a descriptor view of a registered type.
    pub fn descriptor(&self, hash: TypeHash) -> Option<TypeDescriptor<'_>> {
        self.get(hash).map(|entry| TypeDescriptor::new(entry, self))
    }

    /// Name of a type, or its hex hash when unregistered.
    pub fn name_of(&self, hash: TypeHash) -> String {
        match self.types.get(&hash) {
            Some(entry) => entry.name.clone(),
            None => hash.to_string(),
        }
    }

    /// The raw template of a template instance, or the type itself.
    pub fn raw_type(&self, hash: TypeHash) -> TypeHash {
        self.get(hash).and_then(|e| e.template).unwrap_or(hash)
    }

    // ==========================================================================
    // Hierarchy
    // ==========================================================================

    /// Ordered ancestors of `hash`, most specific first, ending in `object`.
    ///
    /// The first element is always `hash` itself. Unregistered hashes yield
    /// `[hash, object]`.
    pub fn class_hierarchy(&self, hash: TypeHash) -> Vec<TypeHash> {
        let component = self
            .get(hash)
            .filter(|e| e.is_array())
            .and_then(|e| e.type_args.first().copied());
        let start = component.unwrap_or(hash);

        let mut hierarchy = vec![start];
        let mut visited = FxHashSet::default();
        visited.insert(start);

        let mut i = 0;
        while i < hierarchy.len() {
            let candidate = hierarchy[i];
            if let Some(entry) = self.get(candidate) {
                let mut insert_at = i + 1;
                if let Some(template) = entry.template
                    && visited.insert(template)
                {
                    hierarchy.insert(insert_at, template);
                    insert_at += 1;
                }
                if let Some(base) = entry.base
                    && base != builtins::OBJECT
                    && base != builtins::ENUM
                    && visited.insert(base)
                {
                    hierarchy.insert(insert_at, base);
                }
                for interface in &entry.interfaces {
                    if visited.insert(*interface) {
                        hierarchy.push(*interface);
                    }
                }
            }
            i += 1;
        }

        if self.get(start).is_some_and(|e| e.is_enum()) && visited.insert(builtins::ENUM) {
            hierarchy.push(builtins::ENUM);
        }
        hierarchy.retain(|h| *h != builtins::OBJECT);

        match component {
            Some(_) => {
                let mut arrays: Vec<TypeHash> = hierarchy
                    .iter()
                    .map(|h| TypeHash::from_template_instance(builtins::ARRAY, &[*h]))
                    .collect();
                arrays.push(TypeHash::from_template_instance(builtins::ARRAY, &[builtins::OBJECT]));
                arrays.push(builtins::ARRAY);
                arrays.push(builtins::OBJECT);
                arrays
            }
            None => {
                hierarchy.push(builtins::OBJECT);
                hierarchy
            }
        }
    }

    /// Can a value of type `source` be used where `target` is expected?
    pub fn is_assignable(&self, source: TypeHash, target: TypeHash) -> bool {
        source == target
            || target == builtins::OBJECT
            || self.class_hierarchy(source).contains(&target)
    }
}

impl std::fmt::Debug for TypeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeUniverse")
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoo() -> (TypeUniverse, TypeHash, TypeHash, TypeHash, TypeHash) {
        let mut universe = TypeUniverse::with_builtins();
        let pet = universe.register(TypeEntry::interface("Pet")).unwrap();
        let animal = universe.register(TypeEntry::class("Animal")).unwrap();
        let mammal = universe
            .register(TypeEntry::class("Mammal").with_base(animal))
            .unwrap();
        let dog = universe
            .register(TypeEntry::class("Dog").with_base(mammal).with_interface(pet))
            .unwrap();
        (universe, pet, animal, mammal, dog)
    }

    #[test]
    fn builtins_registered() {
        let universe = TypeUniverse::with_builtins();
        assert!(universe.contains(builtins::OBJECT));
        assert!(universe.contains(builtins::INT32));
        assert!(universe.get(builtins::INT32).unwrap().is_primitive());
        assert!(!universe.get(builtins::STRING).unwrap().is_primitive());
        assert_eq!(universe.get_by_name("int").map(|e| e.type_hash), Some(builtins::INT32));
    }

    #[test]
    fn register_builtins_twice_is_harmless() {
        let mut universe = TypeUniverse::with_builtins();
        let before = universe.len();
        universe.register_builtins();
        assert_eq!(universe.len(), before);
    }

    #[test]
    fn duplicate_type_error() {
        let mut universe = TypeUniverse::new();
        universe.register(TypeEntry::class("Dog")).unwrap();
        let err = universe.register(TypeEntry::class("Dog")).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateType { name: "Dog".into() });
    }

    #[test]
    fn hierarchy_classes_before_interfaces() {
        let (universe, pet, animal, mammal, dog) = zoo();
        assert_eq!(
            universe.class_hierarchy(dog),
            vec![dog, mammal, animal, pet, builtins::OBJECT]
        );
    }

    #[test]
    fn hierarchy_of_object() {
        let universe = TypeUniverse::with_builtins();
        assert_eq!(universe.class_hierarchy(builtins::OBJECT), vec![builtins::OBJECT]);
    }

    #[test]
    fn hierarchy_of_unregistered_type() {
        let universe = TypeUniverse::with_builtins();
        let ghost = TypeHash::from_name("Ghost");
        assert_eq!(universe.class_hierarchy(ghost), vec![ghost, builtins::OBJECT]);
    }

    #[test]
    fn hierarchy_of_numeric() {
        let universe = TypeUniverse::with_builtins();
        assert_eq!(
            universe.class_hierarchy(builtins::INT32),
            vec![builtins::INT32, builtins::NUMBER, builtins::OBJECT]
        );
    }

    #[test]
    fn hierarchy_of_enum() {
        let mut universe = TypeUniverse::with_builtins();
        let color = universe
            .register(TypeEntry::enumeration("Color").with_member("Red"))
            .unwrap();
        assert_eq!(
            universe.class_hierarchy(color),
            vec![color, builtins::ENUM, builtins::OBJECT]
        );
    }

    #[test]
    fn hierarchy_of_array() {
        let (mut universe, pet, animal, mammal, dog) = zoo();
        let dogs = universe.register_array(dog);
        let array_of = |h| TypeHash::from_template_instance(builtins::ARRAY, &[h]);

        assert_eq!(
            universe.class_hierarchy(dogs),
            vec![
                dogs,
                array_of(mammal),
                array_of(animal),
                array_of(pet),
                array_of(builtins::OBJECT),
                builtins::ARRAY,
                builtins::OBJECT,
            ]
        );
    }

    #[test]
    fn hierarchy_of_template_instance_includes_raw_template() {
        let mut universe = TypeUniverse::with_builtins();
        let scores = universe.register_map(builtins::STRING, builtins::INT32);
        assert_eq!(
            universe.class_hierarchy(scores),
            vec![scores, builtins::MAP, builtins::OBJECT]
        );
    }

    #[test]
    fn diamond_interfaces_visited_once() {
        let mut universe = TypeUniverse::with_builtins();
        let named = universe.register(TypeEntry::interface("Named")).unwrap();
        let base = universe
            .register(TypeEntry::class("Base").with_interface(named))
            .unwrap();
        let derived = universe
            .register(TypeEntry::class("Derived").with_base(base).with_interface(named))
            .unwrap();

        assert_eq!(
            universe.class_hierarchy(derived),
            vec![derived, base, named, builtins::OBJECT]
        );
    }

    #[test]
    fn assignability() {
        let (universe, pet, animal, _, dog) = zoo();
        assert!(universe.is_assignable(dog, dog));
        assert!(universe.is_assignable(dog, animal));
        assert!(universe.is_assignable(dog, pet));
        assert!(universe.is_assignable(dog, builtins::OBJECT));
        assert!(!universe.is_assignable(animal, dog));
        assert!(!universe.is_assignable(dog, builtins::STRING));
    }

    #[test]
    fn array_covariance() {
        let (mut universe, _, animal, _, dog) = zoo();
        let dogs = universe.register_array(dog);
        let animals = universe.register_array(animal);
        assert!(universe.is_assignable(dogs, animals));
        assert!(universe.is_assignable(dogs, builtins::ARRAY));
        assert!(!universe.is_assignable(animals, dogs));
    }

    #[test]
    fn register_instance_is_idempotent() {
        let mut universe = TypeUniverse::with_builtins();
        let a = universe.register_optional(builtins::STRING);
        let b = universe.register_optional(builtins::STRING);
        assert_eq!(a, b);
        assert_eq!(universe.name_of(a), "optional<string>");
        assert_eq!(universe.raw_type(a), builtins::OPTIONAL);
        assert_eq!(universe.raw_type(builtins::STRING), builtins::STRING);
    }

    #[test]
    fn name_of_unregistered_is_hex() {
        let universe = TypeUniverse::new();
        assert_eq!(universe.name_of(TypeHash(0x10)), "0x0000000000000010");
    }
}
