//! Source/target pair used as registration and cache key.

use std::fmt;

use crate::{TypeHash, TypeUniverse};

/// An immutable `(source, target)` type pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConvertiblePair {
    source: TypeHash,
    target: TypeHash,
}

impl ConvertiblePair {
    /// Create a pair.
    pub const fn new(source: TypeHash, target: TypeHash) -> Self {
        Self { source, target }
    }

    /// Source type.
    pub const fn source(&self) -> TypeHash {
        self.source
    }

    /// Target type.
    pub const fn target(&self) -> TypeHash {
        self.target
    }

    /// Render as `source -> target` using universe names.
    pub fn describe(&self, universe: &TypeUniverse) -> String {
        format!(
            "{} -> {}",
            universe.name_of(self.source),
            universe.name_of(self.target)
        )
    }
}

impl fmt::Debug for ConvertiblePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConvertiblePair({} -> {})", self.source, self.target)
    }
}
