//! Shape identifiers backed by a global string interner.
//!
//! Identifiers are copied and compared constantly while the renderer walks
//! shape lists and matches completion actions back to their shapes, so they
//! are stored as interned symbols.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier of a logical shape.
///
/// # Examples
///
/// ```
/// use easel_core::identifier::Id;
///
/// let node = Id::new("node-1");
/// let body = node.create_nested("body");
/// assert_eq!(body, "node-1::body");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        with_interner(|interner| Self(interner.get_or_intern(name)))
    }

    /// Creates the identifier of a sub-shape bound under `label`.
    ///
    /// The result is `parent::label`, so sub-shape ids stay unique across
    /// composites that reuse the same labels.
    pub fn create_nested(&self, label: &str) -> Self {
        with_interner(|interner| {
            let parent = interner
                .resolve(self.0)
                .expect("Parent ID should exist in interner");
            let nested = format!("{parent}::{label}");
            Self(interner.get_or_intern(nested))
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        });
        write!(f, "{value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                == other
        })
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("rect-1");
        let id2 = Id::new("rect-1");
        let id3 = Id::new("rect-2");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "rect-1");
    }

    #[test]
    fn test_create_nested() {
        let parent = Id::new("node");

        let body = parent.create_nested("body");
        let label = parent.create_nested("label");

        assert_ne!(body, label);
        assert_eq!(body, "node::body");
        assert_eq!(label.create_nested("glyph"), "node::label::glyph");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id: Id = "from_test".into();
        assert_eq!(id, Id::new("from_test"));
    }
}
