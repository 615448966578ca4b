//! Node identifier management using string interning
//!
//! Draw.io documents reference cells by string id (parents, edge sources
//! and targets). This module provides the [`Id`] type, a copyable interned
//! handle that makes those lookups cheap to hash and compare.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Interned node identifier
///
/// # Examples
///
/// ```
/// use vellum_core::identifier::Id;
///
/// let edge = Id::new("edge-7");
/// let label = edge.create_nested(Id::new("label"));
/// assert_eq!(label, "edge-7::label");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an identifier for an element that had no id in the source.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__{idx}"))
    }

    /// Creates a nested ID by combining this ID and `child_id` with a `::` separator.
    pub fn create_nested(&self, child_id: Id) -> Self {
        let nested_name = format!("{self}::{child_id}");
        Self::new(&nested_name)
    }

    /// Returns the identifier text.
    pub fn as_string(&self) -> String {
        interner().resolve(self.0).unwrap_or_default().to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_string();
        f.write_str(&value)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Id::new(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("cell-2");
        let id2 = Id::new("cell-2");
        let id3 = Id::new("cell-3");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "cell-2");
    }

    #[test]
    fn test_from_anonymous() {
        assert_ne!(Id::from_anonymous(0), Id::from_anonymous(1));
        assert_eq!(Id::from_anonymous(4), Id::from_anonymous(4));
    }

    #[test]
    fn test_create_nested() {
        let edge = Id::new("e1");
        let nested = edge.create_nested(Id::new("label"));
        assert_eq!(nested, "e1::label");
        assert_eq!(nested.to_string(), "e1::label");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("Rectangle");
        assert!(id == "Rectangle");
        assert!(id != "Oval");

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_serde_as_string() {
        let id = Id::new("node-9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"node-9\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
