//! Core type definitions for the similarity engine

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier of an entity (a lab record)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An entity: identifier plus the themed text (keyword/domain fields joined)
///
/// Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub text: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, text: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Canonical unordered pair of entity ids
///
/// The smaller id (lexicographic) is always `low`, so `(a, b)` and `(b, a)`
/// produce the same key. Ordering is lexicographic on `(low, high)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: EntityId,
    high: EntityId,
}

impl PairKey {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b {
            PairKey { low: a, high: b }
        } else {
            PairKey { low: b, high: a }
        }
    }

    pub fn low(&self) -> &EntityId {
        &self.low
    }

    pub fn high(&self) -> &EntityId {
        &self.high
    }

    pub fn contains(&self, id: &str) -> bool {
        self.low.as_str() == id || self.high.as_str() == id
    }

    /// The endpoint that is not `id`, if `id` is one of the endpoints
    pub fn other(&self, id: &str) -> Option<&EntityId> {
        if self.low.as_str() == id {
            Some(&self.high)
        } else if self.high.as_str() == id {
            Some(&self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.low, self.high)
    }
}

/// Cluster label assigned by a community detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabel(pub usize);

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_canonical() {
        let ab = PairKey::new("b".into(), "a".into());
        let ba = PairKey::new("a".into(), "b".into());
        assert_eq!(ab, ba);
        assert_eq!(ab.low().as_str(), "a");
        assert_eq!(ab.high().as_str(), "b");
        assert_eq!(ab.to_string(), "a|b");
    }

    #[test]
    fn test_pair_key_other() {
        let key = PairKey::new("x".into(), "y".into());
        assert_eq!(key.other("x").map(EntityId::as_str), Some("y"));
        assert_eq!(key.other("y").map(EntityId::as_str), Some("x"));
        assert!(key.other("z").is_none());
        assert!(key.contains("x"));
        assert!(!key.contains("z"));
    }

    #[test]
    fn test_pair_key_with_separator_in_ids_does_not_collide() {
        let a = PairKey::new("a|b".into(), "c".into());
        let b = PairKey::new("a".into(), "b|c".into());
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_id_serializes_as_string() {
        let json = serde_json::to_string(&EntityId::new("UMR5505")).unwrap();
        assert_eq!(json, "\"UMR5505\"");
    }
}
