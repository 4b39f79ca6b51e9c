//! Identity types for the reactive system.
//!
//! Tracked objects and effects are identified by reference identity, not by
//! value. Two maps holding equal data are still two distinct tracked objects,
//! so every tracked object and every effect receives a unique ID at creation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a tracked object.
///
/// This is the key of the outer level of the dependency registry. Hosts that
/// build their own instrumented types call [`ObjectId::new`] once per instance
/// and pass it to [`Runtime::track`](super::Runtime::track) and
/// [`Runtime::trigger`](super::Runtime::trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Generate a new unique object ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Unique identifier for an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

impl EffectId {
    /// Generate a new unique effect ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_are_unique() {
        let id1 = ObjectId::new();
        let id2 = ObjectId::new();
        let id3 = ObjectId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn effect_ids_are_unique() {
        let a = EffectId::new();
        let b = EffectId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn ids_display_with_prefix() {
        let id = ObjectId::new();
        assert_eq!(id.to_string(), format!("obj#{}", id.raw()));

        let effect = EffectId::new();
        assert_eq!(effect.to_string(), format!("effect#{}", effect.raw()));
    }
}
