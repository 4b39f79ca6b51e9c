//! Dependency Registry
//!
//! The registry answers one question: which effects must re-run when a given
//! property of a given tracked object changes?
//!
//! # Layout
//!
//! ```text
//! ObjectId ──► property name ──► {EffectId, ...}
//! ```
//!
//! The outer level is keyed by object identity. The inner level maps property
//! names to insertion-ordered sets of effect IDs, so registering the same
//! effect twice is a no-op and iteration order is stable from run to run.
//!
//! Entries are created lazily on first registration. They are only removed
//! when an object is released or an effect is stopped; an effect that simply
//! stops reading a property keeps its stale entry.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use super::{EffectId, ObjectId};

/// Per-object mapping from property name to dependent effects.
type PropertyDeps = IndexMap<String, IndexSet<EffectId>>;

/// Mapping from (object, property) to the effects that depend on it.
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    objects: HashMap<ObjectId, PropertyDeps>,
}

impl DependencyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `effect` depends on (`object`, `key`).
    ///
    /// Returns `true` if the dependency was not already registered.
    pub fn insert(&mut self, object: ObjectId, key: &str, effect: EffectId) -> bool {
        let deps = self.objects.entry(object).or_default();

        match deps.get_mut(key) {
            Some(effects) => effects.insert(effect),
            None => {
                let mut effects = IndexSet::new();
                effects.insert(effect);
                deps.insert(key.to_owned(), effects);
                true
            }
        }
    }

    /// Get the effects registered against (`object`, `key`), in registration order.
    pub fn dependents(&self, object: ObjectId, key: &str) -> impl Iterator<Item = EffectId> + '_ {
        self.objects
            .get(&object)
            .and_then(|deps| deps.get(key))
            .into_iter()
            .flat_map(|effects| effects.iter().copied())
    }

    /// Check whether `effect` is registered against (`object`, `key`).
    pub fn contains(&self, object: ObjectId, key: &str, effect: EffectId) -> bool {
        self.objects
            .get(&object)
            .and_then(|deps| deps.get(key))
            .is_some_and(|effects| effects.contains(&effect))
    }

    /// Get the number of effects registered against (`object`, `key`).
    pub fn dependency_count(&self, object: ObjectId, key: &str) -> usize {
        self.objects
            .get(&object)
            .and_then(|deps| deps.get(key))
            .map_or(0, IndexSet::len)
    }

    /// Remove `effect` from every dependency set.
    ///
    /// Returns the number of (object, property) pairs it was removed from.
    /// Property entries left empty are dropped, and so are objects left with
    /// no properties.
    pub fn remove_effect(&mut self, effect: EffectId) -> usize {
        let mut removed = 0;

        self.objects.retain(|_, deps| {
            deps.retain(|_, effects| {
                if effects.shift_remove(&effect) {
                    removed += 1;
                }
                !effects.is_empty()
            });
            !deps.is_empty()
        });

        removed
    }

    /// Drop every entry for `object`.
    ///
    /// Returns `true` if the object had any entries.
    pub fn remove_object(&mut self, object: ObjectId) -> bool {
        self.objects.remove(&object).is_some()
    }

    /// Get the total number of (object, property) pairs with a dependency set.
    pub fn tracked_pairs(&self) -> usize {
        self.objects.values().map(IndexMap::len).sum()
    }

    /// Get the number of objects with at least one entry.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
