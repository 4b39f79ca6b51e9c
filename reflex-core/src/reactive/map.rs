//! Reactive Map Implementation
//!
//! A `ReactiveMap` wraps a plain key-value mapping so that property access
//! can be observed. Its accessors are the only instrumented entry points:
//!
//! 1. [`get`](ReactiveMap::get) and [`contains_key`](ReactiveMap::contains_key)
//!    track the property for the running effect, then read.
//!
//! 2. [`set`](ReactiveMap::set) writes first, then triggers the property's
//!    dependents if the stored value changed.
//!
//! 3. Writing a value equal to the current one stores it without triggering.
//!
//! # Identity
//!
//! Clones share both data and identity. Two maps built from equal data are
//! still two distinct tracked objects and never trigger each other.
//!
//! # Ordering
//!
//! Keys keep their insertion order, like the properties of a script object.
//! Overwriting a key keeps its position.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::handle::TrackHandle;
use super::runtime::Runtime;
use super::ObjectId;
use crate::error::{json_kind, Error, Result};

struct MapInner<V> {
    handle: TrackHandle,
    entries: RwLock<IndexMap<String, V>>,
}

/// A tracked key-value container.
///
/// # Type Parameters
///
/// - `V`: The value type. `PartialEq` decides whether a write is a change.
///   Defaults to [`serde_json::Value`] for arbitrary JSON-like objects.
///
/// # Example
///
/// ```rust,ignore
/// let runtime = Runtime::new();
/// let product = ReactiveMap::from_entries(&runtime, [("price", 5), ("quantity", 2)]);
///
/// product.get("price");        // Some(5), tracked if an effect is running
/// product.set("quantity", 3);  // Re-runs effects that read "quantity"
/// product.set("quantity", 3);  // Same value, nothing re-runs
/// ```
pub struct ReactiveMap<V = Value>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<MapInner<V>>,
}

impl<V> ReactiveMap<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an empty tracked map.
    pub fn new(runtime: &Runtime) -> Self {
        Self::from_entries(runtime, std::iter::empty::<(String, V)>())
    }

    /// Wrap the given entries in a new tracked map.
    pub fn from_entries<K, I>(runtime: &Runtime, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();

        Self {
            inner: Arc::new(MapInner {
                handle: TrackHandle::new(runtime),
                entries: RwLock::new(entries),
            }),
        }
    }

    /// Get the identity of this tracked object.
    pub fn id(&self) -> ObjectId {
        self.inner.handle.id()
    }

    /// Check whether two handles refer to the same tracked object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get the value stored under `key`.
    ///
    /// If called while an effect is running, this also registers the effect
    /// as a dependent of `key`, whether or not the key is present.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.handle.track(key);
        self.get_untracked(key)
    }

    /// Get the value stored under `key` without tracking.
    pub fn get_untracked(&self, key: &str) -> Option<V> {
        self.inner.entries.read().get(key).cloned()
    }

    /// Check whether `key` is present, tracking it like [`get`](Self::get).
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.handle.track(key);
        self.inner.entries.read().contains_key(key)
    }

    /// Store `value` under `key`.
    ///
    /// Returns the previous value, as [`IndexMap::insert`] does. Dependents of
    /// `key` re-run after the write, unless the previous value was equal.
    pub fn set(&self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();

        let (previous, changed) = {
            let mut entries = self.inner.entries.write();
            let changed = entries.get(&key) != Some(&value);
            (entries.insert(key.clone(), value), changed)
        };

        if changed {
            self.inner.handle.trigger(&key);
        }

        previous
    }

    /// Replace the value under `key` with `f(current)`.
    ///
    /// The read is not tracked; the write behaves like [`set`](Self::set).
    pub fn update<F>(&self, key: impl Into<String>, f: F) -> Option<V>
    where
        F: FnOnce(Option<&V>) -> V,
    {
        let key = key.into();
        let new_value = {
            let entries = self.inner.entries.read();
            f(entries.get(&key))
        };
        self.set(key, new_value)
    }

    /// Remove `key`, re-running its dependents if it was present.
    pub fn remove(&self, key: &str) -> Option<V> {
        let removed = self.inner.entries.write().shift_remove(key);

        if removed.is_some() {
            self.inner.handle.trigger(key);
        }

        removed
    }

    /// Get the number of entries. Not tracked.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Check if the map has no entries. Not tracked.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Get the keys in insertion order. Not tracked.
    pub fn keys(&self) -> Vec<String> {
        self.inner.entries.read().keys().cloned().collect()
    }

    /// Copy out the current entries. Not tracked.
    pub fn snapshot(&self) -> IndexMap<String, V> {
        self.inner.entries.read().clone()
    }
}

impl<V> ReactiveMap<V>
where
    V: Clone + PartialEq + Send + Sync + Serialize + 'static,
{
    /// Serialize the current entries as a JSON object. Not tracked.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.inner.entries.read())?)
    }
}

impl ReactiveMap<Value> {
    /// Wrap a JSON object in a new tracked map.
    ///
    /// Only the top level is tracked; nested objects are stored as values.
    pub fn from_json(runtime: &Runtime, json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(object) => Ok(Self::from_entries(runtime, object)),
            other => Err(Error::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }
}

impl<V> Clone for ReactiveMap<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Debug for ReactiveMap<V>
where
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveMap")
            .field("id", &self.id())
            .field("entries", &*self.inner.entries.read())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
