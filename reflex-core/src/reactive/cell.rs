//! Reactive Cell
//!
//! A `ReactiveCell` is a tracked object with exactly one property, exposed
//! through typed accessors instead of string keys. It is the building block
//! for hosts that want a struct of tracked fields rather than a map.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use super::handle::TrackHandle;
use super::runtime::Runtime;
use super::ObjectId;

/// Property name under which a cell's value is tracked.
pub const CELL_KEY: &str = "value";

struct CellInner<T> {
    handle: TrackHandle,
    value: RwLock<T>,
}

/// A tracked single value.
///
/// # Example
///
/// ```rust,ignore
/// struct Cart {
///     price: ReactiveCell<u32>,
///     quantity: ReactiveCell<u32>,
/// }
///
/// let cart = Cart {
///     price: ReactiveCell::new(&runtime, 5),
///     quantity: ReactiveCell::new(&runtime, 2),
/// };
/// ```
pub struct ReactiveCell<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<CellInner<T>>,
}

impl<T> ReactiveCell<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new tracked cell holding `value`.
    pub fn new(runtime: &Runtime, value: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                handle: TrackHandle::new(runtime),
                value: RwLock::new(value),
            }),
        }
    }

    /// Get the identity of this tracked object.
    pub fn id(&self) -> ObjectId {
        self.inner.handle.id()
    }

    /// Get the current value, tracking it for the running effect.
    pub fn get(&self) -> T {
        self.inner.handle.track(CELL_KEY);
        self.get_untracked()
    }

    /// Get the current value without tracking.
    pub fn get_untracked(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Set a new value and return the old one.
    ///
    /// Dependents re-run only if the new value differs from the old.
    pub fn set(&self, value: T) -> T {
        let (previous, changed) = {
            let mut guard = self.inner.value.write();
            let changed = *guard != value;
            (std::mem::replace(&mut *guard, value), changed)
        };

        if changed {
            self.inner.handle.trigger(CELL_KEY);
        }

        previous
    }

    /// Update the value using a function. The read is not tracked.
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = f(&*self.inner.value.read());
        self.set(new_value)
    }
}

impl<T> Clone for ReactiveCell<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for ReactiveCell<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("id", &self.id())
            .field("value", &self.get_untracked())
            .finish()
    }
}
