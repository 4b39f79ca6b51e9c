//! Effect Implementation
//!
//! An Effect is a recomputation callback: a zero-argument unit of work that
//! re-runs whenever a property it read during its last run is written with a
//! different value.
//!
//! # How Effects Work
//!
//! 1. When created through [`Runtime::effect`], the effect runs immediately.
//!    Every tracked read during that run registers the effect as a dependent.
//!
//! 2. When a dependency changes, the runtime re-runs the effect in full,
//!    synchronously, before the write that caused it returns.
//!
//! 3. Each re-run performs its reads again, re-registering the same
//!    dependencies (registration is idempotent) plus any new ones.
//!
//! # Lifetime
//!
//! The runtime owns the callback. Dropping an `Effect` handle does not stop
//! it; call [`Effect::stop`] to remove it from every dependency set. Old
//! dependencies are never cleared between runs, so an effect that stops
//! reading a property keeps being re-run when that property changes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use super::runtime::{Runtime, RuntimeInner};
use super::EffectId;

/// Shared state of an effect, owned by the runtime.
pub(crate) struct EffectInner {
    id: EffectId,

    /// The effect function.
    run: Box<dyn Fn() + Send + Sync>,

    /// Set once the effect is stopped. A stopped effect never runs again.
    stopped: AtomicBool,

    /// Number of completed runs.
    run_count: AtomicUsize,
}

impl EffectInner {
    pub(crate) fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: EffectId::new(),
            run: Box::new(run),
            stopped: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        }
    }

    pub(crate) fn id(&self) -> EffectId {
        self.id
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Call the effect body. The caller is responsible for the active slot.
    pub(crate) fn invoke(&self) {
        (self.run)();
        self.run_count.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

/// Handle to an effect registered with a [`Runtime`].
///
/// # Example
///
/// ```rust,ignore
/// let runtime = Runtime::new();
/// let product = ReactiveMap::from_entries(&runtime, [("price", 5), ("quantity", 2)]);
///
/// let p = product.clone();
/// let effect = runtime.effect(move || {
///     println!("total: {}", p.get("price").unwrap_or(0) * p.get("quantity").unwrap_or(0));
/// });
///
/// product.set("quantity", 3);  // Prints: "total: 15"
/// effect.stop();
/// product.set("quantity", 4);  // Prints nothing
/// ```
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectInner>,
    runtime: Weak<RuntimeInner>,
}

impl Effect {
    pub(crate) fn new(inner: Arc<EffectInner>, runtime: Weak<RuntimeInner>) -> Self {
        Self { inner, runtime }
    }

    /// Get the effect's unique ID.
    pub fn id(&self) -> EffectId {
        self.inner.id()
    }

    /// Run the effect again, tracking its reads.
    ///
    /// Does nothing if the effect is stopped or its runtime has been dropped.
    pub fn run(&self) {
        if let Some(runtime) = Runtime::upgrade(&self.runtime) {
            runtime.run_effect(&self.inner);
        }
    }

    /// Stop the effect and remove it from every dependency set.
    ///
    /// Returns `true` if the effect was still registered.
    pub fn stop(&self) -> bool {
        match Runtime::upgrade(&self.runtime) {
            Some(runtime) => runtime.stop(self.id()),
            None => {
                self.inner.mark_stopped();
                false
            }
        }
    }

    /// Check if the effect has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.is_stopped()
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count()
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id())
            .field("run_count", &self.run_count())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
