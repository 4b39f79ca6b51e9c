//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects tracked objects and
//! effects. It owns the dependency registry and the active effect slot, and
//! re-runs effects when tracked properties change.
//!
//! # How It Works
//!
//! 1. [`Runtime::effect`] registers a callback and runs it once. While it
//!    runs, it occupies the runtime's active slot.
//!
//! 2. Every tracked read calls [`Runtime::track`], which records that the
//!    effect in the active slot depends on (object, property).
//!
//! 3. Every tracked write that changes a value calls [`Runtime::trigger`],
//!    which re-runs each effect registered against (object, property),
//!    depth-first, on the caller's stack.
//!
//! # Thread Safety
//!
//! A runtime behaves as a single logical thread. Track, trigger, effect runs
//! and untracked sections are serialized by a reentrant execution lock, so
//! concurrent callers block while nested triggering on the running thread
//! re-enters. The registry lock is never held while user code runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use smallvec::SmallVec;

use super::context::ActiveSlot;
use super::effect::{Effect, EffectInner};
use super::registry::DependencyRegistry;
use super::{EffectId, ObjectId};
use crate::config::RuntimeConfig;

/// Effects collected by a single trigger. Most properties have few dependents.
type Dependents = SmallVec<[Arc<EffectInner>; 4]>;

pub(crate) struct RuntimeInner {
    config: RuntimeConfig,

    /// Serializes all tracking and effect execution.
    exec: ReentrantMutex<()>,

    /// The effect currently running, if any.
    active: ActiveSlot,

    registry: Mutex<DependencyRegistry>,

    /// Every live effect. The runtime owns the callbacks.
    effects: Mutex<HashMap<EffectId, Arc<EffectInner>>>,

    /// Number of effect runs currently on the stack.
    depth: AtomicUsize,
}

/// Handle to a reactive runtime.
///
/// Cloning the handle shares the runtime. Independent runtimes have separate
/// registries and active slots and never trigger each other's effects.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

/// Decrements the run depth when an effect run ends, even by panic.
struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with the given configuration.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                config,
                exec: ReentrantMutex::new(()),
                active: ActiveSlot::new(),
                registry: Mutex::new(DependencyRegistry::new()),
                effects: Mutex::new(HashMap::new()),
                depth: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<RuntimeInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<RuntimeInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Get a handle that does not keep the runtime alive.
    ///
    /// Effects that call back into the runtime should capture this instead
    /// of a `Runtime` clone.
    pub fn weak(&self) -> WeakRuntime {
        WeakRuntime {
            inner: self.downgrade(),
        }
    }

    /// Get the runtime's configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Register an effect and run it once to collect its dependencies.
    ///
    /// The runtime owns `run` until the effect is stopped. A callback that
    /// captures a `Runtime` clone forms a reference cycle, and the runtime,
    /// its effects and their captured objects are then never freed. Capture
    /// [`Runtime::weak`] instead.
    pub fn effect<F>(&self, run: F) -> Effect
    where
        F: Fn() + Send + Sync + 'static,
    {
        let effect = Arc::new(EffectInner::new(run));
        self.inner
            .effects
            .lock()
            .insert(effect.id(), Arc::clone(&effect));

        self.run_effect(&effect);

        Effect::new(effect, self.downgrade())
    }

    /// Run an effect with it occupying the active slot.
    pub(crate) fn run_effect(&self, effect: &EffectInner) {
        if effect.is_stopped() {
            return;
        }

        let _exec = self.inner.exec.lock();

        let depth = self.inner.depth.fetch_add(1, Ordering::SeqCst) + 1;
        let _depth = DepthGuard(&self.inner.depth);

        if let Some(max) = self.inner.config.max_trigger_depth {
            if depth > max {
                tracing::warn!(
                    runtime = %self.inner.config.name,
                    effect = %effect.id(),
                    depth,
                    max,
                    "effect run skipped: trigger depth exceeded"
                );
                return;
            }
        }

        let _active = self.inner.active.enter(Some(effect.id()));
        tracing::trace!(
            runtime = %self.inner.config.name,
            effect = %effect.id(),
            depth,
            "running effect"
        );

        effect.invoke();
    }

    /// Record that the running effect depends on (`object`, `key`).
    ///
    /// Does nothing when no effect is running, or when the running effect
    /// has been stopped part-way through its run. Tracking the same pair
    /// twice from one effect registers it once.
    pub fn track(&self, object: ObjectId, key: &str) {
        let _exec = self.inner.exec.lock();

        let Some(effect) = self.inner.active.current() else {
            return;
        };
        if !self.inner.effects.lock().contains_key(&effect) {
            return;
        }

        let added = self.inner.registry.lock().insert(object, key, effect);
        if added {
            tracing::trace!(
                runtime = %self.inner.config.name,
                %object,
                key,
                %effect,
                "dependency registered"
            );
        }
    }

    /// Re-run every effect registered against (`object`, `key`).
    ///
    /// Effects run synchronously in registration order. Effects registered
    /// while the trigger is in progress are not part of this trigger.
    pub fn trigger(&self, object: ObjectId, key: &str) {
        let _exec = self.inner.exec.lock();

        let ids: SmallVec<[EffectId; 4]> =
            self.inner.registry.lock().dependents(object, key).collect();
        if ids.is_empty() {
            return;
        }

        let dependents: Dependents = {
            let effects = self.inner.effects.lock();
            ids.iter().filter_map(|id| effects.get(id).cloned()).collect()
        };

        tracing::debug!(
            runtime = %self.inner.config.name,
            %object,
            key,
            dependents = dependents.len(),
            "trigger"
        );

        for effect in &dependents {
            self.run_effect(effect);
        }
    }

    /// Stop an effect and remove it from every dependency set.
    ///
    /// Returns `true` if the effect was registered with this runtime.
    pub fn stop(&self, effect: EffectId) -> bool {
        let _exec = self.inner.exec.lock();

        let removed = self.inner.effects.lock().remove(&effect);
        let Some(removed) = removed else {
            return false;
        };
        removed.mark_stopped();

        let pairs = self.inner.registry.lock().remove_effect(effect);
        tracing::debug!(
            runtime = %self.inner.config.name,
            %effect,
            pairs,
            "effect stopped"
        );

        // The callback may own tracked objects whose release locks the
        // registry, so it is dropped only after the lock above is gone.
        drop(removed);
        true
    }

    /// Drop every registry entry for `object`.
    ///
    /// Tracked objects call this when their last handle is dropped. Hosts
    /// driving [`track`](Self::track) with their own IDs call it themselves.
    pub fn release(&self, object: ObjectId) {
        let _exec = self.inner.exec.lock();

        if self.inner.registry.lock().remove_object(object) {
            tracing::debug!(
                runtime = %self.inner.config.name,
                %object,
                "tracked object released"
            );
        }
    }

    /// Run `f` with no effect current, so its reads register nothing.
    pub fn untracked<R>(&self, f: impl FnOnce() -> R) -> R {
        let _exec = self.inner.exec.lock();
        let _active = self.inner.active.enter(None);
        f()
    }

    /// Get the effect currently running, if any.
    ///
    /// Blocks while another thread is running an effect on this runtime, so
    /// a caller on a different thread never sees that thread's effect.
    pub fn current_effect(&self) -> Option<EffectId> {
        let _exec = self.inner.exec.lock();
        self.inner.active.current()
    }

    /// Get the effects registered against (`object`, `key`), in registration order.
    pub fn dependents(&self, object: ObjectId, key: &str) -> Vec<EffectId> {
        self.inner.registry.lock().dependents(object, key).collect()
    }

    /// Get the number of effects registered against (`object`, `key`).
    pub fn dependency_count(&self, object: ObjectId, key: &str) -> usize {
        self.inner.registry.lock().dependency_count(object, key)
    }

    /// Get the total number of (object, property) pairs with dependents.
    pub fn tracked_pairs(&self) -> usize {
        self.inner.registry.lock().tracked_pairs()
    }

    /// Get the number of live (not stopped) effects.
    pub fn effect_count(&self) -> usize {
        self.inner.effects.lock().len()
    }
}

/// Non-owning handle to a [`Runtime`].
///
/// Obtained from [`Runtime::weak`]. Every method does nothing once the
/// runtime has been dropped.
#[derive(Clone, Default)]
pub struct WeakRuntime {
    inner: Weak<RuntimeInner>,
}

impl WeakRuntime {
    /// Get a strong handle, if the runtime is still alive.
    pub fn upgrade(&self) -> Option<Runtime> {
        Runtime::upgrade(&self.inner)
    }

    /// Forward to [`Runtime::track`].
    pub fn track(&self, object: ObjectId, key: &str) {
        if let Some(runtime) = self.upgrade() {
            runtime.track(object, key);
        }
    }

    /// Forward to [`Runtime::trigger`].
    pub fn trigger(&self, object: ObjectId, key: &str) {
        if let Some(runtime) = self.upgrade() {
            runtime.trigger(object, key);
        }
    }

    /// Forward to [`Runtime::untracked`]. Runs `f` directly if the runtime is gone.
    pub fn untracked<R>(&self, f: impl FnOnce() -> R) -> R {
        match self.upgrade() {
            Some(runtime) => runtime.untracked(f),
            None => f(),
        }
    }
}

impl std::fmt::Debug for WeakRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakRuntime")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("name", &self.inner.config.name)
            .field("effect_count", &self.effect_count())
            .field("tracked_pairs", &self.tracked_pairs())
            .finish()
    }
}
