//! Reactive Primitives
//!
//! This module implements dependency tracking: tracked objects, effects, and
//! the runtime that connects them.
//!
//! # Concepts
//!
//! ## Tracked Objects
//!
//! A tracked object is a data container whose property reads and writes are
//! observed. [`ReactiveMap`] tracks arbitrary string-keyed properties;
//! [`ReactiveCell`] tracks a single typed value. Identity matters: two objects
//! holding equal data are tracked separately.
//!
//! ## Effects
//!
//! An [`Effect`] is a recomputation callback. It runs once when created, and
//! every tracked property it reads while running becomes a dependency. When a
//! dependency is written with a different value, the effect runs again.
//!
//! ## Track and Trigger
//!
//! Reads call [`Runtime::track`], which records that the running effect
//! depends on (object, property). Writes call [`Runtime::trigger`], which
//! re-runs every effect recorded against (object, property).
//!
//! # Implementation Notes
//!
//! Each [`Runtime`] owns a single active-effect slot and a dependency
//! registry, so several independent reactive graphs can coexist. Everything
//! runs synchronously on the caller's stack: no batching, no deduplication,
//! no deferred scheduling.

mod cell;
mod context;
mod effect;
mod handle;
mod ids;
mod map;
mod registry;
mod runtime;

pub use cell::{ReactiveCell, CELL_KEY};
pub use context::{ActiveGuard, ActiveSlot};
pub use effect::Effect;
pub use ids::{EffectId, ObjectId};
pub use map::ReactiveMap;
pub use registry::DependencyRegistry;
pub use runtime::{Runtime, WeakRuntime};
