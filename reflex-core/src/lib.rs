//! Reflex Core
//!
//! This crate provides a small, synchronous dependency-tracking runtime.
//! It implements:
//!
//! - Tracked objects (`ReactiveMap`, `ReactiveCell`)
//! - Effects that re-run when the properties they read change
//! - An explicit dependency registry with track/trigger operations
//!
//! # Architecture
//!
//! - `reactive`: tracked objects, effects, the registry and the runtime
//! - `config`: runtime configuration
//! - `error`: error types for constructing objects from serialized input
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! use reflex_core::reactive::{ReactiveMap, Runtime};
//!
//! let runtime = Runtime::new();
//! let product = ReactiveMap::from_entries(&runtime, [("price", 5i64), ("quantity", 2)]);
//! let total = Arc::new(AtomicI64::new(0));
//!
//! let (p, t) = (product.clone(), total.clone());
//! let effect = runtime.effect(move || {
//!     let price = p.get("price").unwrap_or(0);
//!     let quantity = p.get("quantity").unwrap_or(0);
//!     t.store(price * quantity, Ordering::SeqCst);
//! });
//! assert_eq!(total.load(Ordering::SeqCst), 10);
//!
//! product.set("quantity", 3);
//! assert_eq!(total.load(Ordering::SeqCst), 15);
//!
//! // Same value: the effect does not run again.
//! product.set("quantity", 3);
//! assert_eq!(effect.run_count(), 2);
//! ```

pub mod config;
pub mod error;
pub mod reactive;

pub use config::RuntimeConfig;
pub use error::{Error, Result};
