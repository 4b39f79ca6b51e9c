//! Integration Tests for Reactive System
//!
//! These tests verify that tracked objects, effects and the runtime work
//! together correctly.

use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::sync::Arc;

use reflex_core::reactive::{ObjectId, ReactiveMap, Runtime};
use reflex_core::RuntimeConfig;

fn product(runtime: &Runtime) -> ReactiveMap<i64> {
    ReactiveMap::from_entries(runtime, [("price", 5), ("quantity", 2)])
}

/// Effect that reads `key` from `map` and counts its runs.
fn counting_reader(runtime: &Runtime, map: &ReactiveMap<i64>, key: &'static str) -> Arc<AtomicI32> {
    let runs = Arc::new(AtomicI32::new(0));
    let (m, r) = (map.clone(), runs.clone());
    runtime.effect(move || {
        m.get(key);
        r.fetch_add(1, Ordering::SeqCst);
    });
    runs
}

/// The price/quantity walkthrough: total follows quantity, equal writes are ignored.
#[test]
fn total_follows_quantity() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let total = Arc::new(AtomicI64::new(0));

    let (p, t) = (product.clone(), total.clone());
    let effect = runtime.effect(move || {
        let price = p.get("price").unwrap_or(0);
        let quantity = p.get("quantity").unwrap_or(0);
        t.store(price * quantity, Ordering::SeqCst);
    });

    assert_eq!(total.load(Ordering::SeqCst), 10);
    assert_eq!(effect.run_count(), 1);

    product.set("quantity", 3);
    assert_eq!(total.load(Ordering::SeqCst), 15);
    assert_eq!(effect.run_count(), 2);

    product.set("quantity", 3);
    assert_eq!(total.load(Ordering::SeqCst), 15);
    assert_eq!(effect.run_count(), 2);
}

/// Reads outside any effect leave the registry untouched.
#[test]
fn read_without_run_is_inert() {
    let runtime = Runtime::new();
    let product = product(&runtime);

    product.get("price");
    product.get("missing");
    product.contains_key("quantity");
    runtime.track(ObjectId::new(), "anything");

    assert_eq!(runtime.tracked_pairs(), 0);
    assert!(runtime.current_effect().is_none());
}

/// A changing write re-runs a dependent exactly once.
#[test]
fn write_triggers_dependent_once() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let runs = counting_reader(&runtime, &product, "price");

    product.set("price", 6);

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Reading the same property many times registers once and re-runs once.
#[test]
fn repeated_reads_register_once() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let runs = Arc::new(AtomicI32::new(0));

    let (p, r) = (product.clone(), runs.clone());
    let effect = runtime.effect(move || {
        for _ in 0..5 {
            p.get("price");
        }
        r.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(runtime.dependents(product.id(), "price"), vec![effect.id()]);

    product.set("price", 8);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(runtime.dependency_count(product.id(), "price"), 1);
}

/// Writes to one object never reach effects registered only against another.
#[test]
fn objects_are_isolated() {
    let runtime = Runtime::new();
    let first = product(&runtime);
    let second = product(&runtime);
    let runs = counting_reader(&runtime, &first, "price");

    second.set("price", 100);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    first.set("price", 100);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Every registered dependent runs exactly once per changing write.
#[test]
fn all_dependents_run_once() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let counters: Vec<_> = (0..4)
        .map(|_| counting_reader(&runtime, &product, "quantity"))
        .collect();

    product.set("quantity", 9);

    for runs in &counters {
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}

/// A write inside an effect triggers other effects depth-first.
#[test]
fn nested_trigger_runs_depth_first() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let summary: ReactiveMap<i64> = ReactiveMap::new(&runtime);

    let (p, s) = (product.clone(), summary.clone());
    runtime.effect(move || {
        let total = p.get("price").unwrap_or(0) * p.get("quantity").unwrap_or(0);
        s.set("total", total);
    });

    let doubled = Arc::new(AtomicI64::new(0));
    let (s, d) = (summary.clone(), doubled.clone());
    runtime.effect(move || {
        d.store(s.get("total").unwrap_or(0) * 2, Ordering::SeqCst);
    });
    assert_eq!(doubled.load(Ordering::SeqCst), 20);

    product.set("price", 10);
    assert_eq!(summary.get_untracked("total"), Some(20));
    assert_eq!(doubled.load(Ordering::SeqCst), 40);
}

/// Stopping an effect removes it from every dependency set.
#[test]
fn stopped_effect_does_not_run() {
    let runtime = Runtime::new();
    let product = product(&runtime);
    let runs = Arc::new(AtomicI32::new(0));

    let (p, r) = (product.clone(), runs.clone());
    let effect = runtime.effect(move || {
        p.get("price");
        p.get("quantity");
        r.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(runtime.tracked_pairs(), 2);

    assert!(effect.stop());
    product.set("price", 1);
    product.set("quantity", 1);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.tracked_pairs(), 0);
}

/// Dependencies from earlier runs are kept, so stale reads still trigger.
#[test]
fn stale_dependencies_accumulate() {
    let runtime = Runtime::new();
    let form: ReactiveMap<i64> =
        ReactiveMap::from_entries(&runtime, [("use_discount", 1), ("discount", 3), ("price", 5)]);
    let runs = Arc::new(AtomicI32::new(0));

    let (f, r) = (form.clone(), runs.clone());
    runtime.effect(move || {
        if f.get("use_discount") == Some(1) {
            f.get("discount");
        } else {
            f.get("price");
        }
        r.fetch_add(1, Ordering::SeqCst);
    });

    form.set("use_discount", 0);
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    // No longer read, but still registered.
    form.set("discount", 4);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(runtime.tracked_pairs(), 3);
}

/// JSON-backed objects behave like typed ones.
#[test]
fn json_object_tracks_properties() {
    let runtime = Runtime::new();
    let form = ReactiveMap::from_json(&runtime, r#"{"title": "Gala", "category": null}"#).unwrap();
    let runs = Arc::new(AtomicI32::new(0));

    let (f, r) = (form.clone(), runs.clone());
    runtime.effect(move || {
        f.get("category");
        r.fetch_add(1, Ordering::SeqCst);
    });

    form.set("category", serde_json::json!("music"));
    form.set("category", serde_json::json!("music"));
    form.set("title", serde_json::json!("Gala 2"));

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Two mutually triggering effects terminate under a depth guard.
#[test]
fn depth_guard_bounds_mutual_triggering() {
    let runtime = Runtime::with_config(RuntimeConfig::new().with_max_trigger_depth(10));
    let state: ReactiveMap<i64> = ReactiveMap::from_entries(&runtime, [("a", 0), ("b", 0)]);

    let s = state.clone();
    let a_to_b = runtime.effect(move || {
        let a = s.get("a").unwrap_or(0);
        s.set("b", a + 1);
    });

    let s = state.clone();
    let b_to_a = runtime.effect(move || {
        let b = s.get("b").unwrap_or(0);
        s.set("a", b + 1);
    });

    assert!(a_to_b.run_count() > 1);
    assert!(b_to_a.run_count() > 1);
    assert!(state.get_untracked("a").unwrap() > 1);
}

/// Runtimes can be shared across threads; calls are serialized.
#[test]
fn runtime_is_shareable_across_threads() {
    let runtime = Runtime::new();
    let counter: ReactiveMap<i64> = ReactiveMap::from_entries(&runtime, [("hits", 0)]);
    let seen = Arc::new(AtomicI64::new(0));

    let (c, s) = (counter.clone(), seen.clone());
    let effect = runtime.effect(move || {
        s.store(c.get("hits").unwrap_or(0), Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let counter = counter.clone();
            std::thread::spawn(move || {
                for j in 0..25 {
                    counter.set(format!("t{i}"), j);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Only "hits" is a dependency, so nothing re-ran.
    assert_eq!(effect.run_count(), 1);
    assert_eq!(runtime.tracked_pairs(), 1);

    counter.set("hits", 7);
    assert_eq!(seen.load(Ordering::SeqCst), 7);
}
