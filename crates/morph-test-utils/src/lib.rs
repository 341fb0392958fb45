//! Testing utilities for the Morph workspace
//!
//! Shared identities, adapters and registries used across crate tests.

#![allow(missing_docs)]

use morph_adapter::{Adapter, AdapterError, AdapterRegistry};
use morph_type::TypeIdentity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn id(name: &str) -> TypeIdentity {
    TypeIdentity::parse(name).unwrap()
}

pub fn integer() -> TypeIdentity {
    id("Integer")
}

pub fn string() -> TypeIdentity {
    id("String")
}

pub fn double() -> TypeIdentity {
    id("Double")
}

/// Integer ⇄ String via `to_string` / `parse`
pub fn integer_to_string() -> Adapter {
    Adapter::bi(
        integer(),
        string(),
        |i: i64| Ok(i.to_string()),
        |s: String| s.parse::<i64>().map_err(AdapterError::from_error),
    )
}

/// String ⇄ Double via `parse` / `to_string`
pub fn string_to_double() -> Adapter {
    Adapter::bi(
        string(),
        double(),
        |s: String| s.parse::<f64>().map_err(AdapterError::from_error),
        |d: f64| Ok(d.to_string()),
    )
}

/// Registry holding Integer → String → Double
pub fn example_registry() -> Arc<AdapterRegistry> {
    let registry = Arc::new(AdapterRegistry::new());
    registry.register(integer_to_string()).unwrap();
    registry.register(string_to_double()).unwrap();
    registry
}

/// Forward-only `i64` adapter adding `delta`
pub fn add(from: &str, into: &str, delta: i64) -> Adapter {
    Adapter::uni(id(from), id(into), move |x: i64| Ok(x + delta))
}

/// Invertible `i64` adapter adding `delta` forward, subtracting backward
pub fn shift(from: &str, into: &str, delta: i64) -> Adapter {
    Adapter::bi(
        id(from),
        id(into),
        move |x: i64| Ok(x + delta),
        move |x: i64| Ok(x - delta),
    )
}

/// Adapter that always fails forward
pub fn failing(from: &str, into: &str, message: &'static str) -> Adapter {
    Adapter::bi(
        id(from),
        id(into),
        move |_: i64| Err::<i64, _>(AdapterError::msg(message)),
        |x: i64| Ok(x),
    )
}

/// Invocation counters for [`counting`] adapters
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub forward: Arc<AtomicUsize>,
    pub backward: Arc<AtomicUsize>,
}

impl Calls {
    pub fn forward(&self) -> usize {
        self.forward.load(Ordering::SeqCst)
    }

    pub fn backward(&self) -> usize {
        self.backward.load(Ordering::SeqCst)
    }
}

/// `i64` pass-through adapter recording how often each side runs
pub fn counting(from: &str, into: &str, invertible: bool, calls: &Calls) -> Adapter {
    let forward = Arc::clone(&calls.forward);
    let forward = move |x: i64| {
        forward.fetch_add(1, Ordering::SeqCst);
        Ok::<_, AdapterError>(x)
    };
    if invertible {
        let backward = Arc::clone(&calls.backward);
        Adapter::bi(id(from), id(into), forward, move |x: i64| {
            backward.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AdapterError>(x)
        })
    } else {
        Adapter::uni(id(from), id(into), forward)
    }
}
