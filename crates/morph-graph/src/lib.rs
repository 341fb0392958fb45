//! Morph Resolution Graph
//!
//! Derived graph over registered adapters and the resolver that searches it.
//!
//! # Core Concepts
//!
//! - [`ResolutionGraph`]: Immutable adjacency view of one registry version
//! - [`PathResolver`]: Lazy rebuild, BFS or Dijkstra search, path cache
//! - [`ResolvedPath`]: Ordered [`Step`]s from source to target
//! - [`Direction`]: Whether a step uses an adapter's forward or backward side
//!
//! # Example
//!
//! ```rust
//! use morph_adapter::{Adapter, AdapterRegistry};
//! use morph_graph::PathResolver;
//! use morph_type::TypeIdentity;
//! use std::sync::Arc;
//!
//! let a = TypeIdentity::named("A").unwrap();
//! let b = TypeIdentity::named("B").unwrap();
//! let c = TypeIdentity::named("C").unwrap();
//!
//! let registry = Arc::new(AdapterRegistry::new());
//! registry.register(Adapter::uni(a.clone(), b.clone(), |x: i32| Ok(x + 1))).unwrap();
//! registry.register(Adapter::uni(b, c.clone(), |x: i32| Ok(x * 2))).unwrap();
//!
//! let resolver = PathResolver::new(registry);
//! let path = resolver.resolve(&a, &c).unwrap();
//! assert_eq!(path.to_string(), "A -> B -> C");
//! assert!(resolver.resolve(&c, &a).is_err());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod graph;
mod path;
mod resolver;
mod search;

pub use error::ResolveError;
pub use graph::ResolutionGraph;
pub use path::{Direction, ResolvedPath, Step, StepDescriptor};
pub use resolver::{PathResolver, DEFAULT_CACHE_CAPACITY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
