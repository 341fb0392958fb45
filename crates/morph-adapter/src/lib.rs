//! Morph Adapters
//!
//! Registered conversion steps and the registry that stores them.
//!
//! # Core Concepts
//!
//! - [`Value`]: Type-erased value handed between adapters
//! - [`Adapter`]: Forward transformation with an optional backward one
//! - [`Capability`]: Forward-only or bidirectional
//! - [`AdapterRegistry`]: Append-only storage keyed by (source, target)
//! - [`ConflictStrategy`]: Fail, ignore or override on duplicate routes
//!
//! # Example
//!
//! ```rust
//! use morph_adapter::{Adapter, AdapterRegistry, Registration};
//! use morph_type::TypeIdentity;
//!
//! let registry = AdapterRegistry::new();
//! let int = TypeIdentity::named("Integer").unwrap();
//! let text = TypeIdentity::named("String").unwrap();
//!
//! let outcome = registry
//!     .register(Adapter::uni(int.clone(), text.clone(), |i: i64| Ok(i.to_string())))
//!     .unwrap();
//! assert_eq!(outcome, Registration::Added);
//! assert!(registry.contains(&int, &text));
//! assert!(registry.register(Adapter::uni(int, text, |i: i64| Ok(i.to_string()))).is_err());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod adapter;
mod registry;
mod value;

pub use adapter::{Adapter, AdapterError, AdapterId, Capability, Transform, DEFAULT_COST};
pub use registry::{
    AdapterRegistry, ConflictStrategy, Registration, RegistryError, RegistrySnapshot,
};
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
