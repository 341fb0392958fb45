//! Morph Type Identities
//!
//! Structural, hashable identities for logical types. They are the node keys
//! of the conversion graph and are always supplied by the caller; nothing in
//! the engine inspects Rust types to discover them.
//!
//! # Example
//!
//! ```rust
//! use morph_type::TypeIdentity;
//!
//! let a: TypeIdentity = "Map<String, i32>".parse().unwrap();
//! let b = TypeIdentity::new(
//!     "Map",
//!     vec![TypeIdentity::named("String").unwrap(), TypeIdentity::named("i32").unwrap()],
//! )
//! .unwrap();
//! assert_eq!(a, b);
//! assert!(TypeIdentity::parse("Map<String,").is_err());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builtin;
mod identity;

pub use identity::{TypeError, TypeIdentity, MAX_DEPTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
