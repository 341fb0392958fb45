//! Morph Core Engine
//!
//! Bidirectional type adaptation: given a value of one type identity and a
//! desired type identity, find a chain of registered adapters between them,
//! run it, and run it backwards for the inverse conversion.
//!
//! # Core Concepts
//!
//! - [`Morph`]: Engine facade for registration, query, conversion and introspection
//! - [`ComposedConverter`]: Executable adapter chain for one (source, target) pair
//! - [`MorphConfig`]: Cache capacity, conflict strategy, built-ins, cycle detection
//! - [`ConversionError`]: Everything that can fail after registration
//!
//! # Example
//!
//! ```rust
//! use morph_core::Morph;
//! use morph_type::builtin;
//!
//! let morph = Morph::new();
//! let wide: f64 = morph.convert_to(&builtin::I8, &builtin::F64, -3_i8).unwrap();
//! assert_eq!(wide, -3.0);
//!
//! let chars: Vec<char> = morph
//!     .convert_to(&builtin::STRING, &builtin::CHAR_VEC, "ok".to_string())
//!     .unwrap();
//! assert_eq!(chars, vec!['o', 'k']);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod converter;
pub mod defaults;
mod engine;
mod error;

pub use config::MorphConfig;
pub use converter::ComposedConverter;
pub use engine::{MappingAction, Morph};
pub use error::{ConfigError, ConversionError, MorphError, Result};

pub use morph_adapter::{
    Adapter, AdapterError, AdapterRegistry, Capability, ConflictStrategy, Registration,
    RegistryError, Value,
};
pub use morph_graph::{Direction, PathResolver, ResolveError, ResolvedPath, StepDescriptor};
pub use morph_type::{TypeError, TypeIdentity};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
