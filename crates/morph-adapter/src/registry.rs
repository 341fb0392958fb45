//! Adapter registry
//!
//! Provides [`AdapterRegistry`], append-only storage of adapters keyed by
//! (source, target) with deterministic registration order.
//!
//! Readers always see a complete [`RegistrySnapshot`]; writers build the next
//! snapshot aside and swap it in under the write lock.

use crate::adapter::Adapter;
use indexmap::IndexMap;
use morph_type::TypeIdentity;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What to do when a (source, target) pair is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Reject the newer adapter with [`RegistryError::DuplicateAdapter`]
    #[default]
    Fail,

    /// Keep the older adapter, silently drop the newer one
    Ignore,

    /// Replace the older adapter (last write wins)
    Override,
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New route stored
    Added,

    /// Existing route replaced
    Replaced,

    /// Existing route kept, new adapter dropped
    Ignored,
}

impl Registration {
    /// Whether the registry topology changed
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Added | Self::Replaced)
    }
}

/// Immutable view of the registry at one version
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    version: u64,

    /// Adapters by registration slot
    adapters: Vec<Arc<Adapter>>,

    /// (source, target) → slot
    routes: IndexMap<(TypeIdentity, TypeIdentity), usize>,

    /// source → slots, in registration order
    by_source: IndexMap<TypeIdentity, Vec<usize>>,
}

impl RegistrySnapshot {
    /// Version this snapshot was published at
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All adapters in registration order
    #[inline]
    #[must_use]
    pub fn adapters(&self) -> &[Arc<Adapter>] {
        &self.adapters
    }

    /// Adapters whose source matches, in registration order
    #[must_use]
    pub fn adapters_from(&self, source: &TypeIdentity) -> Vec<Arc<Adapter>> {
        self.by_source
            .get(source)
            .map(|slots| slots.iter().map(|&slot| Arc::clone(&self.adapters[slot])).collect())
            .unwrap_or_default()
    }

    /// Adapter registered for an exact route
    #[must_use]
    pub fn get(&self, source: &TypeIdentity, target: &TypeIdentity) -> Option<&Arc<Adapter>> {
        self.routes
            .get(&(source.clone(), target.clone()))
            .map(|&slot| &self.adapters[slot])
    }

    /// Number of registered adapters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Check if nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Append-only adapter storage
///
/// Thread-safe: `register` is serialised by a write lock, reads only clone the
/// current snapshot pointer and never observe a half-applied registration.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
    strategy: ConflictStrategy,
}

impl AdapterRegistry {
    /// Create empty registry that rejects duplicates
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty registry with a default conflict strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(strategy: ConflictStrategy) -> Self {
        Self {
            current: RwLock::default(),
            strategy,
        }
    }

    /// Default conflict strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> ConflictStrategy {
        self.strategy
    }

    /// Register adapter using the default conflict strategy
    ///
    /// # Errors
    /// See [`AdapterRegistry::register_with`].
    #[inline]
    pub fn register(&self, adapter: Adapter) -> Result<Registration, RegistryError> {
        self.register_with(adapter, self.strategy)
    }

    /// Register adapter using an explicit conflict strategy
    ///
    /// # Errors
    /// - [`RegistryError::IdentityAdapterRejected`] if source equals target
    /// - [`RegistryError::DuplicateAdapter`] if the route exists and the
    ///   strategy is [`ConflictStrategy::Fail`]
    ///
    /// Errors leave the registry untouched.
    pub fn register_with(
        &self,
        adapter: Adapter,
        strategy: ConflictStrategy,
    ) -> Result<Registration, RegistryError> {
        if adapter.is_identity() {
            return Err(RegistryError::IdentityAdapterRejected(adapter.source().clone()));
        }

        let route = (adapter.source().clone(), adapter.target().clone());
        let mut current = self.current.write();

        let existing = current.routes.get(&route).copied();
        let outcome = match (existing, strategy) {
            (Some(_), ConflictStrategy::Fail) => {
                return Err(RegistryError::DuplicateAdapter {
                    from: route.0,
                    into: route.1,
                });
            }
            (Some(_), ConflictStrategy::Ignore) => Registration::Ignored,
            (Some(_), ConflictStrategy::Override) => Registration::Replaced,
            (None, _) => Registration::Added,
        };

        if outcome.changed() {
            let mut next = RegistrySnapshot::clone(&current);
            let adapter = Arc::new(adapter);
            match existing {
                Some(slot) => next.adapters[slot] = adapter,
                None => {
                    let slot = next.adapters.len();
                    next.adapters.push(adapter);
                    next.by_source.entry(route.0.clone()).or_default().push(slot);
                    next.routes.insert(route.clone(), slot);
                }
            }
            next.version += 1;
            *current = Arc::new(next);
        }

        tracing::debug!(
            from = %route.0,
            into = %route.1,
            ?outcome,
            version = current.version,
            "adapter registration"
        );

        Ok(outcome)
    }

    /// Consistent snapshot of every registered adapter
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Adapters whose source matches, in registration order
    #[inline]
    #[must_use]
    pub fn adapters_from(&self, source: &TypeIdentity) -> Vec<Arc<Adapter>> {
        self.snapshot().adapters_from(source)
    }

    /// Every adapter in registration order
    #[inline]
    #[must_use]
    pub fn all_adapters(&self) -> Vec<Arc<Adapter>> {
        self.snapshot().adapters().to_vec()
    }

    /// Adapter registered for an exact route
    #[must_use]
    pub fn get(&self, source: &TypeIdentity, target: &TypeIdentity) -> Option<Arc<Adapter>> {
        self.snapshot().get(source, target).cloned()
    }

    /// Check if a route has an adapter
    #[inline]
    #[must_use]
    pub fn contains(&self, source: &TypeIdentity, target: &TypeIdentity) -> bool {
        self.snapshot().get(source, target).is_some()
    }

    /// Current version (bumped on every topology change)
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Number of registered adapters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration-time structural errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Route already has an adapter
    #[error("duplicate adapter registration for route '{from}' -> '{into}'")]
    DuplicateAdapter {
        /// Source identity
        from: TypeIdentity,
        /// Target identity
        into: TypeIdentity,
    },

    /// Source and target are the same identity
    #[error("identity adapter rejected for '{0}': identity conversion needs no adapter")]
    IdentityAdapterRejected(TypeIdentity),
}
