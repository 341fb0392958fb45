//! Path resolver
//!
//! Lazily (re)builds the [`ResolutionGraph`] whenever the registry version
//! moves, and caches resolved paths per (source, target, graph version).

use crate::error::ResolveError;
use crate::graph::ResolutionGraph;
use crate::path::ResolvedPath;
use crate::search;
use moka::sync::Cache;
use morph_adapter::AdapterRegistry;
use morph_type::TypeIdentity;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// Default number of cached paths
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

type RouteKey = (TypeIdentity, TypeIdentity, u64);

/// Finds adapter chains between type identities
///
/// Safe to share across threads. Readers never observe a half-built graph:
/// a rebuild runs aside and is swapped in, at most one per version.
pub struct PathResolver {
    registry: Arc<AdapterRegistry>,
    graph: RwLock<Arc<ResolutionGraph>>,
    rebuild: Mutex<()>,
    cache: Option<Cache<RouteKey, Arc<ResolvedPath>>>,
}

impl PathResolver {
    /// Create resolver with the default cache capacity
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self::with_cache_capacity(registry, DEFAULT_CACHE_CAPACITY)
    }

    /// Create resolver with an explicit cache capacity (0 disables caching)
    #[must_use]
    pub fn with_cache_capacity(registry: Arc<AdapterRegistry>, capacity: u64) -> Self {
        Self {
            registry,
            graph: RwLock::new(Arc::new(ResolutionGraph::empty())),
            rebuild: Mutex::new(()),
            cache: (capacity > 0).then(|| Cache::new(capacity)),
        }
    }

    /// Registry this resolver reads from
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<AdapterRegistry> {
        &self.registry
    }

    /// Graph matching the current registry version
    #[must_use]
    pub fn graph(&self) -> Arc<ResolutionGraph> {
        {
            let current = self.graph.read();
            if current.version() == self.registry.version() {
                return Arc::clone(&current);
            }
        }

        let _rebuilding = self.rebuild.lock();

        // Another resolver may have finished the rebuild while we waited
        let snapshot = self.registry.snapshot();
        {
            let current = self.graph.read();
            if current.version() == snapshot.version() {
                return Arc::clone(&current);
            }
        }

        let rebuilt = Arc::new(ResolutionGraph::build(&snapshot));
        *self.graph.write() = Arc::clone(&rebuilt);
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
        rebuilt
    }

    /// Resolve the path from `from` to `into`
    ///
    /// Identical identities resolve to the empty path without consulting the
    /// graph. No adapter is executed.
    ///
    /// # Errors
    /// [`ResolveError::NoPathFound`] when no chain connects the two.
    pub fn resolve(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
    ) -> Result<Arc<ResolvedPath>, ResolveError> {
        if from == into {
            return Ok(Arc::new(ResolvedPath::identity(from.clone())));
        }

        let graph = self.graph();
        let key = (from.clone(), into.clone(), graph.version());
        if let Some(cache) = &self.cache {
            if let Some(path) = cache.get(&key) {
                tracing::trace!(%from, %into, "path cache hit");
                return Ok(path);
            }
        }

        let Some(steps) = search::shortest_path(&graph, from, into) else {
            tracing::debug!(%from, %into, version = graph.version(), "no conversion path");
            return Err(ResolveError::no_path(from, into));
        };

        let path = Arc::new(ResolvedPath::new(from.clone(), into.clone(), steps));
        tracing::debug!(
            %from,
            %into,
            steps = path.len(),
            cost = path.cost(),
            version = graph.version(),
            "resolved conversion path"
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::clone(&path));
        }
        Ok(path)
    }

    /// Search a path leading from `target` back to `source`
    ///
    /// Uses the same graph, so only backward transformations and adapters
    /// registered in that direction are eligible.
    ///
    /// # Errors
    /// [`ResolveError::NoReversePath`] when no chain exists.
    pub fn resolve_reverse(
        &self,
        target: &TypeIdentity,
        source: &TypeIdentity,
    ) -> Result<Arc<ResolvedPath>, ResolveError> {
        self.resolve(target, source).map_err(|error| match error {
            ResolveError::NoPathFound { from, into } => ResolveError::NoReversePath { from, into },
            other => other,
        })
    }

    /// Check if a path exists
    #[inline]
    #[must_use]
    pub fn can_resolve(&self, from: &TypeIdentity, into: &TypeIdentity) -> bool {
        self.resolve(from, into).is_ok()
    }

    /// Drop every cached path
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver")
            .field("registry_version", &self.registry.version())
            .field("graph_version", &self.graph.read().version())
            .field("cache_enabled", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
