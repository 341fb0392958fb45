//! Morph engine facade
//!
//! Ties a registry, a resolver and a configuration together behind the
//! registration, query, conversion and introspection calls an embedding
//! application uses.

use crate::config::MorphConfig;
use crate::converter::ComposedConverter;
use crate::defaults;
use crate::error::{ConversionError, MorphError};
use morph_adapter::{Adapter, AdapterError, AdapterRegistry, ConflictStrategy, Registration, RegistryError, Value};
use morph_graph::{PathResolver, StepDescriptor};
use morph_type::TypeIdentity;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;

/// Bidirectional type-adaptation engine
///
/// # Example
/// ```
/// use morph_adapter::AdapterError;
/// use morph_core::{Morph, MorphConfig};
/// use morph_type::TypeIdentity;
///
/// let morph = Morph::with_config(MorphConfig::new().with_default_adapters(false));
/// let int = TypeIdentity::named("Integer").unwrap();
/// let text = TypeIdentity::named("String").unwrap();
///
/// morph
///     .map(int.clone())
///     .bi(
///         text.clone(),
///         |i: i64| Ok(i.to_string()),
///         |s: String| s.parse::<i64>().map_err(AdapterError::from_error),
///     )
///     .unwrap();
///
/// let s: String = morph.convert_to(&int, &text, 12_i64).unwrap();
/// assert_eq!(s, "12");
/// let i: i64 = morph.reverse_to(&text, &int, s).unwrap();
/// assert_eq!(i, 12);
/// ```
#[derive(Debug)]
pub struct Morph {
    config: MorphConfig,
    resolver: PathResolver,
}

impl Morph {
    /// Create engine with the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MorphConfig::default())
    }

    /// Create engine with its own registry
    #[must_use]
    pub fn with_config(config: MorphConfig) -> Self {
        let registry = Arc::new(AdapterRegistry::with_strategy(config.conflict_strategy));
        Self::with_registry(registry, config)
    }

    /// Create engine over an existing registry
    ///
    /// Built-in adapters are added to that registry when the configuration
    /// asks for them, without replacing any existing route. The registry keeps
    /// its own conflict strategy; `config.conflict_strategy` is not applied to it.
    #[must_use]
    pub fn with_registry(registry: Arc<AdapterRegistry>, config: MorphConfig) -> Self {
        if registry.strategy() != config.conflict_strategy {
            tracing::debug!(
                registry = ?registry.strategy(),
                configured = ?config.conflict_strategy,
                "supplied registry keeps its own conflict strategy"
            );
        }
        if config.default_adapters {
            defaults::install(&registry);
        }
        let resolver = PathResolver::with_cache_capacity(registry, config.path_cache_capacity);
        tracing::debug!(?config, "morph engine created");
        Self { config, resolver }
    }

    /// Create engine from a TOML configuration file
    ///
    /// # Errors
    /// [`MorphError::Config`] when the file cannot be read or parsed.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, MorphError> {
        Ok(Self::with_config(MorphConfig::from_path(path)?))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Underlying registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<AdapterRegistry> {
        self.resolver.registry()
    }

    /// Underlying resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Register adapter using the configured conflict strategy
    ///
    /// # Errors
    /// [`RegistryError`] on duplicate routes or identity adapters.
    #[inline]
    pub fn register(&self, adapter: Adapter) -> Result<Registration, RegistryError> {
        self.registry().register(adapter)
    }

    /// Register adapter using an explicit conflict strategy
    ///
    /// # Errors
    /// As [`Morph::register`].
    #[inline]
    pub fn register_with(
        &self,
        adapter: Adapter,
        strategy: ConflictStrategy,
    ) -> Result<Registration, RegistryError> {
        self.registry().register_with(adapter, strategy)
    }

    /// Start a fluent registration from `source`
    #[inline]
    #[must_use]
    pub fn map(&self, source: TypeIdentity) -> MappingAction<'_> {
        MappingAction {
            morph: self,
            source,
            cost: None,
            lossless: false,
            strategy: None,
        }
    }

    /// Whether a path exists; runs no adapter
    #[inline]
    #[must_use]
    pub fn can_convert(&self, from: &TypeIdentity, into: &TypeIdentity) -> bool {
        self.resolver.can_resolve(from, into)
    }

    /// Converter for one (source, target) pair
    ///
    /// # Errors
    /// [`ConversionError::NoPathFound`] when no chain exists.
    pub fn converter(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
    ) -> Result<ComposedConverter, ConversionError> {
        let path = self.resolver.resolve(from, into)?;
        Ok(ComposedConverter::new(path).with_cycle_detection(self.config.detect_cycles))
    }

    /// Convert a value of `from` into `into`
    ///
    /// # Errors
    /// Resolution errors, or the first step failure.
    pub fn convert(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
        value: Value,
    ) -> Result<Value, ConversionError> {
        self.converter(from, into)?.convert(value)
    }

    /// Typed [`Morph::convert`]
    ///
    /// # Errors
    /// As [`Morph::convert`], plus [`ConversionError::UnexpectedOutput`].
    pub fn convert_to<S, T>(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
        input: S,
    ) -> Result<T, ConversionError>
    where
        S: Any + Send,
        T: Any + Send,
    {
        self.converter(from, into)?.convert_to(input)
    }

    /// Convert a value of `from` back into `into`
    ///
    /// Reverses the forward path `into → from`, so
    /// `reverse(b, a, convert(a, b, v)) == v` whenever every step is invertible.
    ///
    /// # Errors
    /// [`ConversionError::NoReversePath`] when no forward path exists,
    /// [`ConversionError::NonInvertiblePath`] when it holds a forward-only
    /// step, otherwise the first step failure.
    pub fn reverse(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
        value: Value,
    ) -> Result<Value, ConversionError> {
        self.reverse_converter(from, into)?.reverse(value)
    }

    /// Typed [`Morph::reverse`]
    ///
    /// # Errors
    /// As [`Morph::reverse`], plus [`ConversionError::UnexpectedOutput`].
    pub fn reverse_to<S, T>(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
        input: S,
    ) -> Result<T, ConversionError>
    where
        S: Any + Send,
        T: Any + Send,
    {
        self.reverse_converter(from, into)?.reverse_to(input)
    }

    fn reverse_converter(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
    ) -> Result<ComposedConverter, ConversionError> {
        self.converter(into, from).map_err(|error| match error {
            ConversionError::NoPathFound { .. } => ConversionError::NoReversePath {
                from: from.clone(),
                into: into.clone(),
            },
            other => other,
        })
    }

    /// Convert only along a path whose every step is lossless
    ///
    /// # Errors
    /// [`ConversionError::NoLosslessConversion`] before executing anything,
    /// otherwise as [`Morph::convert`].
    pub fn convert_lossless(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
        value: Value,
    ) -> Result<Value, ConversionError> {
        self.converter(from, into)?.convert_lossless(value)
    }

    /// Steps the engine would take; runs no adapter
    ///
    /// # Errors
    /// [`ConversionError::NoPathFound`] when no chain exists.
    pub fn describe_path(
        &self,
        from: &TypeIdentity,
        into: &TypeIdentity,
    ) -> Result<Vec<StepDescriptor>, ConversionError> {
        Ok(self.resolver.resolve(from, into)?.describe())
    }
}

impl Default for Morph {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent registration started by [`Morph::map`]
#[derive(Debug)]
#[must_use = "a mapping registers nothing until `to` or `bi` is called"]
pub struct MappingAction<'a> {
    morph: &'a Morph,
    source: TypeIdentity,
    cost: Option<u32>,
    lossless: bool,
    strategy: Option<ConflictStrategy>,
}

impl MappingAction<'_> {
    /// With explicit traversal cost
    #[inline]
    pub fn cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Mark as lossless
    #[inline]
    pub fn lossless(mut self) -> Self {
        self.lossless = true;
        self
    }

    /// With explicit conflict strategy
    #[inline]
    pub fn strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Register a forward-only adapter to `target`
    ///
    /// # Errors
    /// As [`Morph::register`].
    pub fn to<S, T, F>(self, target: TypeIdentity, forward: F) -> Result<Registration, RegistryError>
    where
        S: Any + Send,
        T: Any + Send,
        F: Fn(S) -> Result<T, AdapterError> + Send + Sync + 'static,
    {
        let adapter = Adapter::uni(self.source.clone(), target, forward);
        self.finish(adapter)
    }

    /// Register a bidirectional adapter to `target`
    ///
    /// # Errors
    /// As [`Morph::register`].
    pub fn bi<S, T, F, G>(
        self,
        target: TypeIdentity,
        forward: F,
        backward: G,
    ) -> Result<Registration, RegistryError>
    where
        S: Any + Send,
        T: Any + Send,
        F: Fn(S) -> Result<T, AdapterError> + Send + Sync + 'static,
        G: Fn(T) -> Result<S, AdapterError> + Send + Sync + 'static,
    {
        let adapter = Adapter::bi(self.source.clone(), target, forward, backward);
        self.finish(adapter)
    }

    fn finish(self, mut adapter: Adapter) -> Result<Registration, RegistryError> {
        if let Some(cost) = self.cost {
            adapter = adapter.with_cost(cost);
        }
        if self.lossless {
            adapter = adapter.lossless();
        }
        match self.strategy {
            Some(strategy) => self.morph.register_with(adapter, strategy),
            None => self.morph.register(adapter),
        }
    }
}
