//! Adapters between two type identities
//!
//! Provides [`Adapter`], an opaque and possibly failing transformation from a
//! source identity to a target identity, optionally paired with a backward
//! transformation.

use crate::value::Value;
use morph_type::TypeIdentity;
use std::any::{type_name, Any};
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cost assigned to adapters that do not declare one
pub const DEFAULT_COST: u32 = 1;

/// Type-erased transformation
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, AdapterError> + Send + Sync>;

static NEXT_ADAPTER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique adapter identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdapterId(u64);

impl AdapterId {
    fn next() -> Self {
        Self(NEXT_ADAPTER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an adapter can do
///
/// The only behavioural difference between adapters is whether a backward
/// transformation exists.
#[derive(Clone)]
pub enum Capability {
    /// Forward transformation only
    Forward(Transform),

    /// Forward and backward transformations
    Bidirectional {
        /// Source → target
        forward: Transform,
        /// Target → source
        backward: Transform,
    },
}

impl Capability {
    /// Whether a backward transformation is present
    #[inline]
    #[must_use]
    pub fn is_bidirectional(&self) -> bool {
        matches!(self, Self::Bidirectional { .. })
    }

    fn forward(&self) -> &Transform {
        match self {
            Self::Forward(forward) | Self::Bidirectional { forward, .. } => forward,
        }
    }

    fn backward(&self) -> Option<&Transform> {
        match self {
            Self::Forward(_) => None,
            Self::Bidirectional { backward, .. } => Some(backward),
        }
    }
}

impl Debug for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward(_) => f.write_str("Forward"),
            Self::Bidirectional { .. } => f.write_str("Bidirectional"),
        }
    }
}

/// Registered conversion step between two type identities
///
/// Immutable after construction. Cloning shares the transformations.
///
/// # Example
/// ```
/// use morph_adapter::{Adapter, AdapterError, Value};
/// use morph_type::TypeIdentity;
///
/// let int = TypeIdentity::named("i64").unwrap();
/// let text = TypeIdentity::named("String").unwrap();
/// let adapter = Adapter::bi(
///     int,
///     text,
///     |i: i64| Ok(i.to_string()),
///     |s: String| s.parse::<i64>().map_err(AdapterError::from_error),
/// );
///
/// let out = adapter.forward(Value::new(7_i64)).unwrap();
/// assert_eq!(out.downcast::<String>().unwrap(), "7");
/// ```
#[derive(Clone)]
pub struct Adapter {
    id: AdapterId,
    source: TypeIdentity,
    target: TypeIdentity,
    capability: Capability,
    cost: Option<u32>,
    lossless: bool,
}

impl Adapter {
    /// Create adapter from type-erased parts
    #[must_use]
    pub fn new(source: TypeIdentity, target: TypeIdentity, capability: Capability) -> Self {
        Self {
            id: AdapterId::next(),
            source,
            target,
            capability,
            cost: None,
            lossless: false,
        }
    }

    /// Create forward-only adapter from a typed closure
    #[must_use]
    pub fn uni<S, T, F>(source: TypeIdentity, target: TypeIdentity, forward: F) -> Self
    where
        S: Any + Send,
        T: Any + Send,
        F: Fn(S) -> Result<T, AdapterError> + Send + Sync + 'static,
    {
        Self::new(source, target, Capability::Forward(erase(forward)))
    }

    /// Create bidirectional adapter from typed closures
    #[must_use]
    pub fn bi<S, T, F, G>(source: TypeIdentity, target: TypeIdentity, forward: F, backward: G) -> Self
    where
        S: Any + Send,
        T: Any + Send,
        F: Fn(S) -> Result<T, AdapterError> + Send + Sync + 'static,
        G: Fn(T) -> Result<S, AdapterError> + Send + Sync + 'static,
    {
        Self::new(
            source,
            target,
            Capability::Bidirectional {
                forward: erase(forward),
                backward: erase(backward),
            },
        )
    }

    /// Declare an explicit traversal cost
    #[inline]
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Mark both directions as lossless
    #[inline]
    #[must_use]
    pub fn lossless(mut self) -> Self {
        self.lossless = true;
        self
    }

    /// Unique identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> AdapterId {
        self.id
    }

    /// Source identity
    #[inline]
    #[must_use]
    pub fn source(&self) -> &TypeIdentity {
        &self.source
    }

    /// Target identity
    #[inline]
    #[must_use]
    pub fn target(&self) -> &TypeIdentity {
        &self.target
    }

    /// Capability tag
    #[inline]
    #[must_use]
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Traversal cost ([`DEFAULT_COST`] unless declared)
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost.unwrap_or(DEFAULT_COST)
    }

    /// Whether a non-default cost was declared
    #[inline]
    #[must_use]
    pub fn has_custom_cost(&self) -> bool {
        self.cost.is_some_and(|cost| cost != DEFAULT_COST)
    }

    /// Whether the adapter was marked lossless
    #[inline]
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.lossless
    }

    /// Whether a backward transformation exists
    #[inline]
    #[must_use]
    pub fn has_backward(&self) -> bool {
        self.capability.is_bidirectional()
    }

    /// Whether source and target are the same identity
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// Apply the forward transformation
    ///
    /// # Errors
    /// Whatever the transformation reports.
    pub fn forward(&self, value: Value) -> Result<Value, AdapterError> {
        (self.capability.forward())(value)
    }

    /// Apply the backward transformation
    ///
    /// # Errors
    /// [`AdapterError::NotInvertible`] for forward-only adapters, otherwise
    /// whatever the transformation reports.
    pub fn backward(&self, value: Value) -> Result<Value, AdapterError> {
        let backward = self.capability.backward().ok_or(AdapterError::NotInvertible)?;
        backward(value)
    }
}

impl Debug for Adapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("capability", &self.capability)
            .field("cost", &self.cost())
            .field("lossless", &self.lossless)
            .finish()
    }
}

fn erase<S, T, F>(f: F) -> Transform
where
    S: Any + Send,
    T: Any + Send,
    F: Fn(S) -> Result<T, AdapterError> + Send + Sync + 'static,
{
    Arc::new(move |value: Value| {
        let input = value
            .downcast::<S>()
            .map_err(|value| AdapterError::unexpected_input::<S>(value.type_name()))?;
        f(input).map(Value::new)
    })
}

/// Failure inside a single adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// User transformation rejected the value
    #[error("{0}")]
    Failed(String),

    /// Value handed to the adapter has the wrong Rust type
    #[error("unexpected input: expected {expected}, found {found}")]
    UnexpectedInput {
        /// Rust type the adapter accepts
        expected: &'static str,
        /// Rust type it received
        found: &'static str,
    },

    /// Backward transformation requested on a forward-only adapter
    #[error("adapter has no backward transformation")]
    NotInvertible,
}

impl AdapterError {
    /// Create failure from a message
    #[inline]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Create failure from any error, keeping its message
    #[inline]
    pub fn from_error<E: std::error::Error>(error: E) -> Self {
        Self::Failed(error.to_string())
    }

    /// Create input mismatch error
    #[inline]
    #[must_use]
    pub fn unexpected_input<S>(found: &'static str) -> Self {
        Self::UnexpectedInput {
            expected: type_name::<S>(),
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> TypeIdentity {
        TypeIdentity::named(name).unwrap()
    }

    fn int_to_string() -> Adapter {
        Adapter::bi(
            id("Integer"),
            id("String"),
            |i: i64| Ok(i.to_string()),
            |s: String| s.parse::<i64>().map_err(AdapterError::from_error),
        )
    }

    #[test]
    fn adapter_forward() {
        let adapter = int_to_string();
        let out = adapter.forward(Value::new(5_i64)).unwrap();
        assert_eq!(out.downcast::<String>().unwrap(), "5");
    }

    #[test]
    fn adapter_backward() {
        let adapter = int_to_string();
        let out = adapter.backward(Value::new("12".to_string())).unwrap();
        assert_eq!(out.downcast::<i64>().unwrap(), 12);
    }

    #[test]
    fn adapter_backward_failure_is_reported() {
        let adapter = int_to_string();
        let err = adapter.backward(Value::new("twelve".to_string())).unwrap_err();
        assert!(matches!(err, AdapterError::Failed(_)));
    }

    #[test]
    fn uni_adapter_has_no_backward() {
        let adapter = Adapter::uni(id("A"), id("B"), |x: u8| Ok(u16::from(x)));
        assert!(!adapter.has_backward());
        let err = adapter.backward(Value::new(1_u16)).unwrap_err();
        assert_eq!(err, AdapterError::NotInvertible);
    }

    #[test]
    fn adapter_rejects_wrong_input_type() {
        let adapter = int_to_string();
        let err = adapter.forward(Value::new(5_i32)).unwrap_err();
        assert!(matches!(err, AdapterError::UnexpectedInput { .. }));
    }

    #[test]
    fn adapter_cost_defaults_to_unit() {
        let adapter = int_to_string();
        assert_eq!(adapter.cost(), DEFAULT_COST);
        assert!(!adapter.has_custom_cost());

        let weighted = int_to_string().with_cost(5);
        assert_eq!(weighted.cost(), 5);
        assert!(weighted.has_custom_cost());

        let explicit_unit = int_to_string().with_cost(DEFAULT_COST);
        assert!(!explicit_unit.has_custom_cost());
    }

    #[test]
    fn adapter_ids_are_unique() {
        let a = int_to_string();
        let b = int_to_string();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn adapter_lossless_marker() {
        assert!(!int_to_string().is_lossless());
        assert!(int_to_string().lossless().is_lossless());
    }

    #[test]
    fn adapter_identity_detection() {
        let adapter = Adapter::uni(id("A"), id("A"), |x: u8| Ok(x));
        assert!(adapter.is_identity());
    }
}
