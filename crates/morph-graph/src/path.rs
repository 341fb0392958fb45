//! Resolved paths
//!
//! A [`ResolvedPath`] is the ordered list of [`Step`]s connecting a source to a
//! target. Each step is one adapter traversed in one [`Direction`].

use crate::error::ResolveError;
use morph_adapter::{Adapter, AdapterError, AdapterId, Value};
use morph_type::TypeIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which of an adapter's transformations a step uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Adapter source → adapter target
    Forward,

    /// Adapter target → adapter source (synthesized reverse edge)
    Backward,
}

impl Direction {
    /// Opposite direction
    #[inline]
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// One adapter traversal
#[derive(Debug, Clone)]
pub struct Step {
    adapter: Arc<Adapter>,
    direction: Direction,
}

impl Step {
    /// Traverse adapter source → target
    #[inline]
    #[must_use]
    pub fn forward(adapter: Arc<Adapter>) -> Self {
        Self {
            adapter,
            direction: Direction::Forward,
        }
    }

    /// Traverse adapter target → source
    ///
    /// Returns `None` for forward-only adapters.
    #[must_use]
    pub fn backward(adapter: Arc<Adapter>) -> Option<Self> {
        adapter.has_backward().then_some(Self {
            adapter,
            direction: Direction::Backward,
        })
    }

    /// Underlying adapter
    #[inline]
    #[must_use]
    pub fn adapter(&self) -> &Arc<Adapter> {
        &self.adapter
    }

    /// Traversal direction
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Identity this step consumes
    #[must_use]
    pub fn from(&self) -> &TypeIdentity {
        match self.direction {
            Direction::Forward => self.adapter.source(),
            Direction::Backward => self.adapter.target(),
        }
    }

    /// Identity this step produces
    #[must_use]
    pub fn into(&self) -> &TypeIdentity {
        match self.direction {
            Direction::Forward => self.adapter.target(),
            Direction::Backward => self.adapter.source(),
        }
    }

    /// Traversal cost
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.adapter.cost()
    }

    /// Whether the traversed transformation is lossless
    #[inline]
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.adapter.is_lossless()
    }

    /// Whether this step can be undone
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        match self.direction {
            Direction::Forward => self.adapter.has_backward(),
            Direction::Backward => true,
        }
    }

    /// Step undoing this one
    #[must_use]
    pub fn inverted(&self) -> Option<Self> {
        match self.direction {
            Direction::Forward => Self::backward(Arc::clone(&self.adapter)),
            Direction::Backward => Some(Self::forward(Arc::clone(&self.adapter))),
        }
    }

    /// Run the transformation for this direction
    ///
    /// # Errors
    /// Whatever the adapter reports.
    pub fn apply(&self, value: Value) -> Result<Value, AdapterError> {
        match self.direction {
            Direction::Forward => self.adapter.forward(value),
            Direction::Backward => self.adapter.backward(value),
        }
    }

    /// Run the transformation undoing this step
    ///
    /// # Errors
    /// [`AdapterError::NotInvertible`] when no inverse exists, otherwise
    /// whatever the adapter reports.
    pub fn apply_inverse(&self, value: Value) -> Result<Value, AdapterError> {
        match self.direction {
            Direction::Forward => self.adapter.backward(value),
            Direction::Backward => self.adapter.forward(value),
        }
    }

    /// Serializable description
    #[must_use]
    pub fn descriptor(&self) -> StepDescriptor {
        StepDescriptor {
            from: self.from().clone(),
            into: self.into().clone(),
            direction: self.direction,
            adapter: self.adapter.id().get(),
            cost: self.cost(),
            lossless: self.is_lossless(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from(), self.into())
    }
}

/// Diagnostic view of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Identity consumed
    pub from: TypeIdentity,
    /// Identity produced
    pub into: TypeIdentity,
    /// Adapter transformation used
    pub direction: Direction,
    /// Raw [`AdapterId`] value
    pub adapter: u64,
    /// Traversal cost
    pub cost: u32,
    /// Lossless marker
    pub lossless: bool,
}

/// Ordered adapter sequence from a source to a target
///
/// Invariant: `steps[i].into() == steps[i + 1].from()`, the first step starts
/// at `from` and the last ends at `into`. Empty only when `from == into`.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    from: TypeIdentity,
    into: TypeIdentity,
    steps: Vec<Step>,
    cost: u64,
}

impl ResolvedPath {
    /// Empty path from a type to itself
    #[must_use]
    pub fn identity(ty: TypeIdentity) -> Self {
        Self {
            from: ty.clone(),
            into: ty,
            steps: Vec::new(),
            cost: 0,
        }
    }

    pub(crate) fn new(from: TypeIdentity, into: TypeIdentity, steps: Vec<Step>) -> Self {
        debug_assert!(steps.windows(2).all(|w| Step::into(&w[0]) == w[1].from()));
        let cost = steps.iter().map(|s| u64::from(s.cost())).sum();
        Self {
            from,
            into,
            steps,
            cost,
        }
    }

    /// Requested source
    #[inline]
    #[must_use]
    pub fn from(&self) -> &TypeIdentity {
        &self.from
    }

    /// Requested target
    #[inline]
    #[must_use]
    pub fn into(&self) -> &TypeIdentity {
        &self.into
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if this is the identity path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of step costs
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Adapter ids in execution order
    #[must_use]
    pub fn adapter_ids(&self) -> Vec<AdapterId> {
        self.steps.iter().map(|s| s.adapter().id()).collect()
    }

    /// Index of the first step not marked lossless
    #[must_use]
    pub fn first_lossy(&self) -> Option<usize> {
        self.steps.iter().position(|s| !s.is_lossless())
    }

    /// Whether every step is lossless
    #[inline]
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.first_lossy().is_none()
    }

    /// Index of the step a reversal would reject first
    ///
    /// Reversal runs last step first, so this is the highest index.
    #[must_use]
    pub fn non_invertible_step(&self) -> Option<usize> {
        self.steps.iter().rposition(|s| !s.is_invertible())
    }

    /// Whether every step can be undone
    #[inline]
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        self.non_invertible_step().is_none()
    }

    /// Mechanically reverse the path
    ///
    /// # Errors
    /// [`ResolveError::NonInvertible`] naming the offending forward step.
    pub fn inverted(&self) -> Result<Self, ResolveError> {
        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate().rev() {
            let inverse = step.inverted().ok_or_else(|| ResolveError::NonInvertible {
                step_index: index,
                from: step.from().clone(),
                into: step.into().clone(),
            })?;
            steps.push(inverse);
        }
        Ok(Self {
            from: self.into.clone(),
            into: self.from.clone(),
            steps,
            cost: self.cost,
        })
    }

    /// Diagnostic description of every step
    #[must_use]
    pub fn describe(&self) -> Vec<StepDescriptor> {
        self.steps.iter().map(Step::descriptor).collect()
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.from)?;
        for step in &self.steps {
            write!(f, " -> {}", step.into())?;
        }
        Ok(())
    }
}
