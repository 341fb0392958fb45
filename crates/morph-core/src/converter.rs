//! Composed converter
//!
//! Runs a [`ResolvedPath`] forward or backward. Stateless with respect to the
//! values it converts, so one converter can serve any number of threads.

use crate::error::ConversionError;
use morph_adapter::{AdapterError, AdapterId, Value};
use morph_graph::{Direction, ResolvedPath, Step};
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Adapter transformations currently executing on this thread
    static ACTIVE: RefCell<Vec<(AdapterId, Direction)>> = const { RefCell::new(Vec::new()) };
}

/// Marks one adapter transformation as running until dropped
struct ActiveStep {
    key: (AdapterId, Direction),
}

impl ActiveStep {
    fn enter(key: (AdapterId, Direction)) -> Option<Self> {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&key) {
                return None;
            }
            active.push(key);
            Some(Self { key })
        })
    }
}

impl Drop for ActiveStep {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(position) = active.iter().rposition(|key| *key == self.key) {
                active.remove(position);
            }
        });
    }
}

/// Executable adapter chain for one (source, target) pair
#[derive(Debug, Clone)]
pub struct ComposedConverter {
    path: Arc<ResolvedPath>,
    detect_cycles: bool,
}

impl ComposedConverter {
    /// Create converter over a resolved path
    #[inline]
    #[must_use]
    pub fn new(path: Arc<ResolvedPath>) -> Self {
        Self {
            path,
            detect_cycles: true,
        }
    }

    /// With or without re-entrancy detection
    #[inline]
    #[must_use]
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Path this converter executes
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ResolvedPath {
        &self.path
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Check if this is the identity conversion
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether [`ComposedConverter::reverse`] can succeed structurally
    #[inline]
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        self.path.is_invertible()
    }

    /// Apply every step in path order
    ///
    /// # Errors
    /// [`ConversionError::ConversionFailed`] at the first failing step,
    /// [`ConversionError::CyclingConversion`] when a step re-enters itself.
    pub fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let mut value = value;
        for (index, step) in self.path.steps().iter().enumerate() {
            value = self.run_step(index, step, step.direction(), value, Step::apply)?;
        }
        Ok(value)
    }

    /// Undo every step, last step first
    ///
    /// The whole path is checked before anything runs: a forward-only step
    /// fails the call without invoking any backward transformation.
    ///
    /// # Errors
    /// [`ConversionError::NonInvertiblePath`] for paths with a forward-only
    /// step, otherwise as [`ComposedConverter::convert`].
    pub fn reverse(&self, value: Value) -> Result<Value, ConversionError> {
        if let Some(step_index) = self.path.non_invertible_step() {
            let step = &self.path.steps()[step_index];
            tracing::debug!(step_index, path = %self.path, "reverse rejected: forward-only step");
            return Err(ConversionError::NonInvertiblePath {
                step_index,
                from: step.from().clone(),
                into: step.into().clone(),
                path: self.path.describe(),
            });
        }

        let mut value = value;
        for (index, step) in self.path.steps().iter().enumerate().rev() {
            value = self.run_step(index, step, step.direction().flip(), value, Step::apply_inverse)?;
        }
        Ok(value)
    }

    /// Convert only if every step is lossless
    ///
    /// # Errors
    /// [`ConversionError::NoLosslessConversion`] before executing anything
    /// when a step is lossy, otherwise as [`ComposedConverter::convert`].
    pub fn convert_lossless(&self, value: Value) -> Result<Value, ConversionError> {
        if let Some(step_index) = self.path.first_lossy() {
            let step = &self.path.steps()[step_index];
            return Err(ConversionError::NoLosslessConversion {
                step_index,
                from: step.from().clone(),
                into: step.into().clone(),
                path: self.path.describe(),
            });
        }
        self.convert(value)
    }

    /// Typed [`ComposedConverter::convert`]
    ///
    /// # Errors
    /// As [`ComposedConverter::convert`], plus
    /// [`ConversionError::UnexpectedOutput`] when the result is not a `T`.
    pub fn convert_to<S, T>(&self, input: S) -> Result<T, ConversionError>
    where
        S: Any + Send,
        T: Any + Send,
    {
        downcast_output(self.convert(Value::new(input))?)
    }

    /// Typed [`ComposedConverter::reverse`]
    ///
    /// # Errors
    /// As [`ComposedConverter::reverse`], plus
    /// [`ConversionError::UnexpectedOutput`] when the result is not a `T`.
    pub fn reverse_to<S, T>(&self, input: S) -> Result<T, ConversionError>
    where
        S: Any + Send,
        T: Any + Send,
    {
        downcast_output(self.reverse(Value::new(input))?)
    }

    fn run_step(
        &self,
        index: usize,
        step: &Step,
        executed: Direction,
        value: Value,
        apply: fn(&Step, Value) -> Result<Value, AdapterError>,
    ) -> Result<Value, ConversionError> {
        // Endpoints of the transformation actually executed
        let (from, into) = if executed == step.direction() {
            (step.from(), step.into())
        } else {
            (step.into(), step.from())
        };

        let _active = if self.detect_cycles {
            let key = (step.adapter().id(), executed);
            let Some(active) = ActiveStep::enter(key) else {
                tracing::debug!(step_index = index, %from, %into, "cycling conversion detected");
                return Err(ConversionError::CyclingConversion {
                    step_index: index,
                    from: from.clone(),
                    into: into.clone(),
                    adapter: step.adapter().id().get(),
                });
            };
            Some(active)
        } else {
            None
        };

        tracing::trace!(step_index = index, %from, %into, ?executed, "applying step");
        apply(step, value).map_err(|cause| {
            tracing::debug!(step_index = index, %from, %into, %cause, "adapter failed");
            ConversionError::ConversionFailed {
                step_index: index,
                from: from.clone(),
                into: into.clone(),
                cause,
                path: self.path.describe(),
            }
        })
    }
}

fn downcast_output<T: Any + Send>(value: Value) -> Result<T, ConversionError> {
    value
        .downcast::<T>()
        .map_err(|value| ConversionError::UnexpectedOutput {
            expected: type_name::<T>(),
            found: value.type_name(),
        })
}
