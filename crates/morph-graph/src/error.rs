//! Resolution errors

use morph_type::TypeIdentity;

/// Resolution-time failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No adapter chain connects the requested types
    #[error("no conversion path found from '{from}' to '{into}'")]
    NoPathFound {
        /// Requested source
        from: TypeIdentity,
        /// Requested target
        into: TypeIdentity,
    },

    /// No adapter chain leads back from target to source
    #[error("no reverse conversion path found from '{from}' to '{into}'")]
    NoReversePath {
        /// Start of the reverse search
        from: TypeIdentity,
        /// End of the reverse search
        into: TypeIdentity,
    },

    /// Mechanical reversal hit a step with no inverse
    #[error("step {step_index} ('{from}' -> '{into}') cannot be inverted")]
    NonInvertible {
        /// Index of the step in the forward path
        step_index: usize,
        /// Step source
        from: TypeIdentity,
        /// Step target
        into: TypeIdentity,
    },
}

impl ResolveError {
    /// Create no-path error
    #[inline]
    #[must_use]
    pub fn no_path(from: &TypeIdentity, into: &TypeIdentity) -> Self {
        Self::NoPathFound {
            from: from.clone(),
            into: into.clone(),
        }
    }

    /// Requested (source, target) pair
    #[must_use]
    pub fn route(&self) -> (&TypeIdentity, &TypeIdentity) {
        match self {
            Self::NoPathFound { from, into }
            | Self::NoReversePath { from, into }
            | Self::NonInvertible { from, into, .. } => (from, into),
        }
    }
}
