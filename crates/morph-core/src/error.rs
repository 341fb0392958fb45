//! Engine errors
//!
//! [`ConversionError`] covers everything that can go wrong between asking for
//! a conversion and receiving the converted value. [`MorphError`] wraps every
//! error of the workspace for callers that do not care which layer failed.

use morph_adapter::{AdapterError, RegistryError};
use morph_graph::{ResolveError, StepDescriptor};
use morph_type::{TypeError, TypeIdentity};
use std::fmt::Write as _;

/// Conversion failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// No adapter chain connects the requested types
    #[error("no conversion path found from '{from}' to '{into}'")]
    NoPathFound {
        /// Requested source
        from: TypeIdentity,
        /// Requested target
        into: TypeIdentity,
    },

    /// No adapter chain leads back
    #[error("no reverse conversion path found from '{from}' to '{into}'")]
    NoReversePath {
        /// Start of the reverse search
        from: TypeIdentity,
        /// End of the reverse search
        into: TypeIdentity,
    },

    /// An adapter rejected the value
    #[error("conversion failed at step {step_index} ('{from}' -> '{into}'): {cause}")]
    ConversionFailed {
        /// Index of the step in the forward path
        step_index: usize,
        /// Identity the failing transformation consumed
        from: TypeIdentity,
        /// Identity the failing transformation should have produced
        into: TypeIdentity,
        /// Adapter failure
        cause: AdapterError,
        /// Every step of the forward path
        path: Vec<StepDescriptor>,
    },

    /// Reversal requested on a path holding a forward-only step
    #[error("path is not invertible: step {step_index} ('{from}' -> '{into}') has no backward transformation")]
    NonInvertiblePath {
        /// Index of the step in the forward path
        step_index: usize,
        /// Step source
        from: TypeIdentity,
        /// Step target
        into: TypeIdentity,
        /// Every step of the forward path
        path: Vec<StepDescriptor>,
    },

    /// Lossless conversion requested on a path holding a lossy step
    #[error("no lossless conversion: step {step_index} ('{from}' -> '{into}') is lossy")]
    NoLosslessConversion {
        /// Index of the lossy step
        step_index: usize,
        /// Step source
        from: TypeIdentity,
        /// Step target
        into: TypeIdentity,
        /// Every step of the path
        path: Vec<StepDescriptor>,
    },

    /// An adapter re-entered itself on the same thread
    #[error("cycling conversion: step {step_index} ('{from}' -> '{into}') re-entered adapter {adapter}")]
    CyclingConversion {
        /// Index of the re-entered step
        step_index: usize,
        /// Step source
        from: TypeIdentity,
        /// Step target
        into: TypeIdentity,
        /// Raw adapter id
        adapter: u64,
    },

    /// Final value is not of the requested Rust type
    #[error("unexpected output: expected {expected}, found {found}")]
    UnexpectedOutput {
        /// Requested Rust type
        expected: &'static str,
        /// Rust type produced
        found: &'static str,
    },
}

impl ConversionError {
    /// Index of the step involved, if any
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Self::ConversionFailed { step_index, .. }
            | Self::NonInvertiblePath { step_index, .. }
            | Self::NoLosslessConversion { step_index, .. }
            | Self::CyclingConversion { step_index, .. } => Some(*step_index),
            _ => None,
        }
    }

    /// Multi-line message listing the path with the offending step marked
    #[must_use]
    pub fn detailed_message(&self) -> String {
        let mut out = self.to_string();
        let path = match self {
            Self::ConversionFailed { path, .. }
            | Self::NonInvertiblePath { path, .. }
            | Self::NoLosslessConversion { path, .. } => path,
            _ => return out,
        };

        let marked = self.step_index();
        out.push_str("\npath:");
        for (index, step) in path.iter().enumerate() {
            let marker = if Some(index) == marked { ">>" } else { "  " };
            let _ = write!(out, "\n{marker} {index}: {} -> {}", step.from, step.into);
            if Some(index) == marked {
                out.push_str("  <-- here");
            }
        }
        out
    }
}

impl From<ResolveError> for ConversionError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::NoPathFound { from, into } => Self::NoPathFound { from, into },
            ResolveError::NoReversePath { from, into } => Self::NoReversePath { from, into },
            ResolveError::NonInvertible {
                step_index,
                from,
                into,
            } => Self::NonInvertiblePath {
                step_index,
                from,
                into,
                path: Vec::new(),
            },
        }
    }
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML could not be parsed into a config
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Any Morph error
#[derive(Debug, thiserror::Error)]
pub enum MorphError {
    /// Malformed type descriptor
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Registration rejected
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Conversion failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for Morph operations
pub type Result<T> = std::result::Result<T, MorphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use morph_graph::Direction;

    fn id(name: &str) -> TypeIdentity {
        TypeIdentity::named(name).unwrap()
    }

    fn hop(from: &str, into: &str) -> StepDescriptor {
        StepDescriptor {
            from: id(from),
            into: id(into),
            direction: Direction::Forward,
            adapter: 1,
            cost: 1,
            lossless: false,
        }
    }

    #[test]
    fn detailed_message_marks_failing_step() {
        let error = ConversionError::ConversionFailed {
            step_index: 1,
            from: id("String"),
            into: id("Double"),
            cause: AdapterError::msg("invalid float literal"),
            path: vec![hop("Integer", "String"), hop("String", "Double")],
        };

        let message = error.detailed_message();
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(
            lines[0],
            "conversion failed at step 1 ('String' -> 'Double'): invalid float literal"
        );
        assert_eq!(lines[1], "path:");
        assert_eq!(lines[2], "   0: Integer -> String");
        assert_eq!(lines[3], ">> 1: String -> Double  <-- here");
    }

    #[test]
    fn detailed_message_without_path_is_display() {
        let error = ConversionError::NoPathFound {
            from: id("A"),
            into: id("B"),
        };
        assert_eq!(error.detailed_message(), error.to_string());
        assert_eq!(error.step_index(), None);
    }

    #[test]
    fn resolve_error_maps_to_conversion_error() {
        let error: ConversionError = ResolveError::no_path(&id("A"), &id("B")).into();
        assert!(matches!(error, ConversionError::NoPathFound { .. }));
    }

    #[test]
    fn morph_error_wraps_layers() {
        let error: MorphError = TypeIdentity::parse("Map<").unwrap_err().into();
        assert!(matches!(error, MorphError::Type(_)));
    }
}
