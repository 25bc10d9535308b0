//! Error types for the locator core

use thiserror::Error;

/// Locator error enumeration
///
/// Per-candidate failures are recovered inside the resolution loop and never
/// appear here; this type only carries the fatal outcomes.
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Target carries no candidate queries (caller misuse, raised before any
    /// page interaction)
    #[error("target '{target}' has no candidate queries derivable")]
    NoCandidates { target: String },

    /// Every candidate (and, for adaptive resolution, every recovery
    /// technique) was exhausted without a visible match
    #[error("target '{target}' not found: {reason} (attempted: {attempted:?})")]
    ResolutionFailed {
        target: String,
        reason: String,
        attempted: Vec<String>,
    },

    /// Exported/imported state blob could not be serialized or parsed
    #[error("state blob error: {0}")]
    State(String),
}

impl LocatorError {
    /// Check whether this is the caller-misuse variant
    pub fn is_validation(&self) -> bool {
        matches!(self, LocatorError::NoCandidates { .. })
    }

    /// Target identifier this error refers to, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            LocatorError::NoCandidates { target }
            | LocatorError::ResolutionFailed { target, .. } => Some(target),
            LocatorError::State(_) => None,
        }
    }
}
