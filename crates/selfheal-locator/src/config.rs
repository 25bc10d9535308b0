//! Tunable parameters for resolution and recovery
//!
//! Every constant the algorithms use lives here with its default; none of
//! the defaults are load-bearing invariants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Strategy resolver tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Wall-clock wait per candidate, not cumulative
    pub candidate_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_timeout_ms: 5_000,
        }
    }
}

impl ResolverConfig {
    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_millis(self.candidate_timeout_ms)
    }
}

/// Adaptive selector tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Resolver settings used for the ranked-candidate phase
    pub resolver: ResolverConfig,

    /// Capture an element fingerprint on every successful resolution
    pub capture_fingerprints: bool,

    /// Success-rate delta applied on a candidate success (capped at 1.0)
    pub success_increment: f64,

    /// Success-rate delta applied on a candidate failure (floored at 0.0)
    pub failure_decrement: f64,

    /// Wait per synthesized query during attribute-similarity recovery;
    /// shorter than the primary candidate timeout
    pub recovery_timeout_ms: u64,

    /// Per-axis tolerance for the positional-context recovery pass, pixels
    pub position_tolerance: f64,

    /// Tighter per-axis tolerance used by the general similarity predicate
    pub strict_position_tolerance: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            capture_fingerprints: true,
            success_increment: 0.1,
            failure_decrement: 0.05,
            recovery_timeout_ms: 1_000,
            position_tolerance: 100.0,
            strict_position_tolerance: 50.0,
        }
    }
}

impl AdaptiveConfig {
    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_millis(self.recovery_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdaptiveConfig::default();
        assert_eq!(config.resolver.candidate_timeout_ms, 5_000);
        assert_eq!(config.recovery_timeout_ms, 1_000);
        assert!(config.capture_fingerprints);
        assert_eq!(config.success_increment, 0.1);
        assert_eq!(config.failure_decrement, 0.05);
        assert_eq!(config.position_tolerance, 100.0);
        assert_eq!(config.strict_position_tolerance, 50.0);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: AdaptiveConfig =
            serde_json::from_str(r#"{"recovery_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.recovery_timeout_ms, 250);
        assert_eq!(config.resolver.candidate_timeout_ms, 5_000);
    }
}
