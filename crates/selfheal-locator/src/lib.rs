//! Self-healing element resolution
//!
//! This crate implements the resilient element-location core used by the
//! portal end-to-end suite:
//! - ordered candidate queries with first-visible-match fallback
//! - adaptive re-ranking from per-candidate success/recency statistics
//! - fingerprint capture and similarity-based recovery when every ranked
//!   candidate fails
//! - specialized input/button/text finders over the same machinery
//!
//! The browser itself sits behind the `page-port` boundary; one
//! [`AdaptiveSelector`] instance serves one page/session and owns all of its
//! learned state.

pub mod adaptive;
pub mod config;
pub mod errors;
pub mod finders;
pub mod fingerprint;
pub mod resolver;
pub mod stats;
pub mod types;

pub use adaptive::AdaptiveSelector;
pub use config::{AdaptiveConfig, ResolverConfig};
pub use errors::LocatorError;
pub use finders::{ButtonTarget, InputTarget, TextTarget};
pub use fingerprint::{ElementFingerprint, FingerprintStore};
pub use resolver::StrategyResolver;
pub use stats::{StatsSummary, StrategyRecord, StrategyStats};
pub use types::{RecoveryTechnique, Resolution, ResolutionOrigin, TargetDescriptor};
