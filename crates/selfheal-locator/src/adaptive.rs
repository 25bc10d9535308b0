//! Adaptive strategy selector with similarity recovery
//!
//! Wraps the strategy resolver's per-candidate loop: candidates are
//! re-ordered by learned success/recency statistics before each pass, every
//! individual attempt feeds its outcome back into the statistics store, and
//! when the whole ranked list fails a previously captured fingerprint drives
//! a three-stage similarity recovery.
//!
//! One selector instance per page/session: the statistics and fingerprint
//! stores are plain owned fields, never shared across instances.

use std::sync::Arc;

use page_port::{ElementQuery, PagePort};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AdaptiveConfig;
use crate::errors::LocatorError;
use crate::fingerprint::{observe, ElementFingerprint, FingerprintStore};
use crate::finders::{ButtonTarget, InputTarget, TextTarget};
use crate::resolver::StrategyResolver;
use crate::stats::{RecordEntry, StatsSummary, StrategyStats};
use crate::types::{RecoveryTechnique, Resolution, ResolutionOrigin, TargetDescriptor};

const STATE_VERSION: u32 = 1;

/// Serialized form of a selector's learned state
#[derive(Debug, Serialize, Deserialize)]
struct SelectorState {
    version: u32,
    records: Vec<RecordEntry>,
    fingerprints: Vec<(String, ElementFingerprint)>,
}

/// Self-healing selector for one page/session
pub struct AdaptiveSelector {
    resolver: StrategyResolver,
    stats: StrategyStats,
    fingerprints: FingerprintStore,
    config: AdaptiveConfig,
}

impl AdaptiveSelector {
    /// Create a selector with default tuning
    pub fn new(page: Arc<dyn PagePort>) -> Self {
        Self::with_config(page, AdaptiveConfig::default())
    }

    /// Create a selector with explicit tuning
    pub fn with_config(page: Arc<dyn PagePort>, config: AdaptiveConfig) -> Self {
        Self {
            resolver: StrategyResolver::with_config(page, config.resolver.clone()),
            stats: StrategyStats::new(),
            fingerprints: FingerprintStore::new(),
            config,
        }
    }

    /// Read access to the accumulated statistics
    pub fn stats(&self) -> &StrategyStats {
        &self.stats
    }

    /// Read access to the captured fingerprints
    pub fn fingerprints(&self) -> &FingerprintStore {
        &self.fingerprints
    }

    /// Aggregate counters for operator visibility
    pub fn summary(&self) -> StatsSummary {
        self.stats.summary()
    }

    /// Resolve with learned candidate ordering and similarity recovery
    ///
    /// Statistics persist across calls on the same selector; a fresh call
    /// after e.g. a page reload reuses everything learned so far.
    pub async fn resolve_adaptive(
        &mut self,
        target: &TargetDescriptor,
    ) -> Result<Resolution, LocatorError> {
        if target.candidates.is_empty() {
            return Err(LocatorError::NoCandidates {
                target: target.id.clone(),
            });
        }

        let order = self.stats.rank(&target.id, &target.candidates);
        let timeout = self.config.resolver.candidate_timeout();

        for (position, &index) in order.iter().enumerate() {
            let query = &target.candidates[index];
            let key = query.describe();

            match self.resolver.attempt(&target.id, query, timeout).await {
                Ok(element) => {
                    self.stats
                        .note_success(&target.id, &key, self.config.success_increment);
                    if position > 0 {
                        info!(
                            "Resolved '{}' via fallback candidate #{}: {}",
                            target.id,
                            position + 1,
                            key
                        );
                    }
                    let resolution = Resolution::new(element, query.clone(), index);
                    self.capture(&target.id, &resolution).await;
                    return Ok(resolution);
                }
                Err(err) => {
                    self.stats
                        .note_failure(&target.id, &key, self.config.failure_decrement);
                    warn!("Candidate {} failed for '{}': {}", key, target.id, err);
                }
            }
        }

        if self.config.capture_fingerprints {
            if let Some(fingerprint) = self.fingerprints.get(&target.id).cloned() {
                info!("Ranked candidates exhausted for '{}', trying similarity recovery", target.id);
                if let Some(resolution) = self.recover(target, &fingerprint).await {
                    if let ResolutionOrigin::Recovery { technique } = resolution.origin {
                        info!("Recovered '{}' via {}", target.id, technique.name());
                    }
                    self.capture(&target.id, &resolution).await;
                    return Ok(resolution);
                }
            }
        }

        Err(LocatorError::ResolutionFailed {
            target: target.id.clone(),
            reason: "adaptive and recovery both exhausted".to_string(),
            attempted: target.describe_candidates(),
        })
    }

    /// Resolve an input field from its partial description
    pub async fn find_input(&mut self, spec: &InputTarget) -> Result<Resolution, LocatorError> {
        let target = spec.to_descriptor()?;
        self.resolve_adaptive(&target).await
    }

    /// Resolve a button from its partial description
    pub async fn find_button(&mut self, spec: &ButtonTarget) -> Result<Resolution, LocatorError> {
        let target = spec.to_descriptor()?;
        self.resolve_adaptive(&target).await
    }

    /// Resolve an element by text, with ordered fallbacks
    pub async fn find_by_text(&mut self, spec: &TextTarget) -> Result<Resolution, LocatorError> {
        let target = spec.to_descriptor()?;
        self.resolve_adaptive(&target).await
    }

    /// Export the statistics and fingerprint stores as an opaque blob
    pub fn export_state(&self) -> Result<Vec<u8>, LocatorError> {
        let state = SelectorState {
            version: STATE_VERSION,
            records: self.stats.snapshot(),
            fingerprints: self.fingerprints.snapshot(),
        };
        serde_json::to_vec(&state).map_err(|err| LocatorError::State(err.to_string()))
    }

    /// Replace both stores from a previously exported blob
    pub fn import_state(&mut self, blob: &[u8]) -> Result<(), LocatorError> {
        let state: SelectorState =
            serde_json::from_slice(blob).map_err(|err| LocatorError::State(err.to_string()))?;
        if state.version != STATE_VERSION {
            return Err(LocatorError::State(format!(
                "unsupported state version {}",
                state.version
            )));
        }
        self.stats.restore(state.records);
        self.fingerprints.restore(state.fingerprints);
        Ok(())
    }

    /// Capture and store a fingerprint off a fresh resolution, best effort
    async fn capture(&mut self, target_id: &str, resolution: &Resolution) {
        if !self.config.capture_fingerprints {
            return;
        }
        let page = self.resolver.page().as_ref();
        if let Some(fingerprint) = ElementFingerprint::capture(page, &resolution.element).await {
            self.fingerprints.put(target_id, fingerprint);
        }
    }

    /// Similarity recovery, fixed order: attributes, position, general
    async fn recover(
        &self,
        target: &TargetDescriptor,
        fingerprint: &ElementFingerprint,
    ) -> Option<Resolution> {
        if let Some(resolution) = self.recover_by_attributes(target, fingerprint).await {
            return Some(resolution);
        }
        if let Some(resolution) = self.recover_by_position(target, fingerprint).await {
            return Some(resolution);
        }
        self.recover_by_similarity(target, fingerprint).await
    }

    /// Stage 1: structural queries synthesized from the fingerprint
    async fn recover_by_attributes(
        &self,
        target: &TargetDescriptor,
        fingerprint: &ElementFingerprint,
    ) -> Option<Resolution> {
        let timeout = self.config.recovery_timeout();
        for query in synthesize_queries(fingerprint) {
            match self.resolver.attempt(&target.id, &query, timeout).await {
                Ok(element) => {
                    return Some(Resolution::recovered(
                        element,
                        query,
                        RecoveryTechnique::AttributeSimilarity,
                    ));
                }
                Err(err) => {
                    debug!(
                        "Recovery query {} failed for '{}': {}",
                        query.describe(),
                        target.id,
                        err
                    );
                }
            }
        }
        None
    }

    /// Stage 2: same-tag element near the recorded position
    async fn recover_by_position(
        &self,
        target: &TargetDescriptor,
        fingerprint: &ElementFingerprint,
    ) -> Option<Resolution> {
        fingerprint.position?;
        if fingerprint.tag.is_empty() {
            return None;
        }

        let page = self.resolver.page();
        let query = ElementQuery::Css(fingerprint.tag.clone());
        let handles = match page.query(&query).await {
            Ok(handles) => handles,
            Err(err) => {
                debug!("Positional recovery query failed for '{}': {}", target.id, err);
                return None;
            }
        };

        for handle in handles {
            if let Ok(Some(bounding_box)) = page.bounding_box(&handle).await {
                if fingerprint.position_within(
                    (bounding_box.x, bounding_box.y),
                    self.config.position_tolerance,
                ) {
                    return Some(Resolution::recovered(
                        handle,
                        query,
                        RecoveryTechnique::PositionalContext,
                    ));
                }
            }
        }
        None
    }

    /// Stage 3: broad enumeration judged by the similarity predicate
    ///
    /// Enumerates wider than the fingerprint's tag on purpose: the predicate
    /// accepts attribute/text matches on elements whose tag has changed.
    async fn recover_by_similarity(
        &self,
        target: &TargetDescriptor,
        fingerprint: &ElementFingerprint,
    ) -> Option<Resolution> {
        let page = self.resolver.page();
        let query = ElementQuery::Css("*".to_string());
        let handles = match page.query(&query).await {
            Ok(handles) => handles,
            Err(err) => {
                debug!("General recovery query failed for '{}': {}", target.id, err);
                return None;
            }
        };

        for handle in handles {
            let (attributes, text, bounding_box) = match observe(page.as_ref(), &handle).await {
                Ok(observed) => observed,
                Err(err) => {
                    debug!("Skipping unreadable element during recovery: {}", err);
                    continue;
                }
            };
            if fingerprint.is_similar(
                &attributes,
                text.as_deref(),
                bounding_box.as_ref(),
                self.config.strict_position_tolerance,
            ) {
                return Some(Resolution::recovered(
                    handle,
                    query,
                    RecoveryTechnique::GeneralSimilarity,
                ));
            }
        }
        None
    }
}

/// Structural queries derived from a fingerprint: tag + first class token,
/// tag + type attribute, tag + partial name attribute
fn synthesize_queries(fingerprint: &ElementFingerprint) -> Vec<ElementQuery> {
    let mut queries = Vec::new();
    if fingerprint.tag.is_empty() {
        return queries;
    }
    if let Some(class) = fingerprint.first_class() {
        queries.push(ElementQuery::Css(format!("{}.{}", fingerprint.tag, class)));
    }
    if let Some(type_attr) = fingerprint.attributes.get("type") {
        queries.push(ElementQuery::Css(format!(
            "{}[type=\"{}\"]",
            fingerprint.tag, type_attr
        )));
    }
    if let Some(name) = fingerprint.attributes.get("name") {
        queries.push(ElementQuery::Css(format!(
            "{}[name*=\"{}\"]",
            fingerprint.tag, name
        )));
    }
    queries
}
