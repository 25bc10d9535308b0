//! Strategy resolver with ordered fallback
//!
//! Deterministic, stateless per call: tries each candidate query in list
//! order against the page port, first visible match wins. A candidate that
//! times out or errors is logged and recovered; only full exhaustion is
//! surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use page_port::{ElementHandle, ElementQuery, PagePort, PortError};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::errors::LocatorError;
use crate::types::{Resolution, TargetDescriptor};

/// Slack over the candidate window before the outer guard cuts a port off;
/// a port answering exactly at its deadline surfaces its own result.
const ATTEMPT_GRACE: Duration = Duration::from_millis(100);

/// Sequential fallback resolver over a page port
pub struct StrategyResolver {
    page: Arc<dyn PagePort>,
    config: ResolverConfig,
}

impl StrategyResolver {
    /// Create a resolver with default timeouts
    pub fn new(page: Arc<dyn PagePort>) -> Self {
        Self::with_config(page, ResolverConfig::default())
    }

    /// Create a resolver with explicit tuning
    pub fn with_config(page: Arc<dyn PagePort>, config: ResolverConfig) -> Self {
        Self { page, config }
    }

    /// The page port this resolver drives
    pub fn page(&self) -> &Arc<dyn PagePort> {
        &self.page
    }

    /// Resolve a target by trying its candidates in order
    ///
    /// Worst-case latency is candidates × per-candidate timeout; candidates
    /// are attempted strictly sequentially and resolution stops at the first
    /// visible match.
    pub async fn resolve(&self, target: &TargetDescriptor) -> Result<Resolution, LocatorError> {
        if target.candidates.is_empty() {
            return Err(LocatorError::NoCandidates {
                target: target.id.clone(),
            });
        }

        let timeout = self.config.candidate_timeout();
        for (index, query) in target.candidates.iter().enumerate() {
            match self.attempt(&target.id, query, timeout).await {
                Ok(element) => {
                    if index > 0 {
                        info!(
                            "Resolved '{}' via fallback candidate #{}: {}",
                            target.id,
                            index + 1,
                            query.describe()
                        );
                    }
                    return Ok(Resolution::new(element, query.clone(), index));
                }
                Err(err) => {
                    warn!(
                        "Candidate {} failed for '{}': {}",
                        query.describe(),
                        target.id,
                        err
                    );
                }
            }
        }

        Err(LocatorError::ResolutionFailed {
            target: target.id.clone(),
            reason: "all candidates exhausted".to_string(),
            attempted: target.describe_candidates(),
        })
    }

    /// One candidate attempt: wait for a visible match within the window
    ///
    /// The port enforces the window itself; an outer guard with a grace
    /// margin only cuts off a port that fails to honor it.
    pub(crate) async fn attempt(
        &self,
        target_id: &str,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<ElementHandle, PortError> {
        debug!("Trying {} for '{}'", query.describe(), target_id);
        match tokio::time::timeout(
            timeout + ATTEMPT_GRACE,
            self.page.wait_until_visible(query, timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PortError::Timeout {
                waited_ms: timeout.as_millis() as u64,
            }),
        }
    }
}
