//! Per-strategy success bookkeeping
//!
//! One [`StrategyRecord`] per (target identifier, candidate query) pair.
//! Records are created on first attempt, mutated on every attempt after
//! that, and live as long as the owning selector instance.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use page_port::ElementQuery;
use serde::{Deserialize, Serialize};

/// Learned state for one (target, candidate query) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecord {
    /// Success rate in [0, 1]; untried candidates start at 0.5
    pub success_rate: f64,

    /// When this candidate last succeeded
    pub last_used: Option<DateTime<Utc>>,
}

impl Default for StrategyRecord {
    fn default() -> Self {
        Self {
            success_rate: 0.5,
            last_used: None,
        }
    }
}

impl StrategyRecord {
    fn mark_success(&mut self, increment: f64) {
        self.success_rate = (self.success_rate + increment).min(1.0);
        self.last_used = Some(Utc::now());
    }

    fn mark_failure(&mut self, decrement: f64) {
        self.success_rate = (self.success_rate - decrement).max(0.0);
    }
}

/// Serialized form of one record, used by the export/import blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    pub target: String,
    pub query: String,
    pub success_rate: f64,
    pub last_used: Option<DateTime<Utc>>,
}

/// Aggregate view for operators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSummary {
    /// Distinct target identifiers seen
    pub targets: usize,

    /// Total (target, query) records held
    pub records: usize,
}

/// Statistics store for one selector instance
///
/// Keyed by target identifier and the candidate query's stable string key.
/// Never shared across selector instances.
#[derive(Debug, Default)]
pub struct StrategyStats {
    records: HashMap<(String, String), StrategyRecord>,
}

impl StrategyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the record for one (target, query) pair
    pub fn record(&self, target: &str, query_key: &str) -> Option<&StrategyRecord> {
        self.records
            .get(&(target.to_string(), query_key.to_string()))
    }

    /// Register a successful attempt for this pair
    pub fn note_success(&mut self, target: &str, query_key: &str, increment: f64) {
        self.records
            .entry((target.to_string(), query_key.to_string()))
            .or_default()
            .mark_success(increment);
    }

    /// Register a failed attempt for this pair
    pub fn note_failure(&mut self, target: &str, query_key: &str, decrement: f64) {
        self.records
            .entry((target.to_string(), query_key.to_string()))
            .or_default()
            .mark_failure(decrement);
    }

    /// Order candidate indices by learned preference
    ///
    /// Sort key: success rate descending, then last success most recent
    /// first (never-succeeded last), then a-priori position ascending.
    pub fn rank(&self, target: &str, candidates: &[ElementQuery]) -> Vec<usize> {
        let keyed: Vec<(f64, Option<DateTime<Utc>>)> = candidates
            .iter()
            .map(|query| {
                match self.record(target, &query.describe()) {
                    Some(record) => (record.success_rate, record.last_used),
                    None => (StrategyRecord::default().success_rate, None),
                }
            })
            .collect();

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            keyed[b]
                .0
                .total_cmp(&keyed[a].0)
                .then_with(|| keyed[b].1.cmp(&keyed[a].1))
                .then_with(|| a.cmp(&b))
        });
        order
    }

    /// Aggregate counters for operator visibility
    pub fn summary(&self) -> StatsSummary {
        let targets: HashSet<&str> = self.records.keys().map(|(t, _)| t.as_str()).collect();
        StatsSummary {
            targets: targets.len(),
            records: self.records.len(),
        }
    }

    /// Serializable view of every record
    pub fn snapshot(&self) -> Vec<RecordEntry> {
        self.records
            .iter()
            .map(|((target, query), record)| RecordEntry {
                target: target.clone(),
                query: query.clone(),
                success_rate: record.success_rate,
                last_used: record.last_used,
            })
            .collect()
    }

    /// Replace the store's contents from a snapshot
    pub fn restore(&mut self, entries: Vec<RecordEntry>) {
        self.records = entries
            .into_iter()
            .map(|entry| {
                (
                    (entry.target, entry.query),
                    StrategyRecord {
                        success_rate: entry.success_rate,
                        last_used: entry.last_used,
                    },
                )
            })
            .collect();
    }
}
