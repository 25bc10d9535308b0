//! Core types for the locator system

use page_port::{ElementHandle, ElementQuery};
use serde::{Deserialize, Serialize};

/// Target description: an identifier plus its ordered candidate queries
///
/// The identifier correlates logging, statistics and fingerprints for one
/// logical UI element. Candidate order is the a-priori stability ranking,
/// most semantically stable first. At least one candidate is required;
/// resolution rejects an empty list before touching the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Stable identifier for logging and statistics correlation
    pub id: String,

    /// Candidate queries in a-priori stability order
    pub candidates: Vec<ElementQuery>,
}

impl TargetDescriptor {
    /// Create a new target description
    pub fn new(id: impl Into<String>, candidates: Vec<ElementQuery>) -> Self {
        Self {
            id: id.into(),
            candidates,
        }
    }

    /// Append a lower-priority candidate
    pub fn push_candidate(&mut self, query: ElementQuery) {
        self.candidates.push(query);
    }

    /// Query descriptions in list order, for failure reporting
    pub fn describe_candidates(&self) -> Vec<String> {
        self.candidates.iter().map(|q| q.describe()).collect()
    }
}

/// Similarity recovery technique, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryTechnique {
    /// Structural queries synthesized from the fingerprint's attributes
    AttributeSimilarity,

    /// Same-tag element near the fingerprint's recorded position
    PositionalContext,

    /// Broad enumeration judged by the general similarity predicate
    GeneralSimilarity,
}

impl RecoveryTechnique {
    /// Get technique name as string
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryTechnique::AttributeSimilarity => "attribute-similarity",
            RecoveryTechnique::PositionalContext => "positional-context",
            RecoveryTechnique::GeneralSimilarity => "general-similarity",
        }
    }
}

/// How a resolution found its element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOrigin {
    /// A ranked candidate matched; index is into the a-priori list
    Candidate { index: usize },

    /// Similarity recovery matched after all ranked candidates failed
    Recovery { technique: RecoveryTechnique },
}

/// Successful resolution outcome
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resolved element
    pub element: ElementHandle,

    /// Query that matched (for recovery hits, the query that enumerated or
    /// synthesized the match)
    pub query: ElementQuery,

    /// How the element was found
    pub origin: ResolutionOrigin,
}

impl Resolution {
    /// Create a resolution for a ranked-candidate hit
    pub fn new(element: ElementHandle, query: ElementQuery, candidate_index: usize) -> Self {
        Self {
            element,
            query,
            origin: ResolutionOrigin::Candidate {
                index: candidate_index,
            },
        }
    }

    /// Create a resolution for a similarity-recovery hit
    pub fn recovered(
        element: ElementHandle,
        query: ElementQuery,
        technique: RecoveryTechnique,
    ) -> Self {
        Self {
            element,
            query,
            origin: ResolutionOrigin::Recovery { technique },
        }
    }

    /// Whether the element came from similarity recovery
    pub fn via_recovery(&self) -> bool {
        matches!(self.origin, ResolutionOrigin::Recovery { .. })
    }

    /// A-priori candidate index, for ranked-candidate hits
    pub fn candidate_index(&self) -> Option<usize> {
        match self.origin {
            ResolutionOrigin::Candidate { index } => Some(index),
            ResolutionOrigin::Recovery { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_candidates() {
        let target = TargetDescriptor::new(
            "LoginButton",
            vec![
                ElementQuery::Role {
                    role: "button".to_string(),
                    name: "Login".to_string(),
                },
                ElementQuery::Css("#login".to_string()),
            ],
        );
        assert_eq!(
            target.describe_candidates(),
            vec!["role:button[name='Login']", "css:#login"]
        );
    }

    #[test]
    fn test_resolution_origin() {
        let hit = Resolution::new(
            ElementHandle::new("node-1"),
            ElementQuery::Css("input".to_string()),
            2,
        );
        assert!(!hit.via_recovery());
        assert_eq!(hit.candidate_index(), Some(2));

        let recovered = Resolution::recovered(
            ElementHandle::new("node-2"),
            ElementQuery::Css("input.form-control".to_string()),
            RecoveryTechnique::AttributeSimilarity,
        );
        assert!(recovered.via_recovery());
        assert_eq!(recovered.candidate_index(), None);
    }

    #[test]
    fn test_technique_names() {
        assert_eq!(
            RecoveryTechnique::AttributeSimilarity.name(),
            "attribute-similarity"
        );
        assert_eq!(
            RecoveryTechnique::PositionalContext.name(),
            "positional-context"
        );
        assert_eq!(
            RecoveryTechnique::GeneralSimilarity.name(),
            "general-similarity"
        );
    }
}
