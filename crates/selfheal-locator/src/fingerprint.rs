//! Element fingerprints for similarity recovery
//!
//! A fingerprint is a snapshot of a resolved element (tag, attributes, text,
//! geometry), one per target identifier, overwritten on every successful
//! capture. It is only ever consulted by similarity recovery — never turned
//! back into a direct query.

use std::collections::HashMap;

use page_port::{BoundingBox, ElementHandle, PagePort, PortError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attributes the general similarity predicate compares
const SIMILARITY_ATTRIBUTES: [&str; 6] = ["id", "class", "name", "type", "role", "data-testid"];

/// Snapshot of a successfully resolved element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementFingerprint {
    /// Lowercase tag name
    pub tag: String,

    /// Attribute map at capture time
    pub attributes: HashMap<String, String>,

    /// Text content, if the element had any
    pub text: Option<String>,

    /// Bounding-box origin at capture time
    pub position: Option<(f64, f64)>,

    /// Bounding-box dimensions at capture time
    pub size: Option<(f64, f64)>,
}

impl ElementFingerprint {
    /// Read a fingerprint off a live element, best effort
    ///
    /// Returns `None` when the page no longer answers for the element; a
    /// capture failure must never fail the resolution that triggered it.
    pub async fn capture(page: &dyn PagePort, element: &ElementHandle) -> Option<Self> {
        let (tag, attributes) = match (page.tag_name(element).await, page.attributes(element).await)
        {
            (Ok(tag), Ok(attributes)) => (tag.to_ascii_lowercase(), attributes),
            (Err(err), _) | (_, Err(err)) => {
                debug!("fingerprint capture skipped: {}", err);
                return None;
            }
        };

        let text = page.text(element).await.ok().flatten();
        let geometry = page.bounding_box(element).await.ok().flatten();

        Some(Self {
            tag,
            attributes,
            text,
            position: geometry.map(|b| (b.x, b.y)),
            size: geometry.map(|b| (b.width, b.height)),
        })
    }

    /// First token of the recorded `class` attribute
    pub fn first_class(&self) -> Option<&str> {
        self.attributes
            .get("class")
            .and_then(|classes| classes.split_whitespace().next())
    }

    /// Whether `origin` lies within `tolerance` pixels of the recorded
    /// position on both axes
    pub fn position_within(&self, origin: (f64, f64), tolerance: f64) -> bool {
        match self.position {
            Some((x, y)) => {
                (origin.0 - x).abs() <= tolerance && (origin.1 - y).abs() <= tolerance
            }
            None => false,
        }
    }

    /// General similarity judgement against a live element's observations
    ///
    /// Similar when any one condition holds:
    /// - at least two of id/class/name/type/role/data-testid match exactly
    /// - text content matches exactly
    /// - bounding-box origin is within `strict_tolerance` on both axes
    pub fn is_similar(
        &self,
        attributes: &HashMap<String, String>,
        text: Option<&str>,
        bounding_box: Option<&BoundingBox>,
        strict_tolerance: f64,
    ) -> bool {
        let attribute_matches = SIMILARITY_ATTRIBUTES
            .iter()
            .filter(|&&key| match (self.attributes.get(key), attributes.get(key)) {
                (Some(recorded), Some(live)) => recorded == live,
                _ => false,
            })
            .count();
        if attribute_matches >= 2 {
            return true;
        }

        if let (Some(recorded), Some(live)) = (self.text.as_deref(), text) {
            if recorded == live {
                return true;
            }
        }

        bounding_box
            .map(|b| self.position_within((b.x, b.y), strict_tolerance))
            .unwrap_or(false)
    }
}

/// Fingerprint store for one selector instance
#[derive(Debug, Default)]
pub struct FingerprintStore {
    fingerprints: HashMap<String, ElementFingerprint>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: &str) -> Option<&ElementFingerprint> {
        self.fingerprints.get(target)
    }

    /// Store a fingerprint, replacing any earlier capture for the target
    pub fn put(&mut self, target: &str, fingerprint: ElementFingerprint) {
        self.fingerprints.insert(target.to_string(), fingerprint);
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Serializable view of every fingerprint
    pub fn snapshot(&self) -> Vec<(String, ElementFingerprint)> {
        self.fingerprints
            .iter()
            .map(|(target, fingerprint)| (target.clone(), fingerprint.clone()))
            .collect()
    }

    /// Replace the store's contents from a snapshot
    pub fn restore(&mut self, entries: Vec<(String, ElementFingerprint)>) {
        self.fingerprints = entries.into_iter().collect();
    }
}

/// Read the observations the similarity predicate needs off a live element
pub(crate) async fn observe(
    page: &dyn PagePort,
    element: &ElementHandle,
) -> Result<
    (
        HashMap<String, String>,
        Option<String>,
        Option<BoundingBox>,
    ),
    PortError,
> {
    let attributes = page.attributes(element).await?;
    let text = page.text(element).await?;
    let bounding_box = page.bounding_box(element).await?;
    Ok((attributes, text, bounding_box))
}
