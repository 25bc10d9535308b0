use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::PortError;
use crate::model::{BoundingBox, ElementHandle, ElementQuery};

/// Boundary to the driven browser page
///
/// All methods are read-only with respect to the page. `wait_until_visible`
/// suspends the calling task up to `timeout`; it never blocks the runtime.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// Locate all elements currently matching the query (zero or more)
    async fn query(&self, query: &ElementQuery) -> Result<Vec<ElementHandle>, PortError>;

    /// Wait for a single visible element matching the query
    ///
    /// Returns [`PortError::Timeout`] when no visible match appears within
    /// the window.
    async fn wait_until_visible(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<ElementHandle, PortError>;

    /// Read the element's lowercase tag name
    async fn tag_name(&self, element: &ElementHandle) -> Result<String, PortError>;

    /// Read the element's attribute map
    async fn attributes(
        &self,
        element: &ElementHandle,
    ) -> Result<HashMap<String, String>, PortError>;

    /// Read the element's text content, if any
    async fn text(&self, element: &ElementHandle) -> Result<Option<String>, PortError>;

    /// Read the element's bounding box, if it is rendered
    async fn bounding_box(&self, element: &ElementHandle)
        -> Result<Option<BoundingBox>, PortError>;
}
