//! Scripted in-memory page port and log capture for driving the locator in
//! tests

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use page_port::{BoundingBox, ElementHandle, ElementQuery, PagePort, PortError};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

/// One element the mock page knows about
#[derive(Debug, Clone)]
pub struct MockElement {
    pub handle: ElementHandle,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
}

impl MockElement {
    pub fn new(id: &str, tag: &str) -> Self {
        Self {
            handle: ElementHandle::new(id),
            tag: tag.to_string(),
            attributes: HashMap::new(),
            text: None,
            bounding_box: None,
        }
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn at(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }
}

/// Scripted page: visibility is keyed by `ElementQuery::describe()`, and
/// every port call is counted so tests can assert on boundary traffic.
#[derive(Default)]
pub struct MockPage {
    elements: Mutex<Vec<MockElement>>,
    visible: Mutex<HashMap<String, ElementHandle>>,
    wait_log: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&self, element: MockElement) {
        self.elements.lock().unwrap().push(element);
    }

    /// Script a query key to yield a visible element
    pub fn set_visible(&self, query: &ElementQuery, element_id: &str) {
        self.visible
            .lock()
            .unwrap()
            .insert(query.describe(), ElementHandle::new(element_id));
    }

    /// Remove a previously scripted visibility
    pub fn clear_visible(&self, query: &ElementQuery) {
        self.visible.lock().unwrap().remove(&query.describe());
    }

    /// Drop every element from the page
    pub fn clear_elements(&self) {
        self.elements.lock().unwrap().clear();
    }

    /// Query keys passed to `wait_until_visible`, in order
    pub fn wait_log(&self) -> Vec<String> {
        self.wait_log.lock().unwrap().clone()
    }

    /// Total port calls of any kind
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn find(&self, handle: &ElementHandle) -> Result<MockElement, PortError> {
        self.elements
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.handle == handle)
            .cloned()
            .ok_or_else(|| PortError::Backend(format!("unknown element {:?}", handle)))
    }
}

#[async_trait]
impl PagePort for MockPage {
    async fn query(&self, query: &ElementQuery) -> Result<Vec<ElementHandle>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let elements = self.elements.lock().unwrap();
        let handles = match query {
            ElementQuery::Css(selector) if selector == "*" => {
                elements.iter().map(|e| e.handle.clone()).collect()
            }
            ElementQuery::Css(selector) if selector.chars().all(|c| c.is_ascii_alphanumeric()) => {
                elements
                    .iter()
                    .filter(|e| &e.tag == selector)
                    .map(|e| e.handle.clone())
                    .collect()
            }
            _ => Vec::new(),
        };
        Ok(handles)
    }

    async fn wait_until_visible(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<ElementHandle, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = query.describe();
        self.wait_log.lock().unwrap().push(key.clone());
        match self.visible.lock().unwrap().get(&key) {
            Some(handle) => Ok(handle.clone()),
            None => Err(PortError::Timeout {
                waited_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn tag_name(&self, element: &ElementHandle) -> Result<String, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(element)?.tag)
    }

    async fn attributes(
        &self,
        element: &ElementHandle,
    ) -> Result<HashMap<String, String>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(element)?.attributes)
    }

    async fn text(&self, element: &ElementHandle) -> Result<Option<String>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(element)?.text)
    }

    async fn bounding_box(
        &self,
        element: &ElementHandle,
    ) -> Result<Option<BoundingBox>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(element)?.bounding_box)
    }
}

/// Captured log lines, grouped by level
#[derive(Default)]
pub struct LogCapture {
    events: Mutex<Vec<(Level, String)>>,
}

impl LogCapture {
    /// Messages recorded at one level, in emission order
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

/// Minimal subscriber that records event messages into a [`LogCapture`]
///
/// Install with `tracing::subscriber::set_default` and keep the guard alive
/// for the duration of the assertions.
pub struct CapturingSubscriber(pub Arc<LogCapture>);

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{:?}", value);
        }
    }
}

impl Subscriber for CapturingSubscriber {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attributes: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _id: &Id, _record: &Record<'_>) {}

    fn record_follows_from(&self, _id: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.0
            .events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message));
    }

    fn enter(&self, _id: &Id) {}

    fn exit(&self, _id: &Id) {}
}
