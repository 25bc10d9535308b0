//! Page access boundary
//!
//! The locator core never talks to a browser directly. Everything it needs
//! from a live page goes through the [`PagePort`] trait:
//! - locate candidate elements by declarative query
//! - wait for a query to yield a visible element, with timeout
//! - read attributes, text and geometry of a located element
//!
//! The driving side (CDP adapter, WebDriver bridge, in-memory mock) implements
//! the trait; the core stays engine-agnostic.

pub mod errors;
pub mod model;
pub mod ports;

pub use errors::PortError;
pub use model::{BoundingBox, ElementHandle, ElementQuery, TextMatch};
pub use ports::PagePort;
