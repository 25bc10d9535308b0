use thiserror::Error;

/// Errors surfaced by a page port implementation
#[derive(Debug, Error, Clone)]
pub enum PortError {
    /// No visible match appeared within the wait window
    #[error("timed out after {waited_ms}ms waiting for visible match")]
    Timeout { waited_ms: u64 },

    /// Query could not be executed against the page
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Browser/driver communication failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl PortError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PortError::Timeout { .. })
    }
}
