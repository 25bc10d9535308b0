//! Query and element model for the page boundary

use serde::{Deserialize, Serialize};

/// Text matching mode for free-text queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextMatch {
    /// Exact text content match
    Exact(String),

    /// Substring match (pattern form)
    Contains(String),
}

impl TextMatch {
    /// The raw text being matched against
    pub fn needle(&self) -> &str {
        match self {
            TextMatch::Exact(s) | TextMatch::Contains(s) => s,
        }
    }

    /// Whether `haystack` satisfies this matcher
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            TextMatch::Exact(s) => haystack.trim() == s,
            TextMatch::Contains(s) => haystack.contains(s.as_str()),
        }
    }
}

/// Declarative element query
///
/// One variant per way of locating an element, ordered here from most to
/// least semantically stable:
/// - Role: ARIA role plus accessible name
/// - TestId: explicit test identifier (`data-testid`)
/// - Label: associated label text
/// - Placeholder: placeholder text
/// - Text: visible text content, exact or pattern
/// - Css: structural selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementQuery {
    /// ARIA role and accessible name
    Role { role: String, name: String },

    /// Test identifier attribute
    TestId(String),

    /// Label association
    Label(String),

    /// Placeholder text
    Placeholder(String),

    /// Visible text content
    Text(TextMatch),

    /// Structural CSS selector
    Css(String),
}

impl ElementQuery {
    /// Stable string key for logging and per-query statistics
    pub fn describe(&self) -> String {
        match self {
            ElementQuery::Role { role, name } => format!("role:{}[name='{}']", role, name),
            ElementQuery::TestId(id) => format!("testid:{}", id),
            ElementQuery::Label(label) => format!("label:{}", label),
            ElementQuery::Placeholder(text) => format!("placeholder:{}", text),
            ElementQuery::Text(TextMatch::Exact(text)) => format!("text:exact:'{}'", text),
            ElementQuery::Text(TextMatch::Contains(text)) => format!("text:partial:'{}'", text),
            ElementQuery::Css(selector) => format!("css:{}", selector),
        }
    }
}

impl std::fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Opaque handle to an element located on the driven page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Element geometry in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_keys() {
        let query = ElementQuery::Role {
            role: "button".to_string(),
            name: "Submit".to_string(),
        };
        assert_eq!(query.describe(), "role:button[name='Submit']");

        assert_eq!(
            ElementQuery::Css("#login".to_string()).describe(),
            "css:#login"
        );
        assert_eq!(
            ElementQuery::Text(TextMatch::Contains("Welcome".to_string())).describe(),
            "text:partial:'Welcome'"
        );
    }

    #[test]
    fn test_text_match() {
        let exact = TextMatch::Exact("Sign in".to_string());
        assert!(exact.matches("Sign in"));
        assert!(exact.matches("  Sign in  "));
        assert!(!exact.matches("Sign in now"));

        let partial = TextMatch::Contains("Sign".to_string());
        assert!(partial.matches("Sign in now"));
        assert!(!partial.matches("Log in"));
    }
}
