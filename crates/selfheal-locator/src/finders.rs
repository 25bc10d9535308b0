//! Specialized finders for inputs, buttons and text
//!
//! Thin builders that derive a target description's candidate list in a
//! domain-appropriate priority order from whatever fields the caller knows.
//! Every field is optional; an omitted field simply generates no candidate.
//! Zero derivable candidates is caller misuse and is rejected before any
//! page interaction.

use page_port::{ElementQuery, TextMatch};

use crate::errors::LocatorError;
use crate::types::TargetDescriptor;

/// Partial description of an input field
///
/// Candidate priority: placeholder, label (direct semantic lookups), then
/// structural type+name, id-substring, name-substring, type-only.
#[derive(Debug, Clone, Default)]
pub struct InputTarget {
    /// Identifier for logging and statistics correlation
    pub id: String,

    /// Value of the `type` attribute
    pub input_type: Option<String>,

    /// Value of the `name` attribute
    pub name: Option<String>,

    /// Substring of the DOM `id` attribute
    pub dom_id: Option<String>,

    /// Placeholder text
    pub placeholder: Option<String>,

    /// Associated label text
    pub label: Option<String>,
}

impl InputTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_dom_id(mut self, dom_id: impl Into<String>) -> Self {
        self.dom_id = Some(dom_id.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Derive the candidate list in priority order
    pub fn to_descriptor(&self) -> Result<TargetDescriptor, LocatorError> {
        let mut candidates = Vec::new();

        if let Some(placeholder) = &self.placeholder {
            candidates.push(ElementQuery::Placeholder(placeholder.clone()));
        }
        if let Some(label) = &self.label {
            candidates.push(ElementQuery::Label(label.clone()));
        }
        if let (Some(input_type), Some(name)) = (&self.input_type, &self.name) {
            candidates.push(ElementQuery::Css(format!(
                "input[type=\"{}\"][name=\"{}\"]",
                input_type, name
            )));
        }
        if let Some(dom_id) = &self.dom_id {
            candidates.push(ElementQuery::Css(format!("input[id*=\"{}\"]", dom_id)));
        }
        if let Some(name) = &self.name {
            candidates.push(ElementQuery::Css(format!("input[name*=\"{}\"]", name)));
        }
        if let Some(input_type) = &self.input_type {
            candidates.push(ElementQuery::Css(format!("input[type=\"{}\"]", input_type)));
        }

        require_candidates(&self.id, candidates)
    }
}

/// Partial description of a button
///
/// Candidate priority: role + accessible name, test identifier, text content
/// (literal or pattern), type-attribute structural query.
#[derive(Debug, Clone, Default)]
pub struct ButtonTarget {
    /// Identifier for logging and statistics correlation
    pub id: String,

    /// Accessible name for the role query
    pub name: Option<String>,

    /// Test identifier attribute value
    pub test_id: Option<String>,

    /// Visible text, exact or pattern
    pub text: Option<TextMatch>,

    /// Value of the `type` attribute
    pub button_type: Option<String>,
}

impl ButtonTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    pub fn with_text(mut self, text: TextMatch) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_type(mut self, button_type: impl Into<String>) -> Self {
        self.button_type = Some(button_type.into());
        self
    }

    /// Derive the candidate list in priority order
    pub fn to_descriptor(&self) -> Result<TargetDescriptor, LocatorError> {
        let mut candidates = Vec::new();

        if let Some(name) = &self.name {
            candidates.push(ElementQuery::Role {
                role: "button".to_string(),
                name: name.clone(),
            });
        }
        if let Some(test_id) = &self.test_id {
            candidates.push(ElementQuery::TestId(test_id.clone()));
        }
        if let Some(text) = &self.text {
            candidates.push(ElementQuery::Text(text.clone()));
        }
        if let Some(button_type) = &self.button_type {
            candidates.push(ElementQuery::Css(format!(
                "button[type=\"{}\"]",
                button_type
            )));
        }

        require_candidates(&self.id, candidates)
    }
}

/// Text lookup with ordered fallbacks
#[derive(Debug, Clone, Default)]
pub struct TextTarget {
    /// Identifier for logging and statistics correlation
    pub id: String,

    /// Primary literal text
    pub text: Option<String>,

    /// Fallback matchers tried in order after the primary text
    pub fallbacks: Vec<TextMatch>,
}

impl TextTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_fallback(mut self, fallback: TextMatch) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// Derive the candidate list: primary literal first, then fallbacks
    pub fn to_descriptor(&self) -> Result<TargetDescriptor, LocatorError> {
        let mut candidates = Vec::new();

        if let Some(text) = &self.text {
            candidates.push(ElementQuery::Text(TextMatch::Exact(text.clone())));
        }
        for fallback in &self.fallbacks {
            candidates.push(ElementQuery::Text(fallback.clone()));
        }

        require_candidates(&self.id, candidates)
    }
}

fn require_candidates(
    id: &str,
    candidates: Vec<ElementQuery>,
) -> Result<TargetDescriptor, LocatorError> {
    if candidates.is_empty() {
        return Err(LocatorError::NoCandidates {
            target: id.to_string(),
        });
    }
    Ok(TargetDescriptor::new(id, candidates))
}
