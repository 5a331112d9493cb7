//! Unified Result Model
//!
//! Every command maps what it found (sections, nav state, scrolls, lint
//! issues) onto this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Page,
    Section,
    Nav,
    Scroll,
    Event,
    Issue,
}

/// Severity of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Offset from the scroll container origin, in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,

    /// Whether the element carries the active marker (nav) or is the closest one (section)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Container scroll position at the time of the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_top: Option<f64>,

    /// Position in a replayed event script (0-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl ResultError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Page path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Short element label, e.g. `li.nav-item[data-ref="intro"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,

    /// Section id, or the id a nav item references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable text (nav label, issue message, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (scroll records, dispatch details)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Metadata
    #[serde(default)]
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResultError>,
}

impl ResultItem {
    fn base(kind: Kind, path: Option<String>) -> Self {
        Self {
            kind,
            path,
            element: None,
            id: None,
            excerpt: None,
            data: None,
            severity: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// A discovered page
    pub fn page(path: impl Into<String>) -> Self {
        Self::base(Kind::Page, Some(path.into()))
    }

    /// A content section and its offset
    pub fn section(path: impl Into<String>, id: impl Into<String>, offset: f64) -> Self {
        let mut item = Self::base(Kind::Section, Some(path.into()));
        item.id = Some(id.into());
        item.meta.offset = Some(offset);
        item
    }

    /// A nav item and its active state
    pub fn nav(path: impl Into<String>, reference: Option<String>, active: bool) -> Self {
        let mut item = Self::base(Kind::Nav, Some(path.into()));
        item.id = reference;
        item.meta.active = Some(active);
        item
    }

    /// A scroll performed by an anchor click
    pub fn scroll(path: impl Into<String>, data: serde_json::Value) -> Self {
        let mut item = Self::base(Kind::Scroll, Some(path.into()));
        item.data = Some(data);
        item
    }

    /// One step of an event replay
    pub fn event(path: impl Into<String>, step: usize) -> Self {
        let mut item = Self::base(Kind::Event, Some(path.into()));
        item.meta.step = Some(step);
        item
    }

    /// A lint issue
    pub fn issue(
        path: impl Into<String>,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let mut item = Self::base(Kind::Issue, Some(path.into()));
        item.severity = Some(severity);
        item.excerpt = Some(message.clone());
        item.errors.push(ResultError::new(code, message));
        item
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.items
            .iter()
            .filter(|item| item.severity == Some(severity))
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
