//! Error taxonomy for the sync engine and its hosts

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// An anchor points at an id that no element carries.
    #[error("dangling anchor: no element matches {href}")]
    DanglingAnchor { href: String },

    /// An anchor href that does not name an element (e.g. a bare `#`).
    #[error("invalid fragment: {href}")]
    InvalidFragment { href: String },

    /// A scroll tick found no element matching the section selector.
    #[error("no sections match {selector}")]
    NoSections { selector: String },

    #[error("scroll container not found: {selector}")]
    MissingContainer { selector: String },

    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),

    #[error("unknown node: {0}")]
    UnknownNode(usize),

    #[error("html parse error: {0}")]
    HtmlParse(String),

    #[error("layout error: {0}")]
    Layout(String),
}

impl SyncError {
    /// Stable machine-readable code, used in rendered results
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::DanglingAnchor { .. } => "DANGLING_ANCHOR",
            SyncError::InvalidFragment { .. } => "EMPTY_FRAGMENT",
            SyncError::NoSections { .. } => "NO_SECTIONS",
            SyncError::MissingContainer { .. } => "MISSING_CONTAINER",
            SyncError::UnsupportedSelector(_) => "UNSUPPORTED_SELECTOR",
            SyncError::UnknownNode(_) => "UNKNOWN_NODE",
            SyncError::HtmlParse(_) => "HTML_PARSE",
            SyncError::Layout(_) => "LAYOUT",
        }
    }
}
