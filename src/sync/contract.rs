//! The DOM contract: which elements play which role, and how edge cases are handled

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::dom::Selector;

pub static DEFAULT_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r##"a[href^="#"]"##).expect("Invalid DEFAULT_ANCHOR selector"));

pub static DEFAULT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("main").expect("Invalid DEFAULT_CONTAINER selector"));

pub static DEFAULT_SECTION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".section-container").expect("Invalid DEFAULT_SECTION selector")
});

pub static DEFAULT_NAV_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".nav-item").expect("Invalid DEFAULT_NAV_ITEM selector"));

pub const DEFAULT_REF_ATTR: &str = "data-ref";
pub const DEFAULT_ACTIVE_CLASS: &str = "active";

/// How `scroll_into_view` should move the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

impl std::str::FromStr for ScrollBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smooth" => Ok(ScrollBehavior::Smooth),
            "instant" | "auto" => Ok(ScrollBehavior::Instant),
            _ => Err(format!("Unknown scroll behavior: {}", s)),
        }
    }
}

/// What a click on an anchor whose target does not exist does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingAnchorPolicy {
    /// Raise `SyncError::DanglingAnchor` (after the default jump was prevented)
    #[default]
    Fail,
    /// Log a warning and leave the scroll position alone
    Ignore,
}

impl std::str::FromStr for DanglingAnchorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(DanglingAnchorPolicy::Fail),
            "ignore" => Ok(DanglingAnchorPolicy::Ignore),
            _ => Err(format!("Unknown dangling anchor policy: {}", s)),
        }
    }
}

/// What a scroll tick does when no section exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySectionsPolicy {
    /// Raise `SyncError::NoSections`
    #[default]
    Fail,
    /// Leave every nav item untouched
    Ignore,
}

impl std::str::FromStr for EmptySectionsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(EmptySectionsPolicy::Fail),
            "ignore" => Ok(EmptySectionsPolicy::Ignore),
            _ => Err(format!("Unknown empty sections policy: {}", s)),
        }
    }
}

/// Markers and policies shared by the sync engine and the linter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomContract {
    /// In-page anchors that get a smooth-scroll click handler
    pub anchor: Selector,

    /// Scroll container(s) whose scroll events drive highlighting
    pub container: Selector,

    /// Content sections; each carries an `id`
    pub section: Selector,

    /// Sidebar entries; each carries `ref_attr`
    pub nav_item: Selector,

    /// Attribute linking a nav item to a section id
    pub ref_attr: String,

    /// Class marking the active nav item
    pub active_class: String,

    pub scroll_behavior: ScrollBehavior,

    pub on_dangling: DanglingAnchorPolicy,

    pub on_empty: EmptySectionsPolicy,
}

impl Default for DomContract {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR.clone(),
            container: DEFAULT_CONTAINER.clone(),
            section: DEFAULT_SECTION.clone(),
            nav_item: DEFAULT_NAV_ITEM.clone(),
            ref_attr: DEFAULT_REF_ATTR.to_string(),
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            scroll_behavior: ScrollBehavior::default(),
            on_dangling: DanglingAnchorPolicy::default(),
            on_empty: EmptySectionsPolicy::default(),
        }
    }
}
