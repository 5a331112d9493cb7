//! Simulated page - a `Host` over a parsed document and a layout
//!
//! Offsets follow document coordinates: an element's offset is its layout
//! top minus the scroll position of every scrolled ancestor. The viewport
//! (document root) scroll is excluded, since document coordinates do not
//! move with it.
//!
//! `scroll_into_view` jumps straight to the end state of the animation,
//! logs a `ScrollRecord`, and raises one scroll event on the container
//! that moved.

pub mod layout;

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::dom::{parse_html, Document, NodeId, Selector};
use crate::error::{Result, SyncError};
use crate::events::Event;
use crate::sync::{DomContract, Host, ScrollBehavior};

pub use layout::Layout;

/// One `scroll_into_view` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollRecord {
    pub target: NodeId,
    pub container: NodeId,
    pub from: f64,
    pub to: f64,
    pub behavior: ScrollBehavior,
}

/// A nav item as seen after a highlight pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavEntry {
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Page {
    document: Document,
    layout: Layout,
    scroll_tops: HashMap<NodeId, f64>,
    scroll_containers: Vec<NodeId>,
    scroll_log: Vec<ScrollRecord>,
    pending: VecDeque<Event>,
}

impl Page {
    pub fn new(document: Document, layout: Layout) -> Self {
        Self {
            document,
            layout,
            scroll_tops: HashMap::new(),
            scroll_containers: Vec::new(),
            scroll_log: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn parse(html: &str, layout: Layout) -> Result<Self> {
        Ok(Self::new(parse_html(html)?, layout))
    }

    /// Parse and prepare a page for `contract`: its containers become scrollable,
    /// and sections missing from `layout` get a stacked position.
    pub fn for_contract(html: &str, layout: Option<Layout>, contract: &DomContract) -> Result<Self> {
        let document = parse_html(html)?;
        let section_ids: Vec<String> = document
            .query_all(&contract.section)
            .into_iter()
            .filter_map(|node| document.attr(node, "id").map(ToOwned::to_owned))
            .collect();

        let layout = match layout {
            Some(mut layout) => {
                let estimate =
                    Layout::stacked(section_ids.iter().map(String::as_str), layout.section_height);
                for (id, top) in estimate.tops {
                    if layout.top(&id).is_none() {
                        tracing::debug!(section = %id, top, "section missing from layout, using stacked estimate");
                        layout.set_top(id, top);
                    }
                }
                layout
            }
            None => Layout::stacked(
                section_ids.iter().map(String::as_str),
                layout::DEFAULT_SECTION_HEIGHT,
            ),
        };

        let mut page = Self::new(document, layout);
        page.add_scroll_containers(&contract.container);
        Ok(page)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn add_scroll_container(&mut self, node: NodeId) {
        if !self.scroll_containers.contains(&node) {
            self.scroll_containers.push(node);
        }
    }

    /// Mark every element matching `selector` as a scroll container. Returns how many matched.
    pub fn add_scroll_containers(&mut self, selector: &Selector) -> usize {
        let nodes = self.document.query_all(selector);
        for node in &nodes {
            self.add_scroll_container(*node);
        }
        nodes.len()
    }

    pub fn scroll_top(&self, node: NodeId) -> f64 {
        self.scroll_tops.get(&node).copied().unwrap_or(0.0)
    }

    /// Set a scroll position directly (a user scroll). Negative positions clamp to 0.
    /// Does not raise a scroll event; callers dispatch one when they want handlers to run.
    pub fn scroll_to(&mut self, node: NodeId, top: f64) -> Result<bool> {
        if node.index() >= self.document.len() {
            return Err(SyncError::UnknownNode(node.index()));
        }
        let top = top.max(0.0);
        let changed = self.scroll_top(node) != top;
        self.scroll_tops.insert(node, top);
        Ok(changed)
    }

    pub fn scroll_log(&self) -> &[ScrollRecord] {
        &self.scroll_log
    }

    /// Top edge in document coordinates: the element's own layout entry,
    /// else its nearest ancestor's, else 0
    pub fn layout_top(&self, node: NodeId) -> f64 {
        std::iter::once(node)
            .chain(self.document.ancestors(node))
            .find_map(|n| self.document.attr(n, "id").and_then(|id| self.layout.top(id)))
            .unwrap_or(0.0)
    }

    fn nearest_scroll_container(&self, node: NodeId) -> NodeId {
        self.document
            .ancestors(node)
            .into_iter()
            .find(|a| self.scroll_containers.contains(a))
            .unwrap_or_else(|| self.document.root())
    }

    pub fn nav_entries(&self, contract: &DomContract) -> Vec<NavEntry> {
        self.document
            .query_all(&contract.nav_item)
            .into_iter()
            .map(|node| NavEntry {
                node,
                reference: self
                    .document
                    .attr(node, &contract.ref_attr)
                    .map(ToOwned::to_owned),
                label: self.document.text_content(node),
                active: self.document.has_class(node, &contract.active_class),
            })
            .collect()
    }
}

impl Host for Page {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.document.query_all(selector)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.document.attr(node, name).map(ToOwned::to_owned)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.parent(node)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.element_by_id(id)
    }

    fn offset_top(&self, node: NodeId) -> Result<f64> {
        if self.document.element(node).is_none() {
            return Err(SyncError::UnknownNode(node.index()));
        }
        let root = self.document.root();
        let scrolled: f64 = self
            .document
            .ancestors(node)
            .into_iter()
            .filter(|a| *a != root)
            .map(|a| self.scroll_top(a))
            .sum();
        Ok(self.layout_top(node) - scrolled)
    }

    fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.document.has_class(node, class_name)
    }

    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<bool> {
        self.document.add_class(node, class_name)
    }

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<bool> {
        self.document.remove_class(node, class_name)
    }

    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> Result<()> {
        if self.document.element(node).is_none() {
            return Err(SyncError::UnknownNode(node.index()));
        }
        let container = self.nearest_scroll_container(node);
        let from = self.scroll_top(container);
        let to = (self.layout_top(node) - self.layout_top(container)).max(0.0);

        self.scroll_tops.insert(container, to);
        self.scroll_log.push(ScrollRecord {
            target: node,
            container,
            from,
            to,
            behavior,
        });
        if from != to {
            self.pending.push_back(Event::scroll(container));
        }

        tracing::debug!(
            element = %self.document.describe(node),
            container = %self.document.describe(container),
            from,
            to,
            ?behavior,
            "scroll into view"
        );
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.pending.drain(..).collect()
    }

    fn describe(&self, node: NodeId) -> String {
        self.document.describe(node)
    }
}
