//! The host side of the DOM contract
//!
//! A `Host` is whatever owns the real elements: a browser binding, or the
//! simulated [`crate::page::Page`]. The sync engine only talks to this trait.

use crate::dom::{NodeId, Selector};
use crate::error::Result;
use crate::events::Event;
use crate::sync::contract::ScrollBehavior;

pub trait Host {
    /// Elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Distance from the scroll container's origin to the element's top edge
    fn offset_top(&self, node: NodeId) -> Result<f64>;

    fn has_class(&self, node: NodeId, class_name: &str) -> bool;

    /// Returns whether the class list changed
    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<bool>;

    /// Returns whether the class list changed
    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<bool>;

    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> Result<()>;

    /// Events the host raised on its own since the last call (e.g. scroll after scroll_into_view)
    fn drain_events(&mut self) -> Vec<Event> {
        Vec::new()
    }

    /// Human-readable label for logs
    fn describe(&self, node: NodeId) -> String {
        format!("node#{}", node.index())
    }
}
