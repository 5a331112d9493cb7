//! Event model - events, per-dispatch state, and listener bookkeeping
//!
//! Single-threaded: events are queued and dispatched one at a time by the
//! owner of a `ListenerStore`. Click events bubble from the target to the
//! root, scroll events are delivered to their target only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Scroll,
}

impl EventKind {
    pub fn bubbles(self) -> bool {
        matches!(self, EventKind::Click)
    }

    pub fn cancelable(self) -> bool {
        matches!(self, EventKind::Click)
    }
}

/// An event waiting to be dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
}

impl Event {
    pub fn click(target: NodeId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
        }
    }

    pub fn scroll(target: NodeId) -> Self {
        Self {
            kind: EventKind::Scroll,
            target,
        }
    }
}

/// State of one event while it travels through its listeners
#[derive(Debug, Clone)]
pub struct EventState {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    default_prevented: bool,
}

impl EventState {
    pub fn new(event: Event) -> Self {
        Self {
            kind: event.kind,
            target: event.target,
            current_target: event.target,
            default_prevented: false,
        }
    }

    /// No-op on non-cancelable events, as in the DOM
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listeners keyed by node and event kind, kept in registration order
#[derive(Debug, Clone)]
pub struct ListenerStore<H> {
    map: HashMap<NodeId, HashMap<EventKind, Vec<H>>>,
}

impl<H> Default for ListenerStore<H> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<H: Clone> ListenerStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: NodeId, kind: EventKind, handler: H) {
        self.map
            .entry(node)
            .or_default()
            .entry(kind)
            .or_default()
            .push(handler);
    }

    /// Handlers for `node`, cloned so the caller may mutate the store while running them
    pub fn get(&self, node: NodeId, kind: EventKind) -> Vec<H> {
        self.map
            .get(&node)
            .and_then(|events| events.get(&kind))
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.map
            .values()
            .flat_map(|events| events.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) -> usize {
        let count = self.len();
        self.map.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_only_on_cancelable() {
        let mut click = EventState::new(Event::click(NodeId(1)));
        click.prevent_default();
        assert!(click.default_prevented());

        let mut scroll = EventState::new(Event::scroll(NodeId(1)));
        scroll.prevent_default();
        assert!(!scroll.default_prevented());
    }

    #[test]
    fn test_listener_store_add_get() {
        let mut store: ListenerStore<&'static str> = ListenerStore::new();
        store.add(NodeId(1), EventKind::Click, "first");
        store.add(NodeId(1), EventKind::Click, "second");
        store.add(NodeId(2), EventKind::Scroll, "scroll");

        assert_eq!(store.get(NodeId(1), EventKind::Click), vec!["first", "second"]);
        assert!(store.get(NodeId(1), EventKind::Scroll).is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_listener_store_clear() {
        let mut store: ListenerStore<u8> = ListenerStore::new();
        store.add(NodeId(1), EventKind::Click, 1);
        store.add(NodeId(3), EventKind::Scroll, 2);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_event_kind_serialization() {
        let json = serde_json::to_string(&Event::scroll(NodeId(4))).unwrap();
        assert_eq!(json, r#"{"kind":"scroll","target":4}"#);
    }
}
