//! Sidebar sync - wires anchor clicks and container scrolls to their handlers
//!
//! `SidebarSync::setup` is called once by the hosting application after the
//! elements exist. It registers one click listener per in-page anchor and one
//! scroll listener per scroll container. Events are then pushed through
//! `dispatch`, which also drains any events the host raises in response
//! (a smooth scroll fires scroll events on its container).

pub mod anchor;
pub mod contract;
pub mod highlight;
pub mod host;

use serde::Serialize;
use std::collections::VecDeque;

use crate::dom::NodeId;
use crate::error::{Result, SyncError};
use crate::events::{Event, EventKind, EventState, ListenerStore};

pub use anchor::{click_anchor, fragment_id, resolve_fragment};
pub use contract::{DanglingAnchorPolicy, DomContract, EmptySectionsPolicy, ScrollBehavior};
pub use highlight::{apply_active, closest_section, collect_sections, ActiveChange, SectionOffset};
pub use host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    AnchorClick,
    Highlight,
}

/// What one dispatched event did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatched {
    pub event: Event,
    /// Handlers that ran
    pub handled: usize,
    pub default_prevented: bool,
    /// Element an anchor click scrolled to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrolled_to: Option<NodeId>,
    /// Nav changes made by the scroll handler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveChange>,
}

#[derive(Debug, Clone)]
pub struct SidebarSync {
    contract: DomContract,
    listeners: ListenerStore<Handler>,
    anchors: Vec<NodeId>,
    containers: Vec<NodeId>,
}

impl SidebarSync {
    /// Attach both listeners. Fails when no element matches the container selector.
    pub fn setup<H: Host + ?Sized>(host: &H, contract: DomContract) -> Result<Self> {
        let containers = host.query_all(&contract.container);
        if containers.is_empty() {
            return Err(SyncError::MissingContainer {
                selector: contract.container.to_string(),
            });
        }

        let anchors = host.query_all(&contract.anchor);
        let mut listeners = ListenerStore::new();
        for anchor in &anchors {
            listeners.add(*anchor, EventKind::Click, Handler::AnchorClick);
        }
        for container in &containers {
            listeners.add(*container, EventKind::Scroll, Handler::Highlight);
        }

        tracing::info!(
            anchors = anchors.len(),
            containers = containers.len(),
            "sidebar sync attached"
        );

        Ok(Self {
            contract,
            listeners,
            anchors,
            containers,
        })
    }

    pub fn contract(&self) -> &DomContract {
        &self.contract
    }

    /// Anchors that received a click listener at setup
    pub fn anchors(&self) -> &[NodeId] {
        &self.anchors
    }

    pub fn containers(&self) -> &[NodeId] {
        &self.containers
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Remove every listener; later events reach no handler. Returns how many were removed.
    pub fn detach(&mut self) -> usize {
        let removed = self.listeners.clear();
        tracing::info!(removed, "sidebar sync detached");
        removed
    }

    /// Dispatch `event`, then every event the host raises while handling it, in FIFO order.
    /// The first handler error aborts the run.
    pub fn dispatch<H: Host + ?Sized>(&self, host: &mut H, event: Event) -> Result<Vec<Dispatched>> {
        let mut queue = VecDeque::from([event]);
        let mut out = Vec::new();
        while let Some(event) = queue.pop_front() {
            out.push(self.dispatch_one(host, event)?);
            queue.extend(host.drain_events());
        }
        Ok(out)
    }

    /// Convenience for hosts that want the scroll handler run against the first container
    pub fn scroll<H: Host + ?Sized>(&self, host: &mut H) -> Result<Vec<Dispatched>> {
        match self.containers.first() {
            Some(container) => self.dispatch(host, Event::scroll(*container)),
            None => Ok(Vec::new()),
        }
    }

    fn dispatch_one<H: Host + ?Sized>(&self, host: &mut H, event: Event) -> Result<Dispatched> {
        let mut state = EventState::new(event);
        let mut path = vec![event.target];
        if event.kind.bubbles() {
            let mut cursor = host.parent(event.target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = host.parent(node);
            }
        }

        let mut dispatched = Dispatched {
            event,
            handled: 0,
            default_prevented: false,
            scrolled_to: None,
            active: None,
        };

        for node in path {
            state.current_target = node;
            for handler in self.listeners.get(node, event.kind) {
                match handler {
                    Handler::AnchorClick => {
                        if let Some(target) = click_anchor(host, &self.contract, node, &mut state)? {
                            dispatched.scrolled_to = Some(target);
                        }
                    }
                    Handler::Highlight => {
                        if let Some(change) = highlight::highlight(host, &self.contract)? {
                            dispatched.active = Some(change);
                        }
                    }
                }
                dispatched.handled += 1;
            }
        }

        dispatched.default_prevented = state.default_prevented();
        tracing::trace!(
            kind = ?event.kind,
            element = %host.describe(event.target),
            handled = dispatched.handled,
            "event dispatched"
        );
        Ok(dispatched)
    }
}
