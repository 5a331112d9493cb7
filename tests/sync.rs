//! Behavior tests for the sidebar sync engine, driven through the public API

use navsync::dom::{NodeId, Selector};
use navsync::events::Event;
use navsync::page::{Layout, Page};
use navsync::sync::{
    closest_section, collect_sections, DanglingAnchorPolicy, DomContract, EmptySectionsPolicy,
    Host, ScrollBehavior,
};
use navsync::{SidebarSync, SyncError};

const SITE: &str = include_str!("fixtures/site/index.html");
const SITE_LAYOUT: &str = include_str!("fixtures/site/layout.json");

/// Delegates to a `Page`, counting `scroll_into_view` calls
struct CountingHost {
    page: Page,
    scrolls: Vec<(NodeId, ScrollBehavior)>,
}

impl CountingHost {
    fn new(page: Page) -> Self {
        Self {
            page,
            scrolls: Vec::new(),
        }
    }
}

impl Host for CountingHost {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.page.query_all(selector)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.page.attr(node, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.page.parent(node)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.page.element_by_id(id)
    }

    fn offset_top(&self, node: NodeId) -> navsync::Result<f64> {
        self.page.offset_top(node)
    }

    fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.page.has_class(node, class_name)
    }

    fn add_class(&mut self, node: NodeId, class_name: &str) -> navsync::Result<bool> {
        self.page.add_class(node, class_name)
    }

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> navsync::Result<bool> {
        self.page.remove_class(node, class_name)
    }

    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> navsync::Result<()> {
        self.scrolls.push((node, behavior));
        self.page.scroll_into_view(node, behavior)
    }

    fn drain_events(&mut self) -> Vec<Event> {
        self.page.drain_events()
    }
}

fn site_page(contract: &DomContract) -> Page {
    let layout = Layout::from_json(SITE_LAYOUT).unwrap();
    Page::for_contract(SITE, Some(layout), contract).unwrap()
}

fn site() -> (CountingHost, SidebarSync) {
    let contract = DomContract::default();
    let host = CountingHost::new(site_page(&contract));
    let sync = SidebarSync::setup(&host, contract).unwrap();
    (host, sync)
}

fn container(host: &CountingHost) -> NodeId {
    host.element_by_id("content").unwrap()
}

fn active_refs(host: &CountingHost) -> Vec<String> {
    let contract = DomContract::default();
    host.query_all(&contract.nav_item)
        .into_iter()
        .filter(|n| host.has_class(*n, &contract.active_class))
        .filter_map(|n| host.attr(n, &contract.ref_attr))
        .collect()
}

fn scroll_to(host: &mut CountingHost, sync: &SidebarSync, top: f64) {
    let main = container(host);
    host.page.scroll_to(main, top).unwrap();
    sync.dispatch(host, Event::scroll(main)).unwrap();
}

fn anchor_with_href(host: &CountingHost, sync: &SidebarSync, href: &str) -> NodeId {
    sync.anchors()
        .iter()
        .copied()
        .find(|a| host.attr(*a, "href").as_deref() == Some(href))
        .unwrap()
}

#[test]
fn setup_registers_every_anchor_and_the_container() {
    let (host, sync) = site();
    assert_eq!(sync.anchors().len(), 5);
    assert_eq!(sync.containers(), &[container(&host)]);
    assert!(sync.is_attached());
}

#[test]
fn click_prevents_default_and_scrolls_once() {
    let (mut host, sync) = site();
    let contact = host.element_by_id("contact").unwrap();
    let anchor = anchor_with_href(&host, &sync, "#contact");

    let dispatched = sync.dispatch(&mut host, Event::click(anchor)).unwrap();

    assert!(dispatched[0].default_prevented);
    assert_eq!(dispatched[0].scrolled_to, Some(contact));
    assert_eq!(host.scrolls, vec![(contact, ScrollBehavior::Smooth)]);
    assert_eq!(host.page.scroll_top(container(&host)), 1800.0);
}

#[test]
fn click_scroll_moves_the_highlight() {
    let (mut host, sync) = site();
    let anchor = anchor_with_href(&host, &sync, "#contact");

    let dispatched = sync.dispatch(&mut host, Event::click(anchor)).unwrap();

    // The click, then the scroll event the smooth scroll raised
    assert_eq!(dispatched.len(), 2);
    assert_eq!(dispatched[1].event, Event::scroll(container(&host)));
    assert_eq!(active_refs(&host), vec!["contact"]);
}

#[test]
fn click_on_anchor_descendant_bubbles_to_anchor() {
    let (mut host, sync) = site();
    let span = host.element_by_id("cta").unwrap();
    let contact = host.element_by_id("contact").unwrap();

    let dispatched = sync.dispatch(&mut host, Event::click(span)).unwrap();

    assert!(dispatched[0].default_prevented);
    assert_eq!(host.scrolls, vec![(contact, ScrollBehavior::Smooth)]);
}

#[test]
fn click_outside_anchors_does_nothing() {
    let (mut host, sync) = site();
    let heading_section = host.element_by_id("usage").unwrap();

    let dispatched = sync.dispatch(&mut host, Event::click(heading_section)).unwrap();

    assert_eq!(dispatched[0].handled, 0);
    assert!(!dispatched[0].default_prevented);
    assert!(host.scrolls.is_empty());
}

#[test]
fn scroll_activates_the_nearest_section() {
    let (mut host, sync) = site();

    scroll_to(&mut host, &sync, 640.0);
    assert_eq!(active_refs(&host), vec!["usage"]);

    scroll_to(&mut host, &sync, 1180.0);
    assert_eq!(active_refs(&host), vec!["faq"]);

    scroll_to(&mut host, &sync, 0.0);
    assert_eq!(active_refs(&host), vec!["intro"]);
}

#[test]
fn active_reference_matches_minimum_absolute_offset() {
    let (mut host, sync) = site();
    for top in [0.0, 250.0, 333.0, 900.0, 1500.0, 1790.0, 2400.0] {
        scroll_to(&mut host, &sync, top);

        let offsets = collect_sections(&host, sync.contract()).unwrap();
        let min = offsets
            .iter()
            .map(|s| s.offset.abs())
            .fold(f64::INFINITY, f64::min);
        let winner = closest_section(&offsets).unwrap();
        assert_eq!(winner.offset.abs(), min);
        assert_eq!(active_refs(&host), vec![winner.id.clone()], "scroll top {}", top);
    }
}

#[test]
fn repeated_scroll_is_idempotent() {
    let (mut host, sync) = site();
    scroll_to(&mut host, &sync, 640.0);
    let first = active_refs(&host);

    let dispatched = sync.scroll(&mut host).unwrap();
    let change = dispatched[0].active.as_ref().unwrap();

    assert_eq!(active_refs(&host), first);
    assert!(change.activated.is_empty());
    assert!(change.deactivated.is_empty());
}

#[test]
fn nearest_section_from_scenario_offsets() {
    let html = r#"<main>
<section class="section-container" id="a"></section>
<section class="section-container" id="b"></section>
<section class="section-container" id="c"></section>
</main>
<nav>
<a class="nav-item active" data-ref="a">A</a>
<a class="nav-item" data-ref="b">B</a>
<a class="nav-item" data-ref="c">C</a>
</nav>"#;
    let mut layout = Layout::default();
    layout.set_top("a", 120.0);
    layout.set_top("b", -5.0);
    layout.set_top("c", 300.0);
    let contract = DomContract::default();
    let mut host = CountingHost::new(Page::for_contract(html, Some(layout), &contract).unwrap());
    let sync = SidebarSync::setup(&host, contract).unwrap();

    sync.scroll(&mut host).unwrap();

    assert_eq!(active_refs(&host), vec!["b"]);
}

#[test]
fn single_section_stays_active() {
    let html = r#"<main><section class="section-container" id="a"></section></main>
<nav><a class="nav-item active" data-ref="a">A</a></nav>"#;
    let contract = DomContract::default();
    let mut host = CountingHost::new(Page::for_contract(html, None, &contract).unwrap());
    let sync = SidebarSync::setup(&host, contract).unwrap();

    let dispatched = sync.scroll(&mut host).unwrap();

    assert_eq!(active_refs(&host), vec!["a"]);
    let change = dispatched[0].active.as_ref().unwrap();
    assert!(change.activated.is_empty());
    assert!(change.deactivated.is_empty());
}

#[test]
fn one_to_many_references_all_activate() {
    let html = r#"<main>
<section class="section-container" id="a"></section>
<section class="section-container" id="b"></section>
</main>
<nav><a class="nav-item" data-ref="a">A</a><a class="nav-item" data-ref="b">B</a></nav>
<footer><span class="crumb" data-ref="a">A</span></footer>"#;
    let contract = DomContract::default();
    let mut page = Page::for_contract(html, None, &contract).unwrap();
    let sync = SidebarSync::setup(&page, contract.clone()).unwrap();

    let dispatched = sync.scroll(&mut page).unwrap();

    let change = dispatched[0].active.as_ref().unwrap();
    assert_eq!(change.section, "a");
    assert_eq!(change.matched.len(), 2);
    let crumb = page.query_all(&Selector::parse(".crumb").unwrap())[0];
    assert!(page.has_class(crumb, "active"));
}

#[test]
fn empty_sections_fail_by_default() {
    let html = r#"<main></main><nav><a class="nav-item active" data-ref="a">A</a></nav>"#;
    let contract = DomContract::default();
    let mut page = Page::for_contract(html, None, &contract).unwrap();
    let sync = SidebarSync::setup(&page, contract).unwrap();

    let err = sync.scroll(&mut page).unwrap_err();
    assert!(matches!(err, SyncError::NoSections { .. }));
}

#[test]
fn empty_sections_ignored_leaves_nav_untouched() {
    let html = r#"<main></main><nav><a class="nav-item active" data-ref="a">A</a></nav>"#;
    let contract = DomContract {
        on_empty: EmptySectionsPolicy::Ignore,
        ..DomContract::default()
    };
    let mut page = Page::for_contract(html, None, &contract).unwrap();
    let sync = SidebarSync::setup(&page, contract.clone()).unwrap();

    let dispatched = sync.scroll(&mut page).unwrap();

    assert!(dispatched[0].active.is_none());
    let item = page.query_all(&contract.nav_item)[0];
    assert!(page.has_class(item, "active"));
}

const DANGLING: &str = r##"<main><section class="section-container" id="a"></section></main>
<nav><a class="nav-item" data-ref="a" href="#missing">A</a></nav>"##;

#[test]
fn dangling_anchor_fails_after_default_prevented() {
    let contract = DomContract::default();
    let mut host = CountingHost::new(Page::for_contract(DANGLING, None, &contract).unwrap());
    let sync = SidebarSync::setup(&host, contract).unwrap();
    let anchor = sync.anchors()[0];

    let mut state = navsync::events::EventState::new(Event::click(anchor));
    let err = navsync::sync::click_anchor(&mut host, sync.contract(), anchor, &mut state)
        .unwrap_err();

    assert_eq!(
        err,
        SyncError::DanglingAnchor {
            href: "#missing".to_string()
        }
    );
    assert!(state.default_prevented());
    assert!(host.scrolls.is_empty());

    // Through dispatch, the error propagates out of the loop
    assert!(sync.dispatch(&mut host, Event::click(anchor)).is_err());
}

#[test]
fn dangling_anchor_ignored_does_not_scroll() {
    let contract = DomContract {
        on_dangling: DanglingAnchorPolicy::Ignore,
        ..DomContract::default()
    };
    let mut host = CountingHost::new(Page::for_contract(DANGLING, None, &contract).unwrap());
    let sync = SidebarSync::setup(&host, contract).unwrap();
    let anchor = sync.anchors()[0];

    let dispatched = sync.dispatch(&mut host, Event::click(anchor)).unwrap();

    assert_eq!(dispatched.len(), 1);
    assert!(dispatched[0].default_prevented);
    assert_eq!(dispatched[0].scrolled_to, None);
    assert!(host.scrolls.is_empty());
}

#[test]
fn bare_hash_anchor_is_an_invalid_fragment() {
    let html = r##"<main><section class="section-container" id="a"></section></main><a href="#">Top</a>"##;
    let contract = DomContract::default();
    let mut page = Page::for_contract(html, None, &contract).unwrap();
    let sync = SidebarSync::setup(&page, contract).unwrap();
    let anchor = sync.anchors()[0];

    let err = sync.dispatch(&mut page, Event::click(anchor)).unwrap_err();
    assert_eq!(err.code(), "EMPTY_FRAGMENT");
}

#[test]
fn missing_container_fails_setup() {
    let contract = DomContract::default();
    let page = Page::for_contract("<div></div>", None, &contract).unwrap();
    let err = SidebarSync::setup(&page, contract).unwrap_err();
    assert!(matches!(err, SyncError::MissingContainer { .. }));
}

#[test]
fn detach_stops_every_handler() {
    let (mut host, mut sync) = site();
    let anchor = anchor_with_href(&host, &sync, "#contact");

    assert_eq!(sync.detach(), 6);
    assert!(!sync.is_attached());

    let dispatched = sync.dispatch(&mut host, Event::click(anchor)).unwrap();
    assert_eq!(dispatched[0].handled, 0);
    assert!(!dispatched[0].default_prevented);
    assert!(host.scrolls.is_empty());

    let main = container(&host);
    host.page.scroll_to(main, 640.0).unwrap();
    sync.dispatch(&mut host, Event::scroll(main)).unwrap();
    assert_eq!(active_refs(&host), vec!["intro"]);
}

#[test]
fn custom_contract_markers() {
    let html = r##"<div class="content">
<article class="chapter" id="one"></article>
<article class="chapter" id="two"></article>
</div>
<ol><li class="toc" data-target="one"><a href="#one">1</a></li><li class="toc" data-target="two"><a href="#two">2</a></li></ol>"##;
    let contract = DomContract {
        container: Selector::parse("div.content").unwrap(),
        section: Selector::parse(".chapter").unwrap(),
        nav_item: Selector::parse("li.toc").unwrap(),
        ref_attr: "data-target".to_string(),
        active_class: "current".to_string(),
        ..DomContract::default()
    };
    let mut page = Page::for_contract(html, None, &contract).unwrap();
    let sync = SidebarSync::setup(&page, contract.clone()).unwrap();
    let anchor = sync.anchors()[1];

    sync.dispatch(&mut page, Event::click(anchor)).unwrap();

    let current: Vec<_> = page
        .query_all(&contract.nav_item)
        .into_iter()
        .filter(|n| page.has_class(*n, "current"))
        .filter_map(|n| page.attr(n, "data-target"))
        .collect();
    assert_eq!(current, vec!["two"]);
}
