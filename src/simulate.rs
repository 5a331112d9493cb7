//! Page simulation commands
//!
//! Each command loads one page into a [`Page`] host, wires [`SidebarSync`]
//! the way a browser embedding would, drives it with synthetic events and
//! reports the resulting state as a `ResultSet`.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::dom::NodeId;
use crate::error::SyncError;
use crate::events::Event;
use crate::page::{Layout, Page};
use crate::sync::{closest_section, collect_sections, DomContract, EmptySectionsPolicy, Host, SidebarSync};

/// One step of an event script: `{"scroll": 120.0}` or `{"click": "#contact"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStep {
    /// Set the container's scroll position, then fire a scroll event on it
    Scroll(f64),
    /// Click the first anchor whose href equals the value
    Click(String),
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Invalid event script")
}

/// A page loaded for simulation, with the label used in results
pub struct LoadedPage {
    pub page: Page,
    pub label: String,
}

pub fn load_page(
    root: &Path,
    page: &Path,
    layout: Option<&Path>,
    contract: &DomContract,
) -> Result<LoadedPage> {
    let path = resolve(root, page);
    let label = display_path(&path, root);
    let html = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read page: {}", label))?;

    let layout = match layout {
        Some(layout_path) => {
            let layout_path = resolve(root, layout_path);
            Some(Layout::load(&layout_path)?)
        }
        None => None,
    };

    let page = Page::for_contract(&html, layout, contract)
        .with_context(|| format!("Failed to load page: {}", label))?;
    Ok(LoadedPage { page, label })
}

fn first_container(page: &Page, contract: &DomContract) -> Result<NodeId, SyncError> {
    page.query_all(&contract.container)
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::MissingContainer {
            selector: contract.container.to_string(),
        })
}

/// First anchor registered by `sync` whose href equals `href`
fn find_anchor(page: &Page, sync: &SidebarSync, href: &str) -> Result<NodeId> {
    sync.anchors()
        .iter()
        .copied()
        .find(|anchor| page.attr(*anchor, "href").as_deref() == Some(href))
        .ok_or_else(|| anyhow!("No anchor matching '{}' has href '{}'", sync.contract().anchor, href))
}

fn nav_items(loaded: &LoadedPage, contract: &DomContract) -> Vec<ResultItem> {
    loaded
        .page
        .nav_entries(contract)
        .into_iter()
        .map(|entry| {
            ResultItem::nav(&loaded.label, entry.reference, entry.active)
                .with_element(loaded.page.describe(entry.node))
                .with_excerpt(entry.label)
        })
        .collect()
}

/// Sections and their offsets at `scroll_top`, the closest one marked active
pub fn sections(
    root: &Path,
    page: &Path,
    layout: Option<&Path>,
    scroll_top: f64,
    contract: &DomContract,
) -> Result<ResultSet> {
    let mut loaded = load_page(root, page, layout, contract)?;
    let container = first_container(&loaded.page, contract)?;
    loaded.page.scroll_to(container, scroll_top)?;
    let scroll_top = loaded.page.scroll_top(container);

    let offsets = collect_sections(&loaded.page, contract)?;
    let closest = closest_section(&offsets).map(|s| s.node);
    if closest.is_none() && contract.on_empty == EmptySectionsPolicy::Fail {
        return Err(SyncError::NoSections {
            selector: contract.section.to_string(),
        }
        .into());
    }

    Ok(offsets
        .iter()
        .map(|section| {
            ResultItem::section(&loaded.label, &section.id, section.offset)
                .with_element(loaded.page.describe(section.node))
                .with_meta(Meta {
                    offset: Some(section.offset),
                    active: Some(Some(section.node) == closest),
                    scroll_top: Some(scroll_top),
                    step: None,
                })
        })
        .collect())
}

/// Fire one scroll event at `scroll_top` and report every nav item
pub fn active(
    root: &Path,
    page: &Path,
    layout: Option<&Path>,
    scroll_top: f64,
    contract: &DomContract,
) -> Result<ResultSet> {
    let mut loaded = load_page(root, page, layout, contract)?;
    let sync = SidebarSync::setup(&loaded.page, contract.clone())?;
    let container = first_container(&loaded.page, contract)?;

    loaded.page.scroll_to(container, scroll_top)?;
    sync.dispatch(&mut loaded.page, Event::scroll(container))?;

    Ok(nav_items(&loaded, contract).into_iter().collect())
}

/// Click the anchor with `href`; report the scrolls it caused and the nav state after
pub fn click(
    root: &Path,
    page: &Path,
    layout: Option<&Path>,
    href: &str,
    contract: &DomContract,
) -> Result<ResultSet> {
    let mut loaded = load_page(root, page, layout, contract)?;
    let sync = SidebarSync::setup(&loaded.page, contract.clone())?;
    let anchor = find_anchor(&loaded.page, &sync, href)?;

    sync.dispatch(&mut loaded.page, Event::click(anchor))
        .with_context(|| format!("Click on '{}' failed", href))?;

    let mut result_set = ResultSet::new();
    for record in loaded.page.scroll_log() {
        let item = ResultItem::scroll(&loaded.label, serde_json::to_value(record)?)
            .with_element(loaded.page.describe(record.target))
            .with_meta(Meta {
                scroll_top: Some(record.to),
                ..Meta::default()
            });
        result_set.push(item);
    }
    result_set.extend(nav_items(&loaded, contract));
    Ok(result_set)
}

/// Replay `steps` in order, reporting the active section after each one
pub fn replay(
    root: &Path,
    page: &Path,
    layout: Option<&Path>,
    steps: &[ScriptStep],
    contract: &DomContract,
) -> Result<ResultSet> {
    let mut loaded = load_page(root, page, layout, contract)?;
    let sync = SidebarSync::setup(&loaded.page, contract.clone())?;
    let container = first_container(&loaded.page, contract)?;

    let mut result_set = ResultSet::new();
    let mut active: Option<String> = None;
    for (step, action) in steps.iter().enumerate() {
        let event = match action {
            ScriptStep::Scroll(top) => {
                loaded.page.scroll_to(container, *top)?;
                Event::scroll(container)
            }
            ScriptStep::Click(href) => Event::click(find_anchor(&loaded.page, &sync, href)?),
        };

        let dispatched = sync
            .dispatch(&mut loaded.page, event)
            .with_context(|| format!("Step {} failed", step + 1))?;
        if let Some(change) = dispatched.iter().rev().find_map(|d| d.active.as_ref()) {
            active = Some(change.section.clone());
        }
        tracing::debug!(step, active = ?active, "replayed step");

        let mut item = ResultItem::event(&loaded.label, step)
            .with_element(loaded.page.describe(event.target))
            .with_data(serde_json::to_value(&dispatched)?)
            .with_meta(Meta {
                scroll_top: Some(loaded.page.scroll_top(container)),
                step: Some(step),
                ..Meta::default()
            });
        item.id = active.clone();
        result_set.push(item);
    }
    Ok(result_set)
}

pub fn render(result_set: &ResultSet, config: RenderConfig) -> Result<()> {
    Renderer::with_config(config).render_to(result_set, std::io::stdout().lock())?;
    Ok(())
}
