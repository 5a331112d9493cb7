//! Scroll-driven nav highlighting
//!
//! Every scroll tick re-reads all sections, picks the one whose top edge is
//! nearest the container origin, and moves the active class onto the nav
//! entries referencing it.

use serde::Serialize;

use crate::dom::{NodeId, Selector};
use crate::error::{Result, SyncError};
use crate::sync::contract::{DomContract, EmptySectionsPolicy};
use crate::sync::host::Host;

/// One section's position at the time of a scroll tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionOffset {
    pub node: NodeId,
    /// Empty when the element has no `id`
    pub id: String,
    pub offset: f64,
}

/// Nav entries touched by one highlight pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveChange {
    /// Id of the winning section
    pub section: String,
    /// Every element referencing the winner (active after the pass)
    pub matched: Vec<NodeId>,
    /// Elements that gained the active class
    pub activated: Vec<NodeId>,
    /// Nav items that lost it
    pub deactivated: Vec<NodeId>,
}

pub fn collect_sections<H: Host + ?Sized>(
    host: &H,
    contract: &DomContract,
) -> Result<Vec<SectionOffset>> {
    host.query_all(&contract.section)
        .into_iter()
        .map(|node| {
            Ok(SectionOffset {
                node,
                id: host.attr(node, "id").unwrap_or_default(),
                offset: host.offset_top(node)?,
            })
        })
        .collect()
}

/// Section with the smallest absolute offset; the first one wins ties.
/// `None` only for an empty slice.
pub fn closest_section(sections: &[SectionOffset]) -> Option<&SectionOffset> {
    let (first, rest) = sections.split_first()?;
    Some(rest.iter().fold(first, |prev, curr| {
        if curr.offset.abs() < prev.offset.abs() {
            curr
        } else {
            prev
        }
    }))
}

/// Clear the active class from every nav item not referencing `section_id`,
/// then set it on every element that does
pub fn apply_active<H: Host + ?Sized>(
    host: &mut H,
    contract: &DomContract,
    section_id: &str,
) -> Result<ActiveChange> {
    let mut deactivated = Vec::new();
    for node in host.query_all(&contract.nav_item) {
        if host.attr(node, &contract.ref_attr).as_deref() == Some(section_id) {
            continue;
        }
        if host.remove_class(node, &contract.active_class)? {
            deactivated.push(node);
        }
    }

    let matched = host.query_all(&Selector::attr_equals(&contract.ref_attr, section_id)?);
    let mut activated = Vec::new();
    for node in &matched {
        if host.add_class(*node, &contract.active_class)? {
            activated.push(*node);
        }
    }

    Ok(ActiveChange {
        section: section_id.to_string(),
        matched,
        activated,
        deactivated,
    })
}

/// The scroll handler body. `Ok(None)` means no section exists and the
/// contract says to ignore that.
pub fn highlight<H: Host + ?Sized>(
    host: &mut H,
    contract: &DomContract,
) -> Result<Option<ActiveChange>> {
    let sections = collect_sections(host, contract)?;
    let Some(closest) = closest_section(&sections) else {
        return match contract.on_empty {
            EmptySectionsPolicy::Fail => Err(SyncError::NoSections {
                selector: contract.section.to_string(),
            }),
            EmptySectionsPolicy::Ignore => {
                tracing::debug!(selector = %contract.section, "no sections, nav left untouched");
                Ok(None)
            }
        };
    };

    tracing::debug!(
        section = %closest.id,
        offset = closest.offset,
        candidates = sections.len(),
        "closest section"
    );

    let section_id = closest.id.clone();
    apply_active(host, contract, &section_id).map(Some)
}
