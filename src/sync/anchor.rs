//! Anchor click handling: suppress the jump, smooth-scroll to the target

use crate::dom::NodeId;
use crate::error::{Result, SyncError};
use crate::events::EventState;
use crate::sync::contract::{DanglingAnchorPolicy, DomContract};
use crate::sync::host::Host;

/// The id part of an in-page href (`"#contact"` -> `"contact"`)
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Resolve an in-page href to the element it names
pub fn resolve_fragment<H: Host + ?Sized>(host: &H, href: &str) -> Result<NodeId> {
    let id = fragment_id(href).ok_or_else(|| SyncError::InvalidFragment {
        href: href.to_string(),
    })?;
    host.element_by_id(id)
        .ok_or_else(|| SyncError::DanglingAnchor {
            href: href.to_string(),
        })
}

/// Run the click handler for `anchor`. Returns the element scrolled to, if any.
///
/// The default action is prevented before the target is resolved, so a
/// dangling anchor never falls back to the browser's own jump.
pub fn click_anchor<H: Host + ?Sized>(
    host: &mut H,
    contract: &DomContract,
    anchor: NodeId,
    event: &mut EventState,
) -> Result<Option<NodeId>> {
    event.prevent_default();

    let href = host.attr(anchor, "href").unwrap_or_default();
    let target = match resolve_fragment(host, &href) {
        Ok(target) => target,
        Err(err) => match contract.on_dangling {
            DanglingAnchorPolicy::Fail => return Err(err),
            DanglingAnchorPolicy::Ignore => {
                tracing::warn!(href = %href, error = %err, "ignoring click on unresolved anchor");
                return Ok(None);
            }
        },
    };

    host.scroll_into_view(target, contract.scroll_behavior)?;
    tracing::debug!(href = %href, element = %host.describe(target), "scrolled anchor target into view");
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_id() {
        assert_eq!(fragment_id("#contact"), Some("contact"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id("contact"), None);
        assert_eq!(fragment_id(""), None);
    }
}
