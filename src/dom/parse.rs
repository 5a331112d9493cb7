//! HTML parsing into the arena [`Document`] via html5ever

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::node::{Document, NodeId};
use crate::error::{Result, SyncError};

/// Parse a full HTML document
pub fn parse_html(html: &str) -> Result<Document> {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| SyncError::HtmlParse(e.to_string()))?;

    let mut document = Document::new();
    let root = document.root();
    convert_node(&mut document, &dom.document, root);

    tracing::debug!(nodes = document.len(), "parsed html document");
    Ok(document)
}

fn convert_node(document: &mut Document, handle: &Handle, parent: NodeId) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(document, child, parent);
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let node = document.create_element(parent, name.local.to_string(), attrs);
            for child in handle.children.borrow().iter() {
                convert_node(document, child, node);
            }
        }
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if !text.trim().is_empty() {
                document.create_text(parent, text);
            }
        }
        // Doctype, comments and processing instructions carry nothing we query
        _ => {}
    }
}
