//! Arena-backed document tree

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dom::select::Selector;
use crate::error::{Result, SyncError};

/// Index of a node inside its [`Document`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }
}

pub fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attr("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.remove_attr("class");
    } else {
        element.set_attr("class", classes.join(" "));
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, Vec<NodeId>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn create_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        let element = Element {
            tag: tag.into().to_ascii_lowercase(),
            attrs,
        };
        let element_id = element.attr("id").map(ToOwned::to_owned);
        let id = self.create_node(parent, NodeKind::Element(element));
        if let Some(element_id) = element_id {
            self.id_index.entry(element_id).or_default().push(id);
        }
        id
    }

    pub fn create_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.create_node(parent, NodeKind::Text(text.into()))
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(SyncError::UnknownNode(id.0))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(SyncError::UnknownNode(id.0)),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors from the direct parent up to the document root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            out.push(node);
            cursor = self.parent(node);
        }
        out
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// First element carrying `id`, like `getElementById`
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).and_then(|nodes| nodes.first().copied())
    }

    /// Ids carried by more than one element, sorted by id
    pub fn duplicate_ids(&self) -> Vec<(&str, &[NodeId])> {
        let mut dups: Vec<_> = self
            .id_index
            .iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(id, nodes)| (id.as_str(), nodes.as_slice()))
            .collect();
        dups.sort_by(|a, b| a.0.cmp(b.0));
        dups
    }

    /// All element nodes in document order
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
            }
            if let Ok(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.element(id).is_some_and(|e| has_class(e, class_name))
    }

    /// Returns whether the class list changed
    pub fn add_class(&mut self, id: NodeId, class_name: &str) -> Result<bool> {
        let element = self.element_mut(id)?;
        let mut classes = class_tokens(element.attr("class"));
        if classes.iter().any(|c| c == class_name) {
            return Ok(false);
        }
        classes.push(class_name.to_string());
        set_class_attr(element, &classes);
        Ok(true)
    }

    /// Returns whether the class list changed
    pub fn remove_class(&mut self, id: NodeId, class_name: &str) -> Result<bool> {
        let element = self.element_mut(id)?;
        let mut classes = class_tokens(element.attr("class"));
        let before = classes.len();
        classes.retain(|c| c != class_name);
        if classes.len() == before {
            return Ok(false);
        }
        set_class_attr(element, &classes);
        Ok(true)
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Ok(node) = self.node(current) else {
                continue;
            };
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Short label such as `li.nav-item[data-ref="intro"]`, for logs and reports
    pub fn describe(&self, id: NodeId) -> String {
        let Some(element) = self.element(id) else {
            return match self.nodes.get(id.0).map(|n| &n.kind) {
                Some(NodeKind::Document) => "#document".to_string(),
                Some(NodeKind::Text(_)) => "#text".to_string(),
                _ => format!("#unknown({})", id.0),
            };
        };

        let mut out = element.tag.clone();
        if let Some(element_id) = element.attr("id") {
            out.push('#');
            out.push_str(element_id);
        }
        for class_name in class_tokens(element.attr("class")) {
            out.push('.');
            out.push_str(&class_name);
        }
        for key in ["href", "data-ref"] {
            if let Some(value) = element.attr(key) {
                out.push_str(&format!("[{}=\"{}\"]", key, value));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_elements_in_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let nav = doc.create_element(root, "nav", Vec::new());
        let first = doc.create_element(nav, "a", attrs(&[("href", "#a")]));
        let main = doc.create_element(root, "main", Vec::new());
        let section = doc.create_element(main, "section", attrs(&[("id", "a")]));

        assert_eq!(doc.elements(), vec![nav, first, main, section]);
        assert_eq!(doc.element_by_id("a"), Some(section));
        assert_eq!(doc.ancestors(section), vec![main, root]);
    }

    #[test]
    fn test_class_toggling_reports_changes() {
        let mut doc = Document::new();
        let root = doc.root();
        let item = doc.create_element(root, "li", attrs(&[("class", "nav-item")]));

        assert!(doc.add_class(item, "active").unwrap());
        assert!(!doc.add_class(item, "active").unwrap());
        assert_eq!(doc.attr(item, "class"), Some("nav-item active"));

        assert!(doc.remove_class(item, "active").unwrap());
        assert!(!doc.remove_class(item, "active").unwrap());
        assert_eq!(doc.attr(item, "class"), Some("nav-item"));
    }

    #[test]
    fn test_remove_last_class_drops_attribute() {
        let mut doc = Document::new();
        let root = doc.root();
        let item = doc.create_element(root, "li", attrs(&[("class", "active")]));
        doc.remove_class(item, "active").unwrap();
        assert_eq!(doc.attr(item, "class"), None);
    }

    #[test]
    fn test_class_ops_on_text_node_fail() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.create_text(root, "hello");
        assert!(doc.add_class(text, "active").is_err());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.create_element(root, "section", attrs(&[("id", "x")]));
        doc.create_element(root, "section", attrs(&[("id", "x")]));
        doc.create_element(root, "section", attrs(&[("id", "y")]));

        let dups = doc.duplicate_ids();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "x");
        assert_eq!(dups[0].1.len(), 2);
    }

    #[test]
    fn test_describe_and_text_content() {
        let mut doc = Document::new();
        let root = doc.root();
        let item = doc.create_element(
            root,
            "li",
            attrs(&[("class", "nav-item active"), ("data-ref", "intro")]),
        );
        doc.create_text(item, "  Intro\n  section ");

        assert_eq!(
            doc.describe(item),
            r#"li.nav-item.active[data-ref="intro"]"#
        );
        assert_eq!(doc.text_content(item), "Intro section");
        assert_eq!(doc.describe(root), "#document");
    }
}
