//! CSS selector matching for the DOM contract markers
//!
//! Markers are parsed by the `selectors` crate and matched against the arena
//! through [`DomElement`], so combinators (`nav .nav-item`, `main > section`),
//! selector lists (`main, .content`) and tree-structural pseudo-classes behave
//! as they do in `querySelectorAll`. Pseudo-classes that depend on user or
//! browser state (`:hover`, `:visited`) and pseudo-elements are rejected.

use cssparser::{Parser as CssParser, ParserInput, ToCss};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    matches_selector, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext,
    MatchingMode, NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{NthIndexCache, OpaqueElement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dom::node::{Document, Element, NodeId};
use crate::error::{Result, SyncError};

/// A parsed selector list, kept together with its source text
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    source: String,
    list: SelectorList<ContractSelectors>,
}

impl Selector {
    pub fn parse(src: &str) -> Result<Self> {
        let source = src.trim();
        let mut input = ParserInput::new(source);
        let mut parser = CssParser::new(&mut input);
        let list =
            SelectorList::<ContractSelectors>::parse(&MarkerParser, &mut parser, ParseRelative::No)
                .map_err(|err| {
                    tracing::debug!(selector = source, error = ?err.kind, "selector rejected");
                    SyncError::UnsupportedSelector(src.into())
                })?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// `[key="value"]`, with both parts escaped so any value can be matched
    pub fn attr_equals(key: &str, value: &str) -> Result<Self> {
        let mut source = String::from("[");
        cssparser::serialize_identifier(key, &mut source)
            .and_then(|_| {
                source.push('=');
                cssparser::serialize_string(value, &mut source)
            })
            .map_err(|_| SyncError::UnsupportedSelector(key.into()))?;
        source.push(']');
        Self::parse(&source)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element at `node` matches any selector in the list
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(element) = DomElement::new(doc, node) else {
            return false;
        };

        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );

        self.list
            .0
            .iter()
            .any(|selector| matches_selector(selector, 0, None, &element, &mut context))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Selector {}

impl FromStr for Selector {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self> {
        Selector::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.source
    }
}

/// An element of a [`Document`], as seen by the selector matcher
#[derive(Clone, Copy)]
pub struct DomElement<'a> {
    doc: &'a Document,
    node: NodeId,
    element: &'a Element,
}

impl<'a> DomElement<'a> {
    /// `None` for text and document nodes
    pub fn new(doc: &'a Document, node: NodeId) -> Option<Self> {
        let element = doc.element(node)?;
        Some(Self { doc, node, element })
    }

    fn siblings(&self) -> &'a [NodeId] {
        match self.doc.parent(self.node) {
            Some(parent) => self.doc.children(parent),
            None => &[],
        }
    }

    fn wrap(&self, node: NodeId) -> Option<Self> {
        DomElement::new(self.doc, node)
    }
}

impl fmt::Debug for DomElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomElement")
            .field("node", &self.node)
            .field("tag", &self.element.tag)
            .finish_non_exhaustive()
    }
}

impl selectors::Element for DomElement<'_> {
    type Impl = ContractSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.element)
    }

    fn parent_element(&self) -> Option<Self> {
        self.wrap(self.doc.parent(self.node)?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = siblings.iter().position(|id| *id == self.node)?;
        siblings[..index].iter().rev().find_map(|id| self.wrap(*id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = siblings.iter().position(|id| *id == self.node)?;
        siblings[index + 1..].iter().find_map(|id| self.wrap(*id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc
            .children(self.node)
            .iter()
            .find_map(|id| self.wrap(*id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.element.tag == local_name
    }

    fn has_namespace(&self, _ns: &()) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.element.tag == other.element.tag
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&()>,
        local_name: &CssString,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        self.element
            .attr(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.element.tag.as_str(), "a" | "area") && self.element.attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.element.tag == "slot"
    }

    fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .attr("id")
            .is_some_and(|value| same_name(value, &id.0, case_sensitivity))
    }

    fn has_class(&self, name: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.element.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| same_name(class, &name.0, case_sensitivity))
        })
    }

    fn imported_part(&self, _name: &CssString) -> Option<CssString> {
        None
    }

    fn is_part(&self, _name: &CssString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.doc
            .children(self.node)
            .iter()
            .all(|id| self.doc.element(*id).is_none() && self.doc.text_content(*id).is_empty())
    }

    fn is_root(&self) -> bool {
        self.doc.parent(self.node) == Some(self.doc.root())
    }
}

fn same_name(actual: &str, expected: &str, case_sensitivity: CaseSensitivity) -> bool {
    match case_sensitivity {
        CaseSensitivity::CaseSensitive => actual == expected,
        CaseSensitivity::AsciiCaseInsensitive => actual.eq_ignore_ascii_case(expected),
    }
}

/// Identifiers and attribute values inside a parsed selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssString(pub String);

impl From<&str> for CssString {
    fn from(s: &str) -> Self {
        CssString(s.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CssString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// Selector types for plain HTML documents without namespaces
#[derive(Debug, Clone, Copy)]
pub struct ContractSelectors;

impl selectors::SelectorImpl for ContractSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssString;
    type LocalName = CssString;
    type NamespacePrefix = CssString;
    type NamespaceUrl = ();
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = ();
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// State-dependent pseudo-classes; none are supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = ContractSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = ContractSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

struct MarkerParser;

impl<'i> selectors::parser::Parser<'i> for MarkerParser {
    type Impl = ContractSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> std::result::Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>>
    {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_pseudo_element(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> std::result::Result<PseudoElement, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>>
    {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_non_ts_functional_pseudo_class<'t>(
        &self,
        name: cssparser::CowRcStr<'i>,
        parser: &mut CssParser<'i, 't>,
    ) -> std::result::Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>>
    {
        Err(parser.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn default_namespace(&self) -> Option<()> {
        None
    }

    fn namespace_for_prefix(&self, _prefix: &CssString) -> Option<()> {
        None
    }
}
