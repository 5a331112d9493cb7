//! DOM module - the document tree the sync engine reads and mutates
//!
//! This module provides:
//! - An arena-backed tree (`Document`, `NodeId`)
//! - HTML parsing via html5ever
//! - CSS selector matching for the DOM contract markers

pub mod node;
pub mod parse;
pub mod select;

pub use node::{Document, Element, NodeId};
pub use parse::parse_html;
pub use select::{DomElement, Selector};
