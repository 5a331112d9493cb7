//! navsync - keeps a sidebar navigation in step with the scroll position of
//! a content container, and turns in-page anchor clicks into smooth scrolls.
//!
//! The behavior is written against the [`sync::Host`] trait, the DOM contract
//! a host environment must provide. [`page::Page`] is a host built from
//! parsed HTML and a layout file, used by the CLI and the tests.
//!
//! ```no_run
//! use navsync::{events::Event, page::Page, sync::DomContract, SidebarSync};
//!
//! # fn main() -> navsync::Result<()> {
//! let html = std::fs::read_to_string("index.html").unwrap_or_default();
//! let contract = DomContract::default();
//! let mut page = Page::for_contract(&html, None, &contract)?;
//! let sync = SidebarSync::setup(&page, contract)?;
//! sync.scroll(&mut page)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod events;
pub mod lint;
pub mod page;
pub mod scan;
pub mod simulate;
pub mod sync;

pub use error::{Result, SyncError};
pub use sync::SidebarSync;
