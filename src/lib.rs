//! # pagefix
//!
//! Post-processing for statically generated documentation pages.
//!
//! ## Features
//!
//! - Build a table of contents from `h2` section headings
//! - Add striped-table classes to every table
//! - Expand `#BIB` citation placeholders into bibliography links
//! - Point `#g:` glossary references at the glossary page
//! - Relabel `CHAPTER` cross-reference placeholders from `toc.json`
//! - Audit a site for undefined or unused references
//!
//! ## Quick Start
//!
//! ```
//! use pagefix::{EnhanceOptions, PageConfig, StaticSource, enhance_html};
//!
//! let page = r#"<div class="main"><a href="../intro/">CHAPTER</a></div>"#;
//! let table = StaticSource::from_json(r#"{"intro": {"type": "number", "index": 1}}"#);
//!
//! let options = EnhanceOptions::new(PageConfig::nested());
//! let (html, _summary) = enhance_html(page, &options, &table).unwrap();
//! assert!(html.contains(">Chapter 1</a>"));
//! ```
//!
//! ## Working with the DOM
//!
//! Each transform is also available on its own:
//!
//! ```
//! use pagefix::dom::parse_document;
//! use pagefix::enhance::{rewrite_gloss_refs, style_tables};
//! use pagefix::PageConfig;
//!
//! let mut dom = parse_document(r##"<table></table><a href="#g:slug">slug</a>"##);
//! style_tables(&mut dom).unwrap();
//! rewrite_gloss_refs(&mut dom, &PageConfig::root()).unwrap();
//!
//! let html = dom.to_html();
//! assert!(html.contains(r#"class="table table-striped""#));
//! assert!(html.contains(r##"href="./gloss/#g:slug""##));
//! ```

pub mod audit;
pub mod config;
pub mod crossref;
pub mod dom;
pub mod enhance;
pub mod error;
pub mod source;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use audit::{Audit, Report};
pub use config::{EnhanceOptions, PageConfig, Profile};
pub use crossref::{CrossRefTable, Entry, Outline};
pub use enhance::{Summary, enhance, enhance_html};
pub use error::{Error, Result};
pub use source::{FsSource, NoSource, StaticSource, TableSource};
