//! Mutable HTML document model.
//!
//! Pages are parsed with html5ever into an arena ([`Dom`]), queried with CSS
//! selectors ([`Selector`]) and written back out with [`Dom::to_html`].
//!
//! # Example
//!
//! ```
//! use pagefix::dom::{parse_document, Selector};
//!
//! let mut dom = parse_document("<table><tr><td>1</td></tr></table>");
//! let tables = dom.select(dom.document(), &Selector::parse("table").unwrap());
//! dom.add_class(tables[0], "table");
//! assert!(dom.to_html().contains(r#"<table class="table">"#));
//! ```

mod arena;
mod select;
mod serialize;
mod sink;

pub use arena::{Attribute, Children, Descendants, Dom, Node, NodeData, NodeId, attr_name, html_name};
pub use select::{ElementRef, PageSelectors, Selector};

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use sink::DomSink;

/// Parse a complete HTML document.
///
/// Parsing never fails: malformed markup is repaired the way browsers do.
pub fn parse_document(html: &str) -> Dom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };
    html5ever::parse_document(DomSink::new(), opts)
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
