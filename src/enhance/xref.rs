//! Chapter cross-references.
//!
//! Inside the main content, a link whose entire content is the placeholder
//! text `CHAPTER` is relabelled from the cross-reference table, using the
//! slug found in its `href` (`../intro/index.html` → `intro`). The `href`
//! itself is never changed.

use crate::config::PageConfig;
use crate::crossref::CrossRefTable;
use crate::dom::{Dom, NodeId, Selector};
use crate::error::Result;
use crate::source::TableSource;

/// Container whose links are resolved.
pub const MAIN: &str = "div.main";

/// Link text that marks an unresolved cross-reference.
pub const PLACEHOLDER: &str = "CHAPTER";

/// Result of the cross-reference step for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XrefOutcome {
    /// The table could not be loaded; placeholders were left as they are.
    TableUnavailable(String),
    /// The page has no main content container.
    NoMainContent,
    /// This many placeholders were relabelled.
    Resolved(usize),
}

/// Slug of the page an `href` points at: its second `/`-separated segment.
pub fn slug_from_href(href: &str) -> Option<&str> {
    href.split('/').nth(1).filter(|slug| !slug.is_empty())
}

fn is_placeholder(dom: &Dom, link: NodeId) -> bool {
    dom.children(link).all(|child| dom.is_text(child)) && dom.text_content(link) == PLACEHOLDER
}

/// Placeholder links inside the main content, or `None` without a container.
pub fn chapter_placeholders(dom: &Dom) -> Result<Option<Vec<NodeId>>> {
    let Some(main) = dom.select_first(dom.document(), &Selector::parse(MAIN)?) else {
        return Ok(None);
    };
    let links = dom
        .select(main, &Selector::parse("a")?)
        .into_iter()
        .filter(|&link| is_placeholder(dom, link))
        .collect();
    Ok(Some(links))
}

/// Relabel placeholders from an already-loaded table.
///
/// Placeholders without an `href` are skipped; unknown slugs become
/// `Unknown Reference`.
pub fn resolve_cross_refs(dom: &mut Dom, table: &CrossRefTable) -> Result<XrefOutcome> {
    let Some(links) = chapter_placeholders(dom)? else {
        return Ok(XrefOutcome::NoMainContent);
    };

    let mut resolved = 0;
    for link in links {
        let Some(href) = dom.get_attr(link, "href") else {
            continue;
        };
        let label = match slug_from_href(href) {
            Some(slug) => table.label_for(slug),
            None => {
                tracing::debug!(href, "cross-reference without slug");
                crate::crossref::UNKNOWN_REFERENCE.to_string()
            }
        };
        dom.set_text(link, &label);
        resolved += 1;
    }
    Ok(XrefOutcome::Resolved(resolved))
}

/// Load the page's table from `source`, then relabel placeholders.
///
/// Nothing on the page is touched until the table has loaded. A load failure
/// is logged and reported in the outcome, never returned as an error.
pub fn resolve_from_source(
    dom: &mut Dom,
    page: &PageConfig,
    source: &dyn TableSource,
) -> Result<XrefOutcome> {
    let path = page.toc_path();
    let table = match source.load(&path) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(%path, error = %e, "cross-reference table unavailable, leaving placeholders");
            return Ok(XrefOutcome::TableUnavailable(e.to_string()));
        }
    };
    resolve_cross_refs(dom, &table)
}
