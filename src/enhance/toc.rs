//! Table of contents built from `h2` section headings.

use crate::dom::{Dom, NodeId, Selector};
use crate::error::Result;

/// Container that receives the generated table of contents.
pub const CONTAINER: &str = "div.headings";

/// Prefix of the ids of headings that belong in the table of contents.
pub const SECTION_PREFIX: &str = "s:";

/// What happened to the headings container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TocOutcome {
    /// The page has no container.
    #[default]
    NoContainer,
    /// The page has no section headings, so the container was removed.
    Removed,
    /// The container now lists this many headings.
    Built(usize),
}

/// Replace the contents of `div.headings` with links to every section heading.
///
/// Headings are `h2` elements whose id starts with `s:`, taken in document
/// order. Each list entry links to `#<id>` and carries a copy of the
/// heading's own markup. A page without such headings loses the container
/// entirely instead of showing an empty list.
pub fn build_table_of_contents(dom: &mut Dom) -> Result<TocOutcome> {
    let Some(container) = dom.select_first(dom.document(), &Selector::parse(CONTAINER)?) else {
        return Ok(TocOutcome::NoContainer);
    };

    let headings: Vec<NodeId> = dom
        .select(dom.document(), &Selector::parse("h2")?)
        .into_iter()
        .filter(|&h| {
            dom.element_id(h)
                .is_some_and(|id| id.starts_with(SECTION_PREFIX))
        })
        .collect();

    if headings.is_empty() {
        dom.detach(container);
        return Ok(TocOutcome::Removed);
    }

    // Build the list before touching the container: headings may live inside it.
    let list = dom.create_html_element("ul", &[]);
    dom.append_text(list, "\n");
    for (i, &heading) in headings.iter().enumerate() {
        if i > 0 {
            dom.append_text(list, "\n");
        }
        let item = heading_entry(dom, heading);
        dom.append(list, item);
    }

    let title = dom.create_html_element("h2", &[]);
    dom.append_text(title, "Contents");

    dom.clear_children(container);
    dom.append(container, title);
    dom.append(container, list);

    Ok(TocOutcome::Built(headings.len()))
}

/// `<li><a href="#id">label</a></li>` for one heading.
fn heading_entry(dom: &mut Dom, heading: NodeId) -> NodeId {
    let href = format!("#{}", dom.element_id(heading).unwrap_or_default());
    let link = dom.create_html_element("a", &[("href", href.as_str())]);

    let label: Vec<_> = dom.children(heading).collect();
    for child in label {
        let copy = dom.deep_clone(child);
        dom.append(link, copy);
    }

    let item = dom.create_html_element("li", &[]);
    dom.append(item, link);
    item
}
