//! Bibliography citations.
//!
//! Authors write citations as `<a href="#BIB">key1,key2</a>`. Each placeholder
//! becomes a bracketed group of links into the bibliography page:
//!
//! ```html
//! <span>[<a href="../bib/#b:key1" class="citation">key1</a>,<a href="../bib/#b:key2" class="citation">key2</a>]</span>
//! ```

use crate::config::PageConfig;
use crate::dom::{Dom, NodeId, Selector};
use crate::error::Result;

/// `href` that marks a citation placeholder.
pub const BIB_SENTINEL: &str = "#BIB";

/// Fragment prefix of bibliography entries.
pub const BIB_PREFIX: &str = "#b:";

/// Class carried by generated citation links.
pub const CITATION_CLASS: &str = "citation";

/// Split placeholder text into citation keys.
///
/// Keys are comma-separated and trimmed; empty keys are dropped. Trimming is
/// deliberate so `a, b` cites `b` rather than a key with a leading space.
pub fn parse_citations(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .collect()
}

/// Replace every `#BIB` placeholder link. Returns the number replaced.
pub fn rewrite_bib_refs(dom: &mut Dom, page: &PageConfig) -> Result<usize> {
    let selector = Selector::parse(&format!(r#"a[href="{BIB_SENTINEL}"]"#))?;
    let placeholders = dom.select(dom.document(), &selector);
    let stem = page.bib_stem();

    for &link in &placeholders {
        let text = dom.text_content(link);
        let keys = parse_citations(&text);
        let group = citation_group(dom, &stem, &keys);
        dom.replace(link, group);
    }
    Ok(placeholders.len())
}

fn citation_group(dom: &mut Dom, stem: &str, keys: &[&str]) -> NodeId {
    let span = dom.create_html_element("span", &[]);
    dom.append_text(span, "[");
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            dom.append_text(span, ",");
        }
        let href = format!("{stem}{BIB_PREFIX}{key}");
        let link = dom.create_html_element(
            "a",
            &[("href", href.as_str()), ("class", CITATION_CLASS)],
        );
        dom.append_text(link, key);
        dom.append(span, link);
    }
    dom.append_text(span, "]");
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn body_html(dom: &Dom) -> String {
        let body = dom.find_by_tag("body").unwrap();
        dom.inner_html(body)
    }

    #[test]
    fn test_parse_citations() {
        assert_eq!(parse_citations("a,b,,c"), ["a", "b", "c"]);
        assert_eq!(parse_citations(" smith2019 , jones2020"), ["smith2019", "jones2020"]);
        assert!(parse_citations(",,").is_empty());
        assert!(parse_citations("").is_empty());
    }

    #[test]
    fn test_rewrites_placeholder() {
        let mut dom = parse_document(r##"<p>See <a href="#BIB">a,b,,c</a>.</p>"##);

        assert_eq!(rewrite_bib_refs(&mut dom, &PageConfig::nested()).unwrap(), 1);
        assert_eq!(
            body_html(&dom),
            "<p>See <span>[\
             <a href=\"../bib/#b:a\" class=\"citation\">a</a>,\
             <a href=\"../bib/#b:b\" class=\"citation\">b</a>,\
             <a href=\"../bib/#b:c\" class=\"citation\">c</a>\
             ]</span>.</p>"
        );
    }

    #[test]
    fn test_root_page_stem() {
        let mut dom = parse_document(r##"<a href="#BIB">key</a>"##);
        rewrite_bib_refs(&mut dom, &PageConfig::root()).unwrap();
        assert!(body_html(&dom).contains(r##"href="./bib/#b:key""##));
    }

    #[test]
    fn test_empty_placeholder_renders_empty_brackets() {
        let mut dom = parse_document(r##"<p><a href="#BIB">,</a></p>"##);
        rewrite_bib_refs(&mut dom, &PageConfig::nested()).unwrap();
        assert_eq!(body_html(&dom), "<p><span>[]</span></p>");
    }

    #[test]
    fn test_only_exact_sentinel_matches() {
        let html = r##"<p><a href="#BIBX">x</a><a href="#bib">y</a><a>z</a></p>"##;
        let mut dom = parse_document(html);
        let before = body_html(&dom);
        assert_eq!(rewrite_bib_refs(&mut dom, &PageConfig::nested()).unwrap(), 0);
        assert_eq!(body_html(&dom), before);
    }
}
