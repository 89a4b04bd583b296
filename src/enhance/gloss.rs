//! Glossary links.

use crate::config::PageConfig;
use crate::dom::{Dom, Selector};
use crate::error::Result;

/// Fragment prefix of glossary references.
pub const GLOSS_PREFIX: &str = "#g:";

/// Point `#g:<term>` links at the glossary page, keeping the fragment.
///
/// Links without an `href` are left alone. Returns the number rewritten.
pub fn rewrite_gloss_refs(dom: &mut Dom, page: &PageConfig) -> Result<usize> {
    let selector = Selector::parse(&format!(r#"a[href^="{GLOSS_PREFIX}"]"#))?;
    let links = dom.select(dom.document(), &selector);
    let stem = page.gloss_stem();

    for &link in &links {
        let href = dom.get_attr(link, "href").unwrap_or_default();
        let target = format!("{stem}{href}");
        dom.set_attr(link, "href", &target);
    }
    Ok(links.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn hrefs(dom: &Dom) -> Vec<Option<String>> {
        dom.select(dom.document(), &Selector::parse("a").unwrap())
            .into_iter()
            .map(|a| dom.get_attr(a, "href").map(str::to_string))
            .collect()
    }

    #[test]
    fn test_nested_page() {
        let mut dom = parse_document(r##"<a href="#g:term1">term</a>"##);
        assert_eq!(rewrite_gloss_refs(&mut dom, &PageConfig::nested()).unwrap(), 1);
        assert_eq!(hrefs(&dom), [Some("../gloss/#g:term1".to_string())]);
    }

    #[test]
    fn test_root_page() {
        let mut dom = parse_document(r##"<a href="#g:term1">term</a>"##);
        rewrite_gloss_refs(&mut dom, &PageConfig::root()).unwrap();
        assert_eq!(hrefs(&dom), [Some("./gloss/#g:term1".to_string())]);
    }

    #[test]
    fn test_other_links_untouched() {
        let mut dom = parse_document(
            r##"<a name="anchor">no href</a><a href="#s:intro">section</a><a href="x#g:y">mid</a>"##,
        );
        assert_eq!(rewrite_gloss_refs(&mut dom, &PageConfig::nested()).unwrap(), 0);
        assert_eq!(
            hrefs(&dom),
            [None, Some("#s:intro".to_string()), Some("x#g:y".to_string())]
        );
    }
}
