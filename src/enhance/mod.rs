//! Page enhancement pipeline.
//!
//! Each transform is an independent function over a [`Dom`]; [`enhance`]
//! runs the ones the profile selects, in this order:
//!
//! 1. **Table of contents** - list `h2#s:*` headings in `div.headings`
//! 2. **Table styling** - add `table table-striped` to every table
//! 3. **Citations** - expand `#BIB` placeholders into bibliography links
//! 4. **Glossary** - point `#g:*` links at the glossary page
//! 5. **Cross-references** - relabel `CHAPTER` links from `toc.json`
//!
//! Only step 5 performs I/O, and it mutates nothing until the table has
//! loaded.

mod bib;
mod gloss;
mod tables;
mod toc;
mod xref;

pub use bib::{BIB_PREFIX, BIB_SENTINEL, CITATION_CLASS, parse_citations, rewrite_bib_refs};
pub use gloss::{GLOSS_PREFIX, rewrite_gloss_refs};
pub use tables::{TABLE_CLASSES, style_tables};
pub use toc::{CONTAINER, SECTION_PREFIX, TocOutcome, build_table_of_contents};
pub use xref::{
    MAIN, PLACEHOLDER, XrefOutcome, chapter_placeholders, resolve_cross_refs,
    resolve_from_source, slug_from_href,
};

use crate::config::EnhanceOptions;
use crate::dom::{Dom, parse_document};
use crate::error::Result;
use crate::source::TableSource;

/// What the pipeline changed on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub toc: TocOutcome,
    pub tables_styled: usize,
    pub citations_rewritten: usize,
    pub gloss_links_rewritten: usize,
    /// `None` when the profile skips cross-reference resolution.
    pub cross_refs: Option<XrefOutcome>,
}

/// Run the transforms selected by `options.profile` over `dom`.
pub fn enhance(
    dom: &mut Dom,
    options: &EnhanceOptions,
    source: &dyn TableSource,
) -> Result<Summary> {
    let mut summary = Summary {
        toc: build_table_of_contents(dom)?,
        tables_styled: style_tables(dom)?,
        ..Default::default()
    };

    if options.profile.rewrites_links() {
        summary.citations_rewritten = rewrite_bib_refs(dom, &options.page)?;
        summary.gloss_links_rewritten = rewrite_gloss_refs(dom, &options.page)?;
    }

    if options.profile.resolves_cross_refs() {
        summary.cross_refs = Some(resolve_from_source(dom, &options.page, source)?);
    }

    tracing::debug!(profile = %options.profile, ?summary, "page enhanced");
    Ok(summary)
}

/// Parse `html`, enhance it and serialize the result.
pub fn enhance_html(
    html: &str,
    options: &EnhanceOptions,
    source: &dyn TableSource,
) -> Result<(String, Summary)> {
    let mut dom = parse_document(html);
    let summary = enhance(&mut dom, options, source)?;
    Ok((dom.to_html(), summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PageConfig, Profile};
    use crate::source::StaticSource;

    const PAGE: &str = r##"<!DOCTYPE html><html><head></head><body>
<div class="headings"></div>
<div class="main">
<h2 id="s:one">One</h2>
<table></table>
<p><a href="#BIB">x,y</a> <a href="#g:term">term</a> <a href="../intro/">CHAPTER</a></p>
</div>
</body></html>"##;

    fn source() -> StaticSource {
        StaticSource::from_json(r#"{"intro": {"type": "number", "index": 1}}"#)
    }

    #[test]
    fn test_full_pipeline() {
        let options = EnhanceOptions::new(PageConfig::nested());
        let (html, summary) = enhance_html(PAGE, &options, &source()).unwrap();

        assert_eq!(
            summary,
            Summary {
                toc: TocOutcome::Built(1),
                tables_styled: 1,
                citations_rewritten: 1,
                gloss_links_rewritten: 1,
                cross_refs: Some(XrefOutcome::Resolved(1)),
            }
        );
        assert!(html.contains(r##"<li><a href="#s:one">One</a></li>"##));
        assert!(html.contains(r#"<table class="table table-striped">"#));
        assert!(html.contains(r##"<a href="../bib/#b:y" class="citation">y</a>"##));
        assert!(html.contains(r##"<a href="../gloss/#g:term">term</a>"##));
        assert!(html.contains(r#"<a href="../intro/">Chapter 1</a>"#));
    }

    #[test]
    fn test_no_cross_refs_profile_skips_table() {
        let options =
            EnhanceOptions::new(PageConfig::nested()).with_profile(Profile::NoCrossRefs);
        let (html, summary) = enhance_html(PAGE, &options, &source()).unwrap();

        assert_eq!(summary.cross_refs, None);
        assert_eq!(summary.citations_rewritten, 1);
        assert!(html.contains(">CHAPTER</a>"));
    }

    #[test]
    fn test_minimal_profile_leaves_links() {
        let options = EnhanceOptions::new(PageConfig::nested()).with_profile(Profile::Minimal);
        let (html, summary) = enhance_html(PAGE, &options, &source()).unwrap();

        assert_eq!(summary.toc, TocOutcome::Built(1));
        assert_eq!(summary.tables_styled, 1);
        assert_eq!(summary.citations_rewritten, 0);
        assert_eq!(summary.gloss_links_rewritten, 0);
        assert!(html.contains(r##"<a href="#BIB">x,y</a>"##));
        assert!(html.contains(r##"<a href="#g:term">term</a>"##));
    }

    #[test]
    fn test_failed_table_still_runs_other_transforms() {
        let options = EnhanceOptions::new(PageConfig::nested());
        let failing = StaticSource::failed("network unreachable");
        let (html, summary) = enhance_html(PAGE, &options, &failing).unwrap();

        assert!(matches!(
            summary.cross_refs,
            Some(XrefOutcome::TableUnavailable(ref reason)) if reason.contains("network unreachable")
        ));
        assert_eq!(summary.gloss_links_rewritten, 1);
        assert!(html.contains(">CHAPTER</a>"));
    }
}
