//! Reference audit across a site.
//!
//! Scans source pages (before enhancement) and reports citations, glossary
//! terms and chapter cross-references that are used but never defined, or
//! defined but never used.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::crossref::CrossRefTable;
use crate::dom::{Dom, Selector};
use crate::enhance::{
    BIB_PREFIX, BIB_SENTINEL, GLOSS_PREFIX, chapter_placeholders, parse_citations, slug_from_href,
};
use crate::error::Result;

/// Collected definitions and uses.
#[derive(Debug, Clone, Default)]
pub struct Audit {
    cites_defined: BTreeSet<String>,
    cites_used: BTreeSet<String>,
    gloss_defined: BTreeSet<String>,
    gloss_used: BTreeSet<String>,
    /// Slug to the pages that reference it.
    cross_refs: BTreeMap<String, BTreeSet<String>>,
}

impl Audit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record everything `dom` defines and references. `page` names it in
    /// the report.
    pub fn scan(&mut self, page: &str, dom: &Dom) -> Result<()> {
        for id in dom.descendants(dom.document()) {
            let Some(element_id) = dom.element_id(id) else {
                continue;
            };
            if let Some(key) = element_id.strip_prefix(&BIB_PREFIX[1..]) {
                self.cites_defined.insert(key.to_string());
            } else if let Some(key) = element_id.strip_prefix(&GLOSS_PREFIX[1..]) {
                self.gloss_defined.insert(key.to_string());
            }
        }

        for link in dom.select(dom.document(), &Selector::parse("a[href]")?) {
            let href = dom.get_attr(link, "href").unwrap_or_default();
            if href == BIB_SENTINEL {
                let text = dom.text_content(link);
                self.cites_used
                    .extend(parse_citations(&text).into_iter().map(str::to_string));
            } else if let Some(key) = fragment_key(href, "bib/", BIB_PREFIX) {
                self.cites_used.insert(key.to_string());
            } else if let Some(key) = fragment_key(href, "gloss/", GLOSS_PREFIX) {
                self.gloss_used.insert(key.to_string());
            }
        }

        // Placeholders without an `href` are never resolved, so there is
        // nothing to look up for them.
        for link in chapter_placeholders(dom)?.unwrap_or_default() {
            let Some(href) = dom.get_attr(link, "href") else {
                continue;
            };
            let slug = slug_from_href(href).unwrap_or(href);
            self.cross_refs
                .entry(slug.to_string())
                .or_default()
                .insert(page.to_string());
        }
        Ok(())
    }

    /// Compare uses with definitions. Cross-references are only checked when
    /// a table is given.
    pub fn report(&self, table: Option<&CrossRefTable>) -> Report {
        let mut findings = Vec::new();

        let (cites_used, cites_defined) = (&self.cites_used, &self.cites_defined);
        let (gloss_used, gloss_defined) = (&self.gloss_used, &self.gloss_defined);
        push_difference(&mut findings, "Citations", "undefined", cites_used, cites_defined);
        push_difference(&mut findings, "Citations", "unused", cites_defined, cites_used);
        push_difference(&mut findings, "Glossary Entries", "undefined", gloss_used, gloss_defined);
        push_difference(&mut findings, "Glossary Entries", "unused", gloss_defined, gloss_used);

        if let Some(table) = table {
            let missing: Vec<String> = self
                .cross_refs
                .iter()
                .filter(|(slug, _)| !table.contains(slug))
                .flat_map(|(slug, pages)| pages.iter().map(move |page| format!("{page}: {slug}")))
                .collect();
            if !missing.is_empty() {
                findings.push(Finding {
                    title: "Cross References",
                    group: "undefined",
                    values: missing,
                });
            }
        }

        Report { findings }
    }
}

/// Key after `prefix` in either a raw fragment (`#g:key`) or a link that was
/// already rewritten into `dir` (`../gloss/#g:key`).
fn fragment_key<'a>(href: &'a str, dir: &str, prefix: &str) -> Option<&'a str> {
    let key = match href.strip_prefix(prefix) {
        Some(key) => key,
        None => href.split_once(&format!("{dir}{prefix}"))?.1,
    };
    (!key.is_empty()).then_some(key)
}

fn push_difference(
    findings: &mut Vec<Finding>,
    title: &'static str,
    group: &'static str,
    left: &BTreeSet<String>,
    right: &BTreeSet<String>,
) {
    let values: Vec<String> = left.difference(right).cloned().collect();
    if !values.is_empty() {
        findings.push(Finding {
            title,
            group,
            values,
        });
    }
}

/// One category of problems, e.g. undefined citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub title: &'static str,
    pub group: &'static str,
    /// Sorted.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether anything is referenced without being defined.
    pub fn has_undefined(&self) -> bool {
        self.findings.iter().any(|f| f.group == "undefined")
    }

    pub fn get(&self, title: &str, group: &str) -> Option<&[String]> {
        self.findings
            .iter()
            .find(|f| f.title == title && f.group == group)
            .map(|f| f.values.as_slice())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}: {}", finding.title, finding.group)?;
            for value in &finding.values {
                writeln!(f, "   {value}")?;
            }
        }
        Ok(())
    }
}
