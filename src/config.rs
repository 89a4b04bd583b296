//! Per-page configuration.
//!
//! Generated links are relative, so every transform needs to know whether the
//! page sits at the site root (`./`) or one directory below it (`../`).

use std::fmt;
use std::str::FromStr;

use crate::dom::{Dom, Selector};

/// Where the page being enhanced lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageConfig {
    /// `true` for the site's top-level index page.
    pub root: bool,
}

impl PageConfig {
    pub fn root() -> Self {
        Self { root: true }
    }

    pub fn nested() -> Self {
        Self { root: false }
    }

    /// Read the page position from the template's script tag.
    ///
    /// Templates include the enhancement script as
    /// `<script src=".../site.js" ROOT="{{root}}">`. Any value other than the
    /// empty string, including a missing attribute, marks the root page.
    /// Returns `None` when no script with a matching `src` exists.
    pub fn from_script_tag(dom: &Dom, script_name: &str) -> Option<Self> {
        let scripts = Selector::parse("script[src]").ok()?;
        dom.select(dom.document(), &scripts)
            .into_iter()
            .find(|&id| {
                dom.get_attr(id, "src")
                    .is_some_and(|src| src.ends_with(script_name))
            })
            .map(|id| Self {
                root: dom.get_attr(id, "root") != Some(""),
            })
    }

    /// Relative path from the page to the site root.
    pub fn path_to_root(&self) -> &'static str {
        if self.root { "./" } else { "../" }
    }

    /// Directory holding the glossary page.
    pub fn gloss_stem(&self) -> String {
        format!("{}gloss/", self.path_to_root())
    }

    /// Directory holding the bibliography page.
    pub fn bib_stem(&self) -> String {
        format!("{}bib/", self.path_to_root())
    }

    /// Location of the cross-reference table.
    pub fn toc_path(&self) -> String {
        format!("{}toc.json", self.path_to_root())
    }
}

/// Which transforms run.
///
/// Each profile is a superset of the one below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Every transform, including cross-reference resolution.
    #[default]
    Full,
    /// Everything except cross-reference resolution; no table is loaded.
    NoCrossRefs,
    /// Table of contents and table styling only.
    Minimal,
}

impl Profile {
    pub fn rewrites_links(&self) -> bool {
        matches!(self, Profile::Full | Profile::NoCrossRefs)
    }

    pub fn resolves_cross_refs(&self) -> bool {
        matches!(self, Profile::Full)
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Profile::Full),
            "no-cross-refs" => Ok(Profile::NoCrossRefs),
            "minimal" => Ok(Profile::Minimal),
            other => Err(format!(
                "unknown profile `{other}` (expected full, no-cross-refs or minimal)"
            )),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Profile::Full => "full",
            Profile::NoCrossRefs => "no-cross-refs",
            Profile::Minimal => "minimal",
        })
    }
}

/// Everything [`enhance`](crate::enhance) needs to know about a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnhanceOptions {
    pub page: PageConfig,
    pub profile: Profile,
}

impl EnhanceOptions {
    pub fn new(page: PageConfig) -> Self {
        Self {
            page,
            profile: Profile::Full,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
}
