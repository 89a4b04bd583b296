//! Where the cross-reference table comes from.
//!
//! Loading the table is the only I/O the enhancer performs. A source turns the
//! page-relative table path (`./toc.json` or `../toc.json`) into a parsed
//! [`CrossRefTable`] or an error; the resolver treats any error as "leave the
//! placeholders alone".

use std::fs;
use std::path::{Path, PathBuf};

use crate::crossref::CrossRefTable;
use crate::error::{Error, Result};

pub trait TableSource {
    /// Load the table at `path`, relative to the page being enhanced.
    fn load(&self, path: &str) -> Result<CrossRefTable>;
}

impl<F> TableSource for F
where
    F: Fn(&str) -> Result<CrossRefTable>,
{
    fn load(&self, path: &str) -> Result<CrossRefTable> {
        self(path)
    }
}

/// Reads the table from disk, resolving paths against the page's directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    base: PathBuf,
}

impl FsSource {
    pub fn new(page_dir: impl Into<PathBuf>) -> Self {
        Self {
            base: page_dir.into(),
        }
    }

    /// Source for the page stored at `page`.
    pub fn for_page(page: &Path) -> Self {
        Self::new(page.parent().unwrap_or(Path::new(".")))
    }
}

impl TableSource for FsSource {
    fn load(&self, path: &str) -> Result<CrossRefTable> {
        let full = self.base.join(path);
        tracing::debug!(path = %full.display(), "loading cross-reference table");
        let bytes = fs::read(&full)?;
        CrossRefTable::from_slice(&bytes)
    }
}

/// A table that was obtained some other way, or the reason it could not be.
#[derive(Debug, Clone)]
pub struct StaticSource(std::result::Result<CrossRefTable, String>);

impl StaticSource {
    pub fn table(table: CrossRefTable) -> Self {
        Self(Ok(table))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self(Err(reason.into()))
    }

    /// Parse JSON handed over by a host; a parse failure becomes a failed source.
    pub fn from_json(json: &str) -> Self {
        match CrossRefTable::from_json(json) {
            Ok(table) => Self::table(table),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

impl TableSource for StaticSource {
    fn load(&self, _path: &str) -> Result<CrossRefTable> {
        self.0.clone().map_err(Error::TableUnavailable)
    }
}

/// Used when no table is available at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl TableSource for NoSource {
    fn load(&self, path: &str) -> Result<CrossRefTable> {
        Err(Error::TableUnavailable(format!("no source for {path}")))
    }
}
