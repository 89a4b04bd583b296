//! Cross-reference lookup table (`toc.json`).
//!
//! The site generator writes a JSON object mapping page slugs to entries:
//!
//! ```json
//! {
//!   "intro": {"type": "number", "index": 1},
//!   "tools": {"type": "letter", "index": 1},
//!   "bib":   {"type": "bib"}
//! }
//! ```
//!
//! Placeholder links are relabelled from these entries: `Chapter 1`,
//! `Appendix A`, `Bibliography`.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry as MapEntry;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label used when a slug cannot be resolved.
pub const UNKNOWN_REFERENCE: &str = "Unknown Reference";

/// Appendix letters, indexed from 1. Index 0 is a placeholder.
const ALPHABET: &[u8; 27] = b"_ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// How a reference to one page is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    /// Ordinary chapter, `Chapter <index>`.
    Number { index: u32 },
    /// Appendix, `Appendix <letter>`.
    Letter { index: u32 },
    /// The bibliography page.
    Bib,
    /// Any other `type`; rendered as [`UNKNOWN_REFERENCE`].
    #[serde(other)]
    Unknown,
}

impl Entry {
    pub fn label(&self) -> String {
        match *self {
            Entry::Number { index } => format!("Chapter {index}"),
            Entry::Letter { index } => match ALPHABET.get(index as usize) {
                Some(&letter) => {
                    if index == 0 {
                        tracing::warn!("appendix index 0 has no letter, rendering placeholder");
                    }
                    format!("Appendix {}", letter as char)
                }
                None => {
                    tracing::warn!(index, "appendix index out of range");
                    UNKNOWN_REFERENCE.to_string()
                }
            },
            Entry::Bib => "Bibliography".to_string(),
            Entry::Unknown => UNKNOWN_REFERENCE.to_string(),
        }
    }
}

/// Mapping from page slug to [`Entry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossRefTable {
    entries: BTreeMap<String, Entry>,
}

impl CrossRefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the table for an ordered site outline.
    ///
    /// Chapters are numbered from 1 and appendices lettered from `A`.
    pub fn from_outline(outline: &Outline) -> Result<Self> {
        if outline.appendices.len() > ALPHABET.len() - 1 {
            return Err(Error::TooManyAppendices(outline.appendices.len()));
        }

        let mut table = Self::new();
        for (i, slug) in outline.chapters.iter().enumerate() {
            table.insert_new(slug, Entry::Number { index: i as u32 + 1 })?;
        }
        for (i, slug) in outline.appendices.iter().enumerate() {
            table.insert_new(slug, Entry::Letter { index: i as u32 + 1 })?;
        }
        if let Some(slug) = &outline.bibliography {
            table.insert_new(slug, Entry::Bib)?;
        }
        Ok(table)
    }

    fn insert_new(&mut self, slug: &str, entry: Entry) -> Result<()> {
        match self.entries.entry(slug.to_string()) {
            MapEntry::Occupied(_) => Err(Error::DuplicateSlug(slug.to_string())),
            MapEntry::Vacant(v) => {
                v.insert(entry);
                Ok(())
            }
        }
    }

    pub fn insert(&mut self, slug: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(slug.into(), entry)
    }

    pub fn get(&self, slug: &str) -> Option<&Entry> {
        self.entries.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    /// Label for a slug, or [`UNKNOWN_REFERENCE`] when it is not listed.
    pub fn label_for(&self, slug: &str) -> String {
        self.get(slug)
            .map(Entry::label)
            .unwrap_or_else(|| UNKNOWN_REFERENCE.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Ordered list of a site's pages, used to generate a [`CrossRefTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub chapters: Vec<String>,
    pub appendices: Vec<String>,
    pub bibliography: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "intro": {"type": "number", "index": 3},
        "notes": {"type": "letter", "index": 1},
        "refs":  {"type": "bib"}
    }"#;

    #[test]
    fn test_parse_and_label() {
        let table = CrossRefTable::from_json(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.label_for("intro"), "Chapter 3");
        assert_eq!(table.label_for("notes"), "Appendix A");
        assert_eq!(table.label_for("refs"), "Bibliography");
        assert_eq!(table.label_for("missing"), UNKNOWN_REFERENCE);
    }

    #[test]
    fn test_letter_bounds() {
        assert_eq!(Entry::Letter { index: 26 }.label(), "Appendix Z");
        assert_eq!(Entry::Letter { index: 0 }.label(), "Appendix _");
        assert_eq!(Entry::Letter { index: 27 }.label(), UNKNOWN_REFERENCE);
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let table =
            CrossRefTable::from_json(r#"{"x": {"type": "section", "index": 2}}"#).unwrap();
        assert_eq!(table.get("x"), Some(&Entry::Unknown));
        assert_eq!(table.label_for("x"), UNKNOWN_REFERENCE);
    }

    #[test]
    fn test_bib_ignores_index() {
        let table = CrossRefTable::from_json(r#"{"bib": {"type": "bib", "index": 9}}"#).unwrap();
        assert_eq!(table.get("bib"), Some(&Entry::Bib));
    }

    #[test]
    fn test_missing_index_is_rejected() {
        let err = CrossRefTable::from_json(r#"{"x": {"type": "number"}}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_not_an_object_is_rejected() {
        assert!(CrossRefTable::from_json("[1, 2]").is_err());
        assert!(CrossRefTable::from_json("{").is_err());
    }

    #[test]
    fn test_from_outline() {
        let outline = Outline {
            chapters: vec!["intro".into(), "basics".into()],
            appendices: vec!["glossary".into(), "tools".into()],
            bibliography: Some("bib".into()),
        };
        let table = CrossRefTable::from_outline(&outline).unwrap();

        assert_eq!(table.get("intro"), Some(&Entry::Number { index: 1 }));
        assert_eq!(table.get("basics"), Some(&Entry::Number { index: 2 }));
        assert_eq!(table.label_for("tools"), "Appendix B");
        assert_eq!(table.get("bib"), Some(&Entry::Bib));
    }

    #[test]
    fn test_outline_rejects_duplicates_and_overflow() {
        let dup = Outline {
            chapters: vec!["a".into()],
            appendices: vec!["a".into()],
            bibliography: None,
        };
        assert!(matches!(
            CrossRefTable::from_outline(&dup),
            Err(Error::DuplicateSlug(s)) if s == "a"
        ));

        let many = Outline {
            appendices: (0..27).map(|i| format!("app{i}")).collect(),
            ..Default::default()
        };
        assert!(matches!(
            CrossRefTable::from_outline(&many),
            Err(Error::TooManyAppendices(27))
        ));
    }

    #[test]
    fn test_json_output_is_readable_back() {
        let outline = Outline {
            chapters: vec!["intro".into()],
            appendices: vec![],
            bibliography: Some("bib".into()),
        };
        let table = CrossRefTable::from_outline(&outline).unwrap();
        let json = table.to_json_pretty().unwrap();
        assert!(json.contains(r#""type": "number""#));
        assert_eq!(CrossRefTable::from_json(&json).unwrap(), table);
    }
}
