//! Transcript data model and source loading.
//!
//! The input document is a JSON file holding one record per scanned page,
//! keyed under a top-level `pages` object. Records are deserialized once,
//! indexed by their source page number, and never mutated afterward.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Directory probed for bare relative input paths.
const INPUT_DIR: &str = "input";

/// The kind of a transcript block, from the JSON `type` field.
///
/// Unknown and missing type strings map to [`BlockKind::Untyped`], which the
/// formatter renders with continuation indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// A communication turn (timestamp, speaker, text)
    Comm,
    /// An editorial annotation, centered on the page
    Annotation,
    /// A meta note such as a tape boundary or rest-period marker
    Meta,
    /// Continuation of a previous page's text
    Continuation,
    /// Page footer text
    Footer,
    /// Anything else
    #[default]
    Untyped,
}

impl From<&str> for BlockKind {
    fn from(value: &str) -> Self {
        match value {
            "comm" => BlockKind::Comm,
            "annotation" => BlockKind::Annotation,
            "meta" => BlockKind::Meta,
            "continuation" => BlockKind::Continuation,
            "footer" => BlockKind::Footer,
            _ => BlockKind::Untyped,
        }
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(BlockKind::from).unwrap_or_default())
    }
}

/// One block of a transcript page.
///
/// Fields other than `kind` are populated per block type; absent JSON fields
/// (or explicit nulls) deserialize to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    /// Block type tag
    #[serde(default, rename = "type")]
    pub kind: BlockKind,
    /// Block text, possibly empty
    #[serde(default, deserialize_with = "null_to_default")]
    pub text: String,
    /// Ground elapsed time stamp (comm blocks)
    #[serde(default, deserialize_with = "null_to_default")]
    pub timestamp: String,
    /// Speaker callsign (comm blocks)
    #[serde(default, deserialize_with = "null_to_default")]
    pub speaker: String,
    /// Optional station location (comm blocks)
    #[serde(default)]
    pub location: Option<String>,
    /// Meta note subtype (meta blocks), e.g. `end_of_tape`, `rest_period`
    #[serde(default, deserialize_with = "null_to_default")]
    pub meta_type: String,
}

impl Block {
    /// Location string, if present and non-empty.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|loc| !loc.is_empty())
    }
}

/// Header fields of a transcript page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageHeader {
    /// Tape/reel identifier shown flush right in the page header
    #[serde(default)]
    pub tape: Option<String>,
    /// Output page number as printed in the original document
    #[serde(default)]
    pub page: Option<i64>,
    /// Whether the page opens with the document title line
    #[serde(default, rename = "is_apollo_title")]
    pub is_title: Option<bool>,
    /// Page type tag, e.g. `rest_period`
    #[serde(default)]
    pub page_type: Option<String>,
}

impl PageHeader {
    /// Whether the title line should be emitted for this page.
    pub fn has_title(&self) -> bool {
        self.is_title.unwrap_or(false)
    }

    /// Tape identifier, if present and non-empty.
    pub fn tape(&self) -> Option<&str> {
        self.tape.as_deref().filter(|tape| !tape.is_empty())
    }
}

/// One transcript page: header plus its blocks in reading order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRecord {
    /// Page header fields
    #[serde(default)]
    pub header: PageHeader,
    /// Body blocks in source order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Raw shape of the source file.
#[derive(Debug, Deserialize)]
struct SourceFile {
    pages: HashMap<String, PageRecord>,
}

/// The loaded transcript: pages indexed by source page number.
///
/// A `BTreeMap` keeps the keys ordered, which gives the selector the maximum
/// known page number directly.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pages: BTreeMap<i64, PageRecord>,
}

impl Transcript {
    /// Load a transcript from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Parse a transcript from a JSON string.
    ///
    /// Pages whose header carries no page number are skipped; they cannot be
    /// addressed by any selection.
    pub fn from_json(data: &str) -> Result<Self> {
        let source: SourceFile = serde_json::from_str(data)?;

        let mut pages = BTreeMap::new();
        let mut skipped = 0usize;
        for record in source.pages.into_values() {
            match record.header.page {
                Some(page_num) => {
                    pages.insert(page_num, record);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} page record(s) without a page number");
        }
        log::debug!("loaded {} transcript pages", pages.len());

        Ok(Self { pages })
    }

    /// Build a transcript from already-keyed records (used by tests).
    pub fn from_pages(pages: BTreeMap<i64, PageRecord>) -> Self {
        Self { pages }
    }

    /// Look up a page by source page number.
    pub fn get(&self, page_num: i64) -> Option<&PageRecord> {
        self.pages.get(&page_num)
    }

    /// Whether a source page number exists.
    pub fn contains(&self, page_num: i64) -> bool {
        self.pages.contains_key(&page_num)
    }

    /// Highest known source page number.
    pub fn max_page(&self) -> Option<i64> {
        self.pages.keys().next_back().copied()
    }

    /// Number of loaded pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Resolve the input JSON path, falling back to the `input/` directory for
/// bare relative paths that do not exist as given.
pub fn resolve_input_path(json_path: &str) -> PathBuf {
    let candidate = PathBuf::from(json_path);
    if candidate.is_file() {
        return candidate;
    }

    if candidate.is_relative() {
        let fallback = Path::new(INPUT_DIR).join(&candidate);
        if fallback.is_file() {
            return fallback;
        }
    }

    candidate
}

/// Deserialize a possibly-null JSON field to the type's default.
fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validate that a loaded transcript has at least one addressable page.
pub fn require_pages(transcript: &Transcript) -> Result<()> {
    if transcript.is_empty() {
        return Err(Error::Source(
            "transcript contains no pages with page numbers".to_string(),
        ));
    }
    Ok(())
}
