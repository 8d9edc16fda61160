//! Shared models used across crates

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Version tag written into persisted translation documents.
pub const DOCUMENT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

/// Canonical metadata for one of the 66 books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInfo {
    /// Short lowercase key, e.g. `genesis` or `1corinthians`.
    pub id: String,
    pub name: String,
    pub testament: Testament,
    /// Canonical chapter count, independent of any translation.
    pub chapters: u32,
    /// Canonical verse total (KJV versification). Advisory only.
    pub verses: u32,
    /// 1-based position in the canonical order.
    pub ordinal: u32,
}

/// Static description of a translation, whether or not data is loaded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInfo {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    /// BCP-47 style language code ("en", "de", ...).
    pub language: String,
    pub year: Option<u16>,
    pub public_domain: bool,
    pub description: String,
    pub category: String,
}

/// A single stored verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub translation: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseRecord {
    pub fn new(
        translation: impl Into<String>,
        book: impl Into<String>,
        chapter: u32,
        verse: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            translation: translation.into(),
            book: book.into(),
            chapter,
            verse,
            text: text.into(),
        }
    }
}

/// Translation-independent pointer to a verse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self { book: book.into(), chapter, verse }
    }
}

impl std::fmt::Display for VerseRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterVerse {
    pub verse: u32,
    pub text: String,
}

/// A chapter assembled on read; `verses` is always ascending by verse number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<ChapterVerse>,
    pub translation: String,
}

/// Search result. `score` counts query occurrences and never reorders results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub verse: VerseRecord,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Complete,
    Incomplete,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteBook {
    pub book: String,
    pub expected_chapters: u32,
    pub actual_chapters: u32,
}

/// Book whose verse total is below the canonical count. Advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseBook {
    pub book: String,
    pub expected_verses: u32,
    pub actual_verses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub translation: String,
    pub total_books: usize,
    pub total_chapters: usize,
    pub total_verses: usize,
    pub missing_books: Vec<String>,
    pub incomplete_books: Vec<IncompleteBook>,
    #[serde(default)]
    pub sparse_books: Vec<SparseBook>,
    pub status: ValidationStatus,
}

/// Aggregate numbers exposed by the query façade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub total_translations: usize,
    pub total_books: usize,
    pub total_chapters: usize,
    pub total_verses: usize,
    /// RFC 3339 timestamp of the last write, if any.
    pub last_updated: Option<String>,
}

/// `{bookId: {chapter: {verse: text}}}` with numeric keys kept as strings on the wire.
pub type BookTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub total_verses: usize,
    pub total_chapters: usize,
    pub download_date: String,
    pub source: String,
    #[serde(default)]
    pub schema_version: Option<u32>,
}

/// One persisted translation, as stored in the external blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationDocument {
    pub translation: TranslationInfo,
    pub books: BookTree,
    pub metadata: DocumentMetadata,
}

impl TranslationDocument {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
