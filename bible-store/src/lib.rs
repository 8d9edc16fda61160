pub mod book_registry;
pub mod translation_registry;
pub mod memory_store;
pub mod substring_search;
pub mod ingest;
pub mod validator;
pub mod orchestrator;

use bible_model::{SearchHit, Testament, VerseRecord};

/// Result cap used when callers do not pass one.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Thin abstraction for the primary verse store (backend-agnostic).
pub trait VersePrimaryStore {
    /// Upsert a batch of verses; returns how many were written.
    fn upsert_verses(&mut self, verses: Vec<VerseRecord>) -> Result<usize, StoreError>;
}

/// Read-side abstraction so searchers can scan any store in insertion order.
pub trait VerseStoreRead {
    /// Verses in insertion order, optionally restricted to one translation.
    fn scan<'a>(&'a self, translation: Option<&str>) -> Box<dyn Iterator<Item = &'a VerseRecord> + 'a>;
}

// ------------------------------
// Query options
// ------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub limit: usize,
    pub translation: Option<String>,
    pub book: Option<String>,
    pub testament: Option<Testament>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { limit: DEFAULT_SEARCH_LIMIT, translation: None, book: None, testament: None }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit, ..Self::default() }
    }

    pub fn translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// True when the record passes the non-translation filters.
    pub fn admits(&self, rec: &VerseRecord) -> bool {
        if let Some(book) = &self.book {
            if &rec.book != book { return false; }
        }
        if let Some(testament) = self.testament {
            match book_registry::book_info(&rec.book) {
                Some(info) if info.testament == testament => {}
                _ => return false,
            }
        }
        true
    }
}

/// Pluggable keyword search over a verse store.
pub trait TextSearcher {
    fn name(&self) -> &'static str;
    fn search(&self, store: &dyn VerseStoreRead, query: &str, opts: &SearchOptions) -> Vec<SearchHit>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown book: {0}")]
    UnknownBook(String),
    #[error("chapter {chapter} out of range for {book} (1..={max})")]
    ChapterOutOfRange { book: String, chapter: u32, max: u32 },
    #[error("invalid verse: {0}")]
    InvalidVerse(String),
}

pub use book_registry::{all_books, book_info, canonical_books, normalize_book_name, BookRegistry};
pub use memory_store::{MemoryVerseStore, StoreStats};
pub use substring_search::SubstringSearcher;
