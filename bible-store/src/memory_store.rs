use std::collections::{BTreeMap, BTreeSet, HashMap};

use bible_model::{ChapterVerse, ChapterView, SearchHit, VerseRecord};
use chrono::{DateTime, Utc};

use crate::book_registry::book_info;
use crate::substring_search::SubstringSearcher;
use crate::{SearchOptions, StoreError, TextSearcher, VersePrimaryStore, VerseStoreRead};

/// chapter -> verse -> slot
type ChapterIndex = BTreeMap<u32, BTreeMap<u32, usize>>;

#[derive(Debug, Default)]
struct TranslationIndex {
    books: HashMap<String, ChapterIndex>,
    /// Slots owned by this translation, in insertion order.
    slots: Vec<usize>,
}

/// Counts reported by [`MemoryVerseStore::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub translations: usize,
    /// Distinct book ids with data in any translation.
    pub books: usize,
    /// Distinct (translation, book, chapter) triples.
    pub chapters: usize,
    pub verses: usize,
    pub per_translation: BTreeMap<String, usize>,
}

/// In-memory verse index keyed by (translation, book, chapter, verse).
///
/// Verses live in an insertion-ordered slot vector; overwriting a key keeps its
/// original slot, so scans stay stable across idempotent re-ingestion.
#[derive(Debug, Default)]
pub struct MemoryVerseStore {
    slots: Vec<VerseRecord>,
    index: HashMap<String, TranslationIndex>,
    last_updated: Option<DateTime<Utc>>,
}

impl MemoryVerseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one verse. Text is trimmed; an existing key has its text replaced.
    pub fn add_verse(
        &mut self,
        translation: &str,
        book: &str,
        chapter: u32,
        verse: u32,
        text: &str,
    ) -> Result<(), StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidVerse(format!("{translation} {book} {chapter}:{verse} has empty text")));
        }
        if translation.trim().is_empty() {
            return Err(StoreError::InvalidVerse("empty translation id".into()));
        }
        let info = book_info(book).ok_or_else(|| StoreError::UnknownBook(book.to_string()))?;
        if chapter == 0 || chapter > info.chapters {
            return Err(StoreError::ChapterOutOfRange { book: book.to_string(), chapter, max: info.chapters });
        }
        if verse == 0 {
            return Err(StoreError::InvalidVerse(format!("{book} {chapter}:0")));
        }

        if let Some(slot) = self.slot_of(translation, book, chapter, verse) {
            self.slots[slot].text = text.to_string();
        } else {
            self.insert_new(VerseRecord::new(translation, book, chapter, verse, text));
        }
        self.last_updated = Some(Utc::now());
        Ok(())
    }

    fn insert_new(&mut self, rec: VerseRecord) {
        let slot = self.slots.len();
        let tindex = self.index.entry(rec.translation.clone()).or_default();
        tindex
            .books
            .entry(rec.book.clone())
            .or_default()
            .entry(rec.chapter)
            .or_default()
            .insert(rec.verse, slot);
        tindex.slots.push(slot);
        self.slots.push(rec);
    }

    fn slot_of(&self, translation: &str, book: &str, chapter: u32, verse: u32) -> Option<usize> {
        self.index
            .get(translation)?
            .books
            .get(book)?
            .get(&chapter)?
            .get(&verse)
            .copied()
    }

    pub fn get_verse(&self, translation: &str, book: &str, chapter: u32, verse: u32) -> Option<&VerseRecord> {
        self.slot_of(translation, book, chapter, verse).map(|slot| &self.slots[slot])
    }

    /// Verses of one chapter, ascending by verse number.
    ///
    /// `None` when the book is unknown, the chapter is outside the book's
    /// canonical range, or nothing is stored for it.
    pub fn get_chapter(&self, translation: &str, book: &str, chapter: u32) -> Option<ChapterView> {
        let info = book_info(book)?;
        if chapter == 0 || chapter > info.chapters {
            return None;
        }
        let verses = self.index.get(translation)?.books.get(book)?.get(&chapter)?;
        if verses.is_empty() {
            return None;
        }
        Some(ChapterView {
            book: book.to_string(),
            chapter,
            verses: verses
                .iter()
                .map(|(&verse, &slot)| ChapterVerse { verse, text: self.slots[slot].text.clone() })
                .collect(),
            translation: translation.to_string(),
        })
    }

    /// Case-insensitive substring search in insertion order, stopping at `limit`.
    pub fn search_verses(&self, query: &str, translation: Option<&str>, limit: usize) -> Vec<SearchHit> {
        let mut opts = SearchOptions::with_limit(limit);
        opts.translation = translation.map(str::to_string);
        self.search_with(query, &opts)
    }

    pub fn search_with(&self, query: &str, opts: &SearchOptions) -> Vec<SearchHit> {
        SubstringSearcher.search(self, query, opts)
    }

    /// Chapter numbers that hold at least one verse.
    pub fn chapters_present(&self, translation: &str, book: &str) -> BTreeSet<u32> {
        self.index
            .get(translation)
            .and_then(|t| t.books.get(book))
            .map(|chapters| {
                chapters
                    .iter()
                    .filter(|(_, verses)| !verses.is_empty())
                    .map(|(&c, _)| c)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn book_verse_count(&self, translation: &str, book: &str) -> usize {
        self.index
            .get(translation)
            .and_then(|t| t.books.get(book))
            .map(|chapters| chapters.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    pub fn verse_count(&self, translation: &str) -> usize {
        self.index.get(translation).map(|t| t.slots.len()).unwrap_or(0)
    }

    /// The n-th verse of a translation in insertion order.
    pub fn nth_verse(&self, translation: &str, n: usize) -> Option<&VerseRecord> {
        let slot = *self.index.get(translation)?.slots.get(n)?;
        self.slots.get(slot)
    }

    /// Translation ids that hold data, sorted.
    pub fn translation_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .index
            .iter()
            .filter(|(_, t)| !t.slots.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Book id -> chapter -> verse -> text, for one translation.
    pub fn book_tree(&self, translation: &str) -> BTreeMap<&str, BTreeMap<u32, BTreeMap<u32, &str>>> {
        let mut out = BTreeMap::new();
        let Some(tindex) = self.index.get(translation) else { return out; };
        for (book, chapters) in &tindex.books {
            let chapters: BTreeMap<u32, BTreeMap<u32, &str>> = chapters
                .iter()
                .map(|(&c, verses)| {
                    (c, verses.iter().map(|(&v, &slot)| (v, self.slots[slot].text.as_str())).collect())
                })
                .collect();
            out.insert(book.as_str(), chapters);
        }
        out
    }

    pub fn stats(&self) -> StoreStats {
        let mut books = BTreeSet::new();
        let mut chapters = 0usize;
        let mut per_translation = BTreeMap::new();
        for (id, tindex) in &self.index {
            if tindex.slots.is_empty() { continue; }
            per_translation.insert(id.clone(), tindex.slots.len());
            for (book, chs) in &tindex.books {
                books.insert(book.as_str());
                chapters += chs.len();
            }
        }
        StoreStats {
            translations: per_translation.len(),
            books: books.len(),
            chapters,
            verses: self.slots.len(),
            per_translation,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Drop all verse data. Registries are unaffected.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.last_updated = Some(Utc::now());
    }

    /// Drop every verse of one translation; returns how many were removed.
    pub fn clear_translation(&mut self, translation: &str) -> usize {
        if self.verse_count(translation) == 0 {
            return 0;
        }
        // Rebuild so remaining slots stay dense and in their original order.
        let old = std::mem::take(&mut self.slots);
        self.index.clear();
        let mut removed = 0;
        for rec in old {
            if rec.translation == translation {
                removed += 1;
                continue;
            }
            self.insert_new(rec);
        }
        self.last_updated = Some(Utc::now());
        removed
    }
}

impl VersePrimaryStore for MemoryVerseStore {
    fn upsert_verses(&mut self, verses: Vec<VerseRecord>) -> Result<usize, StoreError> {
        let mut written = 0;
        for v in verses {
            self.add_verse(&v.translation, &v.book, v.chapter, v.verse, &v.text)?;
            written += 1;
        }
        Ok(written)
    }
}

impl VerseStoreRead for MemoryVerseStore {
    fn scan<'a>(&'a self, translation: Option<&str>) -> Box<dyn Iterator<Item = &'a VerseRecord> + 'a> {
        match translation {
            Some(id) => match self.index.get(id) {
                Some(tindex) => Box::new(tindex.slots.iter().map(move |&slot| &self.slots[slot])),
                None => Box::new(std::iter::empty()),
            },
            None => Box::new(self.slots.iter()),
        }
    }
}
