pub mod blob;
pub mod config;
pub mod daily;
pub mod document;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bible_model::{
    BookInfo, ChapterView, CorpusStats, SearchHit, TranslationDocument, TranslationInfo, ValidationReport,
    VerseRecord, VerseRef,
};
use bible_store::ingest::{resolve_book, IngestOptions};
use bible_store::orchestrator::{import_payload, ImportError, ImportReport};
use bible_store::translation_registry::{translation_or_placeholder, translations};
use bible_store::validator::{validate_all, validate_translation};
use bible_store::{all_books, MemoryVerseStore, SearchOptions};
use chrono::{NaiveDate, Utc};
use serde_json::Value;

pub use blob::{BlobError, BlobStore, FsBlobStore, MemoryBlobStore};
pub use config::ServiceConfig;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
    #[error("translation not loaded: {0}")]
    NotLoaded(String),
    #[error("no persisted copy of translation: {0}")]
    NotPersisted(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
}

impl ServiceError {
    /// True when the failure came from an unusable source payload.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, ServiceError::Import(e) if e.is_source_failure())
    }
}

/// Query façade over one verse store plus a blob store for persisted translations.
///
/// The store sits behind a single reader-writer lock: imports are rare batch
/// writes, everything else reads.
pub struct BibleService {
    cfg: ServiceConfig,
    store: Arc<RwLock<MemoryVerseStore>>,
    blobs: Arc<dyn BlobStore>,
}

const TRANSLATION_PREFIX: &str = "translations";

fn blob_key(translation: &str) -> String {
    format!("{TRANSLATION_PREFIX}/{translation}")
}

impl BibleService {
    /// Service backed by a filesystem blob store rooted at `cfg.data_dir`.
    pub fn new(cfg: ServiceConfig) -> Result<Self, ServiceError> {
        let blobs = FsBlobStore::open(&cfg.data_dir)?;
        Ok(Self::with_blob_store(cfg, Arc::new(blobs)))
    }

    pub fn with_blob_store(cfg: ServiceConfig, blobs: Arc<dyn BlobStore>) -> Self {
        Self { cfg, store: Arc::new(RwLock::new(MemoryVerseStore::new())), blobs }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    // A panic mid-import leaves the store consistent per verse, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, MemoryVerseStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryVerseStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept any recognised spelling; unknown spellings pass through and miss.
    fn book_id(book: &str) -> String {
        resolve_book(book).map(str::to_string).unwrap_or_else(|| book.to_string())
    }

    // ------------------------------
    // Read path
    // ------------------------------

    pub fn get_verse(&self, translation: &str, book: &str, chapter: u32, verse: u32) -> Option<VerseRecord> {
        self.read().get_verse(translation, &Self::book_id(book), chapter, verse).cloned()
    }

    pub fn get_chapter(&self, translation: &str, book: &str, chapter: u32) -> Option<ChapterView> {
        self.read().get_chapter(translation, &Self::book_id(book), chapter)
    }

    /// Keyword search; `limit` falls back to the configured default.
    pub fn search(&self, query: &str, translation: Option<&str>, limit: Option<usize>) -> Vec<SearchHit> {
        let limit = limit.unwrap_or(self.cfg.search_limit);
        self.read().search_verses(query, translation, limit)
    }

    pub fn search_with(&self, query: &str, opts: &SearchOptions) -> Vec<SearchHit> {
        let mut opts = opts.clone();
        if let Some(book) = opts.book.take() {
            opts.book = Some(Self::book_id(&book));
        }
        self.read().search_with(query, &opts)
    }

    /// Verse of the day for today's UTC date.
    pub fn daily_verse(&self, translation: &str) -> Option<VerseRecord> {
        self.daily_verse_for(Utc::now().date_naive(), translation)
    }

    /// Same date, same verse. `None` when that verse is not loaded.
    pub fn daily_verse_for(&self, date: NaiveDate, translation: &str) -> Option<VerseRecord> {
        let VerseRef { book, chapter, verse } = daily::daily_reference(date);
        self.get_verse(translation, &book, chapter, verse)
    }

    /// Uniform pick over the translation's verses; `None` when nothing is loaded.
    pub fn random_verse(&self, translation: &str) -> Option<VerseRecord> {
        self.random_verse_with(&mut fastrand::Rng::new(), translation)
    }

    pub fn random_verse_with(&self, rng: &mut fastrand::Rng, translation: &str) -> Option<VerseRecord> {
        let store = self.read();
        let n = store.verse_count(translation);
        if n == 0 {
            return None;
        }
        store.nth_verse(translation, rng.usize(..n)).cloned()
    }

    pub fn stats(&self) -> CorpusStats {
        let store = self.read();
        let stats = store.stats();
        CorpusStats {
            total_translations: stats.translations,
            total_books: stats.books,
            total_chapters: stats.chapters,
            total_verses: stats.verses,
            last_updated: store.last_updated().map(|t| t.to_rfc3339()),
        }
    }

    /// Registered translations, followed by any loaded translation that is not registered.
    pub fn translations(&self) -> Vec<TranslationInfo> {
        let mut out: Vec<TranslationInfo> = translations().to_vec();
        for id in self.loaded_translations() {
            if !out.iter().any(|t| t.id == id) {
                out.push(translation_or_placeholder(&id));
            }
        }
        out
    }

    pub fn loaded_translations(&self) -> Vec<String> {
        self.read().translation_ids()
    }

    pub fn books(&self) -> Vec<BookInfo> {
        all_books()
    }

    pub fn validate(&self, translation: &str) -> ValidationReport {
        validate_translation(&self.read(), translation)
    }

    pub fn validate_all(&self) -> Vec<ValidationReport> {
        validate_all(&self.read())
    }

    // ------------------------------
    // Write path
    // ------------------------------

    /// Normalise `payload` and replace the translation's verses with it.
    ///
    /// The store is left untouched when the payload is a source failure.
    pub fn import_payload(&self, translation: &str, payload: &Value) -> Result<ImportReport, ServiceError> {
        self.import_with_options(translation, payload, &self.cfg.ingest_options())
    }

    fn import_with_options(
        &self,
        translation: &str,
        payload: &Value,
        opts: &IngestOptions,
    ) -> Result<ImportReport, ServiceError> {
        let report = match import_payload(&mut self.write(), translation, payload, opts, true) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(translation, error = %e, "translation import rejected");
                return Err(e.into());
            }
        };
        tracing::info!(
            translation,
            shape = ?report.shape,
            written = report.written,
            dropped = report.dropped,
            removed = report.removed,
            "imported translation"
        );
        Ok(report)
    }

    /// Try each source in order, then the persisted copy.
    ///
    /// Only source failures move on to the next candidate; any other error is
    /// returned immediately. When everything fails the last error is returned.
    pub fn import_with_fallback(&self, translation: &str, sources: &[Value]) -> Result<ImportReport, ServiceError> {
        let mut last_err: Option<ServiceError> = None;
        for (idx, source) in sources.iter().enumerate() {
            match self.import_payload(translation, source) {
                Ok(report) => return Ok(report),
                Err(e) if e.is_source_failure() => {
                    tracing::warn!(translation, source = idx, error = %e, "source unusable, trying next");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(translation, "all sources failed, falling back to persisted copy");
        match self.load_translation(translation) {
            Ok(report) => Ok(report),
            Err(ServiceError::NotPersisted(id)) => Err(last_err.unwrap_or(ServiceError::NotPersisted(id))),
            Err(e) => Err(e),
        }
    }

    /// Write the translation's current verses to the blob store.
    pub fn persist_translation(&self, translation: &str, source: &str) -> Result<TranslationDocument, ServiceError> {
        let doc = {
            let store = self.read();
            if store.verse_count(translation) == 0 {
                return Err(ServiceError::NotLoaded(translation.to_string()));
            }
            document::build_document(&store, translation, source)
        };
        self.blobs.put_json(&blob_key(translation), &doc.to_json()?)?;
        tracing::info!(translation, verses = doc.metadata.total_verses, "persisted translation");
        Ok(doc)
    }

    /// Import the persisted copy of a translation, replacing what is loaded.
    ///
    /// The import threshold does not apply: a persisted copy was accepted when it was written.
    pub fn load_translation(&self, translation: &str) -> Result<ImportReport, ServiceError> {
        let payload = self
            .blobs
            .get_json(&blob_key(translation))?
            .ok_or_else(|| ServiceError::NotPersisted(translation.to_string()))?;
        self.import_with_options(translation, &payload, &IngestOptions { min_verses: 1 })
    }

    /// Load every persisted translation, reporting each outcome.
    pub fn load_all_persisted(&self) -> Result<Vec<(String, Result<ImportReport, ServiceError>)>, ServiceError> {
        let keys = self.blobs.list(TRANSLATION_PREFIX)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.rsplit('/').next().map(str::to_string))
            .map(|id| {
                let outcome = self.load_translation(&id);
                (id, outcome)
            })
            .collect())
    }

    pub fn persisted_translations(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .blobs
            .list(TRANSLATION_PREFIX)?
            .into_iter()
            .filter_map(|key| key.rsplit('/').next().map(str::to_string))
            .collect())
    }

    pub fn delete_persisted(&self, translation: &str) -> Result<bool, ServiceError> {
        Ok(self.blobs.delete(&blob_key(translation))?)
    }

    /// Drop one translation from memory; the persisted copy is untouched.
    pub fn unload_translation(&self, translation: &str) -> usize {
        self.write().clear_translation(translation)
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}
