use bible_model::{BookTree, DocumentMetadata, TranslationDocument, DOCUMENT_SCHEMA};
use bible_store::translation_registry::translation_or_placeholder;
use bible_store::MemoryVerseStore;
use chrono::Utc;

/// Snapshot one translation into the persisted `{translation, books, metadata}` layout.
pub fn build_document(store: &MemoryVerseStore, translation: &str, source: &str) -> TranslationDocument {
    let mut total_chapters = 0;
    let mut total_verses = 0;
    let mut books = BookTree::new();
    for (book, chapters) in store.book_tree(translation) {
        let entry = books.entry(book.to_string()).or_default();
        for (chapter, verses) in chapters {
            total_chapters += 1;
            total_verses += verses.len();
            entry.insert(
                chapter.to_string(),
                verses.into_iter().map(|(v, text)| (v.to_string(), text.to_string())).collect(),
            );
        }
    }

    TranslationDocument {
        translation: translation_or_placeholder(translation),
        books,
        metadata: DocumentMetadata {
            total_verses,
            total_chapters,
            download_date: Utc::now().to_rfc3339(),
            source: source.to_string(),
            schema_version: Some(DOCUMENT_SCHEMA),
        },
    }
}
