use bible_model::{IncompleteBook, SparseBook, ValidationReport, ValidationStatus};

use crate::book_registry::canonical_books;
use crate::memory_store::MemoryVerseStore;

/// Compare a translation's stored data against canonical book expectations.
///
/// Read-only and infallible: a translation with no data at all still gets a
/// report, with status [`ValidationStatus::Missing`].
pub fn validate_translation(store: &MemoryVerseStore, translation: &str) -> ValidationReport {
    let mut missing_books = Vec::new();
    let mut incomplete_books = Vec::new();
    let mut sparse_books = Vec::new();
    let mut total_books = 0;
    let mut total_chapters = 0;
    let mut total_verses = 0;

    for book in canonical_books() {
        let chapters = store.chapters_present(translation, &book.id);
        if chapters.is_empty() {
            missing_books.push(book.id.clone());
            continue;
        }
        total_books += 1;
        total_chapters += chapters.len();

        let actual_chapters = chapters.len() as u32;
        if actual_chapters < book.chapters {
            incomplete_books.push(IncompleteBook {
                book: book.id.clone(),
                expected_chapters: book.chapters,
                actual_chapters,
            });
        }

        let verses = store.book_verse_count(translation, &book.id);
        total_verses += verses;
        // Versifications differ between translations, so this never affects status.
        if (verses as u32) < book.verses {
            sparse_books.push(SparseBook {
                book: book.id.clone(),
                expected_verses: book.verses,
                actual_verses: verses as u32,
            });
        }
    }

    let status = if total_verses == 0 {
        ValidationStatus::Missing
    } else if !missing_books.is_empty() || !incomplete_books.is_empty() {
        ValidationStatus::Incomplete
    } else {
        ValidationStatus::Complete
    };

    ValidationReport {
        translation: translation.to_string(),
        total_books,
        total_chapters,
        total_verses,
        missing_books,
        incomplete_books,
        sparse_books,
        status,
    }
}

/// Validate every translation that currently holds data, sorted by id.
pub fn validate_all(store: &MemoryVerseStore) -> Vec<ValidationReport> {
    store
        .translation_ids()
        .iter()
        .map(|id| validate_translation(store, id))
        .collect()
}
