use bible_model::{IncompleteBook, ValidationStatus};
use bible_store::validator::{validate_all, validate_translation};
use bible_store::{canonical_books, MemoryVerseStore};

/// One verse in every canonical chapter of every book.
fn one_verse_per_chapter(store: &mut MemoryVerseStore, translation: &str) {
    for book in canonical_books() {
        for chapter in 1..=book.chapters {
            store
                .add_verse(translation, &book.id, chapter, 1, "text")
                .expect("canonical chapter is valid");
        }
    }
}

#[test]
fn full_chapter_coverage_is_complete() {
    let mut store = MemoryVerseStore::new();
    one_verse_per_chapter(&mut store, "kjv");

    let report = validate_translation(&store, "kjv");
    assert_eq!(report.status, ValidationStatus::Complete);
    assert!(report.missing_books.is_empty());
    assert!(report.incomplete_books.is_empty());
    assert_eq!(report.total_books, 66);
    assert_eq!(report.total_chapters, 1189);
    assert_eq!(report.total_verses, 1189);
    // Verse totals are advisory only.
    assert_eq!(report.sparse_books.len(), 66);
}

#[test]
fn partial_genesis_is_incomplete() {
    let mut store = MemoryVerseStore::new();
    for chapter in 1..=10 {
        store.add_verse("x", "genesis", chapter, 1, "text").unwrap();
    }

    let report = validate_translation(&store, "x");
    assert_eq!(report.status, ValidationStatus::Incomplete);
    assert_eq!(
        report.incomplete_books,
        vec![IncompleteBook { book: "genesis".into(), expected_chapters: 50, actual_chapters: 10 }]
    );
    assert_eq!(report.missing_books.len(), 65);
    assert!(!report.missing_books.contains(&"genesis".to_string()));
    assert_eq!(report.total_books, 1);
    assert_eq!(report.total_chapters, 10);
    assert_eq!(report.total_verses, 10);
}

#[test]
fn absent_translation_is_missing() {
    let mut store = MemoryVerseStore::new();
    one_verse_per_chapter(&mut store, "kjv");

    let report = validate_translation(&store, "darby");
    assert_eq!(report.status, ValidationStatus::Missing);
    assert_eq!(report.total_verses, 0);
    assert_eq!(report.missing_books.len(), 66);
    assert!(report.incomplete_books.is_empty());
}

#[test]
fn report_serializes_with_camel_case_fields() {
    let store = MemoryVerseStore::new();
    let value = serde_json::to_value(validate_translation(&store, "web")).unwrap();
    assert_eq!(value["status"], "missing");
    assert!(value.get("missingBooks").is_some());
    assert!(value.get("incompleteBooks").is_some());
    assert!(value.get("totalChapters").is_some());
}

#[test]
fn validate_all_covers_loaded_translations() {
    let mut store = MemoryVerseStore::new();
    store.add_verse("web", "jude", 1, 1, "Jude, a servant").unwrap();
    one_verse_per_chapter(&mut store, "asv");

    let reports = validate_all(&store);
    let ids: Vec<&str> = reports.iter().map(|r| r.translation.as_str()).collect();
    assert_eq!(ids, vec!["asv", "web"]);
    assert_eq!(reports[0].status, ValidationStatus::Complete);
    assert_eq!(reports[1].status, ValidationStatus::Incomplete);
}
