use bible_store::ingest::{normalize_payload, normalize_records, normalize_str, resolve_book, IngestError, IngestOptions, PayloadShape};
use bible_store::orchestrator::{import_payload, ImportError};
use bible_store::{normalize_book_name, MemoryVerseStore};
use serde_json::json;

fn lenient() -> IngestOptions {
    IngestOptions { min_verses: 1 }
}

#[test]
fn flat_array_john_3_16_round_trip() {
    let payload = json!([{ "book": "John", "chapter": 3, "verse": 16, "text": "For God so loved the world" }]);
    let mut store = MemoryVerseStore::new();
    let report = import_payload(&mut store, "kjv", &payload, &lenient(), false).expect("import succeeds");

    assert_eq!(report.shape, PayloadShape::FlatArray);
    assert_eq!(report.written, 1);
    assert_eq!(normalize_book_name("John"), Some("john"));
    let verse = store.get_verse("kjv", "john", 3, 16).expect("verse stored");
    assert!(verse.text.starts_with("For God so loved"));
}

#[test]
fn unresolvable_book_is_dropped_not_fatal() {
    let payload = json!([
        { "book": "Unknownxyz", "chapter": 1, "verse": 1, "text": "x" },
        { "book": "Genesis", "chapter": 1, "verse": 1, "text": "In the beginning" },
    ]);
    let batch = normalize_records("kjv", &payload).expect("shape recognised");
    assert_eq!(batch.total_seen, 2);
    assert_eq!(batch.dropped, 1);
    assert_eq!(batch.tuples.len(), 1);
    assert!(batch.tuples.iter().all(|t| t.book == "genesis"));
}

#[test]
fn payload_of_only_bad_records_is_a_source_failure() {
    let payload = json!([{ "book": "Unknownxyz", "chapter": 1, "verse": 1, "text": "x" }]);
    let mut store = MemoryVerseStore::new();
    let err = import_payload(&mut store, "kjv", &payload, &lenient(), false).unwrap_err();
    assert!(err.is_source_failure());
    assert!(matches!(err, ImportError::Source(IngestError::NoResolvableVerses { total_seen: 1, dropped: 1 })));
    assert!(store.is_empty());
}

#[test]
fn records_with_bad_fields_are_dropped() {
    let payload = json!([
        { "book": "Genesis", "chapter": 1, "verse": 1, "text": "   " },
        { "book": "Genesis", "chapter": 51, "verse": 1, "text": "out of range" },
        { "book": "Genesis", "chapter": 1, "verse": 0, "text": "verse zero" },
        { "book": "Genesis", "verse": 2, "text": "no chapter" },
        "not an object",
        { "book": "Genesis", "chapter": "1", "verse": "3", "text": " And God said " },
    ]);
    let batch = normalize_records("kjv", &payload).unwrap();
    assert_eq!(batch.total_seen, 6);
    assert_eq!(batch.dropped, 5);
    assert_eq!(batch.tuples[0].verse, 3);
    assert_eq!(batch.tuples[0].text, "And God said");
}

#[test]
fn nested_books_shape() {
    let payload = json!({
        "books": [
            {
                "name": "1 Corinthians",
                "chapters": [
                    { "chapter": 13, "verses": [
                        { "verse": 4, "text": "Charity suffereth long" },
                        { "verse": 13, "text": "And now abideth faith, hope, charity" }
                    ]}
                ]
            },
            {
                "name": "Psalms",
                "chapters": [
                    { "verses": [ { "text": "Blessed is the man" }, "that walketh not" ] }
                ]
            },
            {
                "name": "Nowhere",
                "chapters": [ { "chapter": 1, "verses": [ { "verse": 1, "text": "lost" } ] } ]
            }
        ]
    });
    let batch = normalize_records("web", &payload).unwrap();
    assert_eq!(batch.shape, PayloadShape::NestedBooks);
    assert_eq!(batch.total_seen, 5);
    assert_eq!(batch.dropped, 1);
    let refs: Vec<(String, u32, u32)> = batch.tuples.iter().map(|t| (t.book.clone(), t.chapter, t.verse)).collect();
    assert_eq!(
        refs,
        vec![
            ("1corinthians".to_string(), 13, 4),
            ("1corinthians".to_string(), 13, 13),
            ("psalms".to_string(), 1, 1),
            ("psalms".to_string(), 1, 2),
        ]
    );
}

#[test]
fn verse_list_shape_accepts_book_name_and_ordinals() {
    let payload = json!({
        "verses": [
            { "book_name": "Song of Solomon", "book": 22, "chapter": 2, "verse": 1, "text": "I am the rose of Sharon" },
            { "book": 43, "chapter": 1, "verse": 1, "text": "In the beginning was the Word" },
            { "book_name": "1Kings", "chapter": 1, "verse": 1, "text": "Now king David was old" },
        ]
    });
    let batch = normalize_records("asv", &payload).unwrap();
    assert_eq!(batch.shape, PayloadShape::VerseList);
    let books: Vec<&str> = batch.tuples.iter().map(|t| t.book.as_str()).collect();
    assert_eq!(books, vec!["songofsolomon", "john", "1kings"]);
}

#[test]
fn persisted_document_shape() {
    let payload = json!({
        "translation": { "id": "ylt" },
        "books": {
            "genesis": { "1": { "1": "In the beginning of God's preparing", "2": "the earth hath existed waste" } },
            "revelation": { "22": { "21": "The grace of our Lord" } }
        },
        "metadata": { "totalVerses": 3, "totalChapters": 2, "downloadDate": "2024-01-01", "source": "test" }
    });
    let batch = normalize_records("ylt", &payload).unwrap();
    assert_eq!(batch.shape, PayloadShape::Document);
    assert_eq!(batch.tuples.len(), 3);
    assert_eq!(batch.dropped, 0);
}

#[test]
fn unrecognized_shapes_fail() {
    assert!(matches!(normalize_records("kjv", &json!({ "foo": 1 })), Err(IngestError::UnrecognizedShape)));
    assert!(matches!(normalize_records("kjv", &json!("text")), Err(IngestError::UnrecognizedShape)));
    assert!(matches!(normalize_str("kjv", "{not json", &lenient()), Err(IngestError::Json(_))));
}

#[test]
fn threshold_rejects_small_imports() {
    let payload = json!([
        { "book": "Genesis", "chapter": 1, "verse": 1, "text": "a" },
        { "book": "Genesis", "chapter": 1, "verse": 2, "text": "b" },
    ]);
    let err = normalize_payload("kjv", &payload, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::BelowThreshold { resolved: 2, min: 1000 }));
    assert!(normalize_payload("kjv", &payload, &IngestOptions { min_verses: 2 }).is_ok());
}

#[test]
fn respelled_book_names_resolve() {
    assert_eq!(resolve_book("1Samuel"), Some("1samuel"));
    assert_eq!(resolve_book("SongOfSolomon"), Some("songofsolomon"));
    assert_eq!(resolve_book("2 Corinthians"), Some("2corinthians"));
    assert_eq!(resolve_book("Unknownxyz"), None);
}

#[test]
fn replace_import_drops_stale_verses() {
    let mut store = MemoryVerseStore::new();
    let first = json!([
        { "book": "Genesis", "chapter": 1, "verse": 1, "text": "old one" },
        { "book": "Genesis", "chapter": 1, "verse": 2, "text": "old two" },
    ]);
    let second = json!([{ "book": "Genesis", "chapter": 1, "verse": 1, "text": "new one" }]);
    import_payload(&mut store, "kjv", &first, &lenient(), false).unwrap();
    let report = import_payload(&mut store, "kjv", &second, &lenient(), true).unwrap();
    assert_eq!(report.removed, 2);
    assert_eq!(store.verse_count("kjv"), 1);
    assert_eq!(store.get_verse("kjv", "genesis", 1, 1).unwrap().text, "new one");
}
