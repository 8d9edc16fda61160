use bible_model::{Testament, VerseRecord};
use bible_store::{MemoryVerseStore, SearchOptions, StoreError, VersePrimaryStore};

#[test]
fn add_verse_overwrites_same_key() {
    let mut store = MemoryVerseStore::new();
    store.add_verse("kjv", "john", 3, 16, "first text").unwrap();
    store.add_verse("kjv", "john", 3, 16, "  second text  ").unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get_verse("kjv", "john", 3, 16).unwrap().text, "second text");
    assert_eq!(store.verse_count("kjv"), 1);
}

#[test]
fn chapter_verses_come_back_ascending() {
    let mut store = MemoryVerseStore::new();
    store.add_verse("kjv", "genesis", 1, 3, "three").unwrap();
    store.add_verse("kjv", "genesis", 1, 1, "one").unwrap();
    store.add_verse("kjv", "genesis", 1, 2, "two").unwrap();

    let chapter = store.get_chapter("kjv", "genesis", 1).expect("chapter present");
    let numbers: Vec<u32> = chapter.verses.iter().map(|v| v.verse).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(chapter.verses[0].text, "one");
    assert_eq!(chapter.book, "genesis");
    assert_eq!(chapter.translation, "kjv");
}

#[test]
fn get_chapter_misses_return_none() {
    let mut store = MemoryVerseStore::new();
    store.add_verse("kjv", "genesis", 1, 1, "In the beginning").unwrap();

    assert!(store.get_chapter("kjv", "notabook", 1).is_none());
    assert!(store.get_chapter("kjv", "genesis", 0).is_none());
    assert!(store.get_chapter("kjv", "genesis", 51).is_none());
    assert!(store.get_chapter("kjv", "genesis", 2).is_none());
    assert!(store.get_chapter("web", "genesis", 1).is_none());
    assert!(store.get_verse("kjv", "genesis", 1, 2).is_none());
}

#[test]
fn invalid_verses_are_rejected() {
    let mut store = MemoryVerseStore::new();
    assert!(matches!(store.add_verse("kjv", "genesis", 1, 1, "   "), Err(StoreError::InvalidVerse(_))));
    assert!(matches!(store.add_verse("kjv", "nope", 1, 1, "x"), Err(StoreError::UnknownBook(_))));
    assert!(matches!(
        store.add_verse("kjv", "jude", 2, 1, "x"),
        Err(StoreError::ChapterOutOfRange { max: 1, .. })
    ));
    assert!(matches!(store.add_verse("kjv", "jude", 1, 0, "x"), Err(StoreError::InvalidVerse(_))));
    assert!(store.is_empty());
}

fn love_store() -> MemoryVerseStore {
    let mut store = MemoryVerseStore::new();
    store.add_verse("web", "john", 3, 16, "For God so loved the world").unwrap();
    store.add_verse("kjv", "1john", 4, 8, "God is love").unwrap();
    store.add_verse("kjv", "john", 15, 13, "Greater love hath no man than this").unwrap();
    store.add_verse("kjv", "genesis", 1, 1, "In the beginning").unwrap();
    store.add_verse("kjv", "1corinthians", 13, 4, "Charity suffereth long").unwrap();
    store.add_verse("kjv", "romans", 13, 10, "Love worketh no ill; love is the fulfilling").unwrap();
    store
}

#[test]
fn search_respects_translation_and_limit() {
    let store = love_store();
    let hits = store.search_verses("love", Some("kjv"), 2);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.verse.translation == "kjv"));
    // Insertion order, not score order.
    assert_eq!(hits[0].verse.book, "1john");
    assert_eq!(hits[1].verse.book, "john");
}

#[test]
fn search_is_case_insensitive_and_scores_occurrences() {
    let store = love_store();
    let hits = store.search_verses("LOVE", None, 50);
    let books: Vec<&str> = hits.iter().map(|h| h.verse.book.as_str()).collect();
    assert_eq!(books, vec!["john", "1john", "john", "romans"]);
    assert_eq!(hits.last().unwrap().score, 2.0);
}

#[test]
fn empty_query_or_zero_limit_yields_nothing() {
    let store = love_store();
    assert!(store.search_verses("", None, 10).is_empty());
    assert!(store.search_verses("   ", None, 10).is_empty());
    assert!(store.search_verses("love", None, 0).is_empty());
    assert!(store.search_verses("zzz", None, 10).is_empty());
}

#[test]
fn padded_query_keeps_its_spaces() {
    let mut store = MemoryVerseStore::new();
    store.add_verse("kjv", "genesis", 1, 1, "then").unwrap();
    assert!(store.search_verses(" the ", Some("kjv"), 10).is_empty());
    assert_eq!(store.search_verses("the", Some("kjv"), 10).len(), 1);

    store.add_verse("kjv", "genesis", 1, 2, "In the beginning").unwrap();
    let hits = store.search_verses(" the ", Some("kjv"), 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].verse.verse, 2);
}

#[test]
fn search_filters_by_book_and_testament() {
    let store = love_store();
    let mut opts = SearchOptions::default().translation("kjv");
    opts.testament = Some(Testament::Old);
    assert!(store.search_with("love", &opts).is_empty());

    let mut opts = SearchOptions::default();
    opts.book = Some("romans".into());
    let hits = store.search_with("love", &opts);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].verse.chapter, 13);
}

#[test]
fn stats_count_translations_books_and_verses() {
    let store = love_store();
    let stats = store.stats();
    assert_eq!(stats.translations, 2);
    assert_eq!(stats.verses, 6);
    assert_eq!(stats.books, 5);
    assert_eq!(stats.chapters, 6);
    assert_eq!(stats.per_translation.get("kjv"), Some(&5));
    assert_eq!(stats.per_translation.get("web"), Some(&1));
    assert!(store.last_updated().is_some());
}

#[test]
fn clear_translation_keeps_others_in_order() {
    let mut store = love_store();
    let removed = store.clear_translation("web");
    assert_eq!(removed, 1);
    assert_eq!(store.translation_ids(), vec!["kjv".to_string()]);
    assert_eq!(store.nth_verse("kjv", 0).unwrap().book, "1john");
    assert_eq!(store.get_verse("kjv", "romans", 13, 10).unwrap().chapter, 13);
    assert_eq!(store.clear_translation("web"), 0);

    store.clear();
    assert!(store.is_empty());
    assert!(store.translation_ids().is_empty());
    assert!(store.search_verses("love", None, 10).is_empty());
}

#[test]
fn upsert_batch_stops_at_first_invalid_record() {
    let mut store = MemoryVerseStore::new();
    let batch = vec![
        VerseRecord::new("kjv", "genesis", 1, 1, "In the beginning"),
        VerseRecord::new("kjv", "genesis", 99, 1, "bad chapter"),
    ];
    assert!(store.upsert_verses(batch).is_err());
    assert_eq!(store.len(), 1);
}
