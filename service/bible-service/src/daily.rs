use bible_model::VerseRef;
use chrono::{Datelike, NaiveDate};

/// Curated (book, chapter, verse) rotation for the verse of the day.
const DAILY_VERSES: [(&str, u32, u32); 31] = [
    ("john", 3, 16),
    ("jeremiah", 29, 11),
    ("philippians", 4, 13),
    ("romans", 8, 28),
    ("proverbs", 3, 5),
    ("isaiah", 41, 10),
    ("psalms", 23, 1),
    ("matthew", 11, 28),
    ("joshua", 1, 9),
    ("2timothy", 1, 7),
    ("psalms", 46, 1),
    ("romans", 12, 2),
    ("galatians", 5, 22),
    ("hebrews", 11, 1),
    ("1corinthians", 13, 4),
    ("isaiah", 40, 31),
    ("matthew", 6, 33),
    ("psalms", 119, 105),
    ("1peter", 5, 7),
    ("lamentations", 3, 22),
    ("john", 14, 6),
    ("ephesians", 2, 8),
    ("micah", 6, 8),
    ("psalms", 37, 4),
    ("2corinthians", 5, 17),
    ("romans", 15, 13),
    ("james", 1, 5),
    ("deuteronomy", 31, 6),
    ("zephaniah", 3, 17),
    ("colossians", 3, 23),
    ("1john", 4, 19),
];

/// Reference for `date`: zero-based day of year modulo the rotation length.
pub fn daily_reference(date: NaiveDate) -> VerseRef {
    let idx = date.ordinal0() as usize % DAILY_VERSES.len();
    let (book, chapter, verse) = DAILY_VERSES[idx];
    VerseRef::new(book, chapter, verse)
}
