//! Format-tolerant ingestion of raw translation payloads.
//!
//! A payload is sniffed into one of the [`PayloadShape`] variants, then the
//! matching parser walks it and emits canonical [`VerseRecord`]s. Records that
//! cannot be normalised (unknown book, missing numbers, empty text, chapter
//! outside the canonical range) are dropped and counted; they never abort the
//! batch. Only a payload that is unusable as a whole yields an [`IngestError`].

use bible_model::VerseRecord;
use serde_json::{Map, Value};

use crate::book_registry::{book_info, canonical_books, normalize_book_name};

/// Resolved-verse floor below which an import is treated as a failed source.
pub const DEFAULT_MIN_VERSES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `[{book, chapter, verse, text}, ...]`
    FlatArray,
    /// `{books: [{name, chapters: [{chapter, verses: [{verse, text}]}]}]}`
    NestedBooks,
    /// `{verses: [{book_name|book, chapter, verse, text}, ...]}`
    VerseList,
    /// Persisted layout: `{translation, books: {bookId: {chapter: {verse: text}}}, metadata}`
    Document,
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub min_verses: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { min_verses: DEFAULT_MIN_VERSES }
    }
}

/// Normalised output of one payload.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub shape: PayloadShape,
    pub tuples: Vec<VerseRecord>,
    pub dropped: usize,
    pub total_seen: usize,
}

/// Whole-source failures. Individual bad records are never reported here.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unrecognized payload shape")]
    UnrecognizedShape,
    #[error("no resolvable verses ({dropped} of {total_seen} records dropped)")]
    NoResolvableVerses { total_seen: usize, dropped: usize },
    #[error("only {resolved} verses resolved, at least {min} required")]
    BelowThreshold { resolved: usize, min: usize },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

enum RawPayload<'a> {
    FlatArray(&'a [Value]),
    NestedBooks(&'a [Value]),
    VerseList(&'a [Value]),
    Document(&'a Map<String, Value>),
}

impl<'a> RawPayload<'a> {
    /// Structural detection, in priority order.
    fn detect(value: &'a Value) -> Option<Self> {
        if let Some(items) = value.as_array() {
            return Some(RawPayload::FlatArray(items));
        }
        let obj = value.as_object()?;
        if let Some(books) = obj.get("books").and_then(Value::as_array) {
            return Some(RawPayload::NestedBooks(books));
        }
        if let Some(verses) = obj.get("verses").and_then(Value::as_array) {
            return Some(RawPayload::VerseList(verses));
        }
        if let Some(books) = obj.get("books").and_then(Value::as_object) {
            return Some(RawPayload::Document(books));
        }
        None
    }

    fn shape(&self) -> PayloadShape {
        match self {
            RawPayload::FlatArray(_) => PayloadShape::FlatArray,
            RawPayload::NestedBooks(_) => PayloadShape::NestedBooks,
            RawPayload::VerseList(_) => PayloadShape::VerseList,
            RawPayload::Document(_) => PayloadShape::Document,
        }
    }

    fn collect(&self, out: &mut Collector<'_>) {
        match self {
            RawPayload::FlatArray(items) | RawPayload::VerseList(items) => parse_flat(items, out),
            RawPayload::NestedBooks(books) => parse_nested(books, out),
            RawPayload::Document(books) => parse_document(books, out),
        }
    }
}

/// Accumulates accepted tuples and drop counts.
struct Collector<'t> {
    translation: &'t str,
    tuples: Vec<VerseRecord>,
    dropped: usize,
    total_seen: usize,
}

impl<'t> Collector<'t> {
    fn new(translation: &'t str) -> Self {
        Self { translation, tuples: Vec::new(), dropped: 0, total_seen: 0 }
    }

    fn offer(&mut self, book: Option<&'static str>, chapter: Option<u32>, verse: Option<u32>, text: Option<&str>) {
        self.total_seen += 1;
        let text = text.map(str::trim).unwrap_or("");
        match (book, chapter, verse) {
            (Some(book), Some(chapter), Some(verse))
                if verse >= 1 && !text.is_empty() && chapter_in_range(book, chapter) =>
            {
                self.tuples.push(VerseRecord::new(self.translation, book, chapter, verse, text));
            }
            _ => self.dropped += 1,
        }
    }

    /// Count `n` records as seen and dropped (e.g. every verse of an unknown book).
    fn drop_all(&mut self, n: usize) {
        self.total_seen += n;
        self.dropped += n;
    }

    fn finish(self, shape: PayloadShape) -> NormalizedBatch {
        NormalizedBatch { shape, tuples: self.tuples, dropped: self.dropped, total_seen: self.total_seen }
    }
}

fn chapter_in_range(book: &str, chapter: u32) -> bool {
    book_info(book).map(|b| chapter >= 1 && chapter <= b.chapters).unwrap_or(false)
}

/// Normalise without applying the usable-import threshold.
///
/// Fails only when the payload shape is not recognised.
pub fn normalize_records(translation: &str, payload: &Value) -> Result<NormalizedBatch, IngestError> {
    let raw = RawPayload::detect(payload).ok_or(IngestError::UnrecognizedShape)?;
    let mut out = Collector::new(translation);
    raw.collect(&mut out);
    let batch = out.finish(raw.shape());
    tracing::debug!(
        translation,
        shape = ?batch.shape,
        seen = batch.total_seen,
        dropped = batch.dropped,
        resolved = batch.tuples.len(),
        "normalized payload"
    );
    Ok(batch)
}

/// Normalise and enforce the usable-import threshold.
pub fn normalize_payload(translation: &str, payload: &Value, opts: &IngestOptions) -> Result<NormalizedBatch, IngestError> {
    let batch = normalize_records(translation, payload)?;
    if batch.tuples.is_empty() {
        return Err(IngestError::NoResolvableVerses { total_seen: batch.total_seen, dropped: batch.dropped });
    }
    if batch.tuples.len() < opts.min_verses {
        return Err(IngestError::BelowThreshold { resolved: batch.tuples.len(), min: opts.min_verses });
    }
    Ok(batch)
}

pub fn normalize_str(translation: &str, json: &str, opts: &IngestOptions) -> Result<NormalizedBatch, IngestError> {
    let value: Value = serde_json::from_str(json)?;
    normalize_payload(translation, &value, opts)
}

// ------------------------------
// Shape parsers
// ------------------------------

const BOOK_FIELDS: [&str; 5] = ["book_name", "book", "bookName", "book_id", "name"];

fn parse_flat(items: &[Value], out: &mut Collector<'_>) {
    for item in items {
        let Some(obj) = item.as_object() else {
            out.drop_all(1);
            continue;
        };
        let book = BOOK_FIELDS.iter().find_map(|f| obj.get(*f).and_then(resolve_book_value));
        out.offer(
            book,
            obj.get("chapter").and_then(as_number),
            obj.get("verse").and_then(as_number),
            obj.get("text").and_then(Value::as_str),
        );
    }
}

fn parse_nested(books: &[Value], out: &mut Collector<'_>) {
    for book_val in books {
        let Some(book_obj) = book_val.as_object() else {
            out.drop_all(1);
            continue;
        };
        let book = ["name", "book", "id", "abbrev"]
            .iter()
            .find_map(|f| book_obj.get(*f).and_then(resolve_book_value));
        let chapters = book_obj.get("chapters").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);

        for (ci, chapter_val) in chapters.iter().enumerate() {
            let (chapter, verses) = match chapter_val {
                Value::Object(ch) => (
                    ch.get("chapter").and_then(as_number).or(Some(ci as u32 + 1)),
                    ch.get("verses").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]),
                ),
                // A chapter given directly as a verse array.
                Value::Array(vs) => (Some(ci as u32 + 1), vs.as_slice()),
                _ => {
                    out.drop_all(1);
                    continue;
                }
            };
            if book.is_none() {
                out.drop_all(verses.len());
                continue;
            }
            for (vi, verse_val) in verses.iter().enumerate() {
                match verse_val {
                    Value::Object(v) => out.offer(
                        book,
                        chapter,
                        v.get("verse").and_then(as_number).or(Some(vi as u32 + 1)),
                        v.get("text").and_then(Value::as_str),
                    ),
                    Value::String(text) => out.offer(book, chapter, Some(vi as u32 + 1), Some(text.as_str())),
                    _ => out.drop_all(1),
                }
            }
        }
    }
}

fn parse_document(books: &Map<String, Value>, out: &mut Collector<'_>) {
    for (book_key, chapters) in books {
        let book = resolve_book(book_key);
        let Some(chapters) = chapters.as_object() else {
            out.drop_all(1);
            continue;
        };
        for (chapter_key, verses) in chapters {
            let chapter = chapter_key.trim().parse::<u32>().ok();
            let Some(verses) = verses.as_object() else {
                out.drop_all(1);
                continue;
            };
            for (verse_key, text) in verses {
                out.offer(book, chapter, verse_key.trim().parse::<u32>().ok(), text.as_str());
            }
        }
    }
}

// ------------------------------
// Field helpers
// ------------------------------

/// Chapter/verse numbers arrive as JSON numbers or numeric strings.
fn as_number(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn resolve_book_value(v: &Value) -> Option<&'static str> {
    match v {
        Value::String(s) => resolve_book(s),
        // 1-based canonical ordinal.
        Value::Number(n) => {
            let ordinal = usize::try_from(n.as_u64()?).ok()?;
            canonical_books().get(ordinal.checked_sub(1)?).map(|b| b.id.as_str())
        }
        _ => None,
    }
}

/// Resolve a raw book string, falling back to deterministic respellings.
pub fn resolve_book(raw: &str) -> Option<&'static str> {
    if let Some(id) = normalize_book_name(raw) {
        return Some(id);
    }
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
    let digit_spaced = space_after_leading_digit(raw.trim());
    let camel_spaced = space_camel_case(raw.trim());
    let both = space_camel_case(&digit_spaced);
    [compact, digit_spaced, camel_spaced, both]
        .iter()
        .find_map(|candidate| normalize_book_name(candidate))
}

/// "1Samuel" -> "1 Samuel"
fn space_after_leading_digit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 1);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c.is_ascii_digit() && out.len() == c.len_utf8() {
            if let Some(next) = chars.peek() {
                if next.is_alphabetic() {
                    out.push(' ');
                }
            }
        }
    }
    out
}

/// "SongOfSolomon" -> "Song Of Solomon"
fn space_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if let Some(p) = prev {
            if p.is_lowercase() && c.is_uppercase() {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
