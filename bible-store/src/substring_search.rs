use bible_model::SearchHit;

use crate::{SearchOptions, TextSearcher, VerseStoreRead};

/// Linear case-insensitive substring search.
///
/// Results follow store insertion order and the scan stops once `limit` hits
/// are collected, so the result set depends on ingestion order. The score is
/// the number of occurrences of the query in the verse and does not reorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringSearcher;

impl TextSearcher for SubstringSearcher {
    fn name(&self) -> &'static str { "substring" }

    fn search(&self, store: &dyn VerseStoreRead, query: &str, opts: &SearchOptions) -> Vec<SearchHit> {
        if query.trim().is_empty() || opts.limit == 0 { return Vec::new(); }
        // Padding is part of the query: " the " must not match "then".
        let needle = query.to_lowercase();

        let mut hits = Vec::new();
        for rec in store.scan(opts.translation.as_deref()) {
            if !opts.admits(rec) { continue; }
            let occurrences = count_occurrences(&rec.text, &needle);
            if occurrences == 0 { continue; }
            hits.push(SearchHit { verse: rec.clone(), score: occurrences as f32 });
            if hits.len() >= opts.limit { break; }
        }
        hits
    }
}

fn count_occurrences(text: &str, lowered_needle: &str) -> usize {
    text.to_lowercase().matches(lowered_needle).count()
}
