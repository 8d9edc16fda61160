use serde_json::Value;

use crate::ingest::{normalize_payload, IngestError, IngestOptions, PayloadShape};
use crate::memory_store::MemoryVerseStore;
use crate::{StoreError, VersePrimaryStore};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("source failure: {0}")]
    Source(#[from] IngestError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    /// True when another source (or a cached copy) is worth trying.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, ImportError::Source(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub shape: PayloadShape,
    pub total_seen: usize,
    pub dropped: usize,
    pub written: usize,
    /// Verses removed from the store before writing (replace mode).
    pub removed: usize,
}

/// Ingest orchestrator: normalise the payload, then write it into the store.
///
/// The store is untouched when the payload is rejected. With `replace` set, the
/// translation's existing verses are dropped before the new ones are written.
pub fn import_payload(
    store: &mut MemoryVerseStore,
    translation: &str,
    payload: &Value,
    opts: &IngestOptions,
    replace: bool,
) -> Result<ImportReport, ImportError> {
    let batch = normalize_payload(translation, payload, opts)?;
    let removed = if replace { store.clear_translation(translation) } else { 0 };
    let written = store.upsert_verses(batch.tuples)?;
    Ok(ImportReport { shape: batch.shape, total_seen: batch.total_seen, dropped: batch.dropped, written, removed })
}
