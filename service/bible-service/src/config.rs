use std::path::{Path, PathBuf};

use bible_store::ingest::{IngestOptions, DEFAULT_MIN_VERSES};
use bible_store::DEFAULT_SEARCH_LIMIT;
use serde::Deserialize;

use crate::ServiceError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Root of the filesystem blob store holding persisted translations.
    pub data_dir: PathBuf,
    /// Resolved-verse floor for a usable translation import.
    pub min_import_verses: usize,
    pub default_translation: String,
    /// Result cap for searches that do not pass one.
    pub search_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("target/bible-data"),
            min_import_verses: DEFAULT_MIN_VERSES,
            default_translation: "kjv".into(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `BIBLE_*` environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        let data_dir = std::env::var("BIBLE_DATA_DIR").map(PathBuf::from).unwrap_or(base.data_dir);
        let min_import_verses = std::env::var("BIBLE_MIN_IMPORT_VERSES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(base.min_import_verses);
        let default_translation = std::env::var("BIBLE_DEFAULT_TRANSLATION").unwrap_or(base.default_translation);
        let search_limit = std::env::var("BIBLE_SEARCH_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(base.search_limit);
        Self { data_dir, min_import_verses, default_translation, search_limit }
    }

    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions { min_verses: self.min_import_verses }
    }
}
