//! Key-value JSON blob storage used to persist translations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("invalid blob key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque JSON document store (get/put/delete by key).
///
/// Keys are `/`-separated relative paths such as `translations/kjv`.
pub trait BlobStore: Send + Sync {
    fn get_json(&self, key: &str) -> Result<Option<Value>, BlobError>;
    fn put_json(&self, key: &str, value: &Value) -> Result<(), BlobError>;
    /// Returns false when nothing was stored under `key`.
    fn delete(&self, key: &str) -> Result<bool, BlobError>;
    /// Keys directly under `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError>;
}

fn check_key(key: &str) -> Result<(), BlobError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad { Err(BlobError::InvalidKey(key.to_string())) } else { Ok(()) }
}

/// One `<key>.json` file per blob under a root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, BlobError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        check_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for FsBlobStore {
    fn get_json(&self, key: &str) -> Result<Option<Value>, BlobError> {
        let path = self.path_for(key)?;
        if !path.exists() { return Ok(None); }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn put_json(&self, key: &str, value: &Value) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so readers never see a half-written document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, BlobError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        check_key(prefix)?;
        let dir = self.root.join(prefix);
        if !dir.is_dir() { return Ok(Vec::new()); }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") { continue; }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(format!("{prefix}/{stem}"));
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Process-local blob store, mainly for tests and ephemeral services.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, Value>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self { Self::default() }
}

impl BlobStore for MemoryBlobStore {
    fn get_json(&self, key: &str) -> Result<Option<Value>, BlobError> {
        check_key(key)?;
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn put_json(&self, key: &str, value: &Value) -> Result<(), BlobError> {
        check_key(key)?;
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, BlobError> {
        check_key(key)?;
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.remove(key).is_some())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        check_key(prefix)?;
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = format!("{prefix}/");
        Ok(blobs
            .keys()
            .filter(|k| k.strip_prefix(&dir).map(|rest| !rest.contains('/')).unwrap_or(false))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::check_key;

    #[test]
    fn rejects_escaping_keys() {
        assert!(check_key("translations/kjv").is_ok());
        assert!(check_key("../etc/passwd").is_err());
        assert!(check_key("/abs").is_err());
        assert!(check_key("a//b").is_err());
        assert!(check_key("").is_err());
    }
}
