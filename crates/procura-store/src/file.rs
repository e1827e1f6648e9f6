//! JSON-file-backed cache store.
//!
//! One file per key (`<dir>/<key>.json`), each wrapped in a versioned
//! envelope so stored shapes can evolve:
//!
//! ```json
//! { "version": 1, "data": { ... } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CachePort, StoreError};

/// On-disk schema version for cache envelopes.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

/// File-per-key JSON store rooted at a cache directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a cache directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The cache directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CachePort for JsonFileStore {
    fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        if envelope.version != CACHE_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: envelope.version,
                expected: CACHE_SCHEMA_VERSION,
            });
        }
        Ok(Some(envelope.data))
    }

    fn set_value(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: CACHE_SCHEMA_VERSION,
            data: value,
        };
        let path = self.key_path(key);
        fs::write(&path, serde_json::to_vec_pretty(&envelope)?)?;
        debug!(path = %path.display(), "cache entry written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_key_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        let got: Option<HashMap<String, String>> = store.get("nothing").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn set_then_get_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();

        let mut map = HashMap::new();
        map.insert("acme.com".to_string(), "valid".to_string());
        store.set("whois_status", &map).unwrap();

        let got: HashMap<String, String> = store.get("whois_status").unwrap().unwrap();
        assert_eq!(got["acme.com"], "valid");
    }

    #[test]
    fn survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();

        let store = JsonFileStore::open(tmp.path()).unwrap();
        store.set("k", &vec![1u64, 2, 3]).unwrap();
        drop(store);

        let store = JsonFileStore::open(tmp.path()).unwrap();
        let got: Vec<u64> = store.get("k").unwrap().unwrap();
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[test]
    fn envelope_written_with_current_version() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        store.set("k", &42u32).unwrap();

        let raw = fs::read_to_string(tmp.path().join("k.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], CACHE_SCHEMA_VERSION);
        assert_eq!(value["data"], 42);
    }

    #[test]
    fn future_version_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        fs::write(
            tmp.path().join("k.json"),
            r#"{"version": 99, "data": {}}"#,
        )
        .unwrap();

        let result = store.get_value("k");
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("k.json"), "not json at all").unwrap();

        assert!(matches!(store.get_value("k"), Err(StoreError::Json(_))));
    }

    #[test]
    fn overwrite_replaces_whole_object() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();

        let mut first = HashMap::new();
        first.insert("a".to_string(), 1u32);
        first.insert("b".to_string(), 2u32);
        store.set("k", &first).unwrap();

        let mut second = HashMap::new();
        second.insert("c".to_string(), 3u32);
        store.set("k", &second).unwrap();

        let got: HashMap<String, u32> = store.get("k").unwrap().unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["c"], 3);
    }
}
