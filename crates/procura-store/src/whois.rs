//! Persistent WHOIS status cache and per-article validation freshness.
//!
//! The status map is a UI-facing cache keyed by normalised website, not an
//! authoritative record: `Valid` entries survive restarts so re-opened
//! sessions skip re-checking, and the per-article `checked` flags replace
//! the source application's one-shot in-component latch with an explicit,
//! invalidatable freshness marker.

use std::collections::{HashMap, HashSet};

use procura_core::WhoisStatus;
use tracing::warn;

use crate::{CachePort, StoreError};

const STATUS_KEY: &str = "whois_status";
const CHECKED_KEY: &str = "checked_articles";

/// Typed repository over a [`CachePort`] for WHOIS state.
pub struct WhoisCache<P: CachePort> {
    port: P,
    status: HashMap<String, WhoisStatus>,
    checked: HashSet<u64>,
}

impl<P: CachePort> WhoisCache<P> {
    /// Load the cache from a port.
    ///
    /// A missing entry starts empty; a corrupt or version-mismatched entry
    /// is dropped with a warning and also starts empty; cache damage never
    /// aborts a session.
    pub fn load(port: P) -> Self {
        let status = match port.get::<HashMap<String, WhoisStatus>>(STATUS_KEY) {
            Ok(Some(map)) => map,
            Ok(None) => HashMap::new(),
            Err(err) => {
                warn!(%err, "dropping unreadable whois status cache");
                HashMap::new()
            }
        };
        let checked = match port.get::<HashSet<u64>>(CHECKED_KEY) {
            Ok(Some(set)) => set,
            Ok(None) => HashSet::new(),
            Err(err) => {
                warn!(%err, "dropping unreadable checked-articles cache");
                HashSet::new()
            }
        };
        Self {
            port,
            status,
            checked,
        }
    }

    /// Status recorded for a website key, if any.
    pub fn status(&self, website_key: &str) -> Option<WhoisStatus> {
        self.status.get(website_key).copied()
    }

    /// Whether a website key is recorded as WHOIS-valid.
    pub fn is_valid(&self, website_key: &str) -> bool {
        self.status(website_key) == Some(WhoisStatus::Valid)
    }

    /// Record a status and persist the full map (last write wins).
    pub fn set_status(
        &mut self,
        website_key: impl Into<String>,
        status: WhoisStatus,
    ) -> Result<(), StoreError> {
        self.status.insert(website_key.into(), status);
        self.port.set(STATUS_KEY, &self.status)
    }

    /// Whether the article's supplier list has already been WHOIS-validated.
    pub fn is_checked(&self, article_id: u64) -> bool {
        self.checked.contains(&article_id)
    }

    /// Mark an article's supplier list as validated.
    pub fn mark_checked(&mut self, article_id: u64) -> Result<(), StoreError> {
        self.checked.insert(article_id);
        self.port.set(CHECKED_KEY, &self.checked)
    }

    /// Explicit re-check trigger: forget that an article was validated.
    pub fn invalidate(&mut self, article_id: u64) -> Result<(), StoreError> {
        self.checked.remove(&article_id);
        self.port.set(CHECKED_KEY, &self.checked)
    }

    /// Number of cached status entries.
    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonFileStore, MemoryStore};

    #[test]
    fn empty_port_starts_empty() {
        let cache = WhoisCache::load(MemoryStore::new());
        assert!(cache.is_empty());
        assert!(!cache.is_checked(1));
        assert_eq!(cache.status("acme.com"), None);
    }

    #[test]
    fn set_status_and_query() {
        let mut cache = WhoisCache::load(MemoryStore::new());
        cache.set_status("acme.com", WhoisStatus::Valid).unwrap();
        cache.set_status("dead.com", WhoisStatus::Invalid).unwrap();

        assert!(cache.is_valid("acme.com"));
        assert!(!cache.is_valid("dead.com"));
        assert_eq!(cache.status("dead.com"), Some(WhoisStatus::Invalid));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn checked_latch_and_invalidation() {
        let mut cache = WhoisCache::load(MemoryStore::new());
        assert!(!cache.is_checked(42));

        cache.mark_checked(42).unwrap();
        assert!(cache.is_checked(42));

        cache.invalidate(42).unwrap();
        assert!(!cache.is_checked(42));
    }

    #[test]
    fn survives_reopen_on_file_store() {
        let tmp = tempfile::TempDir::new().unwrap();

        let mut cache = WhoisCache::load(JsonFileStore::open(tmp.path()).unwrap());
        cache.set_status("acme.com", WhoisStatus::Valid).unwrap();
        cache.mark_checked(7).unwrap();
        drop(cache);

        let cache = WhoisCache::load(JsonFileStore::open(tmp.path()).unwrap());
        assert!(cache.is_valid("acme.com"));
        assert!(cache.is_checked(7));
    }

    #[test]
    fn corrupt_cache_degrades_to_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("whois_status.json"), "{broken").unwrap();
        std::fs::write(
            tmp.path().join("checked_articles.json"),
            r#"{"version": 99, "data": []}"#,
        )
        .unwrap();

        let cache = WhoisCache::load(JsonFileStore::open(tmp.path()).unwrap());
        assert!(cache.is_empty());
        assert!(!cache.is_checked(1));
    }

    #[test]
    fn last_write_wins() {
        let mut cache = WhoisCache::load(MemoryStore::new());
        cache.set_status("acme.com", WhoisStatus::Checking).unwrap();
        cache.set_status("acme.com", WhoisStatus::Valid).unwrap();
        assert_eq!(cache.status("acme.com"), Some(WhoisStatus::Valid));
        assert_eq!(cache.len(), 1);
    }
}
