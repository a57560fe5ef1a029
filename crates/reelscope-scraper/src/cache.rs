//! On-disk cache of raw fetch results.
//!
//! A synchronous actor run is slow and billed, so a successful fetch is kept
//! for a bounded time and reused for repeated analyses of the same profile.
//! Entries are keyed by a hash of `(api token, identity, limit)`; the token
//! is part of the key so that switching accounts never serves another
//! account's results, and hashing keeps it out of file names.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::ScraperError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    identity: String,
    fetched_at: DateTime<Utc>,
    records: Vec<Value>,
}

/// Computes the cache key for one fetch.
#[must_use]
pub fn cache_key(api_token: &str, identity: &str, limit: u32) -> String {
    let input = format!("{api_token}\x00{}\x00{limit}", identity.to_lowercase());
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Directory of JSON cache entries with a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct RecordCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl RecordCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl_secs,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the cached records for `key` if a fresh entry exists.
    ///
    /// Missing, expired and unreadable entries are all treated as a miss.
    pub async fn load(&self, key: &str) -> Option<Vec<Value>> {
        self.load_at(key, Utc::now()).await
    }

    async fn load_at(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<Value>> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "fetch cache miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        let age_secs = (now - entry.fetched_at).num_seconds();
        let ttl_secs = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        if age_secs < 0 || age_secs >= ttl_secs {
            tracing::debug!(identity = %entry.identity, age_secs, "fetch cache entry expired");
            return None;
        }

        tracing::info!(
            identity = %entry.identity,
            age_secs,
            records = entry.records.len(),
            "using cached fetch"
        );
        Some(entry.records)
    }

    /// Writes `records` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Cache`] if the directory or file cannot be
    /// written.
    pub async fn store(
        &self,
        key: &str,
        identity: &str,
        records: &[Value],
    ) -> Result<(), ScraperError> {
        self.store_at(key, identity, records, Utc::now()).await
    }

    async fn store_at(
        &self,
        key: &str,
        identity: &str,
        records: &[Value],
        fetched_at: DateTime<Utc>,
    ) -> Result<(), ScraperError> {
        let entry = CacheEntry {
            identity: identity.to_owned(),
            fetched_at,
            records: records.to_vec(),
        };
        let body = serde_json::to_vec(&entry).map_err(|e| ScraperError::Deserialize {
            context: format!("cache entry for {identity}"),
            source: e,
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ScraperError::Cache {
                path: self.dir.clone(),
                source: e,
            })?;

        let path = self.entry_path(key);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ScraperError::Cache {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(identity, path = %path.display(), "stored fetch in cache");
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    #[test]
    fn cache_key_is_stable_and_case_insensitive_on_identity() {
        assert_eq!(cache_key("t", "Creator", 30), cache_key("t", "creator", 30));
        assert_ne!(cache_key("t", "creator", 30), cache_key("t", "creator", 31));
        assert_ne!(cache_key("t1", "creator", 30), cache_key("t2", "creator", 30));
        assert_eq!(cache_key("t", "creator", 30).len(), 64);
        assert!(!cache_key("secret-token", "creator", 30).contains("secret"));
    }

    #[tokio::test]
    async fn store_then_load_returns_records() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path().join("nested"), 3600);
        let records = vec![json!({"playCount": 1}), json!({"video": {}})];

        cache.store("k", "creator", &records).await.unwrap();
        assert_eq!(cache.load("k").await, Some(records));
    }

    #[tokio::test]
    async fn load_misses_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path(), 3600);
        assert_eq!(cache.load("absent").await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path(), 3600);
        let fetched_at = Utc::now() - Duration::seconds(7200);
        cache
            .store_at("k", "creator", &[json!({})], fetched_at)
            .await
            .unwrap();

        assert_eq!(cache.load("k").await, None);
        assert!(cache
            .load_at("k", fetched_at + Duration::seconds(10))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn store_overwrites_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path(), 3600);
        cache.store("k", "creator", &[json!(1)]).await.unwrap();
        cache.store("k", "creator", &[json!(2), json!(3)]).await.unwrap();
        assert_eq!(cache.load("k").await, Some(vec![json!(2), json!(3)]));
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path(), 3600);
        std::fs::write(dir.path().join("k.json"), b"{not json").unwrap();
        assert_eq!(cache.load("k").await, None);
    }
}
