//! Response caching
//!
//! The resolver consults a [`ResponseCache`] before making a generative
//! call. The cache is injected at construction time; two backends are
//! provided: a bounded in-process map and a persistent SQLite table.
//! Concurrent fills are last-write-wins and TTL expiry is the only
//! invalidation.

use crate::error::{LovechatError, Result};
use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache for generative responses, keyed by `(persona, normalized text)`
pub trait ResponseCache: Send + Sync {
    /// Returns the cached response for `key` if present and unexpired
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a response under `key` with the cache's TTL
    fn put(&self, key: &str, value: &str);
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// Bounded in-memory cache with per-entry TTL
///
/// When full, the entry closest to expiry (the oldest, since every entry
/// shares one TTL) is evicted to make room.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` entries for `ttl` each
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Number of live entries, counting expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();

        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);

        if entries.len() >= self.capacity && !entries.contains_key(key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: now + self.ttl,
            },
        );
    }
}

/// Persistent response cache backed by SQLite
///
/// Survives process restarts and is shared by every process pointing at
/// the same database file. Expired rows are deleted lazily on read.
pub struct SqliteCache {
    db_path: PathBuf,
    ttl: Duration,
}

impl SqliteCache {
    /// Opens (and initializes) a cache at the given database path
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P, ttl: Duration) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for cache database")
                .map_err(|e| LovechatError::Storage(e.to_string()))?;
        }

        let cache = Self { db_path, ttl };
        cache.init()?;
        Ok(cache)
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS response_cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create cache table")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open cache database")
            .map_err(|e| LovechatError::Storage(e.to_string()).into())
    }
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &str) -> Option<String> {
        let conn = match self.open() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache read failed: {}", e);
                return None;
            }
        };

        let now = Utc::now().to_rfc3339();
        let _ = conn.execute(
            "DELETE FROM response_cache WHERE key = ? AND expires_at <= ?",
            params![key, now],
        );

        conn.query_row(
            "SELECT value FROM response_cache WHERE key = ? AND expires_at > ?",
            params![key, now],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            tracing::warn!("Cache read failed: {}", e);
            None
        })
    }

    fn put(&self, key: &str, value: &str) {
        let conn = match self.open() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache write failed: {}", e);
                return;
            }
        };

        let expires_at =
            (Utc::now() + chrono::Duration::seconds(self.ttl.as_secs() as i64)).to_rfc3339();
        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO response_cache (key, value, expires_at) VALUES (?, ?, ?)",
            params![key, value, expires_at],
        ) {
            tracing::warn!("Cache write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_cache_hit() {
        let cache = MemoryCache::new(Duration::from_secs(60), 8);
        cache.put("emma:hello there", "Hi!");
        assert_eq!(cache.get("emma:hello there"), Some("Hi!".to_string()));
    }

    #[test]
    fn test_memory_cache_miss() {
        let cache = MemoryCache::new(Duration::from_secs(60), 8);
        assert_eq!(cache.get("emma:unknown"), None);
    }

    #[test]
    fn test_memory_cache_expiry() {
        let cache = MemoryCache::new(Duration::from_millis(0), 8);
        cache.put("emma:hello", "Hi!");
        assert_eq!(cache.get("emma:hello"), None);
    }

    #[test]
    fn test_memory_cache_overwrite() {
        let cache = MemoryCache::new(Duration::from_secs(60), 8);
        cache.put("emma:hello", "first");
        cache.put("emma:hello", "second");
        assert_eq!(cache.get("emma:hello"), Some("second".to_string()));
    }

    #[test]
    fn test_memory_cache_bounded() {
        let cache = MemoryCache::new(Duration::from_secs(60), 2);
        cache.put("k1", "v1");
        cache.put("k2", "v2");
        cache.put("k3", "v3");
        assert!(cache.len() <= 2);
        assert_eq!(cache.get("k3"), Some("v3".to_string()));
    }

    #[test]
    fn test_sqlite_cache_roundtrip() {
        let dir = tempdir().unwrap();
        let cache =
            SqliteCache::new_with_path(dir.path().join("cache.db"), Duration::from_secs(60))
                .unwrap();
        cache.put("sophia:hello", "Greetings!");
        assert_eq!(cache.get("sophia:hello"), Some("Greetings!".to_string()));
    }

    #[test]
    fn test_sqlite_cache_miss() {
        let dir = tempdir().unwrap();
        let cache =
            SqliteCache::new_with_path(dir.path().join("cache.db"), Duration::from_secs(60))
                .unwrap();
        assert_eq!(cache.get("sophia:unknown"), None);
    }

    #[test]
    fn test_sqlite_cache_expiry() {
        let dir = tempdir().unwrap();
        let cache =
            SqliteCache::new_with_path(dir.path().join("cache.db"), Duration::from_secs(0))
                .unwrap();
        cache.put("sophia:hello", "Greetings!");
        assert_eq!(cache.get("sophia:hello"), None);
    }

    #[test]
    fn test_sqlite_cache_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");
        {
            let cache = SqliteCache::new_with_path(&path, Duration::from_secs(60)).unwrap();
            cache.put("luna:hi", "Moonlight!");
        }
        let cache = SqliteCache::new_with_path(&path, Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("luna:hi"), Some("Moonlight!".to_string()));
    }
}
