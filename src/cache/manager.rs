//! Cache manager for persisting forecast records to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! expiry timestamps.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use super::ForecastCache;
use crate::data::ForecastRecord;
use crate::error::CacheError;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The key the entry was written under
    key: String,
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/ipma-forecast/` on Linux). Each cache entry includes an expiry timestamp;
/// `read` still returns expired entries (with `is_expired = true`) while the
/// `ForecastCache` impl treats them as misses.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "ipma-forecast")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to a cache file for the given key
    ///
    /// Keys contain `:` and spaces, so anything outside `[A-Za-z0-9-]` is
    /// written as `%XX` to get a portable, collision-free file name.
    fn cache_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("%{:02X}", byte));
            }
        }
        name.push_str(".json");
        self.cache_dir.join(name)
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache with a specified TTL (time-to-live)
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry (e.g., "forecast:beja:cuba:0")
    /// * `data` - The data to cache (must implement Serialize)
    /// * `ttl` - How long the cache entry should be considered fresh
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            key: key.to_string(),
            data,
            cached_at: now,
            expires_at,
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    /// Reads data from the cache
    ///
    /// # Returns
    /// * `Ok(None)` if the entry doesn't exist or cannot be parsed
    /// * `Ok(Some(CachedData))` with `is_expired` set from the stored expiry
    /// * `Err` if the file exists but cannot be read
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CachedData<T>>, CacheError> {
        let content = match fs::read_to_string(self.cache_path(key)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable cache entry");
                return Ok(None);
            }
        };

        Ok(Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        }))
    }
}

impl ForecastCache for CacheManager {
    fn get(&self, key: &str) -> Result<Option<ForecastRecord>, CacheError> {
        Ok(self
            .read::<ForecastRecord>(key)?
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.data))
    }

    fn set(&self, key: &str, record: &ForecastRecord, ttl: Duration) -> Result<(), CacheError> {
        self.write(key, record, ttl)
    }
}
