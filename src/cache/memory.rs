//! In-process forecast cache

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::ForecastCache;
use crate::data::ForecastRecord;
use crate::error::CacheError;

/// TTL map held in memory, shared by every acquisition in the process
///
/// Expired entries are dropped when they are next read and swept on every write.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (ForecastRecord, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ForecastCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<ForecastRecord>, CacheError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((record, expires_at)) if Instant::now() < *expires_at => Ok(Some(record.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, record: &ForecastRecord, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        let mut entries = self.entries.lock();
        entries.retain(|_, (_, expires)| now < *expires);
        entries.insert(key.to_string(), (record.clone(), expires_at));
        Ok(())
    }
}
