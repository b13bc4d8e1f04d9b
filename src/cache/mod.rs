//! Cache stores for scraped forecast records
//!
//! Scraping a forecast means a full browser page load, so successful results
//! are kept for a fixed TTL. Two stores are provided: `CacheManager` persists
//! entries as JSON files with expiry timestamps, and `MemoryCache` keeps them
//! in process. Both sit behind the `ForecastCache` trait so the orchestrator
//! never depends on a concrete store.

mod manager;
mod memory;

pub use manager::{CacheManager, CachedData};
pub use memory::MemoryCache;

use std::time::Duration;

use crate::data::{DayIndex, ForecastRecord, Location};
use crate::error::CacheError;

/// Key/value store with per-entry TTL
///
/// `get` returns `Ok(None)` for missing and expired entries alike; only a
/// store that cannot be reached at all reports an error.
pub trait ForecastCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<ForecastRecord>, CacheError>;

    fn set(&self, key: &str, record: &ForecastRecord, ttl: Duration) -> Result<(), CacheError>;
}

/// Builds the cache key for a location and day
///
/// District and city are lowercased, so queries differing only by case share
/// one entry.
pub fn forecast_key(location: &Location, day_index: DayIndex) -> String {
    format!(
        "forecast:{}:{}:{}",
        location.district.to_lowercase(),
        location.city.to_lowercase(),
        day_index
    )
}
