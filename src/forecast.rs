//! Forecast acquisition
//!
//! `ForecastService` ties the pipeline together: cache lookup, one browser
//! session per scrape, location resolution, day extraction and cache
//! write-through. Scraping failures never surface as errors; they are logged
//! and the acquisition yields `None`.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{forecast_key, ForecastCache};
use crate::config::ScraperConfig;
use crate::data::{ForecastQuery, ForecastRecord, ForecastResponse};
use crate::error::{CacheError, ForecastError};
use crate::scrape::{AutomationSession, DayExtractor, LocationResolver, SessionFactory};

/// Fetches forecast records, from cache or by scraping the site
pub struct ForecastService {
    cache: Arc<dyn ForecastCache>,
    sessions: Arc<dyn SessionFactory>,
    resolver: LocationResolver,
    extractor: DayExtractor,
    cache_ttl: Duration,
}

impl ForecastService {
    pub fn new(
        config: &ScraperConfig,
        cache: Arc<dyn ForecastCache>,
        sessions: Arc<dyn SessionFactory>,
    ) -> Self {
        Self {
            cache,
            sessions,
            resolver: LocationResolver::from_config(config),
            extractor: DayExtractor::from_config(config),
            cache_ttl: config.cache_ttl,
        }
    }

    /// Returns the forecast for `query`, or `None` when it could not be scraped
    ///
    /// With `use_cache` set, a fresh cached record is returned without opening
    /// a browser session. Every successful scrape is written to the cache,
    /// whether or not the caller asked to read from it.
    ///
    /// # Errors
    /// Only a cache store that cannot be read; scraping failures are logged
    /// and reported as `Ok(None)`.
    pub async fn acquire(&self, query: &ForecastQuery) -> Result<Option<ForecastRecord>, CacheError> {
        let key = forecast_key(&query.location, query.day_index);

        if query.use_cache {
            if let Some(record) = self.cache.get(&key)? {
                tracing::info!(key = %key, "Serving forecast from cache");
                return Ok(Some(record));
            }
            tracing::debug!(key = %key, "Cache miss");
        }

        let record = self.scrape(query).await;

        if let Some(record) = &record {
            if let Err(e) = self.cache.set(&key, record, self.cache_ttl) {
                tracing::warn!(key = %key, error = %e, "Failed to cache forecast");
            }
        }

        Ok(record)
    }

    /// Wraps `acquire` in the response envelope
    pub async fn respond(&self, query: &ForecastQuery) -> Result<ForecastResponse, CacheError> {
        Ok(ForecastResponse {
            forecast: self.acquire(query).await?,
            used_cache: query.use_cache,
        })
    }

    /// Runs one scrape on a dedicated session and always closes it
    async fn scrape(&self, query: &ForecastQuery) -> Option<ForecastRecord> {
        let mut session = match self.sessions.open().await {
            Ok(session) => session,
            Err(e) => {
                let e = ForecastError::SessionAcquisition(e);
                tracing::error!(
                    district = %query.location.district,
                    city = %query.location.city,
                    error = %e,
                    "Forecast acquisition failed"
                );
                return None;
            }
        };

        let outcome = self.fetch(session.as_mut(), query).await;

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Cleanup failed, could not close browser session");
        }

        match outcome {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(
                    district = %query.location.district,
                    city = %query.location.city,
                    day_index = %query.day_index,
                    error = %e,
                    "Forecast acquisition failed"
                );
                None
            }
        }
    }

    async fn fetch(
        &self,
        session: &mut dyn AutomationSession,
        query: &ForecastQuery,
    ) -> Result<ForecastRecord, ForecastError> {
        self.resolver
            .resolve(session, &query.location, query.strategy)
            .await?;
        self.extractor.extract(&*session, query.day_index).await
    }
}
