//! Runtime configuration for the scraper

use std::path::PathBuf;
use std::time::Duration;

/// Forecast page whose fragment (`#district&city`) selects the location
pub const IPMA_FORECAST_URL: &str = "https://www.ipma.pt/pt/otempo/prev.localidade.hora";

/// Default remote WebDriver endpoint (a Selenium standalone/hub container)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Settings shared by the resolver, extractor and orchestrator
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Page the location is resolved on
    pub base_url: String,
    /// WebDriver server used to open browser sessions
    pub webdriver_url: String,
    /// Run the browser without a display
    pub headless: bool,
    /// Wait for the city dropdown after picking a district
    pub location_timeout: Duration,
    /// Wait for the forecast day columns to render
    pub extraction_timeout: Duration,
    /// How often waits re-check their condition
    pub poll_interval: Duration,
    /// Lifetime of a cached forecast record
    pub cache_ttl: Duration,
    /// Directory for the on-disk cache; `None` uses the XDG cache dir
    pub cache_dir: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: IPMA_FORECAST_URL.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            location_timeout: Duration::from_secs(5),
            extraction_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            cache_ttl: Duration::from_secs(900), // 15 minutes
            cache_dir: None,
        }
    }
}
