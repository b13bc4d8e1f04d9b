//! IPMA forecast CLI - fetch one day of the IPMA 10-day forecast
//!
//! Validates the request, then scrapes the forecast page through a remote
//! WebDriver browser (or serves it from cache) and prints the
//! `{"forecast": ..., "used_cache": ...}` envelope as JSON.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ipma_forecast::cache::{CacheManager, ForecastCache, MemoryCache};
use ipma_forecast::cli::Cli;
use ipma_forecast::scrape::WebDriverFactory;
use ipma_forecast::ForecastService;

/// Logs go to stderr so stdout stays parseable JSON
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn open_cache(cli: &Cli) -> Arc<dyn ForecastCache> {
    let manager = match &cli.cache_dir {
        Some(dir) => Some(CacheManager::with_dir(dir.clone())),
        None => CacheManager::new(),
    };
    match manager {
        Some(manager) => Arc::new(manager),
        None => {
            tracing::warn!("No cache directory available, caching in memory only");
            Arc::new(MemoryCache::new())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let query = match cli.query() {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let config = cli.scraper_config();
    let service = ForecastService::new(
        &config,
        open_cache(&cli),
        Arc::new(WebDriverFactory::from_config(&config)),
    );

    let response = match service.respond(&query).await {
        Ok(response) => response,
        Err(e) => {
            let detail = serde_json::json!({ "detail": format!("Exception triggered, error: {}", e) });
            eprintln!("{}", detail);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to encode response: {}", e);
            ExitCode::FAILURE
        }
    }
}
