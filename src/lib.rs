//! IPMA forecast library
//!
//! Scrapes one day of the IPMA 10-day forecast for a district/city pair,
//! caching results so repeated queries skip the browser.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod scrape;

pub use forecast::ForecastService;
