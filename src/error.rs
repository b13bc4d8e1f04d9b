//! Error types for the forecast acquisition pipeline

use thiserror::Error;

/// Errors raised by an automation session or one of its elements
#[derive(Debug, Error)]
pub enum SessionError {
    /// No element matched the locator
    #[error("no element matches {0}")]
    NoSuchElement(String),

    /// A wait condition did not hold before its deadline
    #[error("timed out after {seconds}s waiting for {condition}")]
    Timeout { condition: String, seconds: u64 },

    /// The element is not a `<select>` control
    #[error("element is not a selectable control: {0}")]
    NotSelectable(String),

    /// Anything the underlying browser driver reported
    #[error("browser driver error: {0}")]
    Driver(String),
}

/// Failures inside one acquisition
///
/// None of these reach the caller of `ForecastService::acquire`; they are
/// logged where they happen and the acquisition yields no record.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("failed to open automation session: {0}")]
    SessionAcquisition(#[source] SessionError),

    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: SessionError,
    },

    /// District or city contains a character that would split the URL fragment
    #[error("{field} '{value}' contains a reserved fragment character")]
    ReservedCharacter { field: &'static str, value: String },

    #[error("district '{0}' not found among the page options")]
    DistrictNotFound(String),

    #[error("city '{city}' not found among the options for district '{district}'")]
    CityNotFound { district: String, city: String },

    /// A location control was missing or never appeared
    #[error("location control '{control}' unavailable: {source}")]
    Control {
        control: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("forecast days did not render within {seconds}s")]
    ExtractionTimeout { seconds: u64 },

    #[error("day index {index} requested but only {rendered} days rendered")]
    DayIndexOutOfRange { index: usize, rendered: usize },

    #[error("could not read mandatory field '{field}': {source}")]
    FieldUnreadable {
        field: &'static str,
        #[source]
        source: SessionError,
    },
}

/// Errors from a cache store
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}
