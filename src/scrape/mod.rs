//! Scraping the IPMA forecast page
//!
//! `LocationResolver` puts the page on the requested district/city and
//! `DayExtractor` reads one day column from it. Both work against the
//! `AutomationSession` port; `webdriver` supplies the real browser.

mod extractor;
mod resolver;
pub mod session;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use extractor::DayExtractor;
pub use resolver::{fragment_url, LocationResolver};
pub use session::{AutomationSession, Condition, ElementHandle, Locator, SessionFactory};
pub use webdriver::{WebDriverFactory, WebDriverSession};

/// Element locators for the forecast page layout
pub(crate) mod page {
    use super::Locator;

    /// District `<select>`
    pub const DISTRICT_SELECT: Locator = Locator::Id("district");
    /// City/locality `<select>`, filled after a district is picked
    pub const CITY_SELECT: Locator = Locator::Id("locations");
    /// One column per forecast day, today first
    pub const DAY_COLUMNS: Locator = Locator::Css("#weekly .weekly-column");

    pub const DATE: Locator = Locator::ClassName("date");
    pub const TEMP_MIN: Locator = Locator::ClassName("tempMin");
    pub const TEMP_MAX: Locator = Locator::ClassName("tempMax");
    /// Weather icon; the description is in its `title`
    pub const WEATHER_ICON: Locator = Locator::ClassName("weatherImg");
    pub const PRECIPITATION: Locator = Locator::ClassName("precProb");
    pub const WIND_DIRECTION: Locator = Locator::ClassName("windDir");
    /// UV icon; the index label is in its `title`
    pub const UV_ICON: Locator = Locator::ClassName("iuvImg");

    pub const TITLE_ATTR: &str = "title";
}
