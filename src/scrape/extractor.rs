//! Reading one day's forecast off the rendered page
//!
//! The weekly strip holds one `.weekly-column` per day, today first:
//!
//! ```text
//! <div class="weekly-column">
//!   <div class="date">Quarta, 18</div>
//!   <img class="weatherImg" title="Céu pouco nublado" />
//!   <span class="tempMin">19°</span> <span class="tempMax">34°</span>
//!   <div class="windDir">W</div>
//!   <div class="precProb">0% ...</div>
//!   <img class="iuvImg" title="IUV: 8" />
//! </div>
//! ```

use std::time::Duration;

use super::page;
use super::session::{AutomationSession, Condition, ElementHandle, Locator};
use crate::config::ScraperConfig;
use crate::data::{DayIndex, ForecastRecord};
use crate::error::{ForecastError, SessionError};

/// Extracts a `ForecastRecord` for one day column
#[derive(Debug, Clone)]
pub struct DayExtractor {
    extraction_timeout: Duration,
}

impl DayExtractor {
    pub fn new(extraction_timeout: Duration) -> Self {
        Self { extraction_timeout }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.extraction_timeout)
    }

    /// Reads the forecast for `day_index` from the session's current page
    ///
    /// Fails when the columns never render, when fewer columns than
    /// `day_index + 1` are shown, or when a mandatory field is unreadable.
    /// The UV index and the selected-location echo are optional.
    pub async fn extract(
        &self,
        session: &dyn AutomationSession,
        day_index: DayIndex,
    ) -> Result<ForecastRecord, ForecastError> {
        session
            .wait_until(Condition::PresenceOf(page::DAY_COLUMNS), self.extraction_timeout)
            .await
            .map_err(|_| ForecastError::ExtractionTimeout {
                seconds: self.extraction_timeout.as_secs(),
            })?;

        let mut columns = session
            .find_elements(page::DAY_COLUMNS)
            .await
            .map_err(|source| ForecastError::FieldUnreadable {
                field: "weekly-column",
                source,
            })?;

        let rendered = columns.len();
        if day_index.get() >= rendered {
            return Err(ForecastError::DayIndexOutOfRange {
                index: day_index.get(),
                rendered,
            });
        }
        let day = columns.swap_remove(day_index.get());

        let date = read_text(day.as_ref(), page::DATE).await?;
        let temp_min = read_text(day.as_ref(), page::TEMP_MIN).await?;
        let temp_max = read_text(day.as_ref(), page::TEMP_MAX).await?;
        let weather_description = read_title(day.as_ref(), page::WEATHER_ICON).await?;
        let precipitation_probability = read_text(day.as_ref(), page::PRECIPITATION).await?;
        let wind_direction = read_text(day.as_ref(), page::WIND_DIRECTION).await?;

        let uv_index = read_title(day.as_ref(), page::UV_ICON).await.ok();

        // Echo of what the page actually shows, in case resolution landed elsewhere
        let (district_selected, city_selected) = match selected_location(session).await {
            Ok((district, city)) => (Some(district), Some(city)),
            Err(e) => {
                tracing::debug!(error = %e, "Could not read the selected location");
                (None, None)
            }
        };

        tracing::info!(day_index = %day_index, date = %date, "Extracted forecast day");
        Ok(ForecastRecord {
            district_selected,
            city_selected,
            date,
            temp_min,
            temp_max,
            weather_description,
            precipitation_probability,
            wind_direction,
            uv_index,
        })
    }
}

fn field_name(locator: Locator) -> &'static str {
    match locator {
        Locator::Id(name) | Locator::Css(name) | Locator::ClassName(name) => name,
    }
}

async fn read_text(day: &dyn ElementHandle, locator: Locator) -> Result<String, ForecastError> {
    let unreadable = |source| ForecastError::FieldUnreadable {
        field: field_name(locator),
        source,
    };
    let element = day.find_element(locator).await.map_err(unreadable)?;
    let text = element.text().await.map_err(unreadable)?;
    Ok(text.trim().to_string())
}

/// `title` attribute of an icon; an icon without one counts as unreadable
async fn read_title(day: &dyn ElementHandle, locator: Locator) -> Result<String, ForecastError> {
    let unreadable = |source| ForecastError::FieldUnreadable {
        field: field_name(locator),
        source,
    };
    let element = day.find_element(locator).await.map_err(unreadable)?;
    element
        .attribute(page::TITLE_ATTR)
        .await
        .map_err(unreadable)?
        .ok_or_else(|| unreadable(SessionError::NoSuchElement(format!("{}[title]", locator))))
}

async fn selected_location(session: &dyn AutomationSession) -> Result<(String, String), SessionError> {
    let district = session
        .find_element(page::DISTRICT_SELECT)
        .await?
        .first_selected_option_text()
        .await?;
    let city = session
        .find_element(page::CITY_SELECT)
        .await?
        .first_selected_option_text()
        .await?;
    Ok((district, city))
}
