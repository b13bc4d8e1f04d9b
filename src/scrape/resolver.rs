//! Bringing the forecast page onto the requested location

use std::time::Duration;

use super::page;
use super::session::{AutomationSession, Condition, ElementHandle};
use crate::config::ScraperConfig;
use crate::data::{Location, LocationStrategy};
use crate::error::{ForecastError, SessionError};

/// Builds `base#district&city`
///
/// District and city go in verbatim; the site's client-side router reads
/// them back from the raw fragment. A `#` or `&` inside either name would
/// shift that split, so such names are refused.
pub fn fragment_url(base_url: &str, location: &Location) -> Result<String, ForecastError> {
    for (field, value) in [("district", &location.district), ("city", &location.city)] {
        if value.contains(['#', '&']) {
            return Err(ForecastError::ReservedCharacter {
                field,
                value: value.clone(),
            });
        }
    }
    Ok(format!("{}#{}&{}", base_url, location.district, location.city))
}

/// Puts a session's page on a district/city using one of two strategies
#[derive(Debug, Clone)]
pub struct LocationResolver {
    base_url: String,
    location_timeout: Duration,
}

impl LocationResolver {
    pub fn new(base_url: impl Into<String>, location_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            location_timeout,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.base_url.clone(), config.location_timeout)
    }

    /// Loads the page and selects `location` on it
    ///
    /// Returns an error only when no page could be loaded. With the selection
    /// strategy a missing option or control is logged and the page is left as
    /// it is, so extraction can still read whatever location it shows.
    pub async fn resolve(
        &self,
        session: &mut dyn AutomationSession,
        location: &Location,
        strategy: LocationStrategy,
    ) -> Result<(), ForecastError> {
        match strategy {
            LocationStrategy::Fragment => {
                let url = fragment_url(&self.base_url, location)?;
                navigate(session, &url).await
            }
            LocationStrategy::Selection => {
                navigate(session, &self.base_url).await?;
                match self.select_location(&*session, location).await {
                    Ok(()) => {}
                    Err(e @ (ForecastError::DistrictNotFound(_) | ForecastError::CityNotFound { .. })) => {
                        tracing::warn!(
                            district = %location.district,
                            city = %location.city,
                            "{}", e
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            district = %location.district,
                            city = %location.city,
                            error = %e,
                            "Location selection failed"
                        );
                    }
                }
                Ok(())
            }
        }
    }

    async fn select_location(
        &self,
        session: &dyn AutomationSession,
        location: &Location,
    ) -> Result<(), ForecastError> {
        // The dropdowns are rendered by script after the document loads
        session
            .wait_until(Condition::PresenceOf(page::DISTRICT_SELECT), self.location_timeout)
            .await
            .map_err(control_error("district"))?;

        let district_select = session
            .find_element(page::DISTRICT_SELECT)
            .await
            .map_err(control_error("district"))?;

        let districts = option_labels(district_select.as_ref())
            .await
            .map_err(control_error("district"))?;
        tracing::debug!(?districts, "Available districts");

        if !districts.iter().any(|d| *d == location.district) {
            return Err(ForecastError::DistrictNotFound(location.district.clone()));
        }

        tracing::info!(district = %location.district, "Selecting district");
        district_select
            .select_by_visible_text(&location.district)
            .await
            .map_err(control_error("district"))?;

        session
            .wait_until(Condition::PresenceOf(page::CITY_SELECT), self.location_timeout)
            .await
            .map_err(control_error("locations"))?;

        if location.city.is_empty() {
            return Ok(());
        }

        let city_select = session
            .find_element(page::CITY_SELECT)
            .await
            .map_err(control_error("locations"))?;

        let cities = option_labels(city_select.as_ref())
            .await
            .map_err(control_error("locations"))?;
        tracing::debug!(?cities, "Available cities");

        let Some(matched) = match_city(&cities, &location.city) else {
            return Err(ForecastError::CityNotFound {
                district: location.district.clone(),
                city: location.city.clone(),
            });
        };

        tracing::info!(city = %matched, "Selecting city");
        city_select
            .select_by_visible_text(matched)
            .await
            .map_err(control_error("locations"))
    }
}

async fn navigate(session: &mut dyn AutomationSession, url: &str) -> Result<(), ForecastError> {
    tracing::debug!(url, "Navigating");
    session
        .navigate(url)
        .await
        .map_err(|source| ForecastError::Navigation {
            url: url.to_string(),
            source,
        })
}

/// Option labels with surrounding whitespace removed
async fn option_labels(select: &dyn ElementHandle) -> Result<Vec<String>, SessionError> {
    Ok(select
        .options()
        .await?
        .into_iter()
        .map(|label| label.trim().to_string())
        .collect())
}

/// First option equal to `city` ignoring case, as the page spells it
fn match_city<'a>(options: &'a [String], city: &str) -> Option<&'a str> {
    let wanted = city.to_lowercase();
    options
        .iter()
        .find(|option| option.to_lowercase() == wanted)
        .map(String::as_str)
}

fn control_error(control: &'static str) -> impl Fn(SessionError) -> ForecastError {
    move |source| ForecastError::Control { control, source }
}
