//! Scripted stand-in for the IPMA page, used by unit tests
//!
//! `FakeSite` is a `SessionFactory` whose sessions all share one page state,
//! so tests can inspect navigations, selections and closes afterwards.

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::page;
use super::session::{AutomationSession, Condition, ElementHandle, Locator, SessionFactory};
use crate::error::SessionError;

#[derive(Debug, Clone)]
pub struct FakeDay {
    pub date: String,
    pub temp_min: String,
    pub temp_max: String,
    pub weather: String,
    pub precipitation: String,
    pub wind: String,
    pub uv: Option<String>,
    /// Class name of a field this column does not render
    pub missing: Option<&'static str>,
}

impl FakeDay {
    pub fn sample(offset: usize) -> Self {
        const WEEKDAYS: [&str; 7] = ["Quarta", "Quinta", "Sexta", "Sábado", "Domingo", "Segunda", "Terça"];
        Self {
            date: format!("{}, {}", WEEKDAYS[offset % 7], 18 + offset),
            temp_min: format!("{}°", 15 + offset),
            temp_max: format!("{}°", 28 + offset),
            weather: "Céu pouco nublado".to_string(),
            precipitation: format!("{}%", offset * 5),
            wind: "NW".to_string(),
            uv: Some(format!("IUV: {}", 8 - offset % 8)),
            missing: None,
        }
    }
}

#[derive(Debug)]
pub struct PageState {
    pub districts: Vec<String>,
    pub cities: HashMap<String, Vec<String>>,
    /// Location the site falls back to when the fragment is unusable
    pub default_location: (String, String),
    pub days: Vec<FakeDay>,
    pub render_days: bool,
    pub has_controls: bool,
    /// How long after a navigation the dropdowns take to render
    pub controls_delay: Duration,
    /// Whether `#locations` shows up once a district is picked
    pub city_control_appears: bool,
    pub fail_navigation: bool,
    pub fail_close: bool,

    pub loaded: bool,
    pub loaded_at: Option<Instant>,
    pub selected_district: Option<String>,
    pub selected_city: Option<String>,

    pub navigations: Vec<String>,
    pub selections: Vec<String>,
    pub closed: usize,
}

impl PageState {
    fn apply_fragment(&mut self, url: &str) {
        let requested = url
            .split_once('#')
            .and_then(|(_, fragment)| fragment.split_once('&'))
            .filter(|(district, city)| {
                self.cities
                    .get(*district)
                    .is_some_and(|cities| cities.iter().any(|c| c == *city))
            })
            .map(|(district, city)| (district.to_string(), city.to_string()));

        let (district, city) = requested.unwrap_or_else(|| self.default_location.clone());
        self.selected_district = Some(district);
        self.selected_city = Some(city);
    }

    fn city_options(&self) -> Vec<String> {
        self.selected_district
            .as_ref()
            .and_then(|d| self.cities.get(d))
            .cloned()
            .unwrap_or_default()
    }

    fn is_present(&self, locator: Locator) -> bool {
        if !self.loaded {
            return false;
        }
        match locator {
            l if l == page::DISTRICT_SELECT => self.controls_pending().is_none() && self.has_controls,
            l if l == page::CITY_SELECT => {
                self.controls_pending().is_none()
                    && self.has_controls
                    && self.city_control_appears
                    && self.selected_district.is_some()
            }
            l if l == page::DAY_COLUMNS => self.render_days && !self.days.is_empty(),
            _ => false,
        }
    }

    /// Time left until the dropdowns render, if they have not yet
    fn controls_pending(&self) -> Option<Duration> {
        let loaded_at = self.loaded_at?;
        let remaining = self.controls_delay.checked_sub(loaded_at.elapsed())?;
        (!remaining.is_zero()).then_some(remaining)
    }

    /// How long a wait for `locator` would have to sleep before it appears
    fn appears_within(&self, locator: Locator, timeout: Duration) -> Option<Duration> {
        if self.is_present(locator) {
            return Some(Duration::ZERO);
        }
        let is_control = locator == page::DISTRICT_SELECT || locator == page::CITY_SELECT;
        let pending = self.controls_pending().filter(|_| is_control && self.has_controls)?;
        if locator == page::CITY_SELECT
            && !(self.city_control_appears && self.selected_district.is_some())
        {
            return None;
        }
        (pending <= timeout).then_some(pending)
    }
}

pub struct FakeSite {
    state: Arc<Mutex<PageState>>,
    opened: AtomicUsize,
    pub fail_open: bool,
}

impl FakeSite {
    /// A page with a handful of districts, ten rendered days and working controls
    pub fn ipma() -> Self {
        let mut cities = HashMap::new();
        cities.insert("Aveiro".to_string(), vec!["Aveiro".to_string(), "Ovar".to_string()]);
        cities.insert(
            "Beja".to_string(),
            vec!["Beja".to_string(), "Cuba".to_string(), "Moura".to_string()],
        );
        cities.insert(
            "Coimbra".to_string(),
            vec!["Coimbra".to_string(), "Figueira da Foz".to_string()],
        );
        cities.insert("Lisboa".to_string(), vec!["Lisboa".to_string(), "Sintra".to_string()]);
        cities.insert("São Jorge".to_string(), vec!["Velas".to_string(), "Calheta".to_string()]);

        let state = PageState {
            districts: ["Aveiro", "Beja", "Coimbra", "Lisboa", "São Jorge"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            cities,
            default_location: ("Lisboa".to_string(), "Lisboa".to_string()),
            days: (0..10).map(FakeDay::sample).collect(),
            render_days: true,
            has_controls: true,
            controls_delay: Duration::ZERO,
            city_control_appears: true,
            fail_navigation: false,
            fail_close: false,
            loaded: false,
            loaded_at: None,
            selected_district: None,
            selected_city: None,
            navigations: Vec::new(),
            selections: Vec::new(),
            closed: 0,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            opened: AtomicUsize::new(0),
            fail_open: false,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock()
    }

    /// Sessions opened so far
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// A session without going through the factory count
    pub fn session(&self) -> FakeSession {
        FakeSession {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl SessionFactory for FakeSite {
    async fn open(&self) -> Result<Box<dyn AutomationSession>, SessionError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(SessionError::Driver("connection refused".to_string()));
        }
        Ok(Box::new(self.session()))
    }
}

pub struct FakeSession {
    state: Arc<Mutex<PageState>>,
}

#[async_trait]
impl AutomationSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.navigations.push(url.to_string());
        if state.fail_navigation {
            return Err(SessionError::Driver("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        state.loaded = true;
        state.loaded_at = Some(Instant::now());
        state.apply_fragment(url);
        Ok(())
    }

    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError> {
        let state = self.state.lock();
        if !state.is_present(locator) {
            return Err(SessionError::NoSuchElement(locator.to_string()));
        }
        let element = match locator {
            l if l == page::DISTRICT_SELECT => FakeElement::DistrictSelect(Arc::clone(&self.state)),
            l if l == page::CITY_SELECT => FakeElement::CitySelect(Arc::clone(&self.state)),
            _ => FakeElement::Day(state.days[0].clone()),
        };
        Ok(Box::new(element))
    }

    async fn find_elements(&self, locator: Locator) -> Result<Vec<Box<dyn ElementHandle>>, SessionError> {
        let state = self.state.lock();
        if locator != page::DAY_COLUMNS || !state.is_present(locator) {
            return Ok(Vec::new());
        }
        Ok(state
            .days
            .iter()
            .map(|day| Box::new(FakeElement::Day(day.clone())) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn wait_until(&self, condition: Condition, timeout: Duration) -> Result<(), SessionError> {
        let Condition::PresenceOf(locator) = condition;
        // Conditions that can never hold fail at once instead of sleeping out the timeout
        let sleep_for = self.state.lock().appears_within(locator, timeout);
        match sleep_for {
            Some(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            None => Err(SessionError::Timeout {
                condition: condition.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.closed += 1;
        if state.fail_close {
            return Err(SessionError::Driver("session already gone".to_string()));
        }
        Ok(())
    }
}

enum FakeElement {
    DistrictSelect(Arc<Mutex<PageState>>),
    CitySelect(Arc<Mutex<PageState>>),
    Day(FakeDay),
    Text(String),
    Icon(String),
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn text(&self) -> Result<String, SessionError> {
        match self {
            FakeElement::Text(text) => Ok(text.clone()),
            FakeElement::Day(day) => Ok(day.date.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        match self {
            FakeElement::Icon(title) if name == page::TITLE_ATTR => Ok(Some(title.clone())),
            _ => Ok(None),
        }
    }

    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError> {
        let FakeElement::Day(day) = self else {
            return Err(SessionError::NoSuchElement(locator.to_string()));
        };
        let Locator::ClassName(class) = locator else {
            return Err(SessionError::NoSuchElement(locator.to_string()));
        };
        if day.missing == Some(class) {
            return Err(SessionError::NoSuchElement(locator.to_string()));
        }

        // Padding mirrors the whitespace the real markup leaves around text
        let element = match locator {
            l if l == page::DATE => FakeElement::Text(format!("\n  {}  ", day.date)),
            l if l == page::TEMP_MIN => FakeElement::Text(day.temp_min.clone()),
            l if l == page::TEMP_MAX => FakeElement::Text(day.temp_max.clone()),
            l if l == page::WEATHER_ICON => FakeElement::Icon(day.weather.clone()),
            l if l == page::PRECIPITATION => FakeElement::Text(format!(" {} ", day.precipitation)),
            l if l == page::WIND_DIRECTION => FakeElement::Text(day.wind.clone()),
            l if l == page::UV_ICON => match &day.uv {
                Some(uv) => FakeElement::Icon(uv.clone()),
                None => return Err(SessionError::NoSuchElement(locator.to_string())),
            },
            _ => return Err(SessionError::NoSuchElement(locator.to_string())),
        };
        Ok(Box::new(element))
    }

    async fn options(&self) -> Result<Vec<String>, SessionError> {
        match self {
            FakeElement::DistrictSelect(state) => {
                Ok(state.lock().districts.iter().map(|d| format!(" {} ", d)).collect())
            }
            FakeElement::CitySelect(state) => Ok(state.lock().city_options()),
            _ => Err(SessionError::NotSelectable("not a select".to_string())),
        }
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<(), SessionError> {
        match self {
            FakeElement::DistrictSelect(state) => {
                let mut state = state.lock();
                if !state.districts.iter().any(|d| d == text) {
                    return Err(SessionError::NoSuchElement(format!("option '{}'", text)));
                }
                state.selections.push(text.to_string());
                state.selected_district = Some(text.to_string());
                state.selected_city = state.city_options().first().cloned();
                Ok(())
            }
            FakeElement::CitySelect(state) => {
                let mut state = state.lock();
                if !state.city_options().iter().any(|c| c == text) {
                    return Err(SessionError::NoSuchElement(format!("option '{}'", text)));
                }
                state.selections.push(text.to_string());
                state.selected_city = Some(text.to_string());
                Ok(())
            }
            _ => Err(SessionError::NotSelectable("not a select".to_string())),
        }
    }

    async fn first_selected_option_text(&self) -> Result<String, SessionError> {
        let (state, district) = match self {
            FakeElement::DistrictSelect(state) => (state, true),
            FakeElement::CitySelect(state) => (state, false),
            _ => return Err(SessionError::NotSelectable("not a select".to_string())),
        };
        let state = state.lock();
        let selected = if district {
            &state.selected_district
        } else {
            &state.selected_city
        };
        selected
            .clone()
            .ok_or_else(|| SessionError::NoSuchElement("selected option".to_string()))
    }
}

/// Shared buffer receiving formatted log lines
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's log output into a buffer until the guard drops
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}
