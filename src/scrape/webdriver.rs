//! WebDriver-backed automation session
//!
//! Talks to a remote WebDriver server (e.g. a `selenium/standalone-chrome`
//! container) through `thirtyfour`. Nothing outside this module sees a
//! `thirtyfour` type.

use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

use super::session::{AutomationSession, Condition, ElementHandle, Locator, SessionFactory};
use crate::config::ScraperConfig;
use crate::error::SessionError;

/// Chrome flags for running inside a container
const CHROME_ARGS: [&str; 6] = [
    "--disable-gpu",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--no-default-browser-check",
    "--no-first-run",
    "--disable-fre",
];

fn driver_error(e: WebDriverError) -> SessionError {
    SessionError::Driver(e.to_string())
}

/// Keeps "no such element" apart from session-level driver failures
fn find_error(locator: Locator) -> impl Fn(WebDriverError) -> SessionError {
    move |e| match e {
        WebDriverError::NoSuchElement(_) => SessionError::NoSuchElement(locator.to_string()),
        e => driver_error(e),
    }
}

fn by(locator: Locator) -> By {
    match locator {
        Locator::Id(id) => By::Id(id),
        Locator::Css(css) => By::Css(css),
        Locator::ClassName(class) => By::ClassName(class),
    }
}

/// Opens Chrome sessions on a remote WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    server_url: String,
    headless: bool,
    poll_interval: Duration,
}

impl WebDriverFactory {
    pub fn new(server_url: impl Into<String>, headless: bool) -> Self {
        Self {
            server_url: server_url.into(),
            headless,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            server_url: config.webdriver_url.clone(),
            headless: config.headless,
            poll_interval: config.poll_interval,
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    async fn open(&self) -> Result<Box<dyn AutomationSession>, SessionError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless().map_err(driver_error)?;
        }
        for arg in CHROME_ARGS {
            caps.add_chrome_arg(arg).map_err(driver_error)?;
        }

        let driver = WebDriver::new(self.server_url.as_str(), caps)
            .await
            .map_err(driver_error)?;
        tracing::info!(server = %self.server_url, "WebDriver session started");
        Ok(Box::new(WebDriverSession {
            driver,
            poll_interval: self.poll_interval,
        }))
    }
}

/// One browser session on the WebDriver server
pub struct WebDriverSession {
    driver: WebDriver,
    poll_interval: Duration,
}

#[async_trait]
impl AutomationSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await.map_err(driver_error)
    }

    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError> {
        let element = self
            .driver
            .find(by(locator))
            .await
            .map_err(find_error(locator))?;
        Ok(Box::new(WebDriverElement { element }))
    }

    async fn find_elements(&self, locator: Locator) -> Result<Vec<Box<dyn ElementHandle>>, SessionError> {
        let elements = self.driver.find_all(by(locator)).await.map_err(driver_error)?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(WebDriverElement { element }) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn wait_until(&self, condition: Condition, timeout: Duration) -> Result<(), SessionError> {
        let Condition::PresenceOf(locator) = condition;
        self.driver
            .query(by(locator))
            .wait(timeout, self.poll_interval)
            .first()
            .await
            .map(|_| ())
            .map_err(|_| SessionError::Timeout {
                condition: condition.to_string(),
                seconds: timeout.as_secs(),
            })
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        tracing::debug!("Closing browser session");
        let session = *self;
        session.driver.quit().await.map_err(driver_error)
    }
}

struct WebDriverElement {
    element: WebElement,
}

impl WebDriverElement {
    async fn select(&self) -> Result<SelectElement, SessionError> {
        SelectElement::new(&self.element)
            .await
            .map_err(|e| SessionError::NotSelectable(e.to_string()))
    }
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn text(&self) -> Result<String, SessionError> {
        self.element.text().await.map_err(driver_error)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.element.attr(name).await.map_err(driver_error)
    }

    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError> {
        let element = self
            .element
            .find(by(locator))
            .await
            .map_err(find_error(locator))?;
        Ok(Box::new(WebDriverElement { element }))
    }

    async fn options(&self) -> Result<Vec<String>, SessionError> {
        let select = self.select().await?;
        let options = select.options().await.map_err(driver_error)?;
        let mut labels = Vec::with_capacity(options.len());
        for option in options {
            labels.push(option.text().await.map_err(driver_error)?);
        }
        Ok(labels)
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<(), SessionError> {
        self.select()
            .await?
            .select_by_visible_text(text)
            .await
            .map_err(driver_error)
    }

    async fn first_selected_option_text(&self) -> Result<String, SessionError> {
        let option = self
            .select()
            .await?
            .first_selected_option()
            .await
            .map_err(driver_error)?;
        option.text().await.map_err(driver_error)
    }
}
