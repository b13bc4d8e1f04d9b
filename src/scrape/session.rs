//! Browser automation ports
//!
//! The resolver and extractor only talk to these traits. A concrete driver
//! (see `webdriver`) adapts its own element and session types to them.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::error::SessionError;

/// How to find an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// `id` attribute
    Id(&'static str),
    /// CSS selector
    Css(&'static str),
    /// Single class name
    ClassName(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{}", id),
            Locator::Css(css) => write!(f, "{}", css),
            Locator::ClassName(class) => write!(f, ".{}", class),
        }
    }
}

/// Condition a session can block on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// At least one element matches the locator
    PresenceOf(Locator),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::PresenceOf(locator) => write!(f, "presence of {}", locator),
        }
    }
}

/// A rendered element the scraper can read from or interact with
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Visible text, as rendered
    async fn text(&self) -> Result<String, SessionError>;

    /// Attribute value, `None` when the attribute is absent
    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError>;

    /// First descendant matching the locator
    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError>;

    /// Visible labels of a select control's options, in page order
    async fn options(&self) -> Result<Vec<String>, SessionError>;

    /// Selects the option whose visible label equals `text`
    async fn select_by_visible_text(&self, text: &str) -> Result<(), SessionError>;

    /// Visible label of the currently selected option
    async fn first_selected_option_text(&self) -> Result<String, SessionError>;
}

/// A live browser context owned by one acquisition
#[async_trait]
pub trait AutomationSession: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    async fn find_element(&self, locator: Locator) -> Result<Box<dyn ElementHandle>, SessionError>;

    /// All matching elements in document order; empty when none match
    async fn find_elements(&self, locator: Locator) -> Result<Vec<Box<dyn ElementHandle>>, SessionError>;

    /// Blocks until `condition` holds, failing with `SessionError::Timeout` after `timeout`
    async fn wait_until(&self, condition: Condition, timeout: Duration) -> Result<(), SessionError>;

    /// Ends the browser session
    async fn close(self: Box<Self>) -> Result<(), SessionError>;
}

/// Opens a fresh automation session per acquisition
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn AutomationSession>, SessionError>;
}
