//! Automation capability consumed by the smoke checker.
//!
//! A [`Page`] represents one browser tab. The checker never shares a page
//! between scenarios: every scenario asks the [`PageFactory`] for a fresh one
//! and closes it when done.

use crate::Result;
use crate::wait::poll_until;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use url::Url;

/// Snapshot of a page's network state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkActivity {
    /// Requests opened but not yet finished or failed
    pub in_flight: usize,
    /// When a request was last opened or settled
    pub last_change: Instant,
}

impl NetworkActivity {
    pub fn new(in_flight: usize, last_change: Instant) -> Self {
        Self {
            in_flight,
            last_change,
        }
    }

    /// True when nothing is in flight and nothing changed for `quiet`
    pub fn is_idle_for(&self, quiet: Duration, now: Instant) -> bool {
        self.in_flight == 0 && now.saturating_duration_since(self.last_change) >= quiet
    }
}

/// Readiness conditions a scenario can wait on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadyCondition {
    /// No network connections for at least `quiet`
    NetworkIdle { quiet: Duration },
}

#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to `url`, resolving once the navigation has committed
    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Current document title; empty when the document has none
    async fn title(&self) -> Result<String>;

    /// Whether an element matching `selector` exists and is rendered visibly
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    fn network_activity(&self) -> NetworkActivity;

    /// Release the underlying tab/session
    async fn close(&mut self) -> Result<()>;
}

/// Source of fresh, independent pages
#[async_trait]
pub trait PageFactory: Send + Sync {
    async fn open_page(&self) -> Result<Box<dyn Page>>;
}

/// Lazy handle to an element, resolved on every probe
pub struct Locator<'a> {
    page: &'a dyn Page,
    selector: String,
}

impl<'a> Locator<'a> {
    pub fn new(page: &'a dyn Page, selector: impl Into<String>) -> Self {
        Self {
            page,
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Wait until the element is visible. `Ok(false)` means the timeout elapsed.
    pub async fn wait_visible(&self, timeout: Duration, interval: Duration) -> Result<bool> {
        let page = self.page;
        let selector = self.selector.as_str();
        poll_until(timeout, interval, move || page.is_visible(selector)).await
    }
}
