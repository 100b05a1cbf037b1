use crate::{Error, NetworkTracker, Result};
use async_trait::async_trait;
use canary_core::{NetworkActivity, Page};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page as Tab;
use futures::StreamExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use url::Url;

/// One browser tab driven over CDP.
///
/// Network events are consumed by a background task feeding a
/// [`NetworkTracker`]. Dropping an unclosed page schedules the tab's close on
/// the current runtime, so a cancelled scenario still releases its target.
pub struct CdpPage {
    tab: Option<Tab>,
    tracker: Arc<Mutex<NetworkTracker>>,
    listener: JoinHandle<()>,
}

impl CdpPage {
    /// Open a blank tab and start tracking its network activity
    pub async fn open(browser: &Browser) -> Result<Self> {
        let tab = browser.new_page("about:blank").await?;

        tab.execute(EnableParams::default()).await?;

        let mut started = tab.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = tab.event_listener::<EventLoadingFinished>().await?;
        let mut failed = tab.event_listener::<EventLoadingFailed>().await?;

        let tracker = Arc::new(Mutex::new(NetworkTracker::new()));
        let events = Arc::clone(&tracker);

        let listener = tokio::spawn(async move {
            loop {
                // Events arrive in order on one connection; draining starts
                // first keeps a start ahead of its own finish
                tokio::select! {
                    biased;
                    Some(event) = started.next() => {
                        tracing::debug!("Request: {} {}", event.request.method, event.request.url);
                        lock(&events).request_started(event.request_id.inner());
                    }
                    Some(event) = finished.next() => {
                        tracing::debug!("Loading finished: {}", event.request_id.inner());
                        lock(&events).request_settled(event.request_id.inner());
                    }
                    Some(event) = failed.next() => {
                        tracing::debug!("Loading failed: {} ({})", event.request_id.inner(), event.error_text);
                        lock(&events).request_settled(event.request_id.inner());
                    }
                    else => break,
                }
            }
        });

        Ok(Self {
            tab: Some(tab),
            tracker,
            listener,
        })
    }

    fn tab(&self) -> Result<&Tab> {
        self.tab
            .as_ref()
            .ok_or_else(|| Error::Browser("page is already closed".to_string()))
    }

    /// Distinct requests seen since the tab opened
    pub fn request_count(&self) -> usize {
        lock(&self.tracker).total()
    }
}

fn lock(tracker: &Mutex<NetworkTracker>) -> MutexGuard<'_, NetworkTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// DOM check mirroring what a user can see: the element exists, has a
/// non-empty box, and is not hidden through CSS.
fn visibility_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector).map_err(|e| Error::Cdp(e.to_string()))?;
    Ok(format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) return false;
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}})()"#
    ))
}

#[async_trait]
impl Page for CdpPage {
    async fn navigate(&mut self, url: &Url) -> canary_core::Result<()> {
        let tab = self.tab()?;
        tab.goto(url.as_str()).await.map_err(|e| Error::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!("Navigation committed: {}", url);
        Ok(())
    }

    async fn title(&self) -> canary_core::Result<String> {
        let title = self.tab()?.get_title().await.map_err(Error::from)?;
        Ok(title.unwrap_or_default())
    }

    async fn is_visible(&self, selector: &str) -> canary_core::Result<bool> {
        let script = visibility_script(selector)?;
        let result = self.tab()?.evaluate(script).await.map_err(Error::from)?;
        let visible = result
            .into_value::<bool>()
            .map_err(|e| Error::Cdp(format!("unexpected visibility result: {}", e)))?;
        Ok(visible)
    }

    fn network_activity(&self) -> NetworkActivity {
        lock(&self.tracker).snapshot()
    }

    async fn close(&mut self) -> canary_core::Result<()> {
        self.listener.abort();
        if let Some(tab) = self.tab.take() {
            tracing::debug!("Closing page after {} request(s)", self.request_count());
            tab.close().await.map_err(Error::from)?;
        }
        Ok(())
    }
}

impl Drop for CdpPage {
    fn drop(&mut self) {
        self.listener.abort();
        if let Some(tab) = self.tab.take() {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move {
                    if let Err(e) = tab.close().await {
                        tracing::debug!("Failed to close abandoned page: {}", e);
                    }
                });
            }
        }
    }
}
