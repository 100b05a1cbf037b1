use crate::{CdpPage, ChromeFinder, Error, ProfileManager, Result};
use async_trait::async_trait;
use canary_core::{Page, PageFactory};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How to start the browser for a smoke run
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit Chrome binary; searched for when `None`
    pub chrome_path: Option<PathBuf>,
    /// Named persistent profile; a temporary profile when `None`
    pub profile: Option<String>,
    pub headless: bool,
    /// Chrome's sandbox usually has to be disabled inside containers
    pub sandbox: bool,
    pub window_size: (u32, u32),
    /// Timeout for individual CDP requests
    pub request_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            profile: None,
            headless: true,
            sandbox: true,
            window_size: (1280, 720),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl LaunchOptions {
    fn browser_config(&self, chrome: PathBuf, profile: &ProfileManager) -> Result<BrowserConfig> {
        let (width, height) = self.window_size;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome)
            .user_data_dir(profile.path())
            .window_size(width, height)
            .request_timeout(self.request_timeout)
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !self.headless {
            builder = builder.with_head();
        }
        if !self.sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(Error::Browser)
    }
}

/// A running browser that hands out one fresh tab per scenario
pub struct BrowserSession {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
    profile: ProfileManager,
}

impl BrowserSession {
    /// Locate Chrome, prepare the profile and launch the browser
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let chrome = ChromeFinder::new(options.chrome_path.clone()).find()?;
        tracing::info!("Using Chrome at {}", chrome.display());

        let profile = match options.profile.as_deref() {
            Some(name) => ProfileManager::named(name)?,
            None => ProfileManager::temporary()?,
        };
        tracing::debug!("Chrome profile: {}", profile.path().display());

        let config = options.browser_config(chrome, &profile)?;
        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler drives the CDP connection; nothing resolves unless it is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        tracing::info!(
            "Browser launched ({})",
            if options.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task,
            profile,
        })
    }

    /// Whether the session uses a throwaway profile
    pub fn uses_temporary_profile(&self) -> bool {
        self.profile.is_temporary()
    }

    /// Shut the browser down and remove a temporary profile
    pub async fn close(self) -> Result<()> {
        let mut browser = self.browser.into_inner();
        let closed = match browser.close().await {
            Ok(_) => {
                if let Err(e) = browser.wait().await {
                    tracing::debug!("Waiting for Chrome to exit failed: {}", e);
                }
                Ok(())
            }
            Err(e) => Err(Error::from(e)),
        };
        stop_handler(&self.handler_task, closed)?;
        tracing::info!("Browser closed");
        Ok(())
    }
}

/// Stop the CDP handler whether or not the browser closed cleanly
fn stop_handler(handler_task: &JoinHandle<()>, closed: Result<()>) -> Result<()> {
    handler_task.abort();
    closed
}

#[async_trait]
impl PageFactory for BrowserSession {
    async fn open_page(&self) -> canary_core::Result<Box<dyn Page>> {
        let browser = self.browser.lock().await;
        let page = CdpPage::open(&browser).await?;
        Ok(Box::new(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_launch_options_are_headless_and_sandboxed() {
        let options = LaunchOptions::default();

        assert!(options.headless);
        assert!(options.sandbox);
        assert!(options.chrome_path.is_none());
        assert!(options.profile.is_none());
    }

    #[test]
    fn test_browser_config_builds_with_explicit_executable() {
        let options = LaunchOptions {
            sandbox: false,
            ..LaunchOptions::default()
        };
        let profile = ProfileManager::temporary().unwrap();

        let config = options.browser_config(PathBuf::from("/usr/bin/chromium"), &profile);

        assert!(config.is_ok());
    }

    #[tokio::test]
    async fn test_failed_close_still_stops_handler() {
        let handler = tokio::spawn(futures::future::pending::<()>());

        let result = stop_handler(&handler, Err(Error::Browser("connection reset".to_string())));

        assert!(result.is_err());
        assert!(handler.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_launch_fails_without_chrome() {
        let options = LaunchOptions {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
            ..LaunchOptions::default()
        };

        let err = BrowserSession::launch(options).await.err().unwrap();

        assert!(err.to_string().contains("Chrome not found"));
    }
}
