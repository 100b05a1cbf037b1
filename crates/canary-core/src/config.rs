//! Smoke check configuration.
//!
//! Configuration is plain JSON. Every field is optional in the file; missing
//! fields keep their defaults. Durations are written in milliseconds:
//!
//! ```json
//! {
//!   "base_url": "http://localhost:4200/",
//!   "root_selector": "app-root",
//!   "network_idle": { "quiet_period_ms": 500, "timeout_ms": 30000 },
//!   "visibility_timeout_ms": 5000
//! }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/";
pub const DEFAULT_ROOT_SELECTOR: &str = "app-root";

/// Settings for the network-idle readiness condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkIdleConfig {
    /// How long the page must go without network activity to count as idle
    #[serde(rename = "quiet_period_ms", with = "millis")]
    pub quiet_period: Duration,

    /// Upper bound on the whole idle wait
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,
}

impl Default for NetworkIdleConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Base URL of the application under test. Scenarios load its root path.
    pub base_url: String,

    /// CSS selector of the element that must become visible
    pub root_selector: String,

    #[serde(rename = "navigation_timeout_ms", with = "millis")]
    pub navigation_timeout: Duration,

    pub network_idle: NetworkIdleConfig,

    #[serde(rename = "visibility_timeout_ms", with = "millis")]
    pub visibility_timeout: Duration,

    /// Interval between readiness probes
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,

    /// Hard limit for a whole scenario; exceeding it cancels the scenario
    #[serde(rename = "scenario_timeout_ms", with = "millis")]
    pub scenario_timeout: Duration,

    /// Run scenarios concurrently, each on its own page
    pub parallel: bool,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root_selector: DEFAULT_ROOT_SELECTOR.to_string(),
            navigation_timeout: Duration::from_secs(30),
            network_idle: NetworkIdleConfig::default(),
            visibility_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            scenario_timeout: Duration::from_secs(90),
            parallel: false,
        }
    }
}

impl SmokeConfig {
    /// Load a config file, filling missing fields with defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: SmokeConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// The page every scenario navigates to: the root path of the base URL
    pub fn target_url(&self) -> Result<Url> {
        Ok(parse_base_url(&self.base_url)?.join("/")?)
    }

    /// Longest a scenario can take while still ending in its own
    /// navigation, timeout or assertion outcome
    pub fn slowest_scenario(&self) -> Duration {
        self.navigation_timeout + self.network_idle.timeout.max(self.visibility_timeout)
    }

    /// Check the configuration before any browser work starts
    pub fn validate(&self) -> Result<()> {
        let url = self.target_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.root_selector.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "root selector must not be empty".to_string(),
            ));
        }

        let timeouts = [
            ("navigation timeout", self.navigation_timeout),
            ("network idle timeout", self.network_idle.timeout),
            ("visibility timeout", self.visibility_timeout),
            ("poll interval", self.poll_interval),
            ("scenario timeout", self.scenario_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(Error::InvalidConfig(format!("{} must be greater than zero", name)));
            }
        }

        if self.scenario_timeout <= self.slowest_scenario() {
            tracing::warn!(
                "Scenario timeout ({} ms) does not exceed navigation plus wait timeouts ({} ms); \
                 slow pages will be cancelled instead of timing out",
                self.scenario_timeout.as_millis(),
                self.slowest_scenario().as_millis()
            );
        }

        Ok(())
    }
}

/// Parse a base URL, assuming `http://` when no scheme is given
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    Ok(Url::parse(&with_scheme)?)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
