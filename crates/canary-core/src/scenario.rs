use crate::config::SmokeConfig;
use crate::page::{Locator, Page, ReadyCondition};
use crate::wait::wait_for_condition;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A smoke scenario: navigate, wait, assert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// The page settles and exposes a non-empty title
    TitlePresent,
    /// The root UI element becomes visible
    RootVisible,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::TitlePresent, Scenario::RootVisible];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::TitlePresent => "title-present",
            Scenario::RootVisible => "root-visible",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::TitlePresent => {
                "Load the home page, wait for the network to go idle, and check the title is not empty"
            }
            Scenario::RootVisible => {
                "Load the home page and wait for the root UI element to become visible"
            }
        }
    }

    /// Run the scenario on `page`. Never fails the process; every problem is an outcome.
    pub async fn run(self, page: &mut dyn Page, target: &Url, config: &SmokeConfig) -> Outcome {
        let result = match self {
            Scenario::TitlePresent => title_present(page, target, config).await,
            Scenario::RootVisible => root_visible(page, target, config).await,
        };

        match result {
            Ok(()) => Outcome::Passed,
            Err(failure) => Outcome::Failed(failure),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::UnknownScenario(format!(
                    "'{}' (expected one of: {})",
                    s,
                    Scenario::ALL.map(|scenario| scenario.name()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Target unreachable or navigation did not commit in time
    Navigation,
    /// A readiness wait expired
    Timeout,
    /// The page loaded but the expectation did not hold
    Assertion,
    /// The automation layer itself failed
    Driver,
    /// The scenario exceeded its overall time limit
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Navigation { .. } => FailureKind::Navigation,
            _ => FailureKind::Driver,
        };
        Failure::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "failure", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed(Failure),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }
}

async fn navigate(
    page: &mut dyn Page,
    target: &Url,
    config: &SmokeConfig,
) -> std::result::Result<(), Failure> {
    tracing::debug!("Navigating to {}", target);
    match tokio::time::timeout(config.navigation_timeout, page.navigate(target)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Failure::new(
            FailureKind::Navigation,
            format!(
                "navigation to {} did not complete within {} ms",
                target,
                config.navigation_timeout.as_millis()
            ),
        )),
    }
}

async fn title_present(
    page: &mut dyn Page,
    target: &Url,
    config: &SmokeConfig,
) -> std::result::Result<(), Failure> {
    navigate(page, target, config).await?;

    let condition = ReadyCondition::NetworkIdle {
        quiet: config.network_idle.quiet_period,
    };
    let idle = wait_for_condition(&*page, condition, config.network_idle.timeout, config.poll_interval).await?;
    if !idle {
        return Err(Failure::new(
            FailureKind::Timeout,
            format!(
                "network did not go idle within {} ms",
                config.network_idle.timeout.as_millis()
            ),
        ));
    }

    let title = page.title().await?;
    if title.trim().is_empty() {
        return Err(Failure::new(FailureKind::Assertion, "page title is empty"));
    }

    tracing::debug!("Page title: {}", title);
    Ok(())
}

async fn root_visible(
    page: &mut dyn Page,
    target: &Url,
    config: &SmokeConfig,
) -> std::result::Result<(), Failure> {
    navigate(page, target, config).await?;

    let root = Locator::new(&*page, config.root_selector.as_str());
    let visible = root
        .wait_visible(config.visibility_timeout, config.poll_interval)
        .await?;
    if !visible {
        return Err(Failure::new(
            FailureKind::Timeout,
            format!(
                "element '{}' was not visible within {} ms",
                root.selector(),
                config.visibility_timeout.as_millis()
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names_parse() {
        assert_eq!("title-present".parse::<Scenario>().unwrap(), Scenario::TitlePresent);
        assert_eq!("Root-Visible".parse::<Scenario>().unwrap(), Scenario::RootVisible);
    }

    #[test]
    fn test_unknown_scenario_lists_choices() {
        let err = "login".parse::<Scenario>().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Unknown scenario"));
        assert!(message.contains("title-present"));
        assert!(message.contains("root-visible"));
    }

    #[test]
    fn test_navigation_error_maps_to_navigation_failure() {
        let failure: Failure = Error::Navigation {
            url: "http://localhost:4200/".to_string(),
            message: "net::ERR_CONNECTION_REFUSED".to_string(),
        }
        .into();

        assert_eq!(failure.kind, FailureKind::Navigation);
        assert!(failure.message.contains("ERR_CONNECTION_REFUSED"));
    }

    #[test]
    fn test_other_errors_map_to_driver_failure() {
        let failure: Failure = Error::Driver("websocket closed".to_string()).into();
        assert_eq!(failure.kind, FailureKind::Driver);
    }

    #[test]
    fn test_outcome_serialization() {
        let passed = serde_json::to_value(Outcome::Passed).unwrap();
        assert_eq!(passed["outcome"], "passed");

        let failed = serde_json::to_value(Outcome::Failed(Failure::new(
            FailureKind::Assertion,
            "page title is empty",
        )))
        .unwrap();
        assert_eq!(failed["outcome"], "failed");
        assert_eq!(failed["failure"]["kind"], "assertion");
    }
}
