use crate::config::SmokeConfig;
use crate::page::PageFactory;
use crate::report::{ScenarioResult, SmokeReport};
use crate::scenario::{Failure, FailureKind, Outcome, Scenario};
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use url::Url;

/// Runs smoke scenarios against one target, each on its own page
pub struct SmokeChecker<F> {
    config: SmokeConfig,
    target: Url,
    pages: F,
}

impl<F: PageFactory> SmokeChecker<F> {
    /// Create a checker. Fails if the configuration is invalid.
    pub fn new(config: SmokeConfig, pages: F) -> Result<Self> {
        config.validate()?;
        let target = config.target_url()?;

        Ok(Self {
            config,
            target,
            pages,
        })
    }

    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    pub fn target_url(&self) -> &Url {
        &self.target
    }

    /// Give back the page factory, e.g. to shut the browser down
    pub fn into_pages(self) -> F {
        self.pages
    }

    /// Run `scenarios` and collect their results in the order given.
    ///
    /// One scenario failing never stops the others.
    pub async fn run(&self, scenarios: &[Scenario]) -> SmokeReport {
        let started_at = Utc::now();

        let results = if self.config.parallel {
            futures::future::join_all(scenarios.iter().map(|s| self.run_scenario(*s))).await
        } else {
            let mut results = Vec::with_capacity(scenarios.len());
            for scenario in scenarios {
                results.push(self.run_scenario(*scenario).await);
            }
            results
        };

        SmokeReport::new(self.target.to_string(), started_at, results)
    }

    /// Run one scenario on a fresh page, bounded by the scenario timeout
    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioResult {
        let started = Instant::now();
        tracing::info!("Running scenario '{}' against {}", scenario, self.target);

        let mut page = match self.pages.open_page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Scenario '{}': could not open page: {}", scenario, e);
                let failure = Failure::new(FailureKind::Driver, format!("could not open page: {}", e));
                return ScenarioResult::new(scenario, Outcome::Failed(failure), started.elapsed());
            }
        };

        let run = scenario.run(page.as_mut(), &self.target, &self.config);
        let outcome = match tokio::time::timeout(self.config.scenario_timeout, run).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::Failed(Failure::new(
                FailureKind::Cancelled,
                format!(
                    "scenario exceeded {} ms and was cancelled",
                    self.config.scenario_timeout.as_millis()
                ),
            )),
        };

        if let Err(e) = page.close().await {
            tracing::warn!("Scenario '{}': failed to close page: {}", scenario, e);
        }

        match outcome.failure() {
            None => tracing::info!("Scenario '{}' passed", scenario),
            Some(failure) => tracing::info!("Scenario '{}' failed: {}", scenario, failure),
        }

        ScenarioResult::new(scenario, outcome, started.elapsed())
    }
}
