use crate::scenario::{FailureKind, Outcome, Scenario};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status surfaced to result aggregators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Error => "error",
        }
    }

    fn of(outcome: &Outcome) -> Self {
        match outcome.failure() {
            None => Status::Pass,
            Some(failure) => match failure.kind {
                FailureKind::Navigation | FailureKind::Timeout | FailureKind::Assertion => {
                    Status::Fail
                }
                FailureKind::Driver | FailureKind::Cancelled => Status::Error,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub status: Status,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

impl ScenarioResult {
    pub fn new(scenario: Scenario, outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            scenario,
            status: Status::of(&outcome),
            outcome,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.outcome.is_passed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeReport {
    pub target_url: String,
    pub started_at: DateTime<Utc>,
    pub results: Vec<ScenarioResult>,
}

impl SmokeReport {
    pub fn new(target_url: String, started_at: DateTime<Utc>, results: Vec<ScenarioResult>) -> Self {
        Self {
            target_url,
            started_at,
            results,
        }
    }

    /// True when every scenario passed
    pub fn passed(&self) -> bool {
        self.results.iter().all(ScenarioResult::is_passed)
    }

    pub fn count(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn result(&self, scenario: Scenario) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.scenario == scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Failure;

    fn failed(kind: FailureKind) -> Outcome {
        Outcome::Failed(Failure::new(kind, "boom"))
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(Status::of(&Outcome::Passed), Status::Pass);
        assert_eq!(Status::of(&failed(FailureKind::Navigation)), Status::Fail);
        assert_eq!(Status::of(&failed(FailureKind::Timeout)), Status::Fail);
        assert_eq!(Status::of(&failed(FailureKind::Assertion)), Status::Fail);
        assert_eq!(Status::of(&failed(FailureKind::Driver)), Status::Error);
        assert_eq!(Status::of(&failed(FailureKind::Cancelled)), Status::Error);
    }

    #[test]
    fn test_report_counts() {
        let report = SmokeReport::new(
            "http://localhost:4200/".to_string(),
            Utc::now(),
            vec![
                ScenarioResult::new(Scenario::TitlePresent, Outcome::Passed, Duration::from_millis(812)),
                ScenarioResult::new(
                    Scenario::RootVisible,
                    failed(FailureKind::Timeout),
                    Duration::from_millis(5003),
                ),
            ],
        );

        assert!(!report.passed());
        assert_eq!(report.total(), 2);
        assert_eq!(report.count(Status::Pass), 1);
        assert_eq!(report.count(Status::Fail), 1);
        assert_eq!(report.count(Status::Error), 0);
        assert_eq!(report.result(Scenario::RootVisible).unwrap().elapsed_ms, 5003);
    }

    #[test]
    fn test_empty_report_passes() {
        let report = SmokeReport::new("http://localhost:4200/".to_string(), Utc::now(), vec![]);
        assert!(report.passed());
    }

    #[test]
    fn test_result_json_shape() {
        let result = ScenarioResult::new(
            Scenario::RootVisible,
            failed(FailureKind::Timeout),
            Duration::from_millis(40),
        );

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["scenario"], "root-visible");
        assert_eq!(json["status"], "fail");
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["failure"]["kind"], "timeout");
        assert_eq!(json["elapsed_ms"], 40);
    }
}
