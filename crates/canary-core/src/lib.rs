pub mod checker;
pub mod config;
pub mod error;
pub mod page;
pub mod report;
pub mod scenario;
pub mod wait;

pub use checker::SmokeChecker;
pub use config::{NetworkIdleConfig, SmokeConfig};
pub use error::{Error, Result};
pub use page::{Locator, NetworkActivity, Page, PageFactory, ReadyCondition};
pub use report::{ScenarioResult, SmokeReport, Status};
pub use scenario::{Failure, FailureKind, Outcome, Scenario};
