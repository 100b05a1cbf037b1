//! Configuration layering for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file
//! (`--config`, or `canary.json` in the working directory), environment
//! variables, command-line flags. Clap resolves env vs. flag; this module
//! applies the result on top of the file.

use anyhow::{Context, Result};
use canary_core::SmokeConfig;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "canary.json";

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON config file (defaults to ./canary.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the application under test
    #[arg(long, env = "CANARY_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// CSS selector of the root UI element
    #[arg(long, env = "CANARY_SELECTOR", value_name = "SELECTOR")]
    pub selector: Option<String>,

    /// Navigation timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub navigation_timeout: Option<u64>,

    /// Network idle wait timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub idle_timeout: Option<u64>,

    /// Quiet period that counts as network idle, in milliseconds
    #[arg(long, value_name = "MS")]
    pub quiet_period: Option<u64>,

    /// Root element visibility timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub visibility_timeout: Option<u64>,

    /// Overall limit per scenario in milliseconds
    #[arg(long, value_name = "MS")]
    pub scenario_timeout: Option<u64>,

    /// Interval between readiness probes in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Run scenarios concurrently
    #[arg(long)]
    pub parallel: bool,
}

impl ConfigArgs {
    /// Build and validate the effective configuration
    pub fn resolve(&self) -> Result<SmokeConfig> {
        let mut config = match self.config_file() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                SmokeConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?
            }
            None => SmokeConfig::default(),
        };

        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn config_file(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                default.is_file().then(|| default.to_path_buf())
            }
        }
    }

    fn apply(&self, config: &mut SmokeConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(selector) = &self.selector {
            config.root_selector = selector.clone();
        }

        let millis = Duration::from_millis;
        if let Some(ms) = self.navigation_timeout {
            config.navigation_timeout = millis(ms);
        }
        if let Some(ms) = self.idle_timeout {
            config.network_idle.timeout = millis(ms);
        }
        if let Some(ms) = self.quiet_period {
            config.network_idle.quiet_period = millis(ms);
        }
        if let Some(ms) = self.visibility_timeout {
            config.visibility_timeout = millis(ms);
        }
        if let Some(ms) = self.scenario_timeout {
            config.scenario_timeout = millis(ms);
        }
        if let Some(ms) = self.poll_interval {
            config.poll_interval = millis(ms);
        }
        if self.parallel {
            config.parallel = true;
        }
    }
}

/// Print the effective configuration as JSON
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let config = args.resolve()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
