use crate::OutputFormat;
use anyhow::{Context, Result};
use canary_browser::{BrowserSession, LaunchOptions};
use canary_core::{Scenario, SmokeChecker, SmokeConfig, SmokeReport, Status};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct BrowserArgs {
    /// Path to Chrome/Chromium executable
    #[arg(long, env = "CHROME", value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Use a persistent profile from ~/.canary/profiles instead of a temporary one
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Disable Chrome's sandbox (often required in containers)
    #[arg(long)]
    pub no_sandbox: bool,
}

impl BrowserArgs {
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            chrome_path: self.chrome_path.clone(),
            profile: self.profile.clone(),
            headless: !self.headed,
            sandbox: !self.no_sandbox,
            ..LaunchOptions::default()
        }
    }
}

/// Run the selected scenarios (all when `scenarios` is empty) and report
pub fn execute(
    config: SmokeConfig,
    browser: LaunchOptions,
    scenarios: Vec<Scenario>,
    report_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let scenarios = select_scenarios(scenarios);
    tracing::debug!(
        "Running {} scenario(s), output format {}",
        scenarios.len(),
        format.as_str()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let session = BrowserSession::launch(browser)
            .await
            .context("Failed to launch browser")?;
        if session.uses_temporary_profile() {
            tracing::debug!("Using a temporary profile, removed when the run ends");
        }
        let checker = SmokeChecker::new(config, session)?;

        let spinner = spinner(format, checker.target_url().as_str());
        let report = checker.run(&scenarios).await;
        spinner.finish_and_clear();

        if let Err(e) = checker.into_pages().close().await {
            tracing::warn!("Failed to shut down browser cleanly: {}", e);
        }

        Ok::<_, anyhow::Error>(report)
    });

    // Don't wait on page-close tasks still in flight
    runtime.shutdown_timeout(Duration::from_millis(100));

    let report = result?;

    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    if !report.passed() {
        anyhow::bail!(
            "{} of {} scenario(s) did not pass",
            report.total() - report.count(Status::Pass),
            report.total()
        );
    }

    Ok(())
}

/// Requested scenarios in order, without duplicates; all scenarios when none requested
fn select_scenarios(requested: Vec<Scenario>) -> Vec<Scenario> {
    if requested.is_empty() {
        return Scenario::ALL.to_vec();
    }

    let mut selected = Vec::with_capacity(requested.len());
    for scenario in requested {
        if !selected.contains(&scenario) {
            selected.push(scenario);
        }
    }
    selected
}

fn spinner(format: OutputFormat, target: &str) -> ProgressBar {
    if format != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(template) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(template);
    }
    spinner.set_message(format!("Checking {}", target));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn output_json(report: &SmokeReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn output_table(report: &SmokeReport) {
    println!("Scenario,Status,Elapsed (ms),Failure");
    for result in &report.results {
        let failure = result
            .outcome
            .failure()
            .map(|f| format!("\"{}\"", f.message.replace('"', "'")))
            .unwrap_or_default();
        println!(
            "{},{},{},{}",
            result.scenario,
            result.status.as_str(),
            result.elapsed_ms,
            failure
        );
    }
}

fn output_pretty(report: &SmokeReport) {
    println!("\n{}", style("Smoke Check:").bold());
    println!("  Target:   {}", report.target_url);
    println!("  Started:  {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    for result in &report.results {
        let status = match result.status {
            Status::Pass => style("PASS").green().bold(),
            Status::Fail => style("FAIL").red().bold(),
            Status::Error => style("ERROR").yellow().bold(),
        };
        println!(
            "  {:<6} {:<15} {:>6} ms",
            status,
            result.scenario.name(),
            result.elapsed_ms
        );
        if let Some(failure) = result.outcome.failure() {
            println!("         {:?}: {}", failure.kind, failure.message);
        }
    }

    println!();
    println!(
        "  {} passed, {} failed, {} errored",
        report.count(Status::Pass),
        report.count(Status::Fail),
        report.count(Status::Error)
    );
    println!();
}
