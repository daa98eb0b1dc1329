//! Scenario lifecycle.
//!
//! A scenario gets a fresh page from a [`PageSource`], runs, and the page is
//! closed on every exit path. A failing scenario gets a diagnostic screenshot
//! first when an artifacts directory is configured.

use crate::config::RunConfig;
use crate::harness::BrowserHarness;
use crate::mock::{FakeSite, MockHarness};
use crate::result::ProbeResult;
use crate::scenario::Scenario;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Hands out one fresh page per scenario
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Page type
    type Page: BrowserHarness;

    /// Open a blank page
    async fn open_page(&self) -> ProbeResult<Self::Page>;
}

#[async_trait]
impl PageSource for FakeSite {
    type Page = MockHarness;

    async fn open_page(&self) -> ProbeResult<MockHarness> {
        Ok(MockHarness::new(self.clone()))
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl PageSource for crate::browser::ChromiumBrowser {
    type Page = crate::browser::ChromiumPage;

    async fn open_page(&self) -> ProbeResult<Self::Page> {
        self.new_page().await
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Whether every assertion held
    pub passed: bool,
    /// Failure description
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Diagnostic screenshot, when captured
    pub screenshot: Option<PathBuf>,
}

impl ScenarioReport {
    fn new(name: String, outcome: &ProbeResult<()>, started: Instant) -> Self {
        Self {
            name,
            passed: outcome.is_ok(),
            error: outcome.as_ref().err().map(ToString::to_string),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            screenshot: None,
        }
    }
}

/// Open a page, run the scenario on it, and release the page
pub async fn run_on<S: PageSource + ?Sized>(
    source: &S,
    scenario: &Scenario,
    config: &RunConfig,
) -> ScenarioReport {
    let started = Instant::now();
    match source.open_page().await {
        Ok(page) => run_scenario(&page, scenario, config).await,
        Err(e) => {
            warn!(scenario = %scenario, error = %e, "could not open page");
            ScenarioReport::new(scenario.name(), &Err(e), started)
        }
    }
}

/// Run one scenario on a page that is closed afterwards, pass or fail
pub async fn run_scenario<H: BrowserHarness + ?Sized>(
    harness: &H,
    scenario: &Scenario,
    config: &RunConfig,
) -> ScenarioReport {
    let name = scenario.name();
    let started = Instant::now();
    info!(scenario = %name, environment = %config.environment, "scenario started");

    let outcome = scenario.execute(harness, config).await;
    let mut report = ScenarioReport::new(name, &outcome, started);

    match &outcome {
        Ok(()) => info!(scenario = %report.name, duration_ms = report.duration_ms, "scenario passed"),
        Err(e) => {
            warn!(scenario = %report.name, error = %e, "scenario failed");
            if let Some(dir) = &config.artifacts_dir {
                match capture_screenshot(harness, dir, &report.name).await {
                    Ok(path) => report.screenshot = Some(path),
                    Err(e) => warn!(error = %e, "failure screenshot not captured"),
                }
            }
        }
    }

    if let Err(e) = harness.close().await {
        warn!(scenario = %report.name, error = %e, "page close failed");
    }
    report
}

/// Write a screenshot to `<dir>/<scenario>-<timestamp>.png`
///
/// # Errors
///
/// Screenshot or file system failures.
pub async fn capture_screenshot<H: BrowserHarness + ?Sized>(
    harness: &H,
    dir: &Path,
    scenario: &str,
) -> ProbeResult<PathBuf> {
    let png = harness.screenshot().await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(artifact_name(scenario, chrono::Utc::now()));
    tokio::fs::write(&path, png).await?;
    info!(path = %path.display(), "failure screenshot saved");
    Ok(path)
}

fn artifact_name(scenario: &str, at: chrono::DateTime<chrono::Utc>) -> String {
    let stem: String = scenario
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    format!(
        "{}-{}.png",
        stem.trim_end_matches('-'),
        at.format("%Y%m%dT%H%M%S%.3fZ")
    )
}
