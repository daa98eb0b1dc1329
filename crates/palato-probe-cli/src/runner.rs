//! Scenario runner

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use chrono::{DateTime, Utc};
use palato_probe::{run_on, PageSource, RunConfig, Scenario, ScenarioReport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Aggregated outcome of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Environment id
    pub environment: String,
    /// Resolved base URL
    pub base_url: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
    /// Per-scenario reports, in run order
    pub scenarios: Vec<ScenarioReport>,
}

impl RunSummary {
    fn new(config: &RunConfig) -> Self {
        Self {
            environment: config.environment.id().to_string(),
            base_url: config.base_url().to_string(),
            started_at: Utc::now(),
            duration_ms: 0,
            scenarios: Vec::new(),
        }
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|r| r.passed).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.iter().filter(|r| !r.passed).count()
    }

    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|r| r.passed)
    }

    /// Write the summary as pretty JSON
    pub fn write(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Ok when every scenario passed
    pub fn into_result(self) -> CliResult<()> {
        if self.all_passed() {
            Ok(())
        } else {
            Err(CliError::test_execution(format!(
                "{} scenario(s) failed",
                self.failed()
            )))
        }
    }
}

/// Runs scenarios one after another, one fresh page each
#[derive(Debug)]
pub struct ScenarioRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl ScenarioRunner {
    /// Create a new runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Select scenarios by name filter
    ///
    /// # Errors
    ///
    /// [`CliError::InvalidArgument`] when the filter matches nothing.
    pub fn select(filter: Option<&str>) -> CliResult<Vec<Scenario>> {
        let scenarios = Scenario::matching(filter);
        if scenarios.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "no scenario matches '{}'",
                filter.unwrap_or_default()
            )));
        }
        Ok(scenarios)
    }

    /// Run `scenarios` against pages from `source`
    pub async fn run<S: PageSource + ?Sized>(
        &mut self,
        source: &S,
        scenarios: &[Scenario],
        run_config: &RunConfig,
    ) -> CliResult<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::new(run_config);

        self.reporter.header(&format!(
            "{} scenario(s) against {} ({})",
            scenarios.len(),
            run_config.environment,
            run_config.base_url()
        ));
        self.reporter.start_progress(scenarios.len() as u64, "starting");

        for scenario in scenarios {
            self.reporter.set_message(&scenario.name());
            let report = run_on(source, scenario, run_config).await;
            self.reporter.scenario(&report);
            self.reporter.increment(1);
            let failed = !report.passed;
            summary.scenarios.push(report);
            if failed && self.config.fail_fast {
                self.reporter.warning("stopping after first failure (--fail-fast)");
                break;
            }
        }

        self.reporter.finish();
        let elapsed = start.elapsed();
        summary.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.reporter.summary(summary.passed(), summary.failed(), elapsed);

        if let Some(ref path) = self.config.report_path {
            summary.write(path)?;
            self.reporter.info(&format!("report written to {}", path.display()));
        }

        Ok(summary)
    }
}
