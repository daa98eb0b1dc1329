//! palato-probe: end-to-end checks of the Palato Digital website
//!
//! ## Usage
//!
//! ```bash
//! palato-probe list                           # Scenario names
//! palato-probe --env prod run                 # Everything against production
//! palato-probe run --filter legal_page        # Legal pages on staging
//! palato-probe run --artifacts shots --report run.json
//! ```

use clap::Parser;
use palato_probe::RunConfig;
use palato_probe_cli::{
    Cli, CliConfig, CliResult, ColorChoice, Commands, ListArgs, RunArgs, ScenarioRunner,
    Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    // Unknown environments stop here, before any browser work
    let run_config = RunConfig::for_selector(&cli.env)?;

    match cli.command {
        Commands::Run(args) => run_scenarios(config, run_config, &args),
        Commands::List(args) => {
            list(&run_config, &args);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn init_logging(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn list(run_config: &RunConfig, args: &ListArgs) {
    for scenario in palato_probe::Scenario::matching(args.filter.as_deref()) {
        println!("{scenario}");
    }
    tracing::debug!(environment = %run_config.environment, base_url = run_config.base_url(), "listed scenarios");
}

#[cfg(feature = "browser")]
fn run_scenarios(config: CliConfig, run_config: RunConfig, args: &RunArgs) -> CliResult<()> {
    use palato_probe::{BrowserConfig, ChromiumBrowser};

    let scenarios = ScenarioRunner::select(args.filter.as_deref())?;

    let mut browser = BrowserConfig::from_env();
    if let Some(headless) = args.headless_override() {
        browser = browser.with_headless(headless);
    }
    if let Some(ref path) = args.chromium_path {
        browser = browser.with_chromium_path(path.clone());
    }

    let mut run_config = run_config.with_browser(browser);
    if let Some(ref dir) = args.artifacts {
        run_config = run_config.with_artifacts_dir(dir);
    }

    let config = config
        .with_fail_fast(args.fail_fast)
        .with_report_path(args.report.clone());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let chromium = ChromiumBrowser::launch(run_config.browser.clone()).await?;
        let mut runner = ScenarioRunner::new(config);
        let summary = runner.run(&chromium, &scenarios, &run_config).await;
        if let Err(e) = chromium.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        summary?.into_result()
    })
}

#[cfg(not(feature = "browser"))]
fn run_scenarios(config: CliConfig, run_config: RunConfig, args: &RunArgs) -> CliResult<()> {
    let _ = (config, run_config, ScenarioRunner::select(args.filter.as_deref())?);
    Err(palato_probe_cli::CliError::config(
        "`run` needs the browser feature; rebuild with --features browser",
    ))
}
