//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// palato-probe: end-to-end checks of the Palato Digital website
#[derive(Parser, Debug)]
#[command(name = "palato-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Target environment: staging (stag) or production (prod)
    #[arg(long, env = "PALATO_ENV", default_value = "staging", global = true)]
    pub env: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the target environment
    Run(RunArgs),

    /// List scenario names
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failed scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Run without a browser window (default when CI=true)
    #[arg(long, conflicts_with = "headed")]
    pub headless: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Directory for failure screenshots
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Chromium executable (auto-detected when absent)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,
}

impl RunArgs {
    /// Explicit headless choice, `None` when neither flag was given
    #[must_use]
    pub const fn headless_override(&self) -> Option<bool> {
        if self.headless {
            Some(true)
        } else if self.headed {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("palato-probe").chain(args.iter().copied())).unwrap()
    }

    mod cli_tests {
        use super::*;

        #[test]
        fn test_verify_cli() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_globals() {
            let cli = parse(&["-vv", "--color", "never", "--env", "prod", "list"]);
            assert_eq!(cli.verbose, 2);
            assert!(!cli.quiet);
            assert!(matches!(cli.color, ColorArg::Never));
            assert_eq!(cli.env, "prod");
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = parse(&["list", "-q"]);
            assert!(cli.quiet);
        }

        #[test]
        fn test_requires_subcommand() {
            assert!(Cli::try_parse_from(["palato-probe"]).is_err());
        }
    }

    mod run_args_tests {
        use super::*;

        fn run_args(args: &[&str]) -> RunArgs {
            match parse(args).command {
                Commands::Run(args) => args,
                Commands::List(_) => panic!("expected run"),
            }
        }

        #[test]
        fn test_defaults() {
            let args = run_args(&["run"]);
            assert!(args.filter.is_none());
            assert!(!args.fail_fast);
            assert!(args.artifacts.is_none());
            assert!(args.report.is_none());
            assert_eq!(args.headless_override(), None);
        }

        #[test]
        fn test_all_flags() {
            let args = run_args(&[
                "run",
                "--filter",
                "legal_page",
                "--fail-fast",
                "--headless",
                "--artifacts",
                "shots",
                "--report",
                "run.json",
                "--chromium-path",
                "/usr/bin/chromium",
            ]);
            assert_eq!(args.filter.as_deref(), Some("legal_page"));
            assert!(args.fail_fast);
            assert_eq!(args.headless_override(), Some(true));
            assert_eq!(args.artifacts, Some(PathBuf::from("shots")));
            assert_eq!(args.report, Some(PathBuf::from("run.json")));
            assert_eq!(args.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }

        #[test]
        fn test_headed() {
            assert_eq!(run_args(&["run", "--headed"]).headless_override(), Some(false));
        }

        #[test]
        fn test_headless_conflicts_with_headed() {
            assert!(Cli::try_parse_from(["palato-probe", "run", "--headless", "--headed"]).is_err());
        }
    }

    mod color_arg_tests {
        use super::*;

        #[test]
        fn test_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
