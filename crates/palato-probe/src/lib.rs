//! palato-probe: end-to-end verification of the Palato Digital website
//!
//! Drives a browser through the marketing site (home, about, services,
//! contact, legal pages, portfolio, 404) and decides whether each rendered
//! page is correct.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌──────────────────┐    ┌──────────────┐    │
//! │   │ Scenario   │───►│ ScenarioAssertions│───►│ PageVerifier │    │
//! │   │ (per page) │    │ (recipes)         │    │ (chrome)     │    │
//! │   └────────────┘    └─────────┬────────┘    └──────┬───────┘    │
//! │                               ▼                    ▼            │
//! │                     ┌──────────────────────────────────┐        │
//! │                     │ BrowserHarness (Chromium | Mock) │        │
//! │                     └──────────────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Element lookup is declarative: a [`LocatorSpec`] is an ordered chain of
//! [`Selector`] strategies, evaluated by [`fallback::resolve`] until one holds.
//! Every wait is bounded by a value from [`Timeouts`].

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertions;
mod browser;
mod config;
mod environment;
mod harness;
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
mod locator;
mod result;
mod url_pattern;
mod verifier;

/// Fallback chain evaluation
pub mod fallback;

/// Scripted harness for tests without a browser
///
/// Serves fake pages and records every call.
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod mock;

/// End-to-end scenarios
pub mod scenario;

/// Scenario lifecycle: fresh page, run, screenshot on failure, close
pub mod session;

/// Content catalog of the Palato Digital site
pub mod site;

/// Bounded waits
pub mod wait;

pub use assertions::{FormOutcome, ScenarioAssertions};
pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{ChromiumBrowser, ChromiumPage};
pub use config::RunConfig;
pub use environment::Environment;
pub use harness::{select_matches, BrowserHarness, ElementSnapshot};
pub use locator::{
    normalize, AriaRole, LocatorSpec, Pattern, Requirement, Selector, Strategy, TextMatch,
};
pub use result::{ProbeError, ProbeResult};
pub use scenario::Scenario;
pub use session::{run_on, run_scenario, PageSource, ScenarioReport};
pub use verifier::{ChromeProfile, PageVerifier};
pub use url_pattern::UrlPattern;
pub use wait::Timeouts;
