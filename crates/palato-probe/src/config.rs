//! Run configuration.

use crate::browser::BrowserConfig;
use crate::environment::Environment;
use crate::result::ProbeResult;
use crate::wait::Timeouts;
use std::path::PathBuf;

/// Everything a run needs, resolved once and passed to every scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Target environment
    pub environment: Environment,
    /// Wait bounds
    pub timeouts: Timeouts,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Where failure screenshots go (None = not captured)
    pub artifacts_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Configuration with default timeouts and browser settings
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            timeouts: Timeouts::default(),
            browser: BrowserConfig::default(),
            artifacts_dir: None,
        }
    }

    /// Resolve an environment selector.
    ///
    /// # Errors
    ///
    /// [`crate::ProbeError::Config`] for an unknown selector.
    pub fn for_selector(selector: &str) -> ProbeResult<Self> {
        Environment::resolve(selector).map(Self::new)
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set browser settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Capture failure screenshots into `dir`
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Base URL of the target environment
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    /// Absolute URL of a site path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        self.environment.url_for(path)
    }
}
