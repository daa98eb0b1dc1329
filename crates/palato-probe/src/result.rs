//! Result and error types for palato-probe.

use thiserror::Error;

/// Result type for palato-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can end a scenario
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Run configuration is unusable (raised before any navigation)
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// A required element never became visible within its bound
    #[error("{description} not visible after {timeout_ms}ms")]
    ElementNotVisible {
        /// What was being looked for
        description: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// Every strategy of a fallback chain failed
    #[error("{check}: no strategy matched (tried {})", .attempted.join("; "))]
    FallbackExhausted {
        /// Name of the check
        check: String,
        /// Every attempted strategy, in order
        attempted: Vec<String>,
    },

    /// An outcome region showed something other than the known phrases
    #[error("Unexpected outcome: expected one of [{}] but got '{actual}'", .expected.join(", "))]
    AmbiguousOutcome {
        /// Accepted phrases
        expected: Vec<String>,
        /// Observed text
        actual: String,
    },

    /// The document URL never matched
    #[error("URL did not match {expected} within {timeout_ms}ms (last seen '{actual}')")]
    UrlMismatch {
        /// Expected pattern
        expected: String,
        /// Last observed URL
        actual: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// The document title did not match
    #[error("Title mismatch: expected {expected} but got '{actual}'")]
    TitleMismatch {
        /// Expected title or pattern
        expected: String,
        /// Observed title
        actual: String,
    },

    /// Any other content assertion
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Transport-level navigation failure
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// The harness could not carry out a command
    #[error("Harness error: {message}")]
    Harness {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a harness error
    #[must_use]
    pub fn harness(message: impl Into<String>) -> Self {
        Self::Harness {
            message: message.into(),
        }
    }

    /// Whether this error was raised by configuration rather than a page
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
