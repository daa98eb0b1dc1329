//! Expected-URL patterns.

use crate::locator::Pattern;
use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};

/// What the document URL is expected to look like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// URL contains the substring
    Contains(String),
    /// URL ends with the path, trailing slash optional
    PathSuffix(String),
    /// Regular expression searched anywhere in the URL
    Regex(Pattern),
}

impl UrlPattern {
    /// Path-suffix pattern
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::PathSuffix(path.into())
    }

    /// Regex pattern.
    ///
    /// # Errors
    ///
    /// [`crate::ProbeError::Config`] when the pattern does not compile.
    pub fn regex(pattern: &str) -> ProbeResult<Self> {
        Pattern::new(pattern).map(Self::Regex)
    }

    /// Check a URL against this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Contains(needle) => url.contains(needle.as_str()),
            Self::PathSuffix(path) => {
                let wanted = path.trim_end_matches('/');
                let actual = strip_query(url).trim_end_matches('/');
                actual.ends_with(wanted)
            }
            Self::Regex(pattern) => pattern.is_match(url),
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contains(n) => write!(f, "containing '{n}'"),
            Self::PathSuffix(p) => write!(f, "ending in '{p}'"),
            Self::Regex(r) => write!(f, "/{r}/"),
        }
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
