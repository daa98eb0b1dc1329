//! Target environments and their base URLs.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deployment the suite runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Pre-release site
    Staging,
    /// Public site
    Production,
}

impl Environment {
    /// Every environment, in display order
    pub const ALL: [Self; 2] = [Self::Staging, Self::Production];

    /// Canonical identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Short identifier accepted on the command line
    #[must_use]
    pub const fn short_id(self) -> &'static str {
        match self {
            Self::Staging => "stag",
            Self::Production => "prod",
        }
    }

    /// Base URL, without trailing slash
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Staging => "https://stag.palatodigital.com",
            Self::Production => "https://palatodigital.com",
        }
    }

    /// Resolve a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] for an unrecognized selector.
    pub fn resolve(selector: &str) -> ProbeResult<Self> {
        let wanted = selector.trim();
        Self::ALL
            .into_iter()
            .find(|env| {
                wanted.eq_ignore_ascii_case(env.id()) || wanted.eq_ignore_ascii_case(env.short_id())
            })
            .ok_or_else(|| {
                let valid: Vec<String> = Self::ALL
                    .iter()
                    .map(|env| format!("{} ({})", env.id(), env.short_id()))
                    .collect();
                ProbeError::config(format!(
                    "environment '{selector}' unknown. Valid: {}",
                    valid.join(", ")
                ))
            })
    }

    /// Join a site path onto the base URL
    #[must_use]
    pub fn url_for(self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url().to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url())
        } else {
            format!("{}/{path}", self.base_url())
        }
    }
}

impl FromStr for Environment {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
