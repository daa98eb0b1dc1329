//! Browser harness capability interface.
//!
//! The suite never talks to a browser directly. Everything it needs goes
//! through [`BrowserHarness`], which a backend implements with a handful of
//! required primitives: navigation, a visible-state snapshot of all elements
//! matching a [`Selector`], and actions on the first visible match. Locating,
//! visibility checks and bounded waits are provided on top of `query`.
//!
//! Backends:
//!
//! - `ChromiumPage` (feature `browser`): Chrome DevTools Protocol
//! - [`crate::mock::MockHarness`]: scripted pages for tests

use crate::locator::{AriaRole, Requirement, Selector, TextMatch};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{millis, poll_until, DEFAULT_POLL_INTERVAL_MS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Visible state of one element at the moment it was queried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSnapshot {
    /// Position among the matches of the query
    pub index: usize,
    /// Lower-case tag name
    pub tag: String,
    /// Accessible name
    pub name: String,
    /// Whitespace-normalized text content
    pub text: String,
    /// Whether the element holds its text itself rather than wholly through
    /// a single child element
    pub own_text: bool,
    /// Position of the nearest enclosing element in the same query
    pub parent: Option<usize>,
    /// Whether the element is rendered and not hidden
    pub visible: bool,
    /// Rendered height in CSS pixels
    pub height: f64,
    /// HTML attributes
    pub attributes: BTreeMap<String, String>,
}

impl Default for ElementSnapshot {
    fn default() -> Self {
        Self {
            index: 0,
            tag: String::new(),
            name: String::new(),
            text: String::new(),
            own_text: true,
            parent: None,
            visible: true,
            height: 20.0,
            attributes: BTreeMap::new(),
        }
    }
}

impl ElementSnapshot {
    /// Visible element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the accessible name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the rendered height
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the enclosing element
    #[must_use]
    pub const fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Mark hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// The `href` attribute, if any
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.attributes.get("href").map(String::as_str)
    }
}

/// Narrow the candidates of a query to the matches of `selector`.
///
/// For text selectors an element that encloses another match is dropped, so
/// the smallest element carrying the text wins even when the text is split
/// across inline children.
#[must_use]
pub fn select_matches(selector: &Selector, candidates: Vec<ElementSnapshot>) -> Vec<ElementSnapshot> {
    let accepted: Vec<bool> = candidates.iter().map(|e| selector.accepts(e)).collect();
    let mut enclosing = vec![false; candidates.len()];
    if matches!(selector, Selector::Text(_)) {
        for (position, element) in candidates.iter().enumerate() {
            if !accepted[position] {
                continue;
            }
            // Ancestors precede their descendants in document order.
            let mut current = position;
            let mut parent = element.parent;
            while let Some(p) = parent.filter(|&p| p < current) {
                enclosing[p] = true;
                current = p;
                parent = candidates[p].parent;
            }
        }
    }
    candidates
        .into_iter()
        .enumerate()
        .filter(|(position, _)| accepted[*position] && !enclosing[*position])
        .map(|(_, element)| element)
        .collect()
}

/// Browser automation capabilities the suite depends on.
///
/// Implementations own exactly one page. Every method takes `&self`; backends
/// serialize access internally.
#[async_trait]
pub trait BrowserHarness: Send + Sync {
    /// Load a URL and wait for the document to finish loading
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// Snapshot every element matching the selector, in document order
    async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementSnapshot>>;

    /// Click the first visible match
    async fn click(&self, selector: &Selector) -> ProbeResult<()>;

    /// Replace the value of the first visible match
    async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()>;

    /// Choose an option of the first visible `<select>` by its visible label
    async fn select_option(&self, selector: &Selector, label: &str) -> ProbeResult<()>;

    /// Tick the first visible checkbox
    async fn check(&self, selector: &Selector) -> ProbeResult<()>;

    /// Current document URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Current document title
    async fn title(&self) -> ProbeResult<String>;

    /// Scroll to the bottom of the document
    async fn scroll_to_end(&self) -> ProbeResult<()>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> ProbeResult<Vec<u8>>;

    /// Release the page
    async fn close(&self) -> ProbeResult<()>;

    /// Delay between probes of the provided waits
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
    }

    /// Locator for an ARIA role and accessible name
    fn locate_by_role(&self, role: AriaRole, name: &str, exact: bool) -> Selector {
        Selector::role(role, TextMatch::with_exactness(name, exact))
    }

    /// Locator for visible text
    fn locate_by_text(&self, text: &str, exact: bool) -> Selector {
        Selector::text(TextMatch::with_exactness(text, exact))
    }

    /// Locator for a CSS selector
    fn locate_by_css(&self, css: &str) -> Selector {
        Selector::css(css)
    }

    /// Wait until some match satisfies the requirement.
    ///
    /// Returns `Ok(None)` when the bound elapses. Backend errors end the wait
    /// immediately.
    async fn wait_for(
        &self,
        selector: &Selector,
        requirement: Requirement,
        timeout: Duration,
    ) -> ProbeResult<Option<ElementSnapshot>> {
        let this = self;
        let found = poll_until(timeout, self.poll_interval(), move || async move {
            match this.query(selector).await {
                Ok(elements) => elements
                    .into_iter()
                    .find(|e| requirement.holds_for(e))
                    .map(Ok),
                Err(e) => Some(Err(e)),
            }
        })
        .await;
        found.transpose()
    }

    /// Whether some match becomes visible within the bound
    async fn is_visible(&self, selector: &Selector, timeout: Duration) -> ProbeResult<bool> {
        Ok(self
            .wait_for(selector, Requirement::Visible, timeout)
            .await?
            .is_some())
    }

    /// Wait for the first visible match, failing after the bound
    async fn wait_until_visible(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> ProbeResult<ElementSnapshot> {
        self.wait_for(selector, Requirement::Visible, timeout)
            .await?
            .ok_or_else(|| ProbeError::ElementNotVisible {
                description: selector.to_string(),
                timeout_ms: millis(timeout),
            })
    }
}
