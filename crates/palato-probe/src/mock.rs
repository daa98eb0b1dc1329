//! Scripted in-memory harness.
//!
//! [`MockHarness`] serves [`FakePage`]s from a [`FakeSite`] and records every
//! call, so verifier, assertion and scenario logic can be exercised without a
//! browser. Unknown URLs serve the site's not-found page while keeping the
//! requested URL, the way a CMS answers a 404.

use crate::harness::{BrowserHarness, ElementSnapshot};
use crate::locator::{AriaRole, Selector};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// PNG signature returned as the mock screenshot
pub const MOCK_SCREENSHOT: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// What clicking an element does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Follow a link (absolute URL or site path)
    Navigate(String),
    /// The element disappears
    Dismiss,
    /// Elements with this key become visible
    Reveal(String),
}

/// One scripted element
#[derive(Debug, Clone)]
pub struct FakeElement {
    /// State reported by `query`
    pub snapshot: ElementSnapshot,
    /// ARIA role, if any
    pub role: Option<AriaRole>,
    /// CSS selectors this element answers to, besides its tag
    pub css: Vec<String>,
    /// Labels of `<select>` options
    pub options: Vec<String>,
    /// Click behaviour
    pub on_click: Option<ClickEffect>,
    /// Key for [`ClickEffect::Reveal`]
    pub key: Option<String>,
    /// Only visible after `scroll_to_end`
    pub below_fold: bool,
    /// Only visible once the page has been queried this many times
    pub after_queries: usize,
}

impl FakeElement {
    /// Element with a tag and text
    #[must_use]
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            snapshot: ElementSnapshot::new(tag).with_name(text).with_text(text),
            role: None,
            css: Vec::new(),
            options: Vec::new(),
            on_click: None,
            key: None,
            below_fold: false,
            after_queries: 0,
        }
    }

    /// Link that navigates to `href` when clicked
    #[must_use]
    pub fn link(name: &str, href: &str) -> Self {
        Self::new("a", name)
            .with_role(AriaRole::Link)
            .with_attribute("href", href)
            .on_click(ClickEffect::Navigate(href.to_string()))
    }

    /// Heading
    #[must_use]
    pub fn heading(text: &str) -> Self {
        Self::new("h2", text).with_role(AriaRole::Heading)
    }

    /// Button
    #[must_use]
    pub fn button(name: &str) -> Self {
        Self::new("button", name).with_role(AriaRole::Button)
    }

    /// Plain text in a paragraph
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::new("p", text)
    }

    /// Form control answering to `[name="..."]`
    #[must_use]
    pub fn control(tag: &str, name: &str) -> Self {
        let mut el = Self::new(tag, "").with_attribute("name", name);
        el.css.push(format!("[name=\"{name}\"]"));
        el
    }

    /// Set the role
    #[must_use]
    pub const fn with_role(mut self, role: AriaRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Answer to an extra CSS selector
    #[must_use]
    pub fn with_css(mut self, css: &str) -> Self {
        self.css.push(css.to_string());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.snapshot.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Override the accessible name
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.snapshot.name = name.to_string();
        self
    }

    /// Set the rendered height
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.snapshot.height = height;
        self
    }

    /// Text held wholly by one child element
    #[must_use]
    pub const fn container(mut self) -> Self {
        self.snapshot.own_text = false;
        self
    }

    /// Start hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.snapshot.visible = false;
        self
    }

    /// Set `<select>` options
    #[must_use]
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(ToString::to_string).collect();
        self
    }

    /// Set click behaviour
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click = Some(effect);
        self
    }

    /// Set the reveal key
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Only visible after scrolling to the end
    #[must_use]
    pub const fn below_fold(mut self) -> Self {
        self.below_fold = true;
        self
    }

    /// Only visible after `polls` queries of the page
    #[must_use]
    pub const fn after_queries(mut self, polls: usize) -> Self {
        self.after_queries = polls;
        self
    }

    fn answers_css(&self, css: &str) -> bool {
        self.snapshot.tag == css || self.css.iter().any(|c| c == css)
    }

    fn selected_by(&self, selector: &Selector) -> bool {
        let candidate = match selector {
            Selector::Role { role, .. } => self.role == Some(*role),
            Selector::Text(_) => true,
            Selector::Css(css) | Selector::Attribute { css, .. } => self.answers_css(css),
        };
        candidate && selector.accepts(&self.snapshot)
    }
}

/// One scripted document
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    /// Document URL
    pub url: String,
    /// Document title
    pub title: String,
    /// Elements in document order
    pub elements: Vec<FakeElement>,
}

impl FakePage {
    /// Empty page
    #[must_use]
    pub fn new(url: &str, title: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            elements: Vec::new(),
        }
    }

    /// Append an element
    #[must_use]
    pub fn with(mut self, element: FakeElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Append several elements
    #[must_use]
    pub fn with_all(mut self, elements: impl IntoIterator<Item = FakeElement>) -> Self {
        self.elements.extend(elements);
        self
    }
}

/// Pages keyed by URL plus a not-found page
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pages: HashMap<String, FakePage>,
    not_found: FakePage,
    unreachable: Vec<String>,
}

impl FakeSite {
    /// Empty site whose unknown URLs serve an untitled blank page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page under its URL
    #[must_use]
    pub fn page(mut self, page: FakePage) -> Self {
        self.pages.insert(canonical(&page.url), page);
        self
    }

    /// Page served for unknown URLs
    #[must_use]
    pub fn not_found(mut self, page: FakePage) -> Self {
        self.not_found = page;
        self
    }

    /// Make navigation to `url` fail at the transport level
    #[must_use]
    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(canonical(url));
        self
    }

    fn load(&self, url: &str) -> ProbeResult<FakePage> {
        let key = canonical(url);
        if self.unreachable.contains(&key) {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        let mut page = self
            .pages
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.not_found.clone());
        page.url = url.to_string();
        Ok(page)
    }
}

fn canonical(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn origin(url: &str) -> &str {
    let after_scheme = url.find("://").map_or(0, |i| i + 3);
    url[after_scheme..]
        .find('/')
        .map_or(url, |i| &url[..after_scheme + i])
}

fn resolve_href(current: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{href}", origin(current))
    } else if href.starts_with('#') {
        format!("{}{href}", current.split('#').next().unwrap_or(current))
    } else {
        href.to_string()
    }
}

#[derive(Debug, Default)]
struct MockState {
    page: Option<FakePage>,
    queries: usize,
    scrolled: bool,
    closed: bool,
    values: BTreeMap<String, String>,
    call_history: Vec<String>,
}

impl MockState {
    fn visible_now(&self, element: &FakeElement) -> bool {
        element.snapshot.visible
            && (!element.below_fold || self.scrolled)
            && self.queries >= element.after_queries
    }

    fn matches(&self, selector: &Selector) -> Vec<(usize, ElementSnapshot)> {
        let Some(page) = &self.page else {
            return Vec::new();
        };
        page.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.selected_by(selector))
            .enumerate()
            .map(|(index, (position, e))| {
                let mut snapshot = e.snapshot.clone();
                snapshot.index = index;
                snapshot.visible = self.visible_now(e);
                (position, snapshot)
            })
            .collect()
    }

    fn first_visible(&self, selector: &Selector) -> ProbeResult<usize> {
        self.matches(selector)
            .into_iter()
            .find(|(_, s)| s.visible)
            .map(|(position, _)| position)
            .ok_or_else(|| ProbeError::harness(format!("no visible element for {selector}")))
    }

    fn element(&self, position: usize) -> ProbeResult<&FakeElement> {
        self.page
            .as_ref()
            .and_then(|p| p.elements.get(position))
            .ok_or_else(|| ProbeError::harness("element detached"))
    }
}

/// In-memory [`BrowserHarness`] with call history
#[derive(Debug)]
pub struct MockHarness {
    site: FakeSite,
    state: Mutex<MockState>,
    poll_interval: Duration,
}

impl MockHarness {
    /// Harness over a scripted site with no page loaded
    #[must_use]
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            state: Mutex::new(MockState::default()),
            poll_interval: Duration::from_millis(2),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_state(&self, call: String) -> ProbeResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.call_history.push(call);
        if state.closed {
            return Err(ProbeError::harness("page already closed"));
        }
        Ok(state)
    }

    /// Recorded calls, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_history.iter().any(|c| c.starts_with(method))
    }

    /// Number of recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    /// Whether `close` has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Value filled into the control with this `name` attribute
    #[must_use]
    pub fn value_of(&self, control: &str) -> Option<String> {
        self.state().values.get(control).cloned()
    }
}

#[async_trait]
impl BrowserHarness for MockHarness {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let mut state = self.open_state(format!("navigate:{url}"))?;
        let page = self.site.load(url)?;
        state.page = Some(page);
        state.queries = 0;
        state.scrolled = false;
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementSnapshot>> {
        let mut state = self.open_state(format!("query:{selector}"))?;
        state.queries += 1;
        Ok(state.matches(selector).into_iter().map(|(_, s)| s).collect())
    }

    async fn click(&self, selector: &Selector) -> ProbeResult<()> {
        let mut state = self.open_state(format!("click:{selector}"))?;
        let position = state.first_visible(selector)?;
        let effect = state.element(position)?.on_click.clone();
        match effect {
            Some(ClickEffect::Navigate(href)) => {
                let current = state.page.as_ref().map(|p| p.url.clone()).unwrap_or_default();
                let page = self.site.load(&resolve_href(&current, &href))?;
                state.page = Some(page);
                state.queries = 0;
                state.scrolled = false;
            }
            Some(ClickEffect::Dismiss) => {
                if let Some(el) = state.page.as_mut().and_then(|p| p.elements.get_mut(position)) {
                    el.snapshot.visible = false;
                }
            }
            Some(ClickEffect::Reveal(key)) => {
                if let Some(page) = state.page.as_mut() {
                    for el in &mut page.elements {
                        if el.key.as_deref() == Some(key.as_str()) {
                            el.snapshot.visible = true;
                        }
                    }
                }
            }
            None => {}
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()> {
        let mut state = self.open_state(format!("fill:{selector}={text}"))?;
        let position = state.first_visible(selector)?;
        let key = state
            .element(position)?
            .snapshot
            .attributes
            .get("name")
            .cloned()
            .unwrap_or_else(|| selector.to_string());
        state.values.insert(key, text.to_string());
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> ProbeResult<()> {
        let mut state = self.open_state(format!("select_option:{selector}={label}"))?;
        let position = state.first_visible(selector)?;
        let element = state.element(position)?;
        if !element.options.iter().any(|o| o == label) {
            return Err(ProbeError::harness(format!(
                "option '{label}' not found in {selector}"
            )));
        }
        let key = element
            .snapshot
            .attributes
            .get("name")
            .cloned()
            .unwrap_or_else(|| selector.to_string());
        state.values.insert(key, label.to_string());
        Ok(())
    }

    async fn check(&self, selector: &Selector) -> ProbeResult<()> {
        let mut state = self.open_state(format!("check:{selector}"))?;
        let position = state.first_visible(selector)?;
        let key = state
            .element(position)?
            .snapshot
            .attributes
            .get("name")
            .cloned()
            .unwrap_or_else(|| selector.to_string());
        state.values.insert(key, "on".to_string());
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let state = self.open_state("current_url".to_string())?;
        Ok(state
            .page
            .as_ref()
            .map_or_else(|| "about:blank".to_string(), |p| p.url.clone()))
    }

    async fn title(&self) -> ProbeResult<String> {
        let state = self.open_state("title".to_string())?;
        Ok(state.page.as_ref().map(|p| p.title.clone()).unwrap_or_default())
    }

    async fn scroll_to_end(&self) -> ProbeResult<()> {
        let mut state = self.open_state("scroll_to_end".to_string())?;
        state.scrolled = true;
        Ok(())
    }

    async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        let _state = self.open_state("screenshot".to_string())?;
        Ok(MOCK_SCREENSHOT.to_vec())
    }

    async fn close(&self) -> ProbeResult<()> {
        let mut state = self.state();
        state.call_history.push("close".to_string());
        state.closed = true;
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
