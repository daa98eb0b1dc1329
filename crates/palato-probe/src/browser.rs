//! Browser launch configuration and the Chromium backend.
//!
//! With the `browser` feature, [`ChromiumBrowser`] launches Chromium over the
//! Chrome `DevTools` Protocol and hands out [`ChromiumPage`]s, which implement
//! [`crate::harness::BrowserHarness`]. Element lookup runs a small collector
//! script in the page and filters the returned snapshots in Rust, so the
//! selector semantics are the same as the mock harness.

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1366,
            viewport_height: 768,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Headless without sandbox on CI, headed with sandbox locally
    #[must_use]
    pub fn for_ci(ci: bool) -> Self {
        let config = Self::default().with_headless(ci);
        if ci {
            config.with_no_sandbox()
        } else {
            config
        }
    }

    /// [`Self::for_ci`] driven by the `CI` environment variable
    #[must_use]
    pub fn from_env() -> Self {
        Self::for_ci(std::env::var("CI").is_ok_and(|v| v.eq_ignore_ascii_case("true")))
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Chromium backend (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::significant_drop_tightening)]
mod cdp {
    use super::BrowserConfig;
    use crate::harness::{select_matches, BrowserHarness, ElementSnapshot};
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use base64::Engine as _;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use tokio::sync::Mutex;
    use tracing::debug;

    const MARK: &str = "data-probe-idx";

    /// Collects every element matching a CSS selector. `__CSS__` is replaced
    /// by a JSON string literal. Previous marks are cleared so indices are
    /// unique to the latest query. `parent` is the index of the nearest
    /// collected ancestor.
    const COLLECTOR: &str = r#"(() => {
  document.querySelectorAll('[data-probe-idx]').forEach(e => e.removeAttribute('data-probe-idx'));
  const squash = s => (s || '').replace(/\s+/g, ' ').trim();
  const nodes = Array.from(document.querySelectorAll(__CSS__));
  const position = new Map(nodes.map((el, index) => [el, index]));
  return JSON.stringify(nodes.map((el, index) => {
    el.setAttribute('data-probe-idx', String(index));
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const visible = style.visibility !== 'hidden' && style.display !== 'none'
      && rect.width > 0 && rect.height > 0;
    const text = squash(el.innerText || el.textContent || el.value);
    const img = el.querySelector('img[alt]');
    const name = squash(el.getAttribute('aria-label'))
      || text
      || squash(img ? img.getAttribute('alt') : '')
      || squash(el.getAttribute('title'));
    const own_text = !Array.from(el.children)
      .some(c => squash(c.innerText || c.textContent) === text);
    let up = el.parentElement;
    while (up && !position.has(up)) up = up.parentElement;
    const parent = up ? position.get(up) : null;
    const attributes = {};
    for (const a of el.attributes) {
      if (a.name !== 'data-probe-idx') attributes[a.name] = a.value;
    }
    return { index, tag: el.tagName.toLowerCase(), name, text, own_text, parent, visible,
      height: rect.height, attributes };
  }));
})()"#;

    fn harness_err(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::harness(e.to_string())
    }

    fn marked(index: usize) -> String {
        format!("[{MARK}=\"{index}\"]")
    }

    /// Running Chromium process
    #[derive(Debug)]
    pub struct ChromiumBrowser {
        config: BrowserConfig,
        inner: Mutex<CdpBrowser>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumBrowser {
        /// Launch Chromium
        ///
        /// # Errors
        ///
        /// [`ProbeError::BrowserLaunch`] if Chromium cannot be started
        pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .arg("--disable-dev-shm-usage");

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ProbeError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        debug!(error = %e, "cdp handler error");
                    }
                }
            });

            debug!(headless = config.headless, sandbox = config.sandbox, "chromium launched");
            Ok(Self {
                config,
                inner: Mutex::new(browser),
                handle,
            })
        }

        /// Open a blank page
        ///
        /// # Errors
        ///
        /// [`ProbeError::Harness`] if the page cannot be created
        pub async fn new_page(&self) -> ProbeResult<ChromiumPage> {
            let browser = self.inner.lock().await;
            let page = browser.new_page("about:blank").await.map_err(harness_err)?;
            Ok(ChromiumPage { page })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> ProbeResult<()> {
            let mut browser = self.inner.lock().await;
            browser.close().await.map_err(harness_err)?;
            if let Err(e) = browser.wait().await {
                debug!(error = %e, "chromium exit wait failed");
            }
            self.handle.abort();
            Ok(())
        }
    }

    /// One Chromium tab
    #[derive(Debug)]
    pub struct ChromiumPage {
        page: CdpPage,
    }

    impl ChromiumPage {
        async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> ProbeResult<T> {
            self.page
                .evaluate(script)
                .await
                .map_err(harness_err)?
                .into_value()
                .map_err(harness_err)
        }

        async fn first_visible(&self, selector: &Selector) -> ProbeResult<usize> {
            self.query(selector)
                .await?
                .into_iter()
                .find(|e| e.visible)
                .map(|e| e.index)
                .ok_or_else(|| ProbeError::harness(format!("no visible element for {selector}")))
        }
    }

    #[async_trait]
    impl BrowserHarness for ChromiumPage {
        async fn navigate(&self, url: &str) -> ProbeResult<()> {
            debug!(url, "navigate");
            self.page
                .goto(url)
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementSnapshot>> {
            let css = serde_json::to_string(&selector.candidate_css())?;
            let raw: String = self.eval(COLLECTOR.replace("__CSS__", &css)).await?;
            let snapshots: Vec<ElementSnapshot> = serde_json::from_str(&raw)?;
            Ok(select_matches(selector, snapshots))
        }

        async fn click(&self, selector: &Selector) -> ProbeResult<()> {
            let index = self.first_visible(selector).await?;
            let element = self
                .page
                .find_element(marked(index))
                .await
                .map_err(harness_err)?;
            element.click().await.map_err(harness_err)?;
            Ok(())
        }

        async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()> {
            let index = self.first_visible(selector).await?;
            let target = marked(index);
            let element = self
                .page
                .find_element(target.clone())
                .await
                .map_err(harness_err)?;
            element.click().await.map_err(harness_err)?;
            let _: bool = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({}); el.value = ''; return true; }})()",
                    serde_json::to_string(&target)?
                ))
                .await?;
            element.type_str(text).await.map_err(harness_err)?;
            Ok(())
        }

        async fn select_option(&self, selector: &Selector, label: &str) -> ProbeResult<()> {
            let index = self.first_visible(selector).await?;
            let chosen: bool = self
                .eval(format!(
                    r"(() => {{
  const el = document.querySelector({target});
  const wanted = {label};
  const opt = Array.from(el.options || []).find(o => o.label.trim() === wanted || o.text.trim() === wanted);
  if (!opt) return false;
  el.value = opt.value;
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return true;
}})()",
                    target = serde_json::to_string(&marked(index))?,
                    label = serde_json::to_string(label)?,
                ))
                .await?;
            if chosen {
                Ok(())
            } else {
                Err(ProbeError::harness(format!(
                    "option '{label}' not found in {selector}"
                )))
            }
        }

        async fn check(&self, selector: &Selector) -> ProbeResult<()> {
            let index = self.first_visible(selector).await?;
            let checked: bool = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({}); if (!el.checked) el.click(); return el.checked; }})()",
                    serde_json::to_string(&marked(index))?
                ))
                .await?;
            if checked {
                Ok(())
            } else {
                Err(ProbeError::harness(format!("{selector} did not become checked")))
            }
        }

        async fn current_url(&self) -> ProbeResult<String> {
            Ok(self
                .page
                .url()
                .await
                .map_err(harness_err)?
                .unwrap_or_default())
        }

        async fn title(&self) -> ProbeResult<String> {
            Ok(self
                .page
                .get_title()
                .await
                .map_err(harness_err)?
                .unwrap_or_default())
        }

        async fn scroll_to_end(&self) -> ProbeResult<()> {
            let _: bool = self
                .eval(
                    "(() => { window.scrollTo(0, document.documentElement.scrollHeight); return true; })()"
                        .to_string(),
                )
                .await?;
            Ok(())
        }

        async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot = self.page.execute(params).await.map_err(harness_err)?;

            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(harness_err)
        }

        async fn close(&self) -> ProbeResult<()> {
            self.page.clone().close().await.map_err(harness_err)
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumBrowser, ChromiumPage};
