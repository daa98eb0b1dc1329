//! Site-wide structural checks.
//!
//! [`PageVerifier`] answers "does this page carry the site chrome": cookie
//! banner dismissed, header with brand and primary navigation, footer. The
//! site literals live in a [`ChromeProfile`].

use crate::fallback;
use crate::harness::BrowserHarness;
use crate::locator::{AriaRole, LocatorSpec, Selector, TextMatch};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{millis, poll_until, Timeouts};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Header, footer and consent banner of one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeProfile {
    /// Brand name shown in the logo and footer
    pub brand: String,
    /// Structural selectors for the logo, tried after the accessible name
    pub logo_css: Vec<String>,
    /// Primary navigation labels
    pub nav_labels: Vec<String>,
    /// Regex for the accessible name of the consent-accept button
    pub cookie_accept: String,
    /// Regex for the copyright or rights notice
    pub rights_notice: String,
}

impl Default for ChromeProfile {
    fn default() -> Self {
        Self::palato_digital()
    }
}

impl ChromeProfile {
    /// The Palato Digital site chrome
    #[must_use]
    pub fn palato_digital() -> Self {
        Self {
            brand: "Palato Digital".to_string(),
            logo_css: vec!["#logo".to_string(), ".custom-logo-link".to_string()],
            nav_labels: vec![
                "Serviços".to_string(),
                "Sobre".to_string(),
                "Vamos falar".to_string(),
            ],
            cookie_accept: r"(?i)aceitar|accept|concordo|permitir".to_string(),
            rights_notice: r"(?i)©|copyright|direitos reservados|all rights reserved".to_string(),
        }
    }

    /// Consent-accept button.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] when `cookie_accept` is not a valid regex.
    pub fn cookie_button(&self) -> ProbeResult<Selector> {
        Ok(Selector::role(
            AriaRole::Button,
            TextMatch::pattern(&self.cookie_accept)?,
        ))
    }

    /// Brand logo: accessible name first, then structural selectors
    #[must_use]
    pub fn brand_spec(&self) -> LocatorSpec {
        self.logo_css.iter().fold(
            LocatorSpec::new("header brand", Selector::link(self.brand.as_str())),
            |spec, css| spec.or(Selector::css(css.as_str())),
        )
    }

    /// Footer container, then brand text, then rights notice.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] when `rights_notice` is not a valid regex.
    pub fn footer_spec(&self) -> ProbeResult<LocatorSpec> {
        Ok(
            LocatorSpec::rendered("footer", Selector::any_role(AriaRole::ContentInfo))
                .or_rendered(Selector::css("footer"))
                .or(Selector::text(TextMatch::partial(self.brand.as_str())))
                .or(Selector::text(TextMatch::pattern(&self.rights_notice)?)),
        )
    }
}

/// Structural checks against the page held by a harness
#[derive(Debug)]
pub struct PageVerifier<'a, H: BrowserHarness + ?Sized> {
    harness: &'a H,
    profile: ChromeProfile,
    timeouts: Timeouts,
}

impl<'a, H: BrowserHarness + ?Sized> PageVerifier<'a, H> {
    /// Verifier for the Palato Digital chrome
    #[must_use]
    pub fn new(harness: &'a H, timeouts: Timeouts) -> Self {
        Self {
            harness,
            profile: ChromeProfile::default(),
            timeouts,
        }
    }

    /// Use another site chrome
    #[must_use]
    pub fn with_profile(mut self, profile: ChromeProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Active profile
    #[must_use]
    pub const fn profile(&self) -> &ChromeProfile {
        &self.profile
    }

    /// Dismiss the consent banner if it shows up within the optional wait.
    ///
    /// Never fails. A missing banner, a failed click, or a banner that stays
    /// up are logged at debug level and otherwise ignored.
    pub async fn accept_cookies_if_present(&self) {
        let button = match self.profile.cookie_button() {
            Ok(button) => button,
            Err(e) => {
                debug!(error = %e, "cookie button pattern rejected");
                return;
            }
        };
        match self.harness.is_visible(&button, self.timeouts.optional()).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("no cookie banner");
                return;
            }
            Err(e) => {
                debug!(error = %e, "cookie banner lookup failed");
                return;
            }
        }

        if let Err(e) = self.harness.click(&button).await {
            debug!(error = %e, "cookie banner click failed");
            return;
        }

        let harness = self.harness;
        let button = &button;
        let gone = poll_until(
            self.timeouts.optional(),
            self.harness.poll_interval(),
            move || async move {
                match harness.query(button).await {
                    Ok(elements) => (!elements.iter().any(|e| e.visible)).then_some(()),
                    Err(_) => Some(()),
                }
            },
        )
        .await;
        if gone.is_some() {
            info!("cookie banner accepted");
        } else {
            debug!("cookie banner still visible after accept");
        }
    }

    /// Brand logo visible, then every primary navigation label visible.
    ///
    /// # Errors
    ///
    /// [`ProbeError::FallbackExhausted`] when no logo strategy holds,
    /// [`ProbeError::ElementNotVisible`] naming the first missing label.
    pub async fn verify_header(&self) -> ProbeResult<()> {
        let timeout = self.timeouts.element();
        fallback::resolve(self.harness, &self.profile.brand_spec(), timeout).await?;

        for label in &self.profile.nav_labels {
            let link = Selector::link(label.as_str());
            if !self.harness.is_visible(&link, timeout).await? {
                return Err(ProbeError::ElementNotVisible {
                    description: format!("navigation link '{label}'"),
                    timeout_ms: millis(timeout),
                });
            }
        }
        debug!("header verified");
        Ok(())
    }

    /// Scroll to the end, then find the footer by container, brand text or
    /// rights notice.
    ///
    /// # Errors
    ///
    /// [`ProbeError::FallbackExhausted`] listing every strategy when none holds.
    pub async fn verify_footer(&self) -> ProbeResult<()> {
        self.harness.scroll_to_end().await?;
        let resolved = fallback::resolve(
            self.harness,
            &self.profile.footer_spec()?,
            self.timeouts.element(),
        )
        .await?;
        debug!(strategy = resolved.strategy, "footer verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClickEffect, FakeElement, FakePage, FakeSite, MockHarness};

    const URL: &str = "https://example.test/";

    async fn page(elements: Vec<FakeElement>) -> MockHarness {
        let h = MockHarness::new(FakeSite::new().page(FakePage::new(URL, "t").with_all(elements)));
        h.navigate(URL).await.unwrap();
        h
    }

    fn nav() -> Vec<FakeElement> {
        vec![
            FakeElement::link("Serviços", "/servicos/"),
            FakeElement::link("Sobre", "/sobre/"),
            FakeElement::link("Vamos falar", "/contacto/"),
        ]
    }

    fn verifier(h: &MockHarness) -> PageVerifier<'_, MockHarness> {
        PageVerifier::new(h, Timeouts::fast())
    }

    mod cookie_tests {
        use super::*;

        #[tokio::test]
        async fn test_absent_banner_is_noop() {
            let h = page(vec![]).await;
            verifier(&h).accept_cookies_if_present().await;
            assert!(!h.was_called("click:"));
        }

        #[tokio::test]
        async fn test_banner_is_dismissed_once() {
            let h = page(vec![FakeElement::button("Aceitar todos").on_click(ClickEffect::Dismiss)])
                .await;
            let v = verifier(&h);
            v.accept_cookies_if_present().await;
            assert_eq!(h.call_count("click:"), 1);
            v.accept_cookies_if_present().await;
            assert_eq!(h.call_count("click:"), 1);
        }

        #[tokio::test]
        async fn test_sticky_banner_does_not_fail() {
            let h = page(vec![FakeElement::button("Accept")]).await;
            verifier(&h).accept_cookies_if_present().await;
            assert!(h.was_called("click:"));
        }

        #[tokio::test]
        async fn test_malformed_button_regex_is_absorbed() {
            let h = page(vec![FakeElement::button("Aceitar")]).await;
            let profile = ChromeProfile {
                cookie_accept: "[aceitar".to_string(),
                ..ChromeProfile::default()
            };
            verifier(&h)
                .with_profile(profile)
                .accept_cookies_if_present()
                .await;
            assert!(!h.was_called("click:"));
        }

        #[tokio::test]
        async fn test_closed_page_is_absorbed() {
            let h = page(vec![]).await;
            h.close().await.unwrap();
            verifier(&h).accept_cookies_if_present().await;
        }
    }

    mod header_tests {
        use super::*;

        #[tokio::test]
        async fn test_brand_by_name() {
            let mut els = nav();
            els.push(FakeElement::link("Palato Digital", "/"));
            let h = page(els).await;
            verifier(&h).verify_header().await.unwrap();
        }

        #[tokio::test]
        async fn test_brand_by_structural_fallback() {
            let mut els = nav();
            els.push(FakeElement::new("a", "").with_css(".custom-logo-link"));
            let h = page(els).await;
            verifier(&h).verify_header().await.unwrap();
        }

        #[tokio::test]
        async fn test_missing_brand_lists_strategies() {
            let h = page(nav()).await;
            let err = verifier(&h).verify_header().await.unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("#logo"));
            assert!(msg.contains(".custom-logo-link"));
            assert!(msg.contains("Palato Digital"));
        }

        #[tokio::test]
        async fn test_missing_label_is_named() {
            let h = page(vec![
                FakeElement::new("a", "").with_css("#logo"),
                FakeElement::link("Serviços", "/servicos/"),
                FakeElement::link("Vamos falar", "/contacto/"),
            ])
            .await;
            let err = verifier(&h).verify_header().await.unwrap_err();
            assert!(err.to_string().contains("'Sobre'"));
        }

        #[tokio::test]
        async fn test_labels_are_case_tolerant() {
            let h = page(vec![
                FakeElement::new("a", "").with_css("#logo"),
                FakeElement::link(" SERVIÇOS ", "/servicos/"),
                FakeElement::link("sobre", "/sobre/"),
                FakeElement::link("Vamos  Falar", "/contacto/"),
            ])
            .await;
            verifier(&h).verify_header().await.unwrap();
        }
    }

    mod footer_tests {
        use super::*;

        #[tokio::test]
        async fn test_container_after_scroll() {
            let h = page(vec![FakeElement::new("footer", "")
                .with_role(AriaRole::ContentInfo)
                .below_fold()])
            .await;
            verifier(&h).verify_footer().await.unwrap();
            assert!(h.was_called("scroll_to_end"));
        }

        #[tokio::test]
        async fn test_brand_text_alone_suffices() {
            let h = page(vec![FakeElement::text("Palato Digital")]).await;
            verifier(&h).verify_footer().await.unwrap();
        }

        #[tokio::test]
        async fn test_rights_text_alone_suffices() {
            let h = page(vec![FakeElement::text("© 2025 Todos os direitos reservados")]).await;
            verifier(&h).verify_footer().await.unwrap();
        }

        #[tokio::test]
        async fn test_malformed_rights_regex_is_config_error() {
            let h = page(vec![FakeElement::text("© 2025 Todos os direitos reservados")]).await;
            let profile = ChromeProfile {
                rights_notice: "(?i)direitos(".to_string(),
                ..ChromeProfile::default()
            };
            let err = verifier(&h)
                .with_profile(profile)
                .verify_footer()
                .await
                .unwrap_err();
            assert!(err.is_config());
            assert!(err.to_string().contains("direitos("));
        }

        #[tokio::test]
        async fn test_zero_height_container_without_text_fails_listing_all() {
            let h = page(vec![FakeElement::new("footer", "")
                .with_role(AriaRole::ContentInfo)
                .with_height(0.0)])
            .await;
            match verifier(&h).verify_footer().await.unwrap_err() {
                ProbeError::FallbackExhausted { check, attempted } => {
                    assert_eq!(check, "footer");
                    assert_eq!(attempted.len(), 4);
                    assert!(attempted[0].contains("contentinfo"));
                    assert!(attempted[2].contains("Palato Digital"));
                    assert!(attempted[3].contains("direitos"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
