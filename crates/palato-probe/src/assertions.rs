//! Per-page assertion recipes.
//!
//! [`ScenarioAssertions`] composes harness calls and [`PageVerifier`] checks
//! into the steps scenarios are written in: follow a link and land on a URL,
//! see a heading, see every section, submit the contact form.

use crate::fallback::{self, Resolved};
use crate::harness::BrowserHarness;
use crate::locator::{AriaRole, LocatorSpec, Requirement, Selector, TextMatch};
use crate::result::{ProbeError, ProbeResult};
use crate::site::{contact, not_found, ContactForm};
use crate::url_pattern::UrlPattern;
use crate::verifier::PageVerifier;
use crate::wait::{millis, poll_until, Timeouts};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How the contact form answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormOutcome {
    /// Success phrase shown
    Accepted,
    /// Rejection phrase shown (expected while the reCAPTCHA is active)
    Rejected,
}

impl FormOutcome {
    fn classify(text: &str) -> Option<Self> {
        if TextMatch::partial(contact::SUCCESS_PHRASE).matches(text) {
            Some(Self::Accepted)
        } else if TextMatch::partial(contact::REJECTION_PHRASE).matches(text) {
            Some(Self::Rejected)
        } else {
            None
        }
    }
}

impl std::fmt::Display for FormOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// Assertion recipes over one page
#[derive(Debug)]
pub struct ScenarioAssertions<'a, H: BrowserHarness + ?Sized> {
    harness: &'a H,
    verifier: PageVerifier<'a, H>,
    timeouts: Timeouts,
}

impl<'a, H: BrowserHarness + ?Sized> ScenarioAssertions<'a, H> {
    /// Recipes for the page held by `harness`
    #[must_use]
    pub fn new(harness: &'a H, timeouts: Timeouts) -> Self {
        Self {
            harness,
            verifier: PageVerifier::new(harness, timeouts),
            timeouts,
        }
    }

    /// Structural checks for the same page
    #[must_use]
    pub const fn verifier(&self) -> &PageVerifier<'a, H> {
        &self.verifier
    }

    /// Click the first visible link whose name contains `label`, then wait
    /// for the URL to match.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotVisible`] when the link never shows,
    /// [`ProbeError::UrlMismatch`] when the URL never matches.
    pub async fn assert_navigates_to(&self, label: &str, expected: &UrlPattern) -> ProbeResult<()> {
        let link = Selector::link(label);
        self.harness
            .wait_until_visible(&link, self.timeouts.element())
            .await?;
        debug!(label, "following link");
        self.harness.click(&link).await?;
        self.assert_url_matches(expected).await
    }

    /// Wait for the document URL to match.
    ///
    /// # Errors
    ///
    /// [`ProbeError::UrlMismatch`] carrying the last URL seen.
    pub async fn assert_url_matches(&self, expected: &UrlPattern) -> ProbeResult<()> {
        let harness = self.harness;
        let matched = poll_until(
            self.timeouts.navigation(),
            self.harness.poll_interval(),
            move || async move {
                match harness.current_url().await {
                    Ok(url) => expected.matches(&url).then_some(Ok(())),
                    Err(e) => Some(Err(e)),
                }
            },
        )
        .await;
        match matched {
            Some(result) => result,
            None => Err(ProbeError::UrlMismatch {
                expected: expected.to_string(),
                actual: self.harness.current_url().await?,
                timeout_ms: self.timeouts.navigation_ms,
            }),
        }
    }

    /// A heading with the text becomes visible.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotVisible`] after the element wait.
    pub async fn assert_heading_visible(&self, text: &str, exact: bool) -> ProbeResult<()> {
        let heading = self.harness.locate_by_role(AriaRole::Heading, text, exact);
        self.harness
            .wait_until_visible(&heading, self.timeouts.element())
            .await
            .map(|_| ())
    }

    /// Every section heading is visible, in any order.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AssertionFailed`] listing every missing section.
    pub async fn assert_sections_present(&self, sections: &[&str]) -> ProbeResult<()> {
        let mut missing = Vec::new();
        for section in sections {
            let heading = self.harness.locate_by_role(AriaRole::Heading, section, false);
            if !self
                .harness
                .is_visible(&heading, self.timeouts.element())
                .await?
            {
                missing.push(format!("'{section}'"));
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "sections not visible: {}",
                missing.join(", ")
            )))
        }
    }

    /// Some element carrying the text becomes visible.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotVisible`] after the element wait.
    pub async fn assert_text_visible(&self, text: &str, exact: bool) -> ProbeResult<()> {
        let selector = self.harness.locate_by_text(text, exact);
        self.harness
            .wait_until_visible(&selector, self.timeouts.element())
            .await
            .map(|_| ())
    }

    /// The title contains the text.
    ///
    /// # Errors
    ///
    /// [`ProbeError::TitleMismatch`] with the observed title.
    pub async fn assert_title_contains(&self, text: &str) -> ProbeResult<()> {
        self.assert_title(&TextMatch::partial(text), format!("containing '{text}'"))
            .await
    }

    /// The title matches the regular expression.
    ///
    /// # Errors
    ///
    /// [`ProbeError::TitleMismatch`] with the observed title, or
    /// [`ProbeError::Config`] when `pattern` is not a valid regex.
    pub async fn assert_title_matches(&self, pattern: &str) -> ProbeResult<()> {
        self.assert_title(&TextMatch::pattern(pattern)?, format!("/{pattern}/"))
            .await
    }

    async fn assert_title(&self, expected: &TextMatch, description: String) -> ProbeResult<()> {
        let harness = self.harness;
        let matched = poll_until(
            self.timeouts.element(),
            self.harness.poll_interval(),
            move || async move {
                match harness.title().await {
                    Ok(title) => expected.matches(&title).then_some(Ok(())),
                    Err(e) => Some(Err(e)),
                }
            },
        )
        .await;
        match matched {
            Some(result) => result,
            None => Err(ProbeError::TitleMismatch {
                expected: description,
                actual: self.harness.title().await?,
            }),
        }
    }

    /// The first visible link named `label` has an `href` matching `pattern`.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotVisible`] or [`ProbeError::AssertionFailed`]
    /// with the observed `href`. [`ProbeError::Config`] when `pattern` is not
    /// a valid regex.
    pub async fn assert_link_href(&self, label: &str, pattern: &str) -> ProbeResult<()> {
        let expected = TextMatch::pattern(pattern)?;
        let link = self.harness.locate_by_role(AriaRole::Link, label, false);
        let element = self
            .harness
            .wait_until_visible(&link, self.timeouts.element())
            .await?;
        let href = element.href().unwrap_or_default();
        if expected.matches(href) {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "link '{label}' href '{href}' does not match /{pattern}/"
            )))
        }
    }

    /// Some strategy of the chain finds a visible element.
    ///
    /// # Errors
    ///
    /// [`ProbeError::FallbackExhausted`] listing every strategy.
    pub async fn assert_any_visible(&self, spec: &LocatorSpec) -> ProbeResult<Resolved> {
        fallback::resolve(self.harness, spec, self.timeouts.element()).await
    }

    /// Fill and submit the contact form, then classify the response.
    ///
    /// Both the success and the rejection phrase pass; the outcome is logged.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotVisible`] when a field or the response region
    /// never shows, [`ProbeError::AmbiguousOutcome`] naming the observed text
    /// when it carries neither phrase.
    pub async fn submit_contact_form(&self, form: &ContactForm) -> ProbeResult<FormOutcome> {
        let timeout = self.timeouts.element();
        let name = Selector::named_control(contact::FIELD_NAME);
        self.harness.wait_until_visible(&name, timeout).await?;

        self.harness.fill(&name, &form.name).await?;
        self.harness
            .fill(&Selector::named_control(contact::FIELD_EMAIL), &form.email)
            .await?;
        self.harness
            .fill(&Selector::named_control(contact::FIELD_PHONE), &form.phone)
            .await?;
        self.harness
            .select_option(
                &Selector::named_control(contact::FIELD_INTEREST),
                &form.interest,
            )
            .await?;
        self.harness
            .fill(&Selector::named_control(contact::FIELD_MESSAGE), &form.message)
            .await?;
        self.harness
            .check(&Selector::named_control(contact::FIELD_CONSENT))
            .await?;
        self.harness
            .click(&Selector::css(contact::SUBMIT_CSS))
            .await?;
        debug!("contact form submitted");

        let response = Selector::css(contact::RESPONSE_CSS);
        let harness = self.harness;
        let response_ref = &response;
        let outcome = poll_until(
            self.timeouts.form_response(),
            self.harness.poll_interval(),
            move || async move {
                match harness.query(response_ref).await {
                    Ok(elements) => elements
                        .iter()
                        .filter(|e| Requirement::Visible.holds_for(e))
                        .find_map(|e| FormOutcome::classify(&e.text))
                        .map(Ok),
                    Err(e) => Some(Err(e)),
                }
            },
        )
        .await
        .transpose()?;

        if let Some(outcome) = outcome {
            info!(%outcome, "contact form answered");
            return Ok(outcome);
        }

        let shown = self
            .harness
            .query(&response)
            .await?
            .into_iter()
            .find(|e| e.visible);
        match shown {
            Some(element) => {
                warn!(text = %element.text, "contact form answered with unknown text");
                Err(ProbeError::AmbiguousOutcome {
                    expected: vec![
                        contact::SUCCESS_PHRASE.to_string(),
                        contact::REJECTION_PHRASE.to_string(),
                    ],
                    actual: element.text,
                })
            }
            None => Err(ProbeError::ElementNotVisible {
                description: format!("form response {}", contact::RESPONSE_CSS),
                timeout_ms: millis(self.timeouts.form_response()),
            }),
        }
    }

    /// Load a path that does not exist and confirm the not-found page.
    ///
    /// A visible heading or the title must carry the not-found vocabulary.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Navigation`] when the document fails to load,
    /// [`ProbeError::AssertionFailed`] naming the title otherwise.
    pub async fn assert_not_found_page(&self, url: &str) -> ProbeResult<()> {
        self.harness.navigate(url).await?;
        let loaded = self.harness.current_url().await?;
        if loaded.is_empty() || loaded == "about:blank" {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "document did not load".to_string(),
            });
        }

        let not_found_text = TextMatch::pattern(not_found::PATTERN)?;
        let heading = Selector::role(AriaRole::Heading, not_found_text.clone());
        if self
            .harness
            .is_visible(&heading, self.timeouts.element())
            .await?
        {
            return Ok(());
        }

        let title = self.harness.title().await?;
        if not_found_text.matches(&title) {
            debug!(%title, "not-found confirmed by title");
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "no not-found heading and title '{title}' does not match /{}/",
                not_found::PATTERN
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClickEffect, FakeElement, FakePage, FakeSite, MockHarness};

    const HOME: &str = "https://example.test/";

    fn form_page(response: &str) -> FakePage {
        FakePage::new("https://example.test/contacto/", "Contacto")
            .with(FakeElement::control("input", contact::FIELD_NAME))
            .with(FakeElement::control("input", contact::FIELD_EMAIL))
            .with(FakeElement::control("input", contact::FIELD_PHONE))
            .with(
                FakeElement::control("select", contact::FIELD_INTEREST)
                    .with_options(&["Desenvolvimento Web", "Marketing Digital"]),
            )
            .with(FakeElement::control("textarea", contact::FIELD_MESSAGE))
            .with(FakeElement::control("input", contact::FIELD_CONSENT))
            .with(
                FakeElement::new("input", "Enviar")
                    .with_css(contact::SUBMIT_CSS)
                    .on_click(ClickEffect::Reveal("response".into())),
            )
            .with(
                FakeElement::new("div", response)
                    .with_css(contact::RESPONSE_CSS)
                    .with_key("response")
                    .hidden(),
            )
    }

    async fn open(page: FakePage) -> MockHarness {
        let url = page.url.clone();
        let site = FakeSite::new()
            .page(page)
            .page(FakePage::new("https://example.test/sobre/", "Sobre"))
            .not_found(
                FakePage::new("", "Página não encontrada – Palato Digital")
                    .with(FakeElement::heading("Ups! Nada encontrado")),
            );
        let h = MockHarness::new(site);
        h.navigate(&url).await.unwrap();
        h
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigates_to() {
            let h = open(FakePage::new(HOME, "Home").with(FakeElement::link(" SOBRE ", "/sobre/"))).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_navigates_to("Sobre", &UrlPattern::Contains("/sobre/".into()))
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_wrong_destination_reports_actual_url() {
            let h = open(FakePage::new(HOME, "Home").with(FakeElement::link("Sobre", "/sobre/"))).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a
                .assert_navigates_to("Sobre", &UrlPattern::path("/servicos/"))
                .await
                .unwrap_err();
            match err {
                ProbeError::UrlMismatch { expected, actual, .. } => {
                    assert!(expected.contains("/servicos/"));
                    assert_eq!(actual, "https://example.test/sobre/");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_missing_link() {
            let h = open(FakePage::new(HOME, "Home")).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a
                .assert_navigates_to("Sobre", &UrlPattern::path("/sobre/"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotVisible { .. }));
            assert!(!h.was_called("click:"));
        }

        #[tokio::test]
        async fn test_link_href() {
            let h = open(FakePage::new(HOME, "Home").with(FakeElement::link("Portfólio", "https://example.test/#portfolio"))).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_link_href("Portfólio", r".*(/|#.*)$").await.unwrap();
            let err = a.assert_link_href("Portfólio", "contacto").await.unwrap_err();
            assert!(err.to_string().contains("#portfolio"));
        }
    }

    mod content_tests {
        use super::*;

        fn legal() -> FakePage {
            FakePage::new(HOME, "Política de Cookies – Palato Digital")
                .with(FakeElement::heading("Política de Cookies"))
                .with(FakeElement::heading("O que são Cookies?"))
                .with(FakeElement::heading("Como Utilizamos os Cookies?"))
        }

        #[tokio::test]
        async fn test_heading_exact_and_partial() {
            let h = open(legal()).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_heading_visible("Política de Cookies", true).await.unwrap();
            a.assert_heading_visible("cookies", false).await.unwrap();
            assert!(a.assert_heading_visible("Cookies", true).await.is_err());
        }

        #[tokio::test]
        async fn test_sections_in_any_order() {
            let h = open(legal()).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_sections_present(&["Como Utilizamos os Cookies?", "O que são Cookies?"])
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_every_missing_section_is_listed() {
            let h = open(legal()).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a
                .assert_sections_present(&["O que são Cookies?", "Declaração", "Contacto"])
                .await
                .unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("'Declaração'"));
            assert!(msg.contains("'Contacto'"));
            assert!(!msg.contains("O que são"));
        }

        #[tokio::test]
        async fn test_title() {
            let h = open(legal()).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_title_contains("Palato Digital").await.unwrap();
            a.assert_title_matches(r"(?i)cookies").await.unwrap();
            let err = a.assert_title_contains("Serviços").await.unwrap_err();
            assert!(matches!(err, ProbeError::TitleMismatch { .. }));
            assert!(err.to_string().contains("Política de Cookies"));
        }

        #[tokio::test]
        async fn test_malformed_title_regex_is_config_error() {
            let h = open(legal()).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a.assert_title_matches("(").await.unwrap_err();
            assert!(err.is_config());
            assert!(!h.was_called("title"));
        }

        #[tokio::test]
        async fn test_text_visible() {
            let h = open(FakePage::new(HOME, "t").with(FakeElement::text("Explore mais projetos"))).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_text_visible("Explore mais", false).await.unwrap();
            assert!(a.assert_text_visible("Explore mais", true).await.is_err());
        }

        #[tokio::test]
        async fn test_any_visible_uses_fallback() {
            let h = open(FakePage::new(HOME, "t").with(
                FakeElement::new("a", "").with_attribute("href", "https://www.behance.net/palato"),
            ))
            .await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let spec = LocatorSpec::new("Behance", Selector::link("Behance"))
                .or(Selector::attribute("a", "href", TextMatch::partial("behance")));
            let got = a.assert_any_visible(&spec).await.unwrap();
            assert_eq!(got.strategy, 1);
        }
    }

    mod form_tests {
        use super::*;

        #[tokio::test]
        async fn test_rejection_passes() {
            let h = open(form_page(
                "Ocorreu um erro ao tentar enviar a sua mensagem. Por favor, tente novamente mais tarde.",
            ))
            .await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let outcome = a.submit_contact_form(&ContactForm::automated()).await.unwrap();
            assert_eq!(outcome, FormOutcome::Rejected);
            assert_eq!(h.value_of("your-name").as_deref(), Some("Automated Test"));
            assert_eq!(h.value_of("your-email").as_deref(), Some("test@palatodigital.com"));
            assert_eq!(h.value_of("your-phone").as_deref(), Some("932001002"));
            assert_eq!(h.value_of("your-interest").as_deref(), Some("Desenvolvimento Web"));
            assert_eq!(h.value_of("acceptance-policies").as_deref(), Some("on"));
        }

        #[tokio::test]
        async fn test_success_passes() {
            let h = open(form_page("Obrigado! A sua mensagem foi enviada com sucesso.")).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let outcome = a.submit_contact_form(&ContactForm::automated()).await.unwrap();
            assert_eq!(outcome, FormOutcome::Accepted);
        }

        #[tokio::test]
        async fn test_unknown_text_is_ambiguous() {
            let h = open(form_page("Campo obrigatório em falta.")).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            match a.submit_contact_form(&ContactForm::automated()).await.unwrap_err() {
                ProbeError::AmbiguousOutcome { actual, expected } => {
                    assert_eq!(actual, "Campo obrigatório em falta.");
                    assert_eq!(expected.len(), 2);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_no_response_fails() {
            let mut page = form_page("never shown");
            if let Some(submit) = page.elements.iter_mut().find(|e| e.on_click.is_some()) {
                submit.on_click = None;
            }
            let h = open(page).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a
                .submit_contact_form(&ContactForm::automated())
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotVisible { .. }));
            assert!(err.to_string().contains(".wpcf7-response-output"));
        }
    }

    mod not_found_tests {
        use super::*;

        #[tokio::test]
        async fn test_heading_confirms() {
            let h = open(FakePage::new(HOME, "Home")).await;
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_not_found_page("https://example.test/pagina-que-nao-existe-12345")
                .await
                .unwrap();
            assert_eq!(
                h.current_url().await.unwrap(),
                "https://example.test/pagina-que-nao-existe-12345"
            );
        }

        #[tokio::test]
        async fn test_title_alone_confirms() {
            let site = FakeSite::new().not_found(FakePage::new("", "Erro 404"));
            let h = MockHarness::new(site);
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            a.assert_not_found_page("https://example.test/x").await.unwrap();
        }

        #[tokio::test]
        async fn test_regular_page_fails() {
            let site = FakeSite::new().not_found(
                FakePage::new("", "Palato Digital").with(FakeElement::heading("Bem-vindo")),
            );
            let h = MockHarness::new(site);
            let a = ScenarioAssertions::new(&h, Timeouts::fast());
            let err = a
                .assert_not_found_page("https://example.test/x")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("'Palato Digital'"));
        }
    }
}
