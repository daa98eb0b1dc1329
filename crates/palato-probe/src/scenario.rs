//! End-to-end scenarios.
//!
//! Each [`Scenario`] is one self-contained page or flow check. Legal pages and
//! portfolio projects are table-driven: one variant carries its record and the
//! scenario name is suffixed with the record key.

use crate::assertions::ScenarioAssertions;
use crate::config::RunConfig;
use crate::harness::BrowserHarness;
use crate::locator::{LocatorSpec, Selector, TextMatch};
use crate::result::{ProbeError, ProbeResult};
use crate::site::{
    self, about, contact, not_found, services, ContactForm, LegalPage, PortfolioProject,
    LEGAL_PAGES, PORTFOLIO_PROJECTS,
};
use crate::url_pattern::UrlPattern;
use std::fmt;
use tracing::{debug, info};

/// One end-to-end check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Homepage title carries the brand
    HomepageTitle,
    /// Homepage chrome, navigation, CTA, social and legal links
    HomepageSanity,
    /// About page reached from the menu
    AboutPage,
    /// Services page reached from the menu
    ServicesPage,
    /// Contact page reached from the menu, then the form
    ContactFull,
    /// Contact form on a directly loaded contact page
    ContactForm,
    /// Not-found page on an invalid path
    NotFound,
    /// One legal page
    LegalPage(LegalPage),
    /// One portfolio project page
    PortfolioProject(PortfolioProject),
}

impl Scenario {
    /// Every scenario, in run order
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut scenarios = vec![
            Self::HomepageTitle,
            Self::HomepageSanity,
            Self::AboutPage,
            Self::ServicesPage,
            Self::ContactFull,
            Self::ContactForm,
            Self::NotFound,
        ];
        scenarios.extend(LEGAL_PAGES.into_iter().map(Self::LegalPage));
        scenarios.extend(PORTFOLIO_PROJECTS.into_iter().map(Self::PortfolioProject));
        scenarios
    }

    /// Scenarios whose name contains `filter` (all when `None`)
    #[must_use]
    pub fn matching(filter: Option<&str>) -> Vec<Self> {
        Self::all()
            .into_iter()
            .filter(|s| filter.map_or(true, |f| s.name().contains(f)))
            .collect()
    }

    /// Human-readable name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::HomepageTitle => "homepage_title".to_string(),
            Self::HomepageSanity => "homepage_sanity".to_string(),
            Self::AboutPage => "about_page".to_string(),
            Self::ServicesPage => "services_page".to_string(),
            Self::ContactFull => "contact_full".to_string(),
            Self::ContactForm => "contact_form".to_string(),
            Self::NotFound => "not_found".to_string(),
            Self::LegalPage(page) => format!("legal_page[{}]", page.key),
            Self::PortfolioProject(project) => format!("portfolio_project[{}]", project.slug),
        }
    }

    /// Run against a loaded harness.
    ///
    /// # Errors
    ///
    /// The first failed assertion.
    pub async fn execute<H: BrowserHarness + ?Sized>(
        &self,
        harness: &H,
        config: &RunConfig,
    ) -> ProbeResult<()> {
        match self {
            Self::HomepageTitle => homepage_title(harness, config).await,
            Self::HomepageSanity => homepage_sanity(harness, config).await,
            Self::AboutPage => about_page(harness, config).await,
            Self::ServicesPage => services_page(harness, config).await,
            Self::ContactFull => contact_full(harness, config).await,
            Self::ContactForm => contact_form(harness, config).await,
            Self::NotFound => not_found_page(harness, config).await,
            Self::LegalPage(page) => legal_page(harness, config, page).await,
            Self::PortfolioProject(project) => portfolio_project(harness, config, project).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

async fn open<H: BrowserHarness + ?Sized>(
    harness: &H,
    url: &str,
    assertions: &ScenarioAssertions<'_, H>,
) -> ProbeResult<()> {
    harness.navigate(url).await?;
    assertions.verifier().accept_cookies_if_present().await;
    Ok(())
}

async fn homepage_title<H: BrowserHarness + ?Sized>(harness: &H, config: &RunConfig) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    harness.navigate(config.base_url()).await?;
    a.assert_title_contains(site::TITLE_TEXT).await
}

async fn homepage_sanity<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, config.base_url(), &a).await?;
    a.assert_title_contains(site::TITLE_TEXT).await?;
    a.verifier().verify_header().await?;

    for (label, path) in site::NAV_LINKS {
        a.assert_link_href(label, &format!(".*{}", regex::escape(path)))
            .await?;
    }
    a.assert_link_href(site::PORTFOLIO_LABEL, site::PORTFOLIO_HREF_PATTERN)
        .await?;

    let cta = Selector::text(TextMatch::partial(site::CTA_HEADING));
    if harness.is_visible(&cta, config.timeouts.optional()).await? {
        let links = harness.query(&Selector::link(site::CTA_LINK)).await?;
        let reachable = links
            .iter()
            .any(|l| l.visible && l.href().is_some_and(|h| h.contains(site::CTA_TARGET)));
        if !reachable {
            return Err(ProbeError::assertion(format!(
                "no visible '{}' link pointing to {} in the CTA section",
                site::CTA_LINK,
                site::CTA_TARGET
            )));
        }
    } else {
        debug!("CTA section not shown");
    }

    a.verifier().verify_footer().await?;

    for network in site::SOCIAL_NETWORKS {
        let spec = LocatorSpec::new(format!("{network} link"), Selector::link(network)).or(
            Selector::attribute("a", "href", TextMatch::partial(network.to_lowercase())),
        );
        a.assert_any_visible(&spec).await?;
    }

    for legal in site::LEGAL_LINKS {
        harness
            .wait_until_visible(&Selector::link(legal), config.timeouts.element())
            .await?;
    }
    Ok(())
}

async fn about_page<H: BrowserHarness + ?Sized>(harness: &H, config: &RunConfig) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, config.base_url(), &a).await?;
    a.assert_navigates_to(about::LINK, &UrlPattern::Contains(about::PATH.to_string()))
        .await?;
    a.assert_heading_visible(about::HEADING, false).await?;
    a.assert_text_visible(about::INTRO, false).await?;
    a.assert_text_visible(about::PHILOSOPHY, false).await?;
    for card in about::CARDS {
        a.assert_text_visible(card, false).await?;
    }
    a.verifier().verify_header().await?;
    a.verifier().verify_footer().await
}

async fn services_page<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, config.base_url(), &a).await?;
    a.assert_navigates_to(
        services::LINK,
        &UrlPattern::Contains(services::PATH.to_string()),
    )
    .await?;
    a.assert_heading_visible(services::HEADING, true).await?;
    a.assert_text_visible(services::SUBTITLE, false).await?;
    a.assert_heading_visible(services::FIRST_SERVICE, false).await?;
    a.verifier().verify_header().await?;
    a.verifier().verify_footer().await
}

async fn contact_full<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, config.base_url(), &a).await?;
    a.assert_navigates_to(
        contact::LINK,
        &UrlPattern::Contains(contact::PATH.to_string()),
    )
    .await?;
    a.assert_heading_visible(contact::HEADING, false).await?;
    for text in contact::TEXTS {
        a.assert_text_visible(text, false).await?;
    }
    let outcome = a.submit_contact_form(&ContactForm::automated()).await?;
    info!(%outcome, "contact form outcome");
    Ok(())
}

async fn contact_form<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, &config.url_for(contact::PATH), &a).await?;
    let outcome = a.submit_contact_form(&ContactForm::automated()).await?;
    info!(%outcome, "contact form outcome");
    Ok(())
}

async fn not_found_page<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    a.assert_not_found_page(&config.url_for(not_found::PATH))
        .await?;
    a.assert_url_matches(&UrlPattern::regex(&format!(
        ".*{}",
        regex::escape(not_found::PATH)
    ))?)
    .await?;
    a.verifier().accept_cookies_if_present().await;
    a.verifier().verify_header().await?;
    a.verifier().verify_footer().await
}

async fn legal_page<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
    page: &LegalPage,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    open(harness, &config.url_for(page.path), &a).await?;
    a.assert_url_matches(&UrlPattern::path(page.path)).await?;
    a.assert_heading_visible(page.title, false).await?;
    a.assert_sections_present(page.sections).await?;
    a.verifier().verify_header().await?;
    if page.check_footer {
        a.verifier().verify_footer().await?;
    } else {
        debug!(page = page.key, "footer check skipped");
    }
    Ok(())
}

async fn portfolio_project<H: BrowserHarness + ?Sized>(
    harness: &H,
    config: &RunConfig,
    project: &PortfolioProject,
) -> ProbeResult<()> {
    let a = ScenarioAssertions::new(harness, config.timeouts);
    let path = project.path();
    open(harness, &config.url_for(&path), &a).await?;
    a.assert_url_matches(&UrlPattern::path(path)).await?;
    a.assert_heading_visible(project.title, true).await?;
    a.assert_sections_present(project.subsections).await?;
    harness
        .wait_until_visible(
            &Selector::attribute("a", "href", TextMatch::exact(project.website)),
            config.timeouts.element(),
        )
        .await?;
    a.verifier().verify_header().await?;
    a.verifier().verify_footer().await?;
    a.assert_text_visible(site::PORTFOLIO_FOOTER_TEXT, false).await
}
