//! A scripted copy of the Palato Digital site.

#![allow(dead_code)]

use palato_probe::mock::{ClickEffect, FakeElement, FakePage, FakeSite};
use palato_probe::site::{self, about, contact, services};
use palato_probe::{AriaRole, Environment, RunConfig, Timeouts};

pub const BASE: &str = "https://palatodigital.com";

pub const REJECTED: &str =
    "Ocorreu um erro ao tentar enviar a sua mensagem. Por favor, tente novamente mais tarde.";

pub fn config() -> RunConfig {
    RunConfig::new(Environment::Production).with_timeouts(Timeouts::fast())
}

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub fn header() -> Vec<FakeElement> {
    vec![
        FakeElement::button("Aceitar").on_click(ClickEffect::Dismiss),
        FakeElement::link(site::BRAND, "/").with_css("#logo").container(),
        FakeElement::link("Serviços", "/servicos/"),
        FakeElement::link("Sobre", "/sobre/"),
        FakeElement::link("Portfólio", "/#portfolio"),
        FakeElement::link("Vamos falar", "/contacto/"),
    ]
}

pub fn footer() -> Vec<FakeElement> {
    vec![
        FakeElement::new("footer", "© 2025 Palato Digital. Todos os direitos reservados.")
            .with_role(AriaRole::ContentInfo)
            .container()
            .below_fold(),
        FakeElement::link("Instagram", "https://www.instagram.com/palatodigital"),
        FakeElement::link("Facebook", "https://www.facebook.com/palatodigital"),
        FakeElement::link("", "https://www.linkedin.com/company/palatodigital"),
        FakeElement::link("", "https://www.behance.net/palatodigital"),
        FakeElement::link("Politica de Privacidade", "/politica-de-privacidade/"),
        FakeElement::link("Politica de Cookies", "/politica-de-cookies/"),
        FakeElement::link("Termos e Condições", "/termos-e-condicoes-de-uso/"),
    ]
}

fn chrome(page: FakePage) -> FakePage {
    page.with_all(header()).with_all(footer())
}

pub fn home() -> FakePage {
    chrome(
        FakePage::new(&url("/"), site::HOMEPAGE_TITLE)
            .with(FakeElement::heading("O sabor da inovação digital"))
            .with(FakeElement::heading(site::CTA_HEADING))
            .with(FakeElement::link("Vamos falar →", "/contacto/")),
    )
}

pub fn about_page() -> FakePage {
    let mut page = FakePage::new(&url(about::PATH), "Sobre – Palato Digital")
        .with(FakeElement::heading(about::HEADING))
        .with(FakeElement::text(
            "O Palato Digital é o seu parceiro especialista em presença digital.",
        ))
        .with(FakeElement::heading(about::PHILOSOPHY));
    for card in about::CARDS {
        page = page.with(FakeElement::heading(card));
    }
    chrome(page)
}

pub fn services_page() -> FakePage {
    chrome(
        FakePage::new(&url(services::PATH), "Serviços – Palato Digital")
            .with(FakeElement::heading(services::HEADING))
            .with(FakeElement::text(services::SUBTITLE))
            .with(FakeElement::heading(services::FIRST_SERVICE)),
    )
}

pub fn contact_page(response: &str) -> FakePage {
    chrome(
        FakePage::new(&url(contact::PATH), "Contacto – Palato Digital")
            .with(FakeElement::heading(contact::HEADING))
            .with(FakeElement::text("Contacto"))
            .with(FakeElement::text(
                "Quer tenha uma ideia clara ou apenas uma vontade de crescer, fale connosco.",
            ))
            .with(FakeElement::text("geral@palatodigital.com"))
            .with(FakeElement::control("input", contact::FIELD_NAME))
            .with(FakeElement::control("input", contact::FIELD_EMAIL))
            .with(FakeElement::control("input", contact::FIELD_PHONE))
            .with(
                FakeElement::control("select", contact::FIELD_INTEREST)
                    .with_options(&["Desenvolvimento Web", "Branding", "Marketing Digital"]),
            )
            .with(FakeElement::control("textarea", contact::FIELD_MESSAGE))
            .with(FakeElement::control("input", contact::FIELD_CONSENT))
            .with(
                FakeElement::new("input", "Enviar")
                    .with_css(contact::SUBMIT_CSS)
                    .on_click(ClickEffect::Reveal("wpcf7".into())),
            )
            .with(
                FakeElement::new("div", response)
                    .with_css(contact::RESPONSE_CSS)
                    .with_key("wpcf7")
                    .hidden(),
            ),
    )
}

pub fn legal_pages() -> Vec<FakePage> {
    site::LEGAL_PAGES
        .iter()
        .map(|legal| {
            let mut page = FakePage::new(&url(legal.path), &format!("{} – Palato Digital", legal.title))
                .with(FakeElement::heading(legal.title))
                .with_all(legal.sections.iter().map(|s| FakeElement::heading(s)))
                .with_all(header());
            if legal.check_footer {
                page = page.with_all(footer());
            }
            page
        })
        .collect()
}

pub fn portfolio_pages() -> Vec<FakePage> {
    site::PORTFOLIO_PROJECTS
        .iter()
        .map(|project| {
            chrome(
                FakePage::new(
                    &url(&project.path()),
                    &format!("{} – Palato Digital", project.title),
                )
                .with(FakeElement::heading(project.title))
                .with_all(project.subsections.iter().map(|s| FakeElement::heading(s)))
                .with(FakeElement::link("Visitar website", project.website))
                .with(FakeElement::text("Explore mais projetos")),
            )
        })
        .collect()
}

pub fn not_found_page() -> FakePage {
    chrome(
        FakePage::new("", "Página não encontrada – Palato Digital")
            .with(FakeElement::heading("Ups! Página não encontrada")),
    )
}

pub fn site_from(pages: Vec<FakePage>) -> FakeSite {
    pages
        .into_iter()
        .fold(FakeSite::new().not_found(not_found_page()), FakeSite::page)
}

pub fn all_pages(response: &str) -> Vec<FakePage> {
    let mut pages = vec![home(), about_page(), services_page(), contact_page(response)];
    pages.extend(legal_pages());
    pages.extend(portfolio_pages());
    pages
}

pub fn palato_site() -> FakeSite {
    site_from(all_pages(REJECTED))
}
