//! Content catalog of the Palato Digital site.
//!
//! Paths, headings and texts the scenarios expect. Table-driven scenarios
//! iterate [`LEGAL_PAGES`] and [`PORTFOLIO_PROJECTS`].

use serde::{Deserialize, Serialize};

/// Brand name
pub const BRAND: &str = "Palato Digital";

/// Text every page title carries
pub const TITLE_TEXT: &str = "Palato Digital";

/// Full homepage title
pub const HOMEPAGE_TITLE: &str = "Palato Digital – O sabor da inovação digital";

/// Primary navigation: label and the path its `href` must contain
pub const NAV_LINKS: [(&str, &str); 3] = [
    ("Serviços", "/servicos/"),
    ("Sobre", "/sobre/"),
    ("Vamos falar", "/contacto/"),
];

/// Portfolio navigation label
pub const PORTFOLIO_LABEL: &str = "Portfólio";

/// Portfolio link points at the root or at an in-page anchor
pub const PORTFOLIO_HREF_PATTERN: &str = r".*(/|#.*)$";

/// Homepage call-to-action heading
pub const CTA_HEADING: &str = "Tem um projeto em mente?";

/// Label of the call-to-action link
pub const CTA_LINK: &str = "Vamos falar";

/// Path fragment the call-to-action link targets
pub const CTA_TARGET: &str = "contacto";

/// Social networks linked from the footer
pub const SOCIAL_NETWORKS: [&str; 4] = ["Instagram", "Facebook", "LinkedIn", "Behance"];

/// Legal links in the footer
pub const LEGAL_LINKS: [&str; 3] = [
    "Politica de Privacidade",
    "Politica de Cookies",
    "Termos e Condições",
];

/// About page
pub mod about {
    /// Page path
    pub const PATH: &str = "/sobre/";
    /// Navigation label
    pub const LINK: &str = "Sobre";
    /// Main heading
    pub const HEADING: &str = "O \"Palato\" por trás do Digital";
    /// Introduction
    pub const INTRO: &str = "O Palato Digital é o seu parceiro especialista";
    /// Philosophy section title
    pub const PHILOSOPHY: &str = "A nossa filosofia";
    /// Philosophy cards
    pub const CARDS: [&str; 3] = [
        "Parceiros, não fornecedores",
        "Performance, não “moda”",
        "Design, não decoração",
    ];
}

/// Services page
pub mod services {
    /// Page path
    pub const PATH: &str = "/servicos/";
    /// Navigation label
    pub const LINK: &str = "Serviços";
    /// Main heading, matched exactly
    pub const HEADING: &str = "Serviços";
    /// Subtitle
    pub const SUBTITLE: &str = "O que fazemos";
    /// First service card heading
    pub const FIRST_SERVICE: &str = "Estratégia e inovação digital";
}

/// Contact page and its Contact Form 7 form
pub mod contact {
    /// Page path
    pub const PATH: &str = "/contacto/";
    /// Navigation label
    pub const LINK: &str = "Vamos falar";
    /// Main heading
    pub const HEADING: &str = "Vamos falar";
    /// Static texts
    pub const TEXTS: [&str; 3] = ["Contacto", "Quer tenha uma ideia clara", "geral@palatodigital.com"];

    /// Name input
    pub const FIELD_NAME: &str = "your-name";
    /// Email input
    pub const FIELD_EMAIL: &str = "your-email";
    /// Phone input
    pub const FIELD_PHONE: &str = "your-phone";
    /// Interest dropdown
    pub const FIELD_INTEREST: &str = "your-interest";
    /// Message textarea
    pub const FIELD_MESSAGE: &str = "your-message";
    /// Privacy consent checkbox
    pub const FIELD_CONSENT: &str = "acceptance-policies";
    /// Submit control
    pub const SUBMIT_CSS: &str = "input[type=\"submit\"]";
    /// Response region
    pub const RESPONSE_CSS: &str = ".wpcf7-response-output";

    /// Phrase of an accepted submission
    pub const SUCCESS_PHRASE: &str = "enviada com sucesso";
    /// Phrase of a rejected submission (the reCAPTCHA blocks automated posts)
    pub const REJECTION_PHRASE: &str = "Ocorreu um erro";
}

/// Not-found handling
pub mod not_found {
    /// Path that never exists
    pub const PATH: &str = "/pagina-que-nao-existe-12345";
    /// Vocabulary of a not-found page, case-insensitive
    pub const PATTERN: &str = r"(?i)não encontrada|nada encontrado|erro 404|ups";
}

/// Text shown at the end of a portfolio project page
pub const PORTFOLIO_FOOTER_TEXT: &str = "Explore mais";

/// One legal page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalPage {
    /// Record key, used in the scenario name
    pub key: &'static str,
    /// Page path
    pub path: &'static str,
    /// Heading with the page title
    pub title: &'static str,
    /// Section headings
    pub sections: &'static [&'static str],
    /// Whether the footer is checked
    pub check_footer: bool,
}

/// Privacy, cookie and terms pages
pub const LEGAL_PAGES: [LegalPage; 3] = [
    LegalPage {
        key: "politica-de-privacidade",
        path: "/politica-de-privacidade/",
        title: "Política de Privacidade",
        sections: &[
            "Informações que Recolhemos",
            "Finalidade da Utilização dos Dados",
            "Direito dos Utilizadores",
            "Contacto sobre a Política de Privacidade",
        ],
        check_footer: true,
    },
    // footer on this page renders inconsistently
    LegalPage {
        key: "politica-de-cookies",
        path: "/politica-de-cookies/",
        title: "Política de Cookies",
        sections: &["O que são Cookies?", "Como Utilizamos os Cookies?"],
        check_footer: false,
    },
    LegalPage {
        key: "termos-e-condicoes-de-uso",
        path: "/termos-e-condicoes-de-uso/",
        title: "Termos e Condições do Palato Digital",
        sections: &[
            "1. Aceitação dos Termos",
            "2. Direitos de Propriedade Intelectual",
            "3. Uso Correto do Website",
            "4. Limitação de Responsabilidade",
            "5. Ligações para Websites de Terceiros",
            "6. Lei Aplicável e Foro",
            "7. Alterações a estes Termos",
            "8. Contacto",
        ],
        check_footer: true,
    },
];

/// One portfolio project page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioProject {
    /// URL slug under `/portfolio/`
    pub slug: &'static str,
    /// Heading, matched exactly
    pub title: &'static str,
    /// Subsection headings
    pub subsections: &'static [&'static str],
    /// Client website linked from the page
    pub website: &'static str,
}

impl PortfolioProject {
    /// Page path
    #[must_use]
    pub fn path(&self) -> String {
        format!("/portfolio/{}/", self.slug)
    }
}

const PROJECT_SUBSECTIONS: &[&str] = &["O que fizemos", "Tipo de negócio", "Website", "Descrição"];

/// Showcased projects
pub const PORTFOLIO_PROJECTS: [PortfolioProject; 2] = [
    PortfolioProject {
        slug: "patinhasyes",
        title: "PatinhasYes",
        subsections: PROJECT_SUBSECTIONS,
        website: "https://patinhasyes.pt",
    },
    PortfolioProject {
        slug: "alcmena",
        title: "Alcmena",
        subsections: PROJECT_SUBSECTIONS,
        website: "https://alcmena.pt",
    },
];

/// Values submitted through the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Sender phone
    pub phone: String,
    /// Visible label of the interest option
    pub interest: String,
    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Fixed data used by the automated runs
    #[must_use]
    pub fn automated() -> Self {
        Self {
            name: "Automated Test".to_string(),
            email: "test@palatodigital.com".to_string(),
            phone: "932001002".to_string(),
            interest: "Desenvolvimento Web".to_string(),
            message: "This is an automated test message.".to_string(),
        }
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::automated()
    }
}
