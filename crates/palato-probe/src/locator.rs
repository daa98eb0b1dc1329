//! Declarative element selection.
//!
//! A [`Selector`] is one strategy for finding an element: ARIA role plus
//! accessible name, visible text, a CSS selector, or an attribute pattern.
//! A [`LocatorSpec`] is an ordered chain of strategies evaluated left to right
//! by [`crate::fallback::resolve`]; the first one that holds wins.

use crate::harness::ElementSnapshot;
use crate::result::{ProbeError, ProbeResult};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Compiled regular expression, compared and serialized by its source
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] when the pattern does not compile.
    pub fn new(source: &str) -> ProbeResult<Self> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| ProbeError::config(format!("invalid pattern /{source}/: {e}")))
    }

    /// Source text
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Search anywhere in `text`
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

/// How element text is compared against an expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMatch {
    /// Whole text equal after whitespace normalization (case-sensitive)
    Exact(String),
    /// Case-insensitive substring after whitespace normalization
    Partial(String),
    /// Regular expression, searched anywhere in the raw text
    Pattern(Pattern),
}

impl TextMatch {
    /// Exact match
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Partial match
    #[must_use]
    pub fn partial(text: impl Into<String>) -> Self {
        Self::Partial(text.into())
    }

    /// Regex match.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] when the pattern does not compile.
    pub fn pattern(pattern: &str) -> ProbeResult<Self> {
        Pattern::new(pattern).map(Self::Pattern)
    }

    /// Build from a text and an exactness flag
    #[must_use]
    pub fn with_exactness(text: impl Into<String>, exact: bool) -> Self {
        if exact {
            Self::Exact(text.into())
        } else {
            Self::Partial(text.into())
        }
    }

    /// Check a candidate text
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(expected) => normalize(candidate) == normalize(expected),
            Self::Partial(expected) => normalize(candidate)
                .to_lowercase()
                .contains(&normalize(expected).to_lowercase()),
            Self::Pattern(pattern) => pattern.is_match(candidate),
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(t) => write!(f, "=\"{t}\""),
            Self::Partial(t) => write!(f, "~\"{t}\""),
            Self::Pattern(p) => write!(f, "=/{p}/"),
        }
    }
}

/// Collapse runs of whitespace and trim
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// ARIA roles the suite locates by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AriaRole {
    /// `<a href>`
    Link,
    /// `<h1>`..`<h6>`
    Heading,
    /// Buttons and submit inputs
    Button,
    /// Page footer
    ContentInfo,
}

impl AriaRole {
    /// Role name as written in ARIA
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Button => "button",
            Self::ContentInfo => "contentinfo",
        }
    }

    /// CSS selecting the elements that carry this role implicitly or explicitly
    #[must_use]
    pub const fn css_candidates(self) -> &'static str {
        match self {
            Self::Link => "a[href], [role=\"link\"]",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=\"heading\"]",
            Self::Button => {
                "button, input[type=\"button\"], input[type=\"submit\"], [role=\"button\"]"
            }
            Self::ContentInfo => "footer, [role=\"contentinfo\"]",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strategy for finding elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// ARIA role, optionally filtered by accessible name
    Role {
        /// Role to match
        role: AriaRole,
        /// Accessible name filter
        name: Option<TextMatch>,
    },
    /// Elements whose own text matches
    Text(TextMatch),
    /// Raw CSS selector
    Css(String),
    /// Elements matching `css` whose `attribute` value matches
    Attribute {
        /// Base CSS selector
        css: String,
        /// Attribute name
        attribute: String,
        /// Attribute value filter
        value: TextMatch,
    },
}

impl Selector {
    /// Role selector with a name filter
    #[must_use]
    pub fn role(role: AriaRole, name: TextMatch) -> Self {
        Self::Role {
            role,
            name: Some(name),
        }
    }

    /// Role selector without a name filter
    #[must_use]
    pub const fn any_role(role: AriaRole) -> Self {
        Self::Role { role, name: None }
    }

    /// Link by accessible name (partial)
    #[must_use]
    pub fn link(name: impl Into<String>) -> Self {
        Self::role(AriaRole::Link, TextMatch::partial(name))
    }

    /// Heading by accessible name
    #[must_use]
    pub fn heading(name: impl Into<String>, exact: bool) -> Self {
        Self::role(AriaRole::Heading, TextMatch::with_exactness(name, exact))
    }

    /// Text selector
    #[must_use]
    pub fn text(text: TextMatch) -> Self {
        Self::Text(text)
    }

    /// CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Form control by its `name` attribute
    #[must_use]
    pub fn named_control(name: &str) -> Self {
        Self::Css(format!("[name=\"{name}\"]"))
    }

    /// Attribute pattern selector
    #[must_use]
    pub fn attribute(
        css: impl Into<String>,
        attribute: impl Into<String>,
        value: TextMatch,
    ) -> Self {
        Self::Attribute {
            css: css.into(),
            attribute: attribute.into(),
            value,
        }
    }

    /// CSS that selects the candidate set before any text filtering
    #[must_use]
    pub fn candidate_css(&self) -> String {
        match self {
            Self::Role { role, .. } => role.css_candidates().to_string(),
            Self::Text(_) => "body *".to_string(),
            Self::Css(css) => css.clone(),
            Self::Attribute { css, attribute, .. } => format!("{css}[{attribute}]"),
        }
    }

    /// Whether a candidate element satisfies the text/attribute filter
    #[must_use]
    pub fn accepts(&self, element: &ElementSnapshot) -> bool {
        match self {
            Self::Role { name: None, .. } | Self::Css(_) => true,
            Self::Role {
                name: Some(name), ..
            } => name.matches(&element.name),
            Self::Text(text) => element.own_text && text.matches(&element.text),
            Self::Attribute {
                attribute, value, ..
            } => element
                .attributes
                .get(attribute)
                .is_some_and(|v| value.matches(v)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name{name}]"),
            Self::Text(text) => write!(f, "text{text}"),
            Self::Css(css) => write!(f, "css={css}"),
            Self::Attribute {
                css,
                attribute,
                value,
            } => write!(f, "css={css}[{attribute}{value}]"),
        }
    }
}

/// What a matched element must satisfy for a strategy to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Requirement {
    /// At least one match is visible
    #[default]
    Visible,
    /// At least one match is visible and has non-zero height
    Rendered,
}

impl Requirement {
    /// Check a single element
    #[must_use]
    pub fn holds_for(self, element: &ElementSnapshot) -> bool {
        match self {
            Self::Visible => element.visible,
            Self::Rendered => element.visible && element.height > 0.0,
        }
    }
}

/// A selector paired with its requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// How to find candidates
    pub selector: Selector,
    /// What the first qualifying candidate must satisfy
    pub requirement: Requirement,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.requirement {
            Requirement::Visible => write!(f, "{}", self.selector),
            Requirement::Rendered => write!(f, "{} (non-zero height)", self.selector),
        }
    }
}

/// Ordered fallback chain for one logical element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSpec {
    /// Name used in logs and errors
    pub name: String,
    /// Strategies, primary first
    pub strategies: Vec<Strategy>,
}

impl LocatorSpec {
    /// Start a chain with its primary strategy
    #[must_use]
    pub fn new(name: impl Into<String>, primary: Selector) -> Self {
        Self {
            name: name.into(),
            strategies: vec![Strategy {
                selector: primary,
                requirement: Requirement::Visible,
            }],
        }
    }

    /// Start a chain whose primary must be rendered with height
    #[must_use]
    pub fn rendered(name: impl Into<String>, primary: Selector) -> Self {
        Self {
            name: name.into(),
            strategies: vec![Strategy {
                selector: primary,
                requirement: Requirement::Rendered,
            }],
        }
    }

    /// Append a fallback that only needs to be visible
    #[must_use]
    pub fn or(mut self, fallback: Selector) -> Self {
        self.strategies.push(Strategy {
            selector: fallback,
            requirement: Requirement::Visible,
        });
        self
    }

    /// Append a fallback that must be rendered with height
    #[must_use]
    pub fn or_rendered(mut self, fallback: Selector) -> Self {
        self.strategies.push(Strategy {
            selector: fallback,
            requirement: Requirement::Rendered,
        });
        self
    }

    /// Descriptions of every strategy, in evaluation order
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        self.strategies.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn element(name: &str) -> ElementSnapshot {
        ElementSnapshot::new("a").with_name(name).with_text(name)
    }

    mod text_match_tests {
        use super::*;

        #[test]
        fn test_exact_normalizes_whitespace() {
            assert!(TextMatch::exact("Serviços").matches("  Serviços \n"));
            assert!(!TextMatch::exact("Serviços").matches("Os Serviços"));
            assert!(!TextMatch::exact("Serviços").matches("SERVIÇOS"));
        }

        #[test]
        fn test_partial_is_case_insensitive() {
            assert!(TextMatch::partial("Serviços").matches(" SERVIÇOS "));
            assert!(TextMatch::partial("vamos falar").matches("→ Vamos   falar"));
            assert!(!TextMatch::partial("Sobre").matches("Contacto"));
        }

        #[test]
        fn test_pattern() {
            let m = TextMatch::pattern(r"(?i)não encontrada|erro 404").unwrap();
            assert!(m.matches("Página NÃO encontrada"));
            assert!(m.matches("Erro 404"));
            assert!(!m.matches("Serviços"));
        }

        #[test]
        fn test_invalid_pattern_is_config_error() {
            let err = TextMatch::pattern("(unclosed").unwrap_err();
            assert!(err.is_config());
            assert!(err.to_string().contains("(unclosed"));
        }

        #[test]
        fn test_pattern_compares_and_serializes_by_source() {
            let m = TextMatch::pattern("(?i)direitos").unwrap();
            assert_eq!(m, TextMatch::pattern("(?i)direitos").unwrap());
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, r#"{"Pattern":"(?i)direitos"}"#);
            let back: TextMatch = serde_json::from_str(&json).unwrap();
            assert_eq!(back, m);
            assert!(serde_json::from_str::<TextMatch>(r#"{"Pattern":"("}"#).is_err());
        }

        #[test]
        fn test_with_exactness() {
            assert_eq!(
                TextMatch::with_exactness("x", true),
                TextMatch::Exact("x".into())
            );
            assert_eq!(
                TextMatch::with_exactness("x", false),
                TextMatch::Partial("x".into())
            );
        }

        proptest! {
            #[test]
            fn prop_partial_matches_any_case_inside_noise(
                needle in "[a-zA-Z]{1,12}",
                prefix in "[a-z ]{0,8}",
                suffix in "[a-z ]{0,8}",
            ) {
                let haystack = format!("{prefix} {} {suffix}", needle.to_uppercase());
                prop_assert!(TextMatch::partial(needle.clone()).matches(&haystack));
            }

            #[test]
            fn prop_exact_ignores_surrounding_whitespace(
                words in proptest::collection::vec("[a-zA-Z]{1,6}", 1..5),
                pad in "[ \t\n]{0,4}",
            ) {
                let text = words.join(" ");
                let padded = format!("{pad}{}{pad}", words.join("  "));
                prop_assert!(TextMatch::exact(text).matches(&padded));
            }
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_role_candidates() {
            assert!(Selector::link("Sobre").candidate_css().contains("a[href]"));
            assert!(Selector::heading("x", true).candidate_css().contains("h1"));
            assert!(Selector::any_role(AriaRole::ContentInfo)
                .candidate_css()
                .contains("footer"));
        }

        #[test]
        fn test_attribute_candidate_css() {
            let s = Selector::attribute("a", "href", TextMatch::partial("instagram"));
            assert_eq!(s.candidate_css(), "a[href]");
        }

        #[test]
        fn test_accepts_by_name() {
            assert!(Selector::link("sobre").accepts(&element("Sobre")));
            assert!(!Selector::link("sobre").accepts(&element("Contacto")));
            assert!(Selector::any_role(AriaRole::Link).accepts(&element("anything")));
        }

        #[test]
        fn test_text_requires_own_text() {
            let mut el = element("Explore mais");
            assert!(Selector::text(TextMatch::partial("explore")).accepts(&el));
            el.own_text = false;
            assert!(!Selector::text(TextMatch::partial("explore")).accepts(&el));
        }

        #[test]
        fn test_accepts_by_attribute() {
            let el = ElementSnapshot::new("a").with_attribute("href", "https://instagram.com/palato");
            let s = Selector::attribute("a", "href", TextMatch::partial("instagram"));
            assert!(s.accepts(&el));
            let s = Selector::attribute("a", "href", TextMatch::partial("behance"));
            assert!(!s.accepts(&el));
        }

        #[test]
        fn test_named_control() {
            assert_eq!(
                Selector::named_control("your-name"),
                Selector::Css("[name=\"your-name\"]".into())
            );
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::link("Sobre").to_string(), "role=link[name~\"Sobre\"]");
            assert_eq!(Selector::css("#logo").to_string(), "css=#logo");
            assert_eq!(
                Selector::text(TextMatch::pattern("(?i)direitos").unwrap()).to_string(),
                "text=/(?i)direitos/"
            );
        }
    }

    mod requirement_tests {
        use super::*;

        #[test]
        fn test_rendered_needs_height() {
            let mut el = ElementSnapshot::new("footer");
            assert!(Requirement::Visible.holds_for(&el));
            assert!(Requirement::Rendered.holds_for(&el));
            el.height = 0.0;
            assert!(Requirement::Visible.holds_for(&el));
            assert!(!Requirement::Rendered.holds_for(&el));
            el.visible = false;
            assert!(!Requirement::Visible.holds_for(&el));
        }
    }

    mod spec_tests {
        use super::*;

        #[test]
        fn test_chain_order_is_insertion_order() {
            let spec = LocatorSpec::rendered("footer", Selector::any_role(AriaRole::ContentInfo))
                .or(Selector::text(TextMatch::partial("Palato Digital")))
                .or(Selector::text(TextMatch::pattern("(?i)direitos").unwrap()));
            assert_eq!(spec.strategies.len(), 3);
            assert_eq!(spec.strategies[0].requirement, Requirement::Rendered);
            assert_eq!(spec.strategies[1].requirement, Requirement::Visible);
            let described = spec.describe();
            assert!(described[0].contains("contentinfo"));
            assert!(described[0].contains("non-zero height"));
            assert!(described[2].contains("direitos"));
        }
    }
}
