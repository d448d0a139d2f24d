//! Landing page link insertion.

use minijinja::{context, Environment};
use regex::Regex;

/// Errors that can occur when updating the landing page.
#[derive(Debug, thiserror::Error)]
pub enum LandingError {
    #[error("No <body> tag found in landing page")]
    MissingBody,

    #[error("Failed to render landing page link: {0}")]
    Render(#[from] minijinja::Error),
}

/// Result of a link insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkInsertion {
    /// The updated document
    Inserted(String),

    /// A link with the same href already exists, document unchanged
    AlreadyPresent,
}

/// Inserts page links right after the landing page's `<body>` tag.
pub struct LandingPage {
    env: Environment<'static>,
    body_open: Regex,
}

impl LandingPage {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // The `.html` suffix turns on auto-escaping for the label.
        env.add_template("link.html", LINK_TEMPLATE)
            .expect("Failed to add link template");

        Self {
            env,
            body_open: Regex::new(r"(?i)<body\b[^>]*>").expect("Invalid body tag pattern"),
        }
    }

    /// Render the link element for a page.
    pub fn render_link(&self, href: &str, label: &str) -> Result<String, LandingError> {
        let tmpl = self.env.get_template("link.html")?;
        Ok(tmpl.render(context! { href => href, label => label })?)
    }

    /// Insert a link to `href` labeled `label` after the first body open tag.
    pub fn insert_link(
        &self,
        document: &str,
        href: &str,
        label: &str,
    ) -> Result<LinkInsertion, LandingError> {
        let body = self.body_open.find(document).ok_or(LandingError::MissingBody)?;

        if document.contains(&format!("href=\"{}\"", href)) {
            return Ok(LinkInsertion::AlreadyPresent);
        }

        let link = self.render_link(href, label)?;
        let (head, rest) = document.split_at(body.end());

        Ok(LinkInsertion::Inserted(format!("{head}\n    {link}{rest}")))
    }
}

impl Default for LandingPage {
    fn default() -> Self {
        Self::new()
    }
}

// `href` is built from a validated identifier, so it is inserted as-is.
const LINK_TEMPLATE: &str = r#"<p><a href="{{ href|safe }}">{{ label }}</a></p>"#;
