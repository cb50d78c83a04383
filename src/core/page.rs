//! Field extraction from HTML pages.
//!
//! Sign-in forms carry anti-forgery tokens and OIDC parameters in hidden
//! `<input>` fields. Pages are scanned with regular expressions rather than
//! a DOM: the forms are small, machine-generated and stable.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{PageError, Result};

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("static regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("static regex")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h([1-6])\b([^>]*)>(.*?)</h[1-6]\s*>"#).expect("static regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));

/// Typed lookup of named form fields.
pub trait PageFieldExtractor {
    /// Value of the first field called `name`, if any.
    fn extract(&self, name: &str) -> Option<String>;

    /// Like [`extract`](Self::extract) but missing fields are an error.
    ///
    /// # Errors
    ///
    /// Returns `PageError::NotFound` naming the field.
    fn require(&self, name: &str) -> Result<String> {
        self.extract(name)
            .ok_or_else(|| PageError::NotFound(name.to_string()).into())
    }
}

/// An HTML document body.
#[derive(Debug, Clone)]
pub struct HtmlPage<'a> {
    body: &'a str,
}

impl<'a> HtmlPage<'a> {
    pub fn new(body: &'a str) -> Self {
        Self { body }
    }

    /// Text of the first heading whose `class` attribute contains `class`.
    ///
    /// Inner tags are stripped and whitespace collapsed.
    pub fn heading_text(&self, class: &str) -> Option<String> {
        HEADING.captures_iter(self.body).find_map(|caps| {
            let attrs = attributes(caps.get(2)?.as_str());
            let classes = attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("class"))
                .map(|(_, v)| v.as_str())?;
            if !classes.split_whitespace().any(|c| c == class) {
                return None;
            }
            let text = TAG.replace_all(caps.get(3)?.as_str(), " ");
            Some(collapse_whitespace(&decode_entities(&text)))
        })
    }

    /// Whether the body contains `needle` verbatim.
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}

impl PageFieldExtractor for HtmlPage<'_> {
    fn extract(&self, name: &str) -> Option<String> {
        INPUT_TAG.find_iter(self.body).find_map(|tag| {
            let attrs = attributes(tag.as_str());
            let matches = attrs
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("name") && v == name);
            if !matches {
                return None;
            }
            Some(
                attrs
                    .into_iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("value"))
                    .map(|(_, v)| v)
                    .unwrap_or_default(),
            )
        })
    }
}

/// Relying-party identifier from an authorization redirect URL.
///
/// Uses the `client_id` parameter, falling back to the first query value.
///
/// # Errors
///
/// Returns `PageError::NoQuery` if the URL has no query parameters.
pub fn client_id_from_url(url: &Url) -> Result<String> {
    let mut pairs = url.query_pairs();
    if let Some((_, value)) = url.query_pairs().find(|(k, _)| k == "client_id") {
        return Ok(value.into_owned());
    }
    pairs
        .next()
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| PageError::NoQuery(url.to_string()).into())
}

fn attributes(tag: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Some((key, value))
        })
        .collect()
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#x2B;", "+")
        .replace("&#x2F;", "/")
        .replace("&#x3D;", "=")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
