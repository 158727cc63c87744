// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document snapshot: the immutable parsed representation of one page.
//!
//! A snapshot is built once per scan by the external fetch collaborator
//! (or from a local file) and shared read-only by all checkers. Style
//! blocks preserve source order; script entries retain both inline text
//! and `src` when present.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// One `<script>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// External source URL, when present.
    pub src: Option<String>,
    /// Inline script text, when present.
    pub text: Option<String>,
}

/// Immutable snapshot of a fetched page.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    url: String,
    html: String,
    style_blocks: Vec<String>,
    scripts: Vec<Script>,
    visible_text: String,
}

static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());
static NOSCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<noscript\b[^>]*>.*?</noscript>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

impl DocumentSnapshot {
    /// Build a snapshot from raw markup.
    pub fn parse(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);

        let style_sel = Selector::parse("style").expect("valid selector");
        let style_blocks: Vec<String> = document
            .select(&style_sel)
            .map(|el| el.text().collect::<String>())
            .collect();

        let script_sel = Selector::parse("script").expect("valid selector");
        let scripts: Vec<Script> = document
            .select(&script_sel)
            .map(|el| {
                let src = el.value().attr("src").map(String::from);
                let body = el.text().collect::<String>();
                let text = if body.trim().is_empty() { None } else { Some(body) };
                Script { src, text }
            })
            .filter(|s| s.src.is_some() || s.text.is_some())
            .collect();

        Self {
            url: url.to_string(),
            html: html.to_string(),
            style_blocks,
            scripts,
            visible_text: extract_visible_text(html),
        }
    }

    /// Append a stylesheet fetched by the external collaborator
    /// (e.g. a linked CSS file). Keeps source order.
    pub fn push_stylesheet(&mut self, css: &str) {
        self.style_blocks.push(css.to_string());
    }

    /// Page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parse the element tree. Each checker parses its own copy; the
    /// parsed tree is not shared across threads.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Raw CSS blocks in source order.
    pub fn style_blocks(&self) -> &[String] {
        &self.style_blocks
    }

    /// Script entries.
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Visible page text with scripts, styles, and tags stripped.
    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }
}

/// Strip script/style/noscript blocks and tags, decode the common
/// entities, and collapse whitespace.
fn extract_visible_text(html: &str) -> String {
    let stripped = SCRIPT_BLOCK_RE.replace_all(html, " ");
    let stripped = STYLE_BLOCK_RE.replace_all(&stripped, " ");
    let stripped = NOSCRIPT_BLOCK_RE.replace_all(&stripped, " ");
    let stripped = TAG_RE.replace_all(&stripped, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}
