// SPDX-License-Identifier: PMPL-1.0-or-later
//! Font hosting checker.
//!
//! Detects web fonts served from third-party CDNs. Any reference to a
//! known font CDN in `<link>` elements, `@import` rules, or scripts is a
//! critical finding; serving fonts locally is the only passing state.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::catalog::{
    FontLoaderPattern, FontProvider, FONT_CDN_DOMAINS, FONT_LOADER_SIGNATURES, FONT_RISK_EURO,
};
use crate::checkers::Checker;
use crate::config::ScanConfig;
use crate::finding::{Category, Finding, Severity};
use crate::snapshot::DocumentSnapshot;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']?([^"')\s;]+)"#).unwrap()
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'()<>\\]+"#).unwrap());

/// Checker for third-party font hosting.
pub struct FontHostingChecker;

impl Checker for FontHostingChecker {
    fn name(&self) -> &'static str {
        "Font Hosting Checker"
    }

    fn category(&self) -> Category {
        Category::Fonts
    }

    fn check(&self, snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut seen = HashSet::new();

        // <link href="..."> references
        let document = snapshot.document();
        let link_sel = Selector::parse("link[href]").expect("valid selector");
        for link in document.select(&link_sel) {
            if let Some(href) = link.value().attr("href") {
                if let Some(provider) = match_font_domain(href) {
                    if seen.insert(format!("link:{}", href)) {
                        findings.push(cdn_finding("FONTS-001", "<link> element", provider, href));
                    }
                }
            }
        }

        // @import rules in style blocks
        for block in snapshot.style_blocks() {
            for caps in IMPORT_RE.captures_iter(block) {
                let url = &caps[1];
                if let Some(provider) = match_font_domain(url) {
                    if seen.insert(format!("import:{}", url)) {
                        findings.push(cdn_finding("FONTS-002", "@import rule", provider, url));
                    }
                }
            }
        }

        // Script sources and inline loader snippets
        for script in snapshot.scripts() {
            if let Some(src) = &script.src {
                if let Some(provider) = match_font_domain(src) {
                    if seen.insert(format!("src:{}", src)) {
                        findings.push(cdn_finding("FONTS-003", "script src", provider, src));
                    }
                } else if let Some(loader) = match_loader(src) {
                    if seen.insert(format!("loader:{}", src)) {
                        findings.push(loader_finding(loader, src));
                    }
                }
            }
            if let Some(text) = &script.text {
                for url_match in URL_RE.find_iter(text) {
                    let url = url_match.as_str();
                    if let Some(provider) = match_font_domain(url) {
                        if seen.insert(format!("src:{}", url)) {
                            findings.push(cdn_finding("FONTS-003", "inline script", provider, url));
                        }
                    }
                }
                for loader in FONT_LOADER_SIGNATURES.iter() {
                    if loader.regex.is_match(text) && seen.insert(format!("loader:{}", loader.loader)) {
                        findings.push(loader_finding(loader, text));
                    }
                }
            }
        }

        findings
    }
}

/// Match a URL against the font CDN allowlist.
fn match_font_domain(url: &str) -> Option<&'static FontProvider> {
    FONT_CDN_DOMAINS.iter().find(|p| url.contains(p.domain))
}

/// Match a script against the loader-library signatures.
fn match_loader(text: &str) -> Option<&'static FontLoaderPattern> {
    FONT_LOADER_SIGNATURES.iter().find(|l| l.regex.is_match(text))
}

fn cdn_finding(rule_id: &str, source: &str, provider: &FontProvider, url: &str) -> Finding {
    let families = extract_families(url);
    // A match with no parseable family parameter still yields a finding;
    // the URL itself becomes the evidence.
    let evidence = if families.is_empty() { url.to_string() } else { families.join(", ") };

    Finding::new(
        Category::Fonts,
        rule_id,
        Severity::Critical,
        &format!("Third-party font embedding: {}", provider.provider),
    )
    .with_description(&format!(
        "A {} references {} ({}). Fonts served from a third-party CDN \
         transmit the visitor's IP address to the provider before any \
         consent can be given. Self-host the font files instead.",
        source, provider.domain, provider.provider
    ))
    .with_evidence(&evidence)
    .with_legal_basis("Art. 6 (1) GDPR")
    .with_risk_euro(FONT_RISK_EURO)
    .as_auto_fixable()
}

fn loader_finding(loader: &FontLoaderPattern, snippet: &str) -> Finding {
    Finding::new(
        Category::Fonts,
        "FONTS-004",
        Severity::Critical,
        &format!("Font loader library: {}", loader.loader),
    )
    .with_description(&format!(
        "A script uses the {} to fetch fonts from {} at runtime. The \
         loader contacts the provider's servers from the visitor's \
         browser. Self-host the font files instead.",
        loader.loader, loader.provider
    ))
    .with_evidence(snippet)
    .with_legal_basis("Art. 6 (1) GDPR")
    .with_risk_euro(FONT_RISK_EURO)
    .as_auto_fixable()
}

/// Extract font family names from a CDN URL's `family=` parameters.
///
/// Handles both the classic API (`family=Roboto:400,700|Open+Sans:400`)
/// and the CSS2 API (`family=Roboto:wght@400;700&family=Open+Sans`).
/// Families are deduplicated, preserving first-seen order.
pub fn extract_families(url: &str) -> Vec<String> {
    let mut families = Vec::new();
    let Some(query) = url.splitn(2, '?').nth(1) else {
        return families;
    };
    for param in query.split('&') {
        let Some(value) = param.strip_prefix("family=") else {
            continue;
        };
        for part in value.split('|') {
            let name = part.split(':').next().unwrap_or(part);
            let name = name.replace('+', " ").replace("%20", " ");
            let name = name.trim().to_string();
            if !name.is_empty() && !families.contains(&name) {
                families.push(name);
            }
        }
    }
    families
}
