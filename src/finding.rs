// SPDX-License-Identifier: PMPL-1.0-or-later
//! Finding types shared by all checkers.
//!
//! A `Finding` is one detected violation or informational observation.
//! Findings are immutable once built; checkers never read each other's
//! findings.

use serde::{Deserialize, Serialize};

/// Maximum length of an evidence snippet, in characters.
pub const MAX_EVIDENCE_LEN: usize = 160;

/// Compliance category a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Third-party font hosting (CDN-served web fonts).
    Fonts,
    /// Tracking scripts and consent management.
    Tracking,
    /// ARIA semantics, labels, and landmarks.
    Accessibility,
    /// Color contrast ratios.
    Contrast,
    /// Required legal text elements (imprint, tax id, contact).
    LegalText,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 5] = [
        Category::Fonts,
        Category::Tracking,
        Category::Accessibility,
        Category::Contrast,
        Category::LegalText,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Fonts => write!(f, "fonts"),
            Category::Tracking => write!(f, "tracking"),
            Category::Accessibility => write!(f, "accessibility"),
            Category::Contrast => write!(f, "contrast"),
            Category::LegalText => write!(f, "legal-text"),
        }
    }
}

/// Severity of a finding. Ordinal: critical > warning > info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violation with concrete legal or usability exposure.
    Critical,
    /// Should be addressed.
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Sort rank; lower sorts first in reports.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// One detected violation or observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Category this finding belongs to.
    pub category: Category,
    /// Stable machine-readable rule identifier (e.g. "FONTS-001").
    pub rule_id: String,
    /// Severity level.
    pub severity: Severity,
    /// Short human-readable title.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Raw snippet supporting the finding, truncated to
    /// [`MAX_EVIDENCE_LEN`] characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Legal citation (e.g. "Art. 6 (1) GDPR").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    /// Estimated monetary exposure contributed by this finding, in EUR.
    pub risk_euro: u32,
    /// Whether a mechanical fix exists. Informational only.
    pub auto_fixable: bool,
    /// Scorer penalty override. When absent the per-severity default
    /// applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_penalty: Option<u32>,
}

impl Finding {
    /// Create a new finding.
    pub fn new(category: Category, rule_id: &str, severity: Severity, title: &str) -> Self {
        Self {
            category,
            rule_id: rule_id.to_string(),
            severity,
            title: title.to_string(),
            description: String::new(),
            evidence: None,
            legal_basis: None,
            risk_euro: 0,
            auto_fixable: false,
            score_penalty: None,
        }
    }

    /// Set the detailed description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Attach an evidence snippet, truncated to [`MAX_EVIDENCE_LEN`].
    pub fn with_evidence(mut self, evidence: &str) -> Self {
        self.evidence = Some(truncate_evidence(evidence));
        self
    }

    /// Set the legal citation.
    pub fn with_legal_basis(mut self, basis: &str) -> Self {
        self.legal_basis = Some(basis.to_string());
        self
    }

    /// Set the estimated exposure in EUR.
    pub fn with_risk_euro(mut self, euro: u32) -> Self {
        self.risk_euro = euro;
        self
    }

    /// Mark the finding as mechanically fixable.
    pub fn as_auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }

    /// Override the scorer penalty for this finding.
    pub fn with_score_penalty(mut self, penalty: u32) -> Self {
        self.score_penalty = Some(penalty);
        self
    }
}

/// Truncate a snippet to [`MAX_EVIDENCE_LEN`] characters on a char boundary.
fn truncate_evidence(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_EVIDENCE_LEN {
        return snippet.to_string();
    }
    let mut truncated: String = snippet.chars().take(MAX_EVIDENCE_LEN).collect();
    truncated.push_str("...");
    truncated
}
