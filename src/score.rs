// SPDX-License-Identifier: PMPL-1.0-or-later
//! Category scorer.
//!
//! Converts a checker's finding list into a 0-100 category score and a
//! status tier. Scoring starts at 100 and subtracts a per-severity
//! penalty per finding, clamped at 0. The fonts category is binary:
//! any critical finding forces the score to 0.

use serde::{Deserialize, Serialize};

use crate::catalog::penalty_for;
use crate::config::ScanConfig;
use crate::finding::{Category, Finding, Severity};

/// Status tier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    /// Score at or above the pass threshold.
    Pass,
    /// Score between the warn and pass thresholds.
    Warning,
    /// Score below the warn threshold.
    Fail,
    /// The checker for this category failed; no score exists.
    Unavailable,
}

impl std::fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryStatus::Pass => write!(f, "pass"),
            CategoryStatus::Warning => write!(f, "warning"),
            CategoryStatus::Fail => write!(f, "fail"),
            CategoryStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Scored result for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// The category.
    pub category: Category,
    /// Score 0-100; absent when the checker was unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// Derived status tier.
    pub status: CategoryStatus,
    /// Findings ordered by severity, then detection order.
    pub findings: Vec<Finding>,
}

/// Score a category from its findings.
pub fn score_category(
    category: Category,
    mut findings: Vec<Finding>,
    config: &ScanConfig,
) -> CategoryResult {
    // Stable sort keeps detection order within each severity.
    findings.sort_by_key(|f| f.severity.rank());

    let penalty: u32 = findings
        .iter()
        .map(|f| f.score_penalty.unwrap_or_else(|| penalty_for(f.severity)))
        .sum();
    let mut score = 100u32.saturating_sub(penalty) as u8;

    // Fonts is pass/fail: a single violation is a complete failure,
    // not a partial deduction.
    if category == Category::Fonts
        && findings.iter().any(|f| f.severity == Severity::Critical)
    {
        score = 0;
    }

    let thresholds = config.thresholds_for(category);
    let status = if score >= thresholds.pass {
        CategoryStatus::Pass
    } else if score >= thresholds.warn {
        CategoryStatus::Warning
    } else {
        CategoryStatus::Fail
    };

    CategoryResult { category, score: Some(score), status, findings }
}

/// Result for a category whose checker failed.
pub fn unavailable_category(category: Category) -> CategoryResult {
    CategoryResult {
        category,
        score: None,
        status: CategoryStatus::Unavailable,
        findings: Vec::new(),
    }
}
