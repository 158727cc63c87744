// SPDX-License-Identifier: PMPL-1.0-or-later
//! Weighted aggregator and risk/cost estimator.
//!
//! Combines category scores with a profile-selected weight vector into
//! one overall score, classifies risk from the fonts-category violation
//! count, and maps the risk level to a fixed monetary exposure band.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::weight_profile;
use crate::config::SiteProfile;
use crate::finding::{Category, Severity};
use crate::score::CategoryResult;

/// Overall risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::VeryHigh => write!(f, "very-high"),
        }
    }
}

/// Monetary exposure estimate for a risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub min_euro: u32,
    pub max_euro: u32,
    pub typical_euro: u32,
    /// Breakdown of the typical value by fixed percentages.
    pub breakdown: CostBreakdown,
}

/// Fixed 40/30/30 split of the typical exposure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub legal_review_euro: u32,
    pub remediation_euro: u32,
    pub monitoring_euro: u32,
}

/// Exposure bands per risk level. A deterministic table lookup, not a
/// model; treat the exact figures as configuration.
fn cost_band(risk: RiskLevel) -> (u32, u32, u32) {
    match risk {
        RiskLevel::Low => (0, 0, 0),
        RiskLevel::Medium => (500, 3_000, 1_500),
        RiskLevel::High => (1_500, 8_000, 4_000),
        RiskLevel::VeryHigh => (4_000, 20_000, 10_000),
    }
}

/// Build the cost estimate for a risk level.
pub fn estimate_cost(risk: RiskLevel) -> CostEstimate {
    let (min_euro, max_euro, typical_euro) = cost_band(risk);
    CostEstimate {
        min_euro,
        max_euro,
        typical_euro,
        breakdown: CostBreakdown {
            legal_review_euro: typical_euro * 40 / 100,
            remediation_euro: typical_euro * 30 / 100,
            monitoring_euro: typical_euro * 30 / 100,
        },
    }
}

/// Critical alert raised when a critical finding carries monetary
/// exposure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalAlert {
    pub message: String,
    /// Sum of `risk_euro` over critical findings.
    pub total_risk_euro: u32,
}

/// Aggregated scan outcome, before report assembly.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    pub estimated_cost: CostEstimate,
    pub critical_alert: Option<CriticalAlert>,
}

/// Combine category results under the profile's weight vector.
///
/// Unavailable categories are excluded and the remaining weights are
/// renormalized, so a failed checker never drags the score down as a
/// phantom zero.
pub fn aggregate(
    categories: &BTreeMap<Category, CategoryResult>,
    profile: SiteProfile,
) -> Aggregation {
    let weights = weight_profile(profile);

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (category, weight) in weights {
        let Some(result) = categories.get(category) else { continue };
        let Some(score) = result.score else { continue };
        weighted_sum += f64::from(score) * weight;
        weight_total += weight;
    }

    let overall_score = if weight_total > 0.0 {
        // the epsilon tolerates float dust just below integer boundaries
        ((weighted_sum / weight_total) + 1e-9).floor() as u8
    } else {
        0
    };

    let (violations, entities) = font_violation_stats(categories);
    let risk_level = classify_risk(violations, entities);

    Aggregation {
        overall_score,
        risk_level,
        estimated_cost: estimate_cost(risk_level),
        critical_alert: critical_alert(categories),
    }
}

/// Fonts-category critical findings: count and distinct evidence
/// entities (embedded resources or family lists).
fn font_violation_stats(categories: &BTreeMap<Category, CategoryResult>) -> (usize, usize) {
    let Some(fonts) = categories.get(&Category::Fonts) else {
        return (0, 0);
    };
    let criticals: Vec<_> = fonts
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .collect();
    let entities: HashSet<&str> = criticals
        .iter()
        .filter_map(|f| f.evidence.as_deref())
        .collect();
    (criticals.len(), entities.len())
}

/// Risk classification driven by the fonts-category violation count,
/// the binary highest-weighted signal.
fn classify_risk(violations: usize, entities: usize) -> RiskLevel {
    match violations {
        0 => RiskLevel::Low,
        1..=2 if entities <= 2 => RiskLevel::Medium,
        1..=2 => RiskLevel::High,
        3..=5 => RiskLevel::High,
        _ => RiskLevel::VeryHigh,
    }
}

/// Raise the alert iff any category holds a critical finding with
/// monetary exposure.
fn critical_alert(categories: &BTreeMap<Category, CategoryResult>) -> Option<CriticalAlert> {
    let mut total = 0u32;
    let mut count = 0usize;
    for result in categories.values() {
        for finding in &result.findings {
            if finding.severity == Severity::Critical && finding.risk_euro > 0 {
                total += finding.risk_euro;
                count += 1;
            }
        }
    }
    if count == 0 {
        return None;
    }
    Some(CriticalAlert {
        message: format!(
            "{} critical violation(s) with direct monetary exposure detected",
            count
        ),
        total_risk_euro: total,
    })
}
