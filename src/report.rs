// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report assembly and rendering.
//!
//! Packages per-category results, findings, the overall score, the risk
//! classification, and the cost estimate into one immutable compliance
//! report. Supports human-readable text and structured JSON output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CostEstimate, CriticalAlert, RiskLevel};
use crate::checkers::CheckerOutcome;
use crate::config::ScanConfig;
use crate::finding::{Category, Severity};
use crate::score::{score_category, unavailable_category, CategoryResult, CategoryStatus};

/// The final compliance report for one scan. Never mutated after
/// assembly; all nested data is owned by the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Scanned page URL.
    pub url: String,
    /// Assembly timestamp.
    pub generated_at: DateTime<Utc>,
    /// Weighted overall score, 0-100.
    pub overall_score: u8,
    /// Risk classification.
    pub risk_level: RiskLevel,
    /// Monetary exposure estimate.
    pub estimated_cost: CostEstimate,
    /// Per-category results.
    pub categories: BTreeMap<Category, CategoryResult>,
    /// Present iff a critical finding carries monetary exposure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_alert: Option<CriticalAlert>,
}

impl ComplianceReport {
    /// Whether any category holds a critical finding.
    pub fn has_critical_findings(&self) -> bool {
        self.categories
            .values()
            .flat_map(|c| &c.findings)
            .any(|f| f.severity == Severity::Critical)
    }
}

/// Assemble the report from joined checker outcomes.
///
/// A failed checker contributes an unavailable category; the remaining
/// categories still score and aggregate.
pub fn assemble_report(
    url: &str,
    outcomes: Vec<CheckerOutcome>,
    config: &ScanConfig,
) -> ComplianceReport {
    let mut categories: BTreeMap<Category, CategoryResult> = BTreeMap::new();
    for outcome in outcomes {
        let result = match outcome.result {
            Ok(findings) => score_category(outcome.category, findings, config),
            Err(_) => unavailable_category(outcome.category),
        };
        categories.insert(outcome.category, result);
    }

    let aggregation = aggregate(&categories, config.profile);

    ComplianceReport {
        url: url.to_string(),
        generated_at: Utc::now(),
        overall_score: aggregation.overall_score,
        risk_level: aggregation.risk_level,
        estimated_cost: aggregation.estimated_cost,
        categories,
        critical_alert: aggregation.critical_alert,
    }
}

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Structured JSON.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a report in the requested format.
pub fn render_report(report: &ComplianceReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

fn render_text(report: &ComplianceReport) -> String {
    let mut output = String::new();

    output.push_str("=== Compliancebot Report ===\n\n");
    output.push_str(&format!("URL: {}\n", report.url));
    output.push_str(&format!("Generated: {}\n", report.generated_at.to_rfc3339()));
    output.push_str(&format!("Overall score: {}/100\n", report.overall_score));
    output.push_str(&format!("Risk level: {}\n", report.risk_level));
    output.push_str(&format!(
        "Estimated exposure: {}-{} EUR (typical {})\n",
        report.estimated_cost.min_euro,
        report.estimated_cost.max_euro,
        report.estimated_cost.typical_euro
    ));
    output.push_str(&format!(
        "  Breakdown: legal review {}, remediation {}, monitoring {}\n",
        report.estimated_cost.breakdown.legal_review_euro,
        report.estimated_cost.breakdown.remediation_euro,
        report.estimated_cost.breakdown.monitoring_euro
    ));

    if let Some(alert) = &report.critical_alert {
        output.push_str(&format!(
            "\nCRITICAL ALERT: {} (estimated {} EUR)\n",
            alert.message, alert.total_risk_euro
        ));
    }

    for result in report.categories.values() {
        output.push('\n');
        match result.score {
            Some(score) => output.push_str(&format!(
                "--- {}: {}/100 ({}) ---\n",
                result.category, score, result.status
            )),
            None => output.push_str(&format!(
                "--- {}: {} ---\n",
                result.category, result.status
            )),
        }

        if result.findings.is_empty() && result.status != CategoryStatus::Unavailable {
            output.push_str("No issues found.\n");
        }

        for finding in &result.findings {
            output.push_str(&format!(
                "[{}] {} {}\n",
                finding.rule_id, finding.severity, finding.title
            ));
            if !finding.description.is_empty() {
                output.push_str(&format!("  {}\n", finding.description));
            }
            if let Some(evidence) = &finding.evidence {
                output.push_str(&format!("  Evidence: {}\n", evidence));
            }
            if let Some(basis) = &finding.legal_basis {
                output.push_str(&format!("  Legal basis: {}\n", basis));
            }
            if finding.risk_euro > 0 {
                output.push_str(&format!("  Exposure: {} EUR\n", finding.risk_euro));
            }
        }
    }

    output
}

fn render_json(report: &ComplianceReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::finding::Finding;

    fn outcome(category: Category, findings: Vec<Finding>) -> CheckerOutcome {
        CheckerOutcome { category, result: Ok(findings) }
    }

    fn failed_outcome(category: Category) -> CheckerOutcome {
        CheckerOutcome {
            category,
            result: Err(EngineError::CheckerFailed {
                category,
                message: "boom".to_string(),
            }),
        }
    }

    fn sample_report() -> ComplianceReport {
        let outcomes = vec![
            outcome(
                Category::Fonts,
                vec![Finding::new(Category::Fonts, "FONTS-001", Severity::Critical, "cdn font")
                    .with_evidence("Roboto")
                    .with_legal_basis("Art. 6 (1) GDPR")
                    .with_risk_euro(350)],
            ),
            outcome(Category::Tracking, vec![]),
            outcome(Category::Accessibility, vec![]),
            outcome(Category::Contrast, vec![]),
            outcome(Category::LegalText, vec![]),
        ];
        assemble_report("https://example.com", outcomes, &ScanConfig::default())
    }

    #[test]
    fn test_assemble_scores_and_alert() {
        let report = sample_report();
        assert_eq!(report.categories.len(), 5);
        assert_eq!(report.categories[&Category::Fonts].score, Some(0));
        assert_eq!(report.categories[&Category::Tracking].score, Some(100));
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.critical_alert.as_ref().unwrap().total_risk_euro, 350);
        assert!(report.has_critical_findings());
    }

    #[test]
    fn test_failed_checker_yields_unavailable_category() {
        let outcomes = vec![
            outcome(Category::Fonts, vec![]),
            failed_outcome(Category::Contrast),
        ];
        let report = assemble_report("https://example.com", outcomes, &ScanConfig::default());
        assert_eq!(
            report.categories[&Category::Contrast].status,
            CategoryStatus::Unavailable
        );
        assert_eq!(report.categories[&Category::Contrast].score, None);
        // fonts alone scores 100, renormalized overall stays 100
        assert_eq!(report.overall_score, 100);
    }

    #[test]
    fn test_text_render_contains_sections() {
        let report = sample_report();
        let text = render_report(&report, OutputFormat::Text);
        assert!(text.contains("Overall score: 60/100"));
        assert!(text.contains("CRITICAL ALERT"));
        assert!(text.contains("[FONTS-001] CRITICAL"));
        assert!(text.contains("Legal basis: Art. 6 (1) GDPR"));
        assert!(text.contains("No issues found."));
    }

    #[test]
    fn test_json_render_roundtrips() {
        let report = sample_report();
        let json = render_report(&report, OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(parsed["url"], "https://example.com");
        assert_eq!(parsed["overall_score"], report.overall_score);
        assert!(parsed["categories"]["fonts"]["findings"].is_array());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }
}
