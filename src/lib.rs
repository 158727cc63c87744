// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compliancebot - Web Page Legal & Accessibility Compliance Engine
//!
//! Analyzes a fetched page's markup, styles, and scripts against a
//! fixed catalogue of legal and accessibility rules and produces a
//! weighted compliance report with a numeric score, a risk
//! classification, and prioritized findings.
//!
//! ## Checkers
//!
//! - **Fonts**: third-party font CDN embedding (GDPR data transfer)
//! - **Tracking**: analytics/ads scripts and consent frameworks (CMP/TCF)
//! - **Accessibility**: ARIA semantics, labels, and landmarks
//! - **Contrast**: WCAG 2.1 color contrast ratios
//! - **Legal text**: required provider-identification elements
//!
//! Checkers run concurrently against one read-only [`DocumentSnapshot`];
//! a category scorer, a weighted aggregator, and a risk/cost estimator
//! turn their findings into the final [`ComplianceReport`].

pub mod aggregate;
pub mod catalog;
pub mod checkers;
pub mod config;
pub mod error;
pub mod finding;
pub mod report;
pub mod score;
pub mod snapshot;

pub use aggregate::{CostEstimate, CriticalAlert, RiskLevel};
pub use config::{ScanConfig, SiteProfile, StatusThresholds, WcagLevel};
pub use error::EngineError;
pub use finding::{Category, Finding, Severity};
pub use report::{ComplianceReport, OutputFormat};
pub use score::{CategoryResult, CategoryStatus};
pub use snapshot::{DocumentSnapshot, Script};

use checkers::Checker;

/// Run a full scan with the standard checkers.
pub fn scan(snapshot: &DocumentSnapshot, config: &ScanConfig) -> ComplianceReport {
    scan_with_checkers(&checkers::default_checkers(), snapshot, config)
}

/// Run a full scan with a caller-supplied checker set.
pub fn scan_with_checkers(
    checkers: &[Box<dyn Checker>],
    snapshot: &DocumentSnapshot,
    config: &ScanConfig,
) -> ComplianceReport {
    let outcomes = checkers::run_checkers(checkers, snapshot, config);
    report::assemble_report(snapshot.url(), outcomes, config)
}
