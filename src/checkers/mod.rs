// SPDX-License-Identifier: PMPL-1.0-or-later
//! Content checkers.
//!
//! Each checker is a pure, side-effect-free pass over the document
//! snapshot, producing findings for one compliance category. Checkers
//! share no mutable state and run as concurrent tasks against the same
//! read-only snapshot, joined before aggregation.

pub mod aria;
pub mod contrast;
pub mod fonts;
pub mod legal_text;
pub mod tracking;

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, error};

use crate::config::ScanConfig;
use crate::error::EngineError;
use crate::finding::{Category, Finding};
use crate::snapshot::DocumentSnapshot;

/// Trait implemented by all checkers.
pub trait Checker: Send + Sync {
    /// Human-readable name of this checker.
    fn name(&self) -> &'static str;

    /// Category this checker reports into.
    fn category(&self) -> Category;

    /// Inspect the snapshot and return findings in detection order.
    fn check(&self, snapshot: &DocumentSnapshot, config: &ScanConfig) -> Vec<Finding>;
}

/// Result of one checker run. A failed checker contributes zero findings
/// and its category is reported as unavailable downstream.
pub struct CheckerOutcome {
    /// Category the checker reports into.
    pub category: Category,
    /// Findings, or the failure that prevented them.
    pub result: Result<Vec<Finding>, EngineError>,
}

/// The five standard checkers.
pub fn default_checkers() -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(fonts::FontHostingChecker),
        Box::new(tracking::TrackingConsentChecker),
        Box::new(aria::AccessibilitySemanticsChecker),
        Box::new(contrast::ContrastChecker),
        Box::new(legal_text::LegalTextChecker),
    ]
}

/// Run checkers concurrently against the same read-only snapshot and
/// join their outcomes. A panicking checker is isolated: it yields a
/// `CheckerFailed` outcome and does not abort the other checkers.
pub fn run_checkers(
    checkers: &[Box<dyn Checker>],
    snapshot: &DocumentSnapshot,
    config: &ScanConfig,
) -> Vec<CheckerOutcome> {
    checkers
        .par_iter()
        .map(|checker| {
            let category = checker.category();
            let result = panic::catch_unwind(AssertUnwindSafe(|| checker.check(snapshot, config)));
            match result {
                Ok(findings) => {
                    debug!(
                        checker = checker.name(),
                        findings = findings.len(),
                        "checker finished"
                    );
                    CheckerOutcome { category, result: Ok(findings) }
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(checker = checker.name(), message = %message, "checker failed");
                    CheckerOutcome {
                        category,
                        result: Err(EngineError::CheckerFailed { category, message }),
                    }
                }
            }
        })
        .collect()
}

/// Best-effort extraction of a panic payload message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;

    struct PanickingChecker;

    impl Checker for PanickingChecker {
        fn name(&self) -> &'static str {
            "Panicking Checker"
        }

        fn category(&self) -> Category {
            Category::Contrast
        }

        fn check(&self, _snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
            panic!("intentional test panic");
        }
    }

    struct StaticChecker;

    impl Checker for StaticChecker {
        fn name(&self) -> &'static str {
            "Static Checker"
        }

        fn category(&self) -> Category {
            Category::Fonts
        }

        fn check(&self, _snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
            vec![Finding::new(Category::Fonts, "FONTS-001", Severity::Critical, "t")]
        }
    }

    #[test]
    fn test_panic_isolated() {
        let checkers: Vec<Box<dyn Checker>> =
            vec![Box::new(PanickingChecker), Box::new(StaticChecker)];
        let snapshot = DocumentSnapshot::parse("https://example.com", "<html></html>");
        let outcomes = run_checkers(&checkers, &snapshot, &ScanConfig::default());

        assert_eq!(outcomes.len(), 2);
        let failed = outcomes.iter().find(|o| o.category == Category::Contrast).unwrap();
        assert!(failed.result.is_err());
        let ok = outcomes.iter().find(|o| o.category == Category::Fonts).unwrap();
        assert_eq!(ok.result.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_default_checkers_cover_all_categories() {
        let checkers = default_checkers();
        for category in Category::ALL {
            assert!(checkers.iter().any(|c| c.category() == category));
        }
    }
}
