// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scan configuration: site profile, WCAG target level, and category
//! score thresholds.
//!
//! A `ScanConfig` value is passed into the scan entry point; the engine
//! holds no process-wide mutable state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::finding::Category;

/// Site profile selecting the aggregation weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteProfile {
    /// Content/brochure site.
    Generic,
    /// E-commerce site. Tracking weighs heavier, legal text lighter.
    Shop,
}

/// WCAG conformance target for the contrast checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level AA - standard conformance.
    AA,
    /// Level AAA - enhanced conformance.
    AAA,
}

impl WcagLevel {
    /// Required contrast ratio for this level.
    ///
    /// AA: 4.5:1 normal text, 3:1 large text. AAA: 7:1 / 4.5:1.
    pub fn required_ratio(self, large_text: bool) -> f64 {
        match (self, large_text) {
            (WcagLevel::AA, false) => 4.5,
            (WcagLevel::AA, true) => 3.0,
            (WcagLevel::AAA, false) => 7.0,
            (WcagLevel::AAA, true) => 4.5,
        }
    }
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// Score thresholds deriving a category status tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Minimum score for a pass.
    pub pass: u8,
    /// Minimum score for a warning; below is a fail.
    pub warn: u8,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self { pass: 80, warn: 60 }
    }
}

/// Configuration for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Site profile selecting the weight vector.
    pub profile: SiteProfile,
    /// WCAG target level for contrast checks.
    pub wcag_level: WcagLevel,
    /// Default status thresholds.
    pub thresholds: StatusThresholds,
    /// Per-category threshold overrides.
    pub threshold_overrides: BTreeMap<Category, StatusThresholds>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            profile: SiteProfile::Generic,
            wcag_level: WcagLevel::AA,
            thresholds: StatusThresholds::default(),
            threshold_overrides: BTreeMap::new(),
        }
    }
}

impl ScanConfig {
    /// Thresholds effective for a category.
    pub fn thresholds_for(&self, category: Category) -> StatusThresholds {
        self.threshold_overrides
            .get(&category)
            .copied()
            .unwrap_or(self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_ratios() {
        assert_eq!(WcagLevel::AA.required_ratio(false), 4.5);
        assert_eq!(WcagLevel::AA.required_ratio(true), 3.0);
        assert_eq!(WcagLevel::AAA.required_ratio(false), 7.0);
        assert_eq!(WcagLevel::AAA.required_ratio(true), 4.5);
    }

    #[test]
    fn test_threshold_override() {
        let mut config = ScanConfig::default();
        config
            .threshold_overrides
            .insert(Category::Fonts, StatusThresholds { pass: 100, warn: 50 });

        assert_eq!(config.thresholds_for(Category::Fonts).pass, 100);
        assert_eq!(config.thresholds_for(Category::Contrast).pass, 80);
    }
}
