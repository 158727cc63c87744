// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end pipeline tests: snapshot -> checkers -> scorer ->
//! aggregator -> report.

use compliancebot::checkers::{self, Checker};
use compliancebot::{
    Category, CategoryStatus, DocumentSnapshot, Finding, RiskLevel, ScanConfig, Severity,
};

/// A page with violations in every category.
const VIOLATING_PAGE: &str = r#"
<html>
<head>
    <link href="https://fonts.googleapis.com/css?family=Roboto:400,700|Open+Sans:400" rel="stylesheet">
    <script src="https://www.google-analytics.com/analytics.js"></script>
    <style>
        .faint { color: #aaa; background-color: #ccc; }
    </style>
</head>
<body>
    <div class="content">
        <form><input type="text" name="email"></form>
        <p>Welcome to our site!</p>
    </div>
</body>
</html>
"#;

/// A page that passes everything.
const CLEAN_PAGE: &str = r#"
<html>
<head>
    <style>body { color: #000; background-color: #fff; }</style>
</head>
<body>
    <header><h1>Beispiel GmbH</h1></header>
    <nav><a href="/">Home</a></nav>
    <main>
        <h2>Impressum</h2>
        <p>Beispiel GmbH, Musterstraße 12, 80331 München</p>
        <p>Telefon: +49 89 123456, kontakt@beispiel.de</p>
        <p>USt-IdNr.: DE123456789, Handelsregister: Amtsgericht München HRB 98765</p>
        <form>
            <label for="email">Email</label>
            <input type="email" id="email" autocomplete="email">
        </form>
    </main>
    <footer><p>Angaben gemäß § 5 DDG</p></footer>
</body>
</html>
"#;

#[test]
fn test_violating_page_full_pipeline() {
    let snapshot = DocumentSnapshot::parse("https://example.com", VIOLATING_PAGE);
    let report = compliancebot::scan(&snapshot, &ScanConfig::default());

    // every category reported
    assert_eq!(report.categories.len(), 5);

    // a single font violation: binary fail, medium risk
    let fonts = &report.categories[&Category::Fonts];
    assert_eq!(fonts.score, Some(0));
    assert_eq!(fonts.status, CategoryStatus::Fail);
    assert_eq!(report.risk_level, RiskLevel::Medium);
    assert!(report.estimated_cost.typical_euro > 0);

    // tracking without consent escalates to critical
    let tracking = &report.categories[&Category::Tracking];
    assert!(tracking
        .findings
        .iter()
        .any(|f| f.severity == Severity::Critical));

    // unlabeled form field is an aggregated critical
    let accessibility = &report.categories[&Category::Accessibility];
    assert!(accessibility
        .findings
        .iter()
        .any(|f| f.rule_id == "ARIA-005" && f.severity == Severity::Critical));

    // the faint CSS pair fails contrast
    assert!(!report.categories[&Category::Contrast].findings.is_empty());

    // no impressum content at all
    assert!(!report.categories[&Category::LegalText].findings.is_empty());

    // font criticals carry exposure, so the alert is raised
    let alert = report.critical_alert.as_ref().expect("alert expected");
    assert!(alert.total_risk_euro > 0);

    assert!(report.overall_score < 50);
}

#[test]
fn test_clean_page_scores_high() {
    let snapshot = DocumentSnapshot::parse("https://example.com", CLEAN_PAGE);
    let report = compliancebot::scan(&snapshot, &ScanConfig::default());

    assert_eq!(report.categories[&Category::Fonts].score, Some(100));
    assert_eq!(report.categories[&Category::Tracking].score, Some(100));
    assert_eq!(report.categories[&Category::LegalText].score, Some(100));
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert_eq!(report.estimated_cost.typical_euro, 0);
    assert!(report.critical_alert.is_none());
    assert_eq!(report.overall_score, 100);
}

#[test]
fn test_pipeline_idempotent_except_timestamp() {
    let snapshot = DocumentSnapshot::parse("https://example.com", VIOLATING_PAGE);
    let config = ScanConfig::default();

    let first = compliancebot::scan(&snapshot, &config);
    let second = compliancebot::scan(&snapshot, &config);

    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&second).unwrap();
    a.as_object_mut().unwrap().remove("generated_at");
    b.as_object_mut().unwrap().remove("generated_at");
    assert_eq!(a, b);
}

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

#[test]
fn test_failing_checker_does_not_block_report() {
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(checkers::fonts::FontHostingChecker),
        Box::new(checkers::tracking::TrackingConsentChecker),
        Box::new(checkers::aria::AccessibilitySemanticsChecker),
        Box::new(PanickingChecker),
        Box::new(checkers::legal_text::LegalTextChecker),
    ];
    let snapshot = DocumentSnapshot::parse("https://example.com", CLEAN_PAGE);
    let report =
        compliancebot::scan_with_checkers(&checkers, &snapshot, &ScanConfig::default());

    assert_eq!(report.categories.len(), 5);
    assert_eq!(
        report.categories[&Category::Contrast].status,
        CategoryStatus::Unavailable
    );
    assert_eq!(report.categories[&Category::Contrast].score, None);

    // the other categories still scored, and the weights renormalized
    assert_eq!(report.categories[&Category::Fonts].score, Some(100));
    assert_eq!(report.overall_score, 100);
}

#[test]
fn test_missing_landmarks_single_aggregated_finding() {
    let html = r#"
        <html><body>
            <header>Head</header>
            <nav><a href="/">Home</a></nav>
            <p>No main, no footer.</p>
        </body></html>
    "#;
    let snapshot = DocumentSnapshot::parse("https://example.com", html);
    let report = compliancebot::scan(&snapshot, &ScanConfig::default());

    let landmark_findings: Vec<&Finding> = report.categories[&Category::Accessibility]
        .findings
        .iter()
        .filter(|f| f.rule_id == "ARIA-002")
        .collect();
    assert_eq!(landmark_findings.len(), 1);
    assert!(landmark_findings[0].description.contains("main"));
    assert!(landmark_findings[0].description.contains("footer"));
}

#[test]
fn test_fonts_finding_lists_exact_families() {
    let snapshot = DocumentSnapshot::parse("https://example.com", VIOLATING_PAGE);
    let report = compliancebot::scan(&snapshot, &ScanConfig::default());

    let fonts = &report.categories[&Category::Fonts];
    assert_eq!(fonts.findings.len(), 1);
    assert_eq!(fonts.findings[0].evidence.as_deref(), Some("Roboto, Open Sans"));
}

#[test]
fn test_findings_ordered_by_severity() {
    let snapshot = DocumentSnapshot::parse("https://example.com", VIOLATING_PAGE);
    let report = compliancebot::scan(&snapshot, &ScanConfig::default());

    for result in report.categories.values() {
        let ranks: Vec<u8> = result.findings.iter().map(|f| f.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted, "findings out of order in {}", result.category);
    }
}
