// SPDX-License-Identifier: PMPL-1.0-or-later
//! Legal text checker.
//!
//! Keyword presence check over the page's visible text for the required
//! legal element groups (company identity, postal address, contact
//! channel, tax id, commercial register). Patterns within a group have
//! OR semantics. Citations of superseded statutes are flagged
//! separately.

use crate::catalog::{LEGAL_TEXT_GROUPS, OUTDATED_STATUTE_PENALTY, OUTDATED_STATUTE_RE};
use crate::checkers::Checker;
use crate::config::ScanConfig;
use crate::finding::{Category, Finding, Severity};
use crate::snapshot::DocumentSnapshot;

/// Checker for required legal text elements.
pub struct LegalTextChecker;

impl Checker for LegalTextChecker {
    fn name(&self) -> &'static str {
        "Legal Text Checker"
    }

    fn category(&self) -> Category {
        Category::LegalText
    }

    fn check(&self, snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
        let text = snapshot.visible_text();
        let mut findings = Vec::new();

        for group in LEGAL_TEXT_GROUPS.iter() {
            if group.patterns.iter().any(|p| p.is_match(text)) {
                continue;
            }
            findings.push(
                Finding::new(
                    Category::LegalText,
                    "LEGAL-001",
                    Severity::Warning,
                    &format!("Missing legal element: {}", group.name),
                )
                .with_description(&format!(
                    "No {} information was found in the page text. Provider \
                     identification must state it where visitors can find it.",
                    group.name
                ))
                .with_legal_basis("§ 5 DDG"),
            );
        }

        if let Some(matched) = OUTDATED_STATUTE_RE.find(text) {
            findings.push(
                Finding::new(
                    Category::LegalText,
                    "LEGAL-002",
                    Severity::Info,
                    "Outdated statute reference",
                )
                .with_description(
                    "The page cites the Telemediengesetz, which the Digitale-\
                     Dienste-Gesetz replaced in May 2024. Update the citation \
                     to § 5 DDG.",
                )
                .with_evidence(matched.as_str())
                .with_legal_basis("§ 5 DDG")
                .with_score_penalty(OUTDATED_STATUTE_PENALTY)
                .as_auto_fixable(),
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(html: &str) -> Vec<Finding> {
        let snapshot = DocumentSnapshot::parse("https://example.com/impressum", html);
        LegalTextChecker.check(&snapshot, &ScanConfig::default())
    }

    const COMPLETE_IMPRESSUM: &str = r#"
        <html><body><main>
            <h1>Impressum</h1>
            <p>Beispiel GmbH</p>
            <p>Musterstraße 12, 80331 München</p>
            <p>Telefon: +49 89 123456, kontakt@beispiel.de</p>
            <p>USt-IdNr.: DE123456789</p>
            <p>Handelsregister: Amtsgericht München, HRB 98765</p>
            <p>Angaben gemäß § 5 DDG</p>
        </main></body></html>
    "#;

    #[test]
    fn test_complete_impressum_is_clean() {
        let findings = scan(COMPLETE_IMPRESSUM);
        assert!(findings.is_empty(), "expected no findings: {:?}", findings);
    }

    #[test]
    fn test_missing_tax_id() {
        let html = r#"
            <html><body><main>
                <h1>Impressum</h1>
                <p>Beispiel GmbH, Musterstraße 12, 80331 München</p>
                <p>Telefon: +49 89 123456</p>
                <p>Handelsregister: HRB 98765</p>
            </main></body></html>
        "#;
        let findings = scan(html);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].title.contains("tax id"));
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_page_misses_every_group() {
        let findings = scan("<html><body><p>Welcome!</p></body></html>");
        let group_findings: Vec<_> =
            findings.iter().filter(|f| f.rule_id == "LEGAL-001").collect();
        assert_eq!(group_findings.len(), 5);
    }

    #[test]
    fn test_outdated_statute_flagged_with_penalty() {
        let html = COMPLETE_IMPRESSUM.replace("§ 5 DDG", "§ 5 TMG");
        let findings = scan(&html);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "LEGAL-002");
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].score_penalty, Some(OUTDATED_STATUTE_PENALTY));
    }

    #[test]
    fn test_statute_in_script_ignored() {
        // Only visible text counts; markup inside scripts is stripped.
        let html = r#"<html><body>
            <script>var statute = "§ 5 TMG";</script>
            <main><h1>Impressum</h1>
                <p>Beispiel GmbH, Musterstraße 12, 80331 München</p>
                <p>kontakt@beispiel.de, USt-IdNr. DE123456789, HRB 1</p>
            </main>
        </body></html>"#;
        let findings = scan(html);
        assert!(findings.iter().all(|f| f.rule_id != "LEGAL-002"));
    }
}
