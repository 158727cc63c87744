// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility semantics checker.
//!
//! Independent sub-checks over the element tree:
//! - Accessible-name resolution for interactive elements
//! - Landmark coverage (tag or role form)
//! - Role validity against the ARIA vocabulary
//! - ARIA id-reference integrity
//! - Form labeling (aggregated, critical)
//! - Live-region heuristic for alert/notification markup

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::catalog::{ARIA_ROLES, EXEMPT_INPUT_TYPES, LANDMARKS, LIVE_REGION_CLASS_RE};
use crate::checkers::Checker;
use crate::config::ScanConfig;
use crate::finding::{Category, Finding, Severity};
use crate::snapshot::DocumentSnapshot;

/// Maximum invalid roles listed in the aggregated finding.
const MAX_LISTED_ROLES: usize = 10;

/// Checker for ARIA semantics, labels, and landmarks.
pub struct AccessibilitySemanticsChecker;

impl Checker for AccessibilitySemanticsChecker {
    fn name(&self) -> &'static str {
        "Accessibility Semantics Checker"
    }

    fn category(&self) -> Category {
        Category::Accessibility
    }

    fn check(&self, snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
        let document = snapshot.document();
        let ids = collect_ids(&document);
        let mut findings = Vec::new();

        check_accessible_names(&document, &ids, &mut findings);
        check_landmarks(&document, &mut findings);
        check_role_validity(&document, &mut findings);
        check_reference_integrity(&document, &ids, &mut findings);
        check_form_labels(&document, &ids, &mut findings);
        check_live_regions(&document, &mut findings);

        findings
    }
}

/// All element ids in the tree, for reference checks.
fn collect_ids(document: &Html) -> HashSet<String> {
    let sel = Selector::parse("[id]").expect("valid selector");
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("id").map(String::from))
        .collect()
}

fn attr_nonempty(el: ElementRef<'_>, name: &str) -> bool {
    el.value().attr(name).is_some_and(|v| !v.trim().is_empty())
}

/// Whether `aria-labelledby` resolves to at least one existing id.
fn labelledby_resolves(el: ElementRef<'_>, ids: &HashSet<String>) -> bool {
    el.value()
        .attr("aria-labelledby")
        .is_some_and(|v| v.split_whitespace().any(|id| ids.contains(id)))
}

fn has_text_content(el: ElementRef<'_>) -> bool {
    !el.text().collect::<String>().trim().is_empty()
}

/// Accessible-name resolution for buttons, links, and button-like
/// inputs. Form fields are covered by the form-labeling sub-check.
fn check_accessible_names(document: &Html, ids: &HashSet<String>, findings: &mut Vec<Finding>) {
    for tag in ["button", "a"] {
        let sel = Selector::parse(tag).expect("valid selector");
        for el in document.select(&sel) {
            let named = has_text_content(el)
                || attr_nonempty(el, "aria-label")
                || labelledby_resolves(el, ids)
                || attr_nonempty(el, "title")
                || (tag == "a" && has_nontrivial_href(el));
            if !named {
                findings.push(name_missing_finding(tag, el));
            }
        }
    }

    // submit/button/reset inputs resolve their name from `value`
    let input_sel = Selector::parse("input").expect("valid selector");
    for el in document.select(&input_sel) {
        let input_type = el.value().attr("type").unwrap_or("text");
        if !matches!(input_type, "submit" | "button" | "reset") {
            continue;
        }
        let named = attr_nonempty(el, "value")
            || attr_nonempty(el, "aria-label")
            || labelledby_resolves(el, ids)
            || attr_nonempty(el, "title");
        if !named {
            findings.push(name_missing_finding("input", el));
        }
    }
}

fn has_nontrivial_href(el: ElementRef<'_>) -> bool {
    el.value()
        .attr("href")
        .is_some_and(|href| !href.trim().is_empty() && href.trim() != "#")
}

fn name_missing_finding(tag: &str, el: ElementRef<'_>) -> Finding {
    let hint = match tag {
        "button" => "Add visible text or an aria-label to the button.",
        "a" => "Give the link descriptive text, an aria-label, or a real destination.",
        "input" => "Add a value attribute or an aria-label to the input.",
        _ => "Add an accessible name via text content or aria-label.",
    };
    Finding::new(
        Category::Accessibility,
        "ARIA-001",
        Severity::Warning,
        &format!("<{}> has no accessible name", tag),
    )
    .with_description(&format!(
        "Assistive technology announces this element with no label. {}",
        hint
    ))
    .with_evidence(&el.html())
    .with_legal_basis("WCAG 2.1 4.1.2")
    .as_auto_fixable()
}

/// Landmark coverage. One aggregated finding lists every missing
/// landmark after checking both the semantic tag and the role form.
fn check_landmarks(document: &Html, findings: &mut Vec<Finding>) {
    let mut missing = Vec::new();
    for (tag, role) in LANDMARKS {
        let tag_present = Selector::parse(tag)
            .ok()
            .is_some_and(|sel| document.select(&sel).next().is_some());
        let role_present = Selector::parse(&format!("[role=\"{}\"]", role))
            .ok()
            .is_some_and(|sel| document.select(&sel).next().is_some());
        if !tag_present && !role_present {
            missing.push(format!("{} ({})", tag, role));
        }
    }

    if !missing.is_empty() {
        findings.push(
            Finding::new(
                Category::Accessibility,
                "ARIA-002",
                Severity::Warning,
                "Missing page landmarks",
            )
            .with_description(&format!(
                "The page lacks these landmark regions: {}. Landmarks let \
                 screen reader users jump between page areas.",
                missing.join(", ")
            ))
            .with_legal_basis("WCAG 2.1 1.3.1"),
        );
    }
}

/// Role validity. One aggregated finding lists invalid role values.
fn check_role_validity(document: &Html, findings: &mut Vec<Finding>) {
    let sel = Selector::parse("[role]").expect("valid selector");
    let mut invalid = Vec::new();
    for el in document.select(&sel) {
        let Some(value) = el.value().attr("role") else { continue };
        for role in value.split_whitespace() {
            let role_lower = role.to_lowercase();
            if !ARIA_ROLES.contains(&role_lower.as_str()) && !invalid.contains(&role_lower) {
                invalid.push(role_lower);
            }
        }
    }

    if !invalid.is_empty() {
        let listed: Vec<&str> = invalid.iter().take(MAX_LISTED_ROLES).map(String::as_str).collect();
        findings.push(
            Finding::new(
                Category::Accessibility,
                "ARIA-003",
                Severity::Warning,
                "Invalid ARIA roles",
            )
            .with_description(&format!(
                "These role values are not in the ARIA vocabulary: {}. \
                 Unknown roles are ignored by assistive technology.",
                listed.join(", ")
            ))
            .with_evidence(&listed.join(", "))
            .with_legal_basis("WCAG 2.1 4.1.2"),
        );
    }
}

/// ARIA id-reference integrity. One finding per dangling reference.
fn check_reference_integrity(document: &Html, ids: &HashSet<String>, findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for attr in ["aria-labelledby", "aria-controls"] {
        let sel = Selector::parse(&format!("[{}]", attr)).expect("valid selector");
        for el in document.select(&sel) {
            let Some(value) = el.value().attr(attr) else { continue };
            for id in value.split_whitespace() {
                if ids.contains(id) || !seen.insert((attr, id.to_string())) {
                    continue;
                }
                findings.push(
                    Finding::new(
                        Category::Accessibility,
                        "ARIA-004",
                        Severity::Warning,
                        &format!("Dangling {} reference", attr),
                    )
                    .with_description(&format!(
                        "{}=\"{}\" references id \"{}\" which does not exist \
                         in the document.",
                        attr, value, id
                    ))
                    .with_evidence(&el.html())
                    .with_legal_basis("WCAG 2.1 1.3.1"),
                );
            }
        }
    }
}

/// Form labeling. Unlabeled fields block task completion for assistive
/// technology users, so the aggregated finding is critical.
fn check_form_labels(document: &Html, ids: &HashSet<String>, findings: &mut Vec<Finding>) {
    let label_sel = Selector::parse("label[for]").expect("valid selector");
    let label_fors: HashSet<String> = document
        .select(&label_sel)
        .filter_map(|l| l.value().attr("for").map(String::from))
        .collect();

    let mut unlabeled = Vec::new();
    for tag in ["input", "select", "textarea"] {
        let sel = Selector::parse(tag).expect("valid selector");
        for el in document.select(&sel) {
            if tag == "input" {
                let input_type = el.value().attr("type").unwrap_or("text");
                if EXEMPT_INPUT_TYPES.contains(&input_type) {
                    continue;
                }
            }
            let labeled = el
                .value()
                .attr("id")
                .is_some_and(|id| label_fors.contains(id))
                || attr_nonempty(el, "aria-label")
                || labelledby_resolves(el, ids)
                || has_label_ancestor(el);
            if !labeled {
                unlabeled.push(describe_field(tag, el));
            }
        }
    }

    if !unlabeled.is_empty() {
        findings.push(
            Finding::new(
                Category::Accessibility,
                "ARIA-005",
                Severity::Critical,
                "Form fields without labels",
            )
            .with_description(&format!(
                "These fields resolve no label via <label for>, aria-label, \
                 aria-labelledby, or an enclosing <label>: {}. Unlabeled \
                 fields make forms unusable with a screen reader.",
                unlabeled.join(", ")
            ))
            .with_evidence(&unlabeled.join(", "))
            .with_legal_basis("WCAG 2.1 3.3.2 / § 3 BFSG")
            .as_auto_fixable(),
        );
    }
}

fn has_label_ancestor(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "label")
}

fn describe_field(tag: &str, el: ElementRef<'_>) -> String {
    let mut descriptor = match (tag, el.value().attr("type")) {
        ("input", Some(t)) => format!("input[type={}]", t),
        _ => tag.to_string(),
    };
    if let Some(id) = el.value().attr("id") {
        descriptor.push('#');
        descriptor.push_str(id);
    } else if let Some(name) = el.value().attr("name") {
        descriptor.push_str(&format!("[name={}]", name));
    }
    descriptor
}

/// Live-region heuristic: alert/notification-style markup should carry
/// aria-live (or an implicitly live role) on itself or a descendant.
fn check_live_regions(document: &Html, findings: &mut Vec<Finding>) {
    let sel = Selector::parse("[class]").expect("valid selector");
    let mut offending = Vec::new();
    for el in document.select(&sel) {
        let Some(class) = el.value().attr("class") else { continue };
        if !LIVE_REGION_CLASS_RE.is_match(class) {
            continue;
        }
        // descendants() includes the element itself
        let live = el.descendants().filter_map(ElementRef::wrap).any(|d| {
            d.value().attr("aria-live").is_some()
                || matches!(d.value().attr("role"), Some("alert") | Some("status"))
        });
        if !live {
            let class = class.trim().to_string();
            if !offending.contains(&class) {
                offending.push(class);
            }
        }
    }

    if !offending.is_empty() {
        findings.push(
            Finding::new(
                Category::Accessibility,
                "ARIA-006",
                Severity::Info,
                "Notification markup without live region",
            )
            .with_description(&format!(
                "Elements with these classes look like notifications but \
                 carry no aria-live: {}. Screen readers will not announce \
                 their updates.",
                offending.join(", ")
            ))
            .with_legal_basis("WCAG 2.1 4.1.3"),
        );
    }
}
