// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tracking and consent checker.
//!
//! Two cooperating passes over the snapshot's scripts:
//! 1. Tracking-script detection against known analytics/ads signatures.
//! 2. Consent-framework detection: TCF API markers, CMP vendor script
//!    domains, consent-string markers, and visible-banner hints.
//!
//! Tracking findings escalate from warning to critical when no consent
//! mechanism is present on the page.

use crate::catalog::{
    CmpVendor, CMP_VENDORS, CONSENT_BANNER_RE, CONSENT_MODE_RE, CONSENT_STRING_MARKERS,
    NO_CONSENT_RISK_EURO, TCF_API_MARKER, TCF_V1_MARKER, TRACKING_RISK_EURO, TRACKING_SIGNATURES,
};
use crate::checkers::Checker;
use crate::config::ScanConfig;
use crate::finding::{Category, Finding, Severity};
use crate::snapshot::DocumentSnapshot;

/// Checker for tracking scripts and consent management.
pub struct TrackingConsentChecker;

/// Consent signals detected on the page.
#[derive(Debug, Default)]
struct ConsentSignals {
    /// First CMP vendor detected, in priority order per script.
    cmp: Option<&'static CmpVendor>,
    /// Current TCF v2 API marker present.
    tcf_api: bool,
    /// Superseded TCF v1 API marker present.
    tcf_v1: bool,
    /// Initialized consent-string marker present.
    consent_string: bool,
    /// Google consent-mode markers present.
    consent_mode: bool,
    /// Visible banner markup hints present.
    banner: bool,
}

impl ConsentSignals {
    /// Whether any consent mechanism exists at all.
    fn has_mechanism(&self) -> bool {
        self.cmp.is_some() || self.tcf_api || self.banner
    }
}

impl Checker for TrackingConsentChecker {
    fn name(&self) -> &'static str {
        "Tracking Consent Checker"
    }

    fn category(&self) -> Category {
        Category::Tracking
    }

    fn check(&self, snapshot: &DocumentSnapshot, _config: &ScanConfig) -> Vec<Finding> {
        let signals = detect_consent_signals(snapshot);
        let trackers = detect_trackers(snapshot);
        let mut findings = Vec::new();

        for (service, evidence) in &trackers {
            let severity = if signals.has_mechanism() {
                Severity::Warning
            } else {
                Severity::Critical
            };
            let risk = if severity == Severity::Critical { TRACKING_RISK_EURO } else { 0 };
            findings.push(
                Finding::new(
                    Category::Tracking,
                    "TRACK-001",
                    severity,
                    &format!("Tracking script: {}", service),
                )
                .with_description(&format!(
                    "{} is embedded on the page. Tracking requires informed \
                     consent before any data leaves the browser.",
                    service
                ))
                .with_evidence(evidence)
                .with_legal_basis("Art. 6 (1) GDPR / § 25 TDDDG")
                .with_risk_euro(risk),
            );
        }

        if !trackers.is_empty() && !signals.has_mechanism() {
            findings.push(
                Finding::new(
                    Category::Tracking,
                    "TRACK-002",
                    Severity::Critical,
                    "No consent mechanism",
                )
                .with_description(
                    "Tracking scripts run but no consent framework, TCF API, \
                     or consent banner was detected. Visitors cannot refuse \
                     tracking before it starts.",
                )
                .with_legal_basis("Art. 7 GDPR")
                .with_risk_euro(NO_CONSENT_RISK_EURO),
            );
        }

        if let Some(cmp) = signals.cmp {
            if !signals.consent_string {
                let cmp_label = match cmp.cmp_id {
                    Some(id) => format!("{} (CMP ID {})", cmp.vendor, id),
                    None => cmp.vendor.to_string(),
                };
                findings.push(
                    Finding::new(
                        Category::Tracking,
                        "TRACK-003",
                        Severity::Warning,
                        "Incomplete CMP setup",
                    )
                    .with_description(&format!(
                        "{} is loaded but no initialized consent string was \
                         found. The CMP may not be wired into the tag setup.",
                        cmp_label
                    ))
                    .with_legal_basis("Art. 7 (1) GDPR"),
                );
            }
        }

        if signals.tcf_v1 && !signals.tcf_api {
            findings.push(
                Finding::new(
                    Category::Tracking,
                    "TRACK-004",
                    Severity::Info,
                    "Superseded consent framework version",
                )
                .with_description(
                    "The page exposes the TCF v1 __cmp API instead of the \
                     current __tcfapi. Upgrade the CMP integration to TCF v2.",
                ),
            );
        }

        if signals.consent_mode {
            findings.push(
                Finding::new(
                    Category::Tracking,
                    "TRACK-005",
                    Severity::Info,
                    "Consent-mode markers present",
                )
                .with_description(
                    "Google consent-mode tagging was detected. This is a \
                     vendor convention, not a consent framework.",
                ),
            );
        }

        findings
    }
}

/// Detect tracking services. One entry per unique signature, with the
/// matched script source or snippet as evidence.
fn detect_trackers(snapshot: &DocumentSnapshot) -> Vec<(&'static str, String)> {
    let mut matches = Vec::new();
    for signature in TRACKING_SIGNATURES.iter() {
        let mut evidence = None;
        for script in snapshot.scripts() {
            if let Some(src) = &script.src {
                if signature.regex.is_match(src) {
                    evidence = Some(src.clone());
                    break;
                }
            }
            if let Some(text) = &script.text {
                if let Some(m) = signature.regex.find(text) {
                    evidence = Some(m.as_str().to_string());
                    break;
                }
            }
        }
        if let Some(evidence) = evidence {
            matches.push((signature.service, evidence));
        }
    }
    matches
}

/// Detect consent signals across scripts and markup.
fn detect_consent_signals(snapshot: &DocumentSnapshot) -> ConsentSignals {
    let mut signals = ConsentSignals {
        banner: CONSENT_BANNER_RE.is_match(snapshot.html()),
        ..ConsentSignals::default()
    };

    for script in snapshot.scripts() {
        // Per script URL the first matching vendor in priority order
        // wins; later vendors are not consulted for that URL.
        for candidate in [script.src.as_deref(), script.text.as_deref()].into_iter().flatten() {
            if signals.cmp.is_none() {
                signals.cmp = CMP_VENDORS.iter().find(|v| v.regex.is_match(candidate));
            }
        }

        if let Some(text) = &script.text {
            if text.contains(TCF_API_MARKER) {
                signals.tcf_api = true;
            }
            if text.contains(TCF_V1_MARKER) && !text.contains(TCF_API_MARKER) {
                signals.tcf_v1 = true;
            }
            if CONSENT_STRING_MARKERS.iter().any(|m| text.contains(m)) {
                signals.consent_string = true;
            }
            if CONSENT_MODE_RE.is_match(text) {
                signals.consent_mode = true;
            }
        }
    }

    signals
}
