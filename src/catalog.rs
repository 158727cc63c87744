// SPDX-License-Identifier: PMPL-1.0-or-later
//! Canonical rule catalogue.
//!
//! Static, strongly-typed pattern and weight tables shared by the
//! checkers and the aggregator. Tables are built once at first use and
//! never mutated; checkers index into them by value.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SiteProfile;
use crate::finding::{Category, Severity};

/// Estimated exposure per third-party font embedding, in EUR.
///
/// Calibrated to the warning-letter wave after LG München I, 3 O 17493/20
/// (damages plus attorney fees per case).
pub const FONT_RISK_EURO: u32 = 350;

/// Exposure attributed to a tracking script running without consent.
pub const TRACKING_RISK_EURO: u32 = 300;

/// Exposure attributed to a missing consent mechanism.
pub const NO_CONSENT_RISK_EURO: u32 = 800;

/// Fixed score penalty for citing a superseded statute.
pub const OUTDATED_STATUTE_PENALTY: u32 = 5;

/// Score penalty per finding, by severity.
pub fn penalty_for(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 25,
        Severity::Warning => 10,
        Severity::Info => 0,
    }
}

/// A known third-party font CDN.
pub struct FontProvider {
    /// Domain substring matched against URLs.
    pub domain: &'static str,
    /// Provider display name.
    pub provider: &'static str,
}

/// Font CDN domains. Any reference is a violation.
pub const FONT_CDN_DOMAINS: &[FontProvider] = &[
    FontProvider { domain: "fonts.googleapis.com", provider: "Google Fonts" },
    FontProvider { domain: "fonts.gstatic.com", provider: "Google Fonts" },
    FontProvider { domain: "use.typekit.net", provider: "Adobe Fonts" },
    FontProvider { domain: "p.typekit.net", provider: "Adobe Fonts" },
    FontProvider { domain: "fast.fonts.net", provider: "Monotype" },
    FontProvider { domain: "cloud.typography.com", provider: "Hoefler&Co" },
    FontProvider { domain: "f.fontdeck.com", provider: "Fontdeck" },
];

/// A font loader library signature.
pub struct FontLoaderPattern {
    pub regex: Regex,
    pub loader: &'static str,
    pub provider: &'static str,
}

/// Loader-library signatures matched against script text and `src`.
pub static FONT_LOADER_SIGNATURES: LazyLock<Vec<FontLoaderPattern>> = LazyLock::new(|| {
    vec![
        FontLoaderPattern {
            regex: Regex::new(r"WebFont\.load\s*\(").unwrap(),
            loader: "WebFont loader",
            provider: "Google Fonts",
        },
        FontLoaderPattern {
            regex: Regex::new(r"(?i)webfont(?:loader)?(?:\.js)?/\d|ajax\.googleapis\.com/ajax/libs/webfont").unwrap(),
            loader: "webfontloader script",
            provider: "Google Fonts",
        },
        FontLoaderPattern {
            regex: Regex::new(r"Typekit\.load\s*\(").unwrap(),
            loader: "Typekit loader",
            provider: "Adobe Fonts",
        },
    ]
});

/// A known tracking/analytics script signature.
pub struct TrackingPattern {
    /// Stable signature id, unique per service.
    pub id: &'static str,
    pub regex: Regex,
    /// Service display name.
    pub service: &'static str,
}

/// Analytics/ads signatures matched across inline scripts and `src`
/// attributes.
pub static TRACKING_SIGNATURES: LazyLock<Vec<TrackingPattern>> = LazyLock::new(|| {
    vec![
        TrackingPattern {
            id: "google-analytics",
            regex: Regex::new(r"google-analytics\.com|\bgtag\s*\(|\bga\s*\(\s*['\x22]create").unwrap(),
            service: "Google Analytics",
        },
        TrackingPattern {
            id: "google-tag-manager",
            regex: Regex::new(r"googletagmanager\.com|\bGTM-[A-Z0-9]{4,}").unwrap(),
            service: "Google Tag Manager",
        },
        TrackingPattern {
            id: "meta-pixel",
            regex: Regex::new(r"connect\.facebook\.net|\bfbq\s*\(").unwrap(),
            service: "Meta Pixel",
        },
        TrackingPattern {
            id: "hotjar",
            regex: Regex::new(r"static\.hotjar\.com|_hjSettings").unwrap(),
            service: "Hotjar",
        },
        TrackingPattern {
            id: "matomo",
            regex: Regex::new(r"matomo\.js|piwik\.js|_paq\.push").unwrap(),
            service: "Matomo",
        },
        TrackingPattern {
            id: "doubleclick",
            regex: Regex::new(r"doubleclick\.net|googlesyndication\.com").unwrap(),
            service: "Google Ads / DoubleClick",
        },
        TrackingPattern {
            id: "tiktok-pixel",
            regex: Regex::new(r"analytics\.tiktok\.com|\bttq\.(?:load|track)").unwrap(),
            service: "TikTok Pixel",
        },
        TrackingPattern {
            id: "linkedin-insight",
            regex: Regex::new(r"px\.ads\.linkedin\.com|_linkedin_partner_id").unwrap(),
            service: "LinkedIn Insight Tag",
        },
    ]
});

/// A known consent management platform.
#[derive(Debug)]
pub struct CmpVendor {
    /// Vendor display name.
    pub vendor: &'static str,
    /// IAB TCF CMP id, when registered.
    pub cmp_id: Option<u16>,
    pub regex: Regex,
}

/// CMP vendor signatures in priority order. When several patterns match
/// the same script URL, the first vendor in this table wins, so reseller
/// CDNs are not mislabeled.
pub static CMP_VENDORS: LazyLock<Vec<CmpVendor>> = LazyLock::new(|| {
    vec![
        CmpVendor {
            vendor: "Usercentrics",
            cmp_id: Some(5),
            regex: Regex::new(r"(?i)app\.usercentrics\.eu|usercentrics\.(?:eu|com)").unwrap(),
        },
        CmpVendor {
            vendor: "Cookiebot",
            cmp_id: Some(14),
            regex: Regex::new(r"(?i)consent\.cookiebot\.com|cookiebot").unwrap(),
        },
        CmpVendor {
            vendor: "OneTrust",
            cmp_id: Some(28),
            regex: Regex::new(r"(?i)cdn\.cookielaw\.org|onetrust").unwrap(),
        },
        CmpVendor {
            vendor: "Didomi",
            cmp_id: Some(7),
            regex: Regex::new(r"(?i)sdk\.privacy-center\.org|didomi").unwrap(),
        },
        CmpVendor {
            vendor: "Sourcepoint",
            cmp_id: Some(6),
            regex: Regex::new(r"(?i)cdn\.privacy-mgmt\.com|sourcepoint").unwrap(),
        },
        CmpVendor {
            vendor: "Quantcast Choice",
            cmp_id: Some(10),
            regex: Regex::new(r"(?i)quantcast\.mgr\.consensu\.org|qc-cmp2").unwrap(),
        },
        CmpVendor {
            vendor: "consentmanager",
            cmp_id: Some(31),
            regex: Regex::new(r"(?i)delivery\.consentmanager\.net|consentmanager\.net").unwrap(),
        },
        CmpVendor {
            vendor: "TrustArc",
            cmp_id: Some(21),
            regex: Regex::new(r"(?i)consent\.trustarc\.com|trustarc").unwrap(),
        },
        CmpVendor {
            vendor: "Borlabs Cookie",
            cmp_id: None,
            regex: Regex::new(r"(?i)borlabs-cookie").unwrap(),
        },
    ]
});

/// Literal marker for the current TCF v2 consent API.
pub const TCF_API_MARKER: &str = "__tcfapi";

/// Literal marker for the superseded TCF v1 consent API.
pub const TCF_V1_MARKER: &str = "__cmp";

/// Markers indicating an initialized TCF consent string.
pub const CONSENT_STRING_MARKERS: &[&str] = &["euconsent-v2", "tcString"];

/// Google consent-mode markers. Unrelated to the TCF; purely
/// informational when detected.
pub static CONSENT_MODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)gtag\s*\(\s*['"]consent['"]|analytics_storage|ad_storage"#).unwrap()
});

/// Markup hints for a visible consent banner.
pub static CONSENT_BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cookie[-_ ]?(?:banner|consent|notice|layer|bar)|consent[-_ ]?(?:banner|manager|overlay)|cc-window")
        .unwrap()
});

/// Interactive tags requiring an accessible name.
pub const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

/// Landmark regions as (semantic tag, ARIA role) pairs.
pub const LANDMARKS: &[(&str, &str)] = &[
    ("header", "banner"),
    ("nav", "navigation"),
    ("main", "main"),
    ("footer", "contentinfo"),
];

/// Input types exempt from form-label requirements.
pub const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

/// Class-name hints for elements that should be live regions.
pub static LIVE_REGION_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:alert|notification|status|toast|snackbar|flash)\b").unwrap()
});

/// WAI-ARIA 1.2 role vocabulary.
pub const ARIA_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote",
    "button", "caption", "cell", "checkbox", "code", "columnheader",
    "combobox", "complementary", "contentinfo", "definition", "deletion",
    "dialog", "directory", "document", "emphasis", "feed", "figure", "form",
    "generic", "grid", "gridcell", "group", "heading", "img", "insertion",
    "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio",
    "meter", "navigation", "none", "note", "option", "paragraph",
    "presentation", "progressbar", "radio", "radiogroup", "region", "row",
    "rowgroup", "rowheader", "scrollbar", "search", "searchbox", "separator",
    "slider", "spinbutton", "status", "strong", "subscript", "superscript",
    "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox",
    "time", "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

/// A required legal text element group. Patterns have OR semantics.
pub struct LegalGroup {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
}

/// Required legal element groups checked against visible page text.
pub static LEGAL_TEXT_GROUPS: LazyLock<Vec<LegalGroup>> = LazyLock::new(|| {
    vec![
        LegalGroup {
            name: "company identity",
            patterns: vec![
                Regex::new(r"(?i)impressum|imprint|legal\s+notice|anbieterkennzeichnung").unwrap(),
                Regex::new(r"(?i)\b(?:gmbh|aktiengesellschaft|ag\s*&\s*co|ohg|kgaa|gbr|inhaber(?:in)?)\b|e\.\s?k\.").unwrap(),
            ],
        },
        LegalGroup {
            name: "postal address",
            patterns: vec![
                Regex::new(r"(?i)(?:straße|strasse|str\.|platz|weg|allee|gasse)\s*\.?\s*\d+").unwrap(),
                Regex::new(r"\b\d{5}\s+[A-ZÄÖÜ][a-zäöüß]+").unwrap(),
            ],
        },
        LegalGroup {
            name: "contact channel",
            patterns: vec![
                Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap(),
                Regex::new(r"(?i)tel(?:efon)?\.?\s*:?\s*[+0-9(]|\+49[\s\d/-]{6,}").unwrap(),
            ],
        },
        LegalGroup {
            name: "tax id",
            patterns: vec![
                Regex::new(r"(?i)ust[.\s-]*id|umsatzsteuer[\s-]*(?:id|identifikationsnummer)|\bDE\s?\d{9}\b|steuernummer").unwrap(),
            ],
        },
        LegalGroup {
            name: "commercial register",
            patterns: vec![
                Regex::new(r"(?i)\bhr[ab]\s*\d+|handelsregister|registergericht|amtsgericht").unwrap(),
            ],
        },
    ]
});

/// References to the Telemediengesetz, superseded by the DDG in May 2024.
pub static OUTDATED_STATUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)§\s*5\s*tmg|telemediengesetz|\btmg\b").unwrap()
});

/// Weight vector for a site profile. Weights sum to 1.0; fonts is pinned
/// at the largest weight in every profile.
pub fn weight_profile(profile: SiteProfile) -> &'static [(Category, f64)] {
    match profile {
        SiteProfile::Generic => &[
            (Category::Fonts, 0.40),
            (Category::Tracking, 0.20),
            (Category::Accessibility, 0.15),
            (Category::Contrast, 0.10),
            (Category::LegalText, 0.15),
        ],
        SiteProfile::Shop => &[
            (Category::Fonts, 0.40),
            (Category::Tracking, 0.25),
            (Category::Accessibility, 0.15),
            (Category::Contrast, 0.10),
            (Category::LegalText, 0.10),
        ],
    }
}
