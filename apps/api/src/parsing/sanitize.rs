//! Contact/link sanitizer. Validates each `PersonalInfo` field and repairs
//! weak ones from the raw document text.
//!
//! Per-field policy:
//! - email:    kept if email-shaped and ≤ 100 chars, else first email in text
//! - phone:    kept if ≤ 25 chars with 10–15 digits, else first phone shape in text
//! - github:   profile URL recovered from text, canonicalized to `https://github.com/<user>`
//! - linkedin: same, `https://linkedin.com/in/<user>`
//! - name:     re-derived when empty or outside 2–50 chars, then truncated to 3 clean tokens
//! - title:    re-derived when shorter than 2 chars, truncated to 6 filtered tokens past 60
//! - location: cleared when it names a technology, re-derived when empty

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::PersonalInfo;
use crate::parsing::personal::{extract_name, extract_title, non_empty_lines};
use crate::parsing::validation::{validate_email, validate_phone};

pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 25;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;
pub const MIN_TITLE_LEN: usize = 2;
pub const MAX_TITLE_LEN: usize = 60;
const MAX_NAME_TOKENS: usize = 3;
const MAX_TITLE_TOKENS: usize = 6;
/// The bare "City, ST" pattern is only trusted in the document header.
const LOCATION_HEADER_LINES: usize = 10;

/// Technology names that disqualify a location candidate.
pub const LOCATION_TECH_KEYWORDS: &[&str] = &[
    "react",
    "javascript",
    "python",
    "node",
    "vite",
    "css",
    "html",
    "java",
    "typescript",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Phone shapes, most specific first.
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\+91[\s.-]?\d{5}[\s.-]?\d{5}",
        r"\+\d{1,3}[\s.-]?\d{3,5}[\s.-]?\d{3,5}[\s.-]?\d{0,5}",
        r"\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}",
        r"\d{10,12}",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static GITHUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:https?://)?(?:www\.)?github\.com/([a-zA-Z0-9_-]+)",
        r"(?i)GitHub\s*(?:URL)?[:\s]+(?:https?://)?(?:www\.)?github\.com/([a-zA-Z0-9_-]+)",
        r"(?i)github\.com/([a-zA-Z0-9_-]+)(?:/[a-zA-Z0-9_-]+)?",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static LINKEDIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/([a-zA-Z0-9_-]+)",
        r"(?i)LinkedIn\s*(?:URL)?[:\s]+(?:https?://)?(?:www\.)?linkedin\.com/in/([a-zA-Z0-9_-]+)",
        r"(?i)linkedin\.com/in/([a-zA-Z0-9_-]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static PROFILE_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

static TOKEN_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s|,]+").expect("valid regex"));

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

static LONG_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5,}$").expect("valid regex"));

/// Tokens that leak into an over-long name from adjacent headers or titles.
static NAME_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:Frontend|Backend|Software|Developer|Engineer|Manager|PROFESSIONAL|SUMMARY|TECHNICAL|SKILLS|EXPERIENCE|EDUCATION|PROJECTS)$",
    )
    .expect("valid regex")
});

static LABELED_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:Location|Address|Based in|Located in)[:\s]+([A-Za-z \t,]+(?:India|USA|UK|Canada|Australia|Germany|France|Singapore|Dubai|Remote))",
    )
    .expect("valid regex")
});

static CITY_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*,[ \t]*(?:[A-Z]{2}\b|[A-Z][a-z]+))")
        .expect("valid regex")
});

/// Returns a repaired copy of `info`; the input is left untouched.
pub fn sanitize_personal_info(info: &PersonalInfo, raw_text: &str) -> PersonalInfo {
    PersonalInfo {
        name: sanitize_name(&info.name, raw_text),
        title: sanitize_title(&info.title, raw_text),
        email: sanitize_email(&info.email, raw_text),
        phone: sanitize_phone(&info.phone, raw_text),
        location: sanitize_location(&info.location, raw_text),
        linkedin: sanitize_profile_url(&info.linkedin, raw_text, &PROFILE_LINKEDIN),
        github: sanitize_profile_url(&info.github, raw_text, &PROFILE_GITHUB),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Email / phone
// ────────────────────────────────────────────────────────────────────────────

pub fn sanitize_email(current: &str, raw_text: &str) -> String {
    let current = current.trim();
    if !current.is_empty() && current.len() <= MAX_EMAIL_LEN && validate_email(current) {
        return current.to_string();
    }
    find_email(raw_text).unwrap_or_default()
}

pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn sanitize_phone(current: &str, raw_text: &str) -> String {
    let current = current.trim();
    if !current.is_empty() && current.len() <= MAX_PHONE_LEN && validate_phone(current) {
        return current.to_string();
    }
    find_phone(raw_text).unwrap_or_default()
}

pub fn find_phone(text: &str) -> Option<String> {
    PHONE_PATTERNS.iter().find_map(|re| {
        re.find(text)
            .map(|m| WHITESPACE_RUN_RE.replace_all(m.as_str(), " ").trim().to_string())
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Profile links
// ────────────────────────────────────────────────────────────────────────────

/// Where a profile lives and how to recognize it.
struct ProfileSite {
    domain: &'static str,
    canonical_prefix: &'static str,
    patterns: &'static LazyLock<Vec<Regex>>,
}

static PROFILE_GITHUB: ProfileSite = ProfileSite {
    domain: "github",
    canonical_prefix: "https://github.com/",
    patterns: &GITHUB_PATTERNS,
};

static PROFILE_LINKEDIN: ProfileSite = ProfileSite {
    domain: "linkedin",
    canonical_prefix: "https://linkedin.com/in/",
    patterns: &LINKEDIN_PATTERNS,
};

fn sanitize_profile_url(current: &str, raw_text: &str, site: &ProfileSite) -> String {
    let mut url = current.trim().to_string();

    if url.is_empty() || !url.to_ascii_lowercase().contains(site.domain) {
        let found = site
            .patterns
            .iter()
            .find_map(|re| re.captures(raw_text).map(|c| c[1].to_string()));
        if let Some(user) = found {
            url = format!("{}{user}", site.canonical_prefix);
        }
    }

    if !url.is_empty() && !url.to_ascii_lowercase().starts_with("http") {
        url = if url.to_ascii_lowercase().contains(&format!("{}.com", site.domain)) {
            format!("https://{url}")
        } else if PROFILE_HANDLE_RE.is_match(&url) {
            format!("{}{url}", site.canonical_prefix)
        } else {
            // "N/A", "see below" and friends
            String::new()
        };
    }

    url
}

// ────────────────────────────────────────────────────────────────────────────
// Name / title
// ────────────────────────────────────────────────────────────────────────────

pub fn sanitize_name(current: &str, raw_text: &str) -> String {
    let mut name = current.trim().to_string();

    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.chars().count()) {
        let extracted = extract_name(raw_text);
        if !extracted.is_empty() {
            name = extracted;
        }
    }

    if name.chars().count() > MAX_NAME_LEN {
        name = TOKEN_SPLIT_RE
            .split(&name)
            .filter(|token| is_clean_name_token(token))
            .take(MAX_NAME_TOKENS)
            .collect::<Vec<_>>()
            .join(" ");
    }

    if (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.chars().count()) {
        name
    } else {
        String::new()
    }
}

fn is_clean_name_token(token: &str) -> bool {
    token.chars().count() > 1
        && !token.contains('@')
        && !token.to_ascii_lowercase().contains(".com")
        && !NUMERIC_RE.is_match(token)
        && !NAME_NOISE_RE.is_match(token)
}

pub fn sanitize_title(current: &str, raw_text: &str) -> String {
    let mut title = current.trim().to_string();

    if title.chars().count() < MIN_TITLE_LEN {
        let extracted = extract_title(raw_text);
        if !extracted.is_empty() {
            title = extracted;
        }
    }

    if title.chars().count() > MAX_TITLE_LEN {
        let mut tokens: Vec<&str> = TOKEN_SPLIT_RE
            .split(&title)
            .filter(|token| {
                !token.is_empty()
                    && !token.contains('@')
                    && !token.to_ascii_lowercase().contains(".com")
                    && !LONG_NUMBER_RE.is_match(token)
            })
            .take(MAX_TITLE_TOKENS)
            .collect();
        // Six long tokens can still overflow.
        while tokens.join(" ").chars().count() > MAX_TITLE_LEN {
            tokens.pop();
        }
        title = tokens.join(" ");
    }

    if title.chars().count() < MIN_TITLE_LEN {
        String::new()
    } else {
        title
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Location
// ────────────────────────────────────────────────────────────────────────────

pub fn mentions_technology(value: &str) -> bool {
    let lower = value.to_lowercase();
    LOCATION_TECH_KEYWORDS.iter().any(|tech| lower.contains(tech))
}

pub fn sanitize_location(current: &str, raw_text: &str) -> String {
    let current = current.trim();
    if current.chars().count() >= 2 && !mentions_technology(current) {
        return current.to_string();
    }
    find_location(raw_text).unwrap_or_default()
}

pub fn find_location(text: &str) -> Option<String> {
    let labeled = LABELED_LOCATION_RE
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .find(|candidate| !mentions_technology(candidate));
    if labeled.is_some() {
        return labeled;
    }

    let header = non_empty_lines(text)
        .into_iter()
        .take(LOCATION_HEADER_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    CITY_REGION_RE
        .captures_iter(&header)
        .map(|c| c[1].trim().to_string())
        .find(|candidate| !mentions_technology(candidate))
}
