//! Fallback work-history extractor.
//!
//! Runs only over the located experience section. A document without one
//! yields no entries.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::ExperienceEntry;
use crate::parsing::sections::{find_section, floor_char_boundary, EXPERIENCE_KEYWORDS};
use crate::parsing::validation::{denotes_present, validate_date_range};

const MAX_DESCRIPTION_BULLETS: usize = 5;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Canonical end-date token for an ongoing role.
pub const PRESENT: &str = "Present";

const ROLE_WORDS: &str =
    "Developer|Engineer|Designer|Manager|Analyst|Architect|Lead|Director|Specialist|Consultant";

/// Optional month ahead of a year, e.g. `Jan 2020`, `Sept. 2021`.
const MONTH_PREFIX: &str =
    r"(?:(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?[ \t]+)?";

/// `<start year> - <end year | Present>`, capturing both years.
fn date_range() -> String {
    format!(
        r"{m}(\d{{4}})[ \t]*[-–—][ \t]*{m}(\d{{4}}|present|current)",
        m = MONTH_PREFIX
    )
}

/// Structured patterns in priority order. Captures: title, company, start, end.
static ENTRY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let range = date_range();
    let title = format!(r"([A-Za-z \t]*?(?:{ROLE_WORDS})[A-Za-z \t–-]*?)");
    [
        // Title
        // Company
        // 2020 - Present
        format!(r"(?im)^[ \t]*{title}[ \t]*\n[ \t]*([A-Za-z0-9 \t&.,]+?)[ \t]*\n[ \t]*{range}"),
        // Title — Company, 2020 - 2022
        format!(
            r"(?im)^[ \t]*([A-Za-z \t]*?(?:{ROLE_WORDS}))[ \t]*[—–-][ \t]*([A-Za-z0-9 \t&.]+?)[ \t]*[,(]?[ \t]*{range}"
        ),
        // Title
        // Company, 2020 - 2022
        format!(r"(?im)^[ \t]*{title}[ \t]*\n[ \t]*([A-Za-z0-9 \t&.,]+?)[ \t]*,[ \t]*{range}"),
        // **Title**
        // Company
        // 2020 - 2022
        format!(
            r"(?im)^[ \t]*\*\*([A-Za-z \t–-]*?(?:Developer|Engineer|Designer|Manager)[A-Za-z \t–-]*?)\*\*[ \t]*\n[ \t]*([A-Za-z0-9 \t&.,]+?)[ \t]*\n[ \t]*{range}"
        ),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static BARE_ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:Senior[ \t]+|Junior[ \t]+|Lead[ \t]+)?[A-Za-z]+[ \t]+(?:Developer|Engineer|Designer|Manager))\b",
    )
    .expect("valid regex")
});

static BULLET_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[•\-*][ \t]*([^\n]+)").expect("valid regex"));

static TRAILING_LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",[ \t]*([A-Za-z \t]+)$").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One structured match before its description is filled in.
struct Candidate {
    start: usize,
    end: usize,
    entry: ExperienceEntry,
}

pub fn extract_experience_from_text(text: &str) -> Vec<ExperienceEntry> {
    let Some(section) = find_section(text, EXPERIENCE_KEYWORDS) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for pattern in ENTRY_PATTERNS.iter() {
        for caps in pattern.captures_iter(section) {
            let Some(whole) = caps.get(0) else { continue };
            let title = collapse_whitespace(&caps[1]);
            let raw_company = collapse_whitespace(caps[2].trim_end_matches(','));
            let key = format!("{}-{}", title.to_lowercase(), raw_company.to_lowercase());
            if !seen.insert(key) {
                continue;
            }

            let (company, location) = split_company_location(&raw_company);
            let entry = ExperienceEntry {
                title,
                company,
                location,
                start_date: caps[3].to_string(),
                end_date: caps[4].to_string(),
                ..Default::default()
            };
            candidates.push(Candidate {
                start: whole.start(),
                end: whole.end(),
                entry: normalize_experience(entry),
            });
        }
    }

    if candidates.is_empty() {
        return bare_role_entries(section);
    }

    candidates.sort_by_key(|c| c.start);
    let starts: Vec<usize> = candidates.iter().map(|c| c.start).collect();
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, mut candidate)| {
            // Bullets belong to this entry until the next one begins.
            let window_end = starts
                .get(i + 1)
                .map(|next| (*next).max(candidate.end))
                .unwrap_or(section.len());
            let window = section.get(candidate.end..window_end).unwrap_or_default();
            candidate.entry.description = bullet_description(window);
            candidate.entry
        })
        .collect()
}

/// Canonicalizes dates and derives `current` from the end date.
///
/// Applied to entries from either source so `current` always agrees with
/// `end_date`.
pub fn normalize_experience(mut entry: ExperienceEntry) -> ExperienceEntry {
    entry.start_date = entry.start_date.trim().to_string();
    entry.end_date = entry.end_date.trim().to_string();

    if denotes_present(&entry.end_date) || (entry.current && entry.end_date.is_empty()) {
        entry.end_date = PRESENT.to_string();
    }
    if !validate_date_range(&entry.start_date, &entry.end_date) {
        std::mem::swap(&mut entry.start_date, &mut entry.end_date);
    }
    entry.current = entry.end_date.eq_ignore_ascii_case(PRESENT);
    entry
}

fn bare_role_entries(section: &str) -> Vec<ExperienceEntry> {
    let mut seen = HashSet::new();
    BARE_ROLE_RE
        .captures_iter(section)
        .map(|caps| collapse_whitespace(&caps[1]))
        .filter(|title| seen.insert(title.to_lowercase()))
        .map(|title| ExperienceEntry {
            title,
            ..Default::default()
        })
        .collect()
}

fn bullet_description(window: &str) -> String {
    let joined = BULLET_LINE_RE
        .captures_iter(window)
        .take(MAX_DESCRIPTION_BULLETS)
        .map(|caps| caps[1].trim().to_string())
        .collect::<Vec<_>>()
        .join(". ");
    truncate_chars(&joined, MAX_DESCRIPTION_CHARS)
}

/// `Acme Inc, Austin` -> (`Acme Inc`, `Austin`).
fn split_company_location(company: &str) -> (String, String) {
    match TRAILING_LOCATION_RE.captures(company) {
        Some(caps) => {
            let cut = caps.get(0).map_or(company.len(), |m| m.start());
            (
                company[..cut].trim().to_string(),
                caps[1].trim().to_string(),
            )
        }
        None => (company.trim().to_string(), String::new()),
    }
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..floor_char_boundary(value, byte_index)].to_string(),
        None => value.to_string(),
    }
}
