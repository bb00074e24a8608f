//! Field-shape predicates shared by the sanitizer and the reconciler.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static EMAIL_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

/// Tokens meaning the role is ongoing.
const PRESENT_TOKENS: &[&str] = &["present", "current", "now"];

pub fn validate_email(email: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(email.trim())
}

/// A phone number carries 10–15 digits once punctuation is stripped.
pub fn validate_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (10..=15).contains(&digits)
}

/// True when `token` stands for "still ongoing".
pub fn denotes_present(token: &str) -> bool {
    let token = token.trim();
    PRESENT_TOKENS.iter().any(|p| token.eq_ignore_ascii_case(p))
}

/// Parses the date shapes résumés use. Year-only values resolve to Jan 1.
pub fn parse_resume_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || denotes_present(raw) {
        return None;
    }
    if YEAR_RE.is_match(raw) {
        return raw
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Month-granularity shapes get a synthetic first day.
    let with_day = format!("1 {raw}");
    ["%d %Y-%m", "%d %m/%Y", "%d %b %Y", "%d %B %Y", "%d %b. %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, fmt).ok())
}

/// A range is invalid only when both ends are determinate and the end
/// precedes the start.
pub fn validate_date_range(start: &str, end: &str) -> bool {
    match (parse_resume_date(start), parse_resume_date(end)) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}
