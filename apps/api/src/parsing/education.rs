//! Fallback education extractor.
//!
//! Degrees, institutions and years are collected by independent patterns and
//! paired by position afterwards, so a degree never absorbs the institution
//! text next to it.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::EducationEntry;
use crate::parsing::sections::{find_section, EDUCATION_KEYWORDS};

/// Short enough to keep `MBA`.
const MIN_DEGREE_LEN: usize = 3;

static DEGREE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(Bachelor(?:'s)?[ \t]+of[ \t]+(?:Technology|Science|Arts|Engineering|Business|Commerce)(?:[ \t]+in[ \t]+[A-Za-z \t]+)?)",
        r"(?i)\b(Master(?:'s)?[ \t]+(?:of[ \t]+)?(?:Technology|Science|Arts|Engineering|Business(?:[ \t]+Administration)?)(?:[ \t]+in[ \t]+[A-Za-z \t]+)?)",
        r"\b(B\.?(?:Tech|Sc|S|A|E)\.?(?:[ \t]+in)?[ \t]+[A-Z][A-Za-z \t]+)",
        r"\b(M\.?(?:Tech|Sc|S|A)\.?(?:[ \t]+in)?[ \t]+[A-Z][A-Za-z \t]+|MBA|Ph\.?D\.?|Doctorate)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static INSTITUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:[A-Z][A-Za-z&.']*[ \t]+)*(?:University|Institute|College|School|Academy)(?:[ \t]+of(?:[ \t]+[A-Z][A-Za-z&]*)+)?)",
    )
    .expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

static FIELD_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin[ \t]+([A-Za-z \t]+)$").expect("valid regex"));

static FIELD_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bof[ \t]+([A-Za-z \t]+)$").expect("valid regex"));

static GPA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bC?GPA[:\s]*(\d+(?:\.\d+)?)").expect("valid regex")
});

/// Trailing connective left behind once an institution is cut off a degree.
static DANGLING_CONNECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[ \t,]+(?:at|from)?[ \t,]*$").expect("valid regex"));

pub fn extract_education_from_text(text: &str) -> Vec<EducationEntry> {
    let section = find_section(text, EDUCATION_KEYWORDS).unwrap_or(text);

    let degrees = collect_degrees(section);
    let institutions = distinct_ci(
        INSTITUTION_RE
            .captures_iter(section)
            .map(|caps| caps[1].trim().to_string()),
    );
    let years = distinct_ci(YEAR_RE.find_iter(section).map(|m| m.as_str().to_string()));

    let count = degrees.len().max(institutions.len());
    let mut entries: Vec<EducationEntry> = (0..count)
        .map(|i| {
            let degree = nth_or_last(&degrees, i);
            EducationEntry {
                field: field_of_study(&degree),
                degree,
                institution: nth_or_last(&institutions, i),
                graduation_year: graduation_year(&years, i, count),
                gpa: String::new(),
            }
        })
        .collect();

    if let (Some(first), Some(caps)) = (entries.first_mut(), GPA_RE.captures(section)) {
        first.gpa = caps[1].to_string();
    }
    entries
}

/// Degree strings in document order, case-insensitively unique.
fn collect_degrees(section: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = DEGREE_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(section).collect::<Vec<_>>())
        .filter_map(|caps| {
            let m = caps.get(1)?;
            let degree = strip_institution(m.as_str());
            (degree.chars().count() >= MIN_DEGREE_LEN).then_some((m.start(), degree))
        })
        .collect();
    found.sort_by_key(|(start, _)| *start);
    distinct_ci(found.into_iter().map(|(_, degree)| degree))
}

/// Cuts any institution phrase a greedy `in <words>` clause ran into.
fn strip_institution(degree: &str) -> String {
    let degree = degree.trim();
    match INSTITUTION_RE.find(degree) {
        Some(m) => DANGLING_CONNECTIVE_RE
            .replace(&degree[..m.start()], "")
            .trim()
            .to_string(),
        None => degree.to_string(),
    }
}

fn field_of_study(degree: &str) -> String {
    FIELD_IN_RE
        .captures(degree)
        .or_else(|| FIELD_OF_RE.captures(degree))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Positional when every entry has its own year, otherwise the latest listed.
fn graduation_year(years: &[String], index: usize, entry_count: usize) -> String {
    if years.len() == entry_count {
        years.get(index).cloned().unwrap_or_default()
    } else {
        years.last().cloned().unwrap_or_default()
    }
}

/// Element `i`, or the last element when `i` is out of range, or empty.
fn nth_or_last(values: &[String], i: usize) -> String {
    values.get(i).or(values.last()).cloned().unwrap_or_default()
}

fn distinct_ci(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(&value)) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_and_institution_on_one_line() {
        let text = "EDUCATION\nBachelor of Technology in Computer Science, ABC University, 2019\nSKILLS\nGo";
        let entries = extract_education_from_text(text);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.degree, "Bachelor of Technology in Computer Science");
        assert_eq!(e.institution, "ABC University");
        assert_eq!(e.field, "Computer Science");
        assert_eq!(e.graduation_year, "2019");
        assert!(!e.degree.contains(&e.institution));
    }

    #[test]
    fn test_degree_running_into_institution_is_cut() {
        let text = "EDUCATION\nMaster of Science in Data Science at Stanford University\n";
        let entries = extract_education_from_text(text);
        assert_eq!(entries[0].degree, "Master of Science in Data Science");
        assert_eq!(entries[0].institution, "Stanford University");
    }

    #[test]
    fn test_positional_pairing_with_years() {
        let text = "EDUCATION\nM.Tech in Software Systems\nXYZ Institute of Technology\n2021\nB.E. Mechanical\nPune College\n2018\n";
        let entries = extract_education_from_text(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].degree, "M.Tech in Software Systems");
        assert_eq!(entries[0].institution, "XYZ Institute of Technology");
        assert_eq!(entries[0].graduation_year, "2021");
        assert_eq!(entries[1].degree, "B.E. Mechanical");
        assert_eq!(entries[1].institution, "Pune College");
        assert_eq!(entries[1].graduation_year, "2018");
    }

    #[test]
    fn test_missing_institution_repeats_last() {
        let text = "EDUCATION\nMBA\nPh.D.\nHarvard University 2010 2015 2020\n";
        let entries = extract_education_from_text(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].institution, "Harvard University");
        // Three years for two entries: everyone gets the latest.
        assert!(entries.iter().all(|e| e.graduation_year == "2020"));
    }

    #[test]
    fn test_only_institutions() {
        let text = "EDUCATION\nSpringfield High School\n";
        let entries = extract_education_from_text(text);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].degree.is_empty());
        assert_eq!(entries[0].institution, "Springfield High School");
    }

    #[test]
    fn test_gpa_attached_to_first_entry_only() {
        let text = "EDUCATION\nBachelor of Science in Physics\nState University\nGPA: 3.8\nMaster of Science in Physics\nState University\n";
        let entries = extract_education_from_text(text);
        assert_eq!(entries[0].gpa, "3.8");
        assert!(entries[1..].iter().all(|e| e.gpa.is_empty()));
    }

    #[test]
    fn test_field_from_of_clause() {
        assert_eq!(field_of_study("Bachelor of Arts"), "Arts");
        assert_eq!(field_of_study("MBA"), "");
    }

    #[test]
    fn test_nothing_found() {
        assert!(extract_education_from_text("EDUCATION\nself-taught\n").is_empty());
    }
}
