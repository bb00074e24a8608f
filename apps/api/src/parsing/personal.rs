//! Name and title extractors.
//!
//! Both return an empty string when nothing is found; callers decide what
//! absence means.

use std::sync::LazyLock;

use regex::Regex;

/// How many non-empty lines the explicit `Name:` label is searched in.
const LABEL_SCAN_LINES: usize = 15;
/// How many non-empty lines the header heuristic examines.
const HEADER_SCAN_LINES: usize = 10;
/// How many non-empty lines the bare-pattern fallback examines.
const FALLBACK_SCAN_LINES: usize = 5;

static NAME_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:full\s+name|name)\s*[:\-]\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})")
        .expect("valid regex")
});

static LONG_DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{10,}").expect("valid regex"));

/// Lines that open with these are headers or labels, never a name.
static NON_NAME_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:resume|cv|curriculum|portfolio|step|personal|experience|education|skills|projects)|^(?:phone|email|address|location|professional\s+title)\s*:",
    )
    .expect("valid regex")
});

/// Banners stamped by résumé builder tools.
static GENERATOR_BANNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:apex|builder)|generated").expect("valid regex"));

static NAME_WORD_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[A-Z][a-z]+$",
        r"^[A-Z]+$",
        r"^[A-Z][a-z]+'[a-z]+$",
        r"^[A-Z][a-z]*\.?$",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const HONORIFIC_TOKENS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Jr.", "Sr.", "Resume", "CV", "Portfolio",
];

static ROLE_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:Senior|Junior|Lead|Staff|Software|Frontend|Backend|Full|Stack|Developer|Engineer|Manager|Analyst|Designer|Architect|Mobile|Web|Android|iOS|Data|Product|Project)$",
    )
    .expect("valid regex")
});

static BARE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-z]+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s*$").expect("valid regex")
});

/// Title patterns in priority order; the first capture is the title.
static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "[Senior] Backend Engineer", "Lead Android Developer"
        r"(?m)^[ \t]*((?:[A-Z][a-z]+ )?(?:Software|Android|iOS|Web|Full[- ]?Stack|Frontend|Backend|Mobile|Data|ML|AI|Cloud|DevOps|QA|UI/UX|Product|Project|Technical) (?:Engineer|Developer|Designer|Manager|Lead|Architect|Analyst|Specialist))\b",
        // "Senior Platform Engineer"
        r"(?m)^[ \t]*((?:Senior|Junior|Lead|Principal|Staff) [A-Z][a-z]+ (?:Engineer|Developer|Designer|Manager))\b",
        // "Title: Solutions Architect"
        r"(?i)(?:Professional Title|Title|Role|Position)[: \t]+([A-Za-z \t]+(?:Engineer|Developer|Designer|Manager|Analyst|Architect))",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

pub(crate) fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Recovers the candidate's name from the top of the document.
pub fn extract_name(text: &str) -> String {
    let lines = non_empty_lines(text);

    let by_label = lines
        .iter()
        .take(LABEL_SCAN_LINES)
        .find_map(|line| NAME_LABEL_RE.captures(line).map(|c| c[1].trim().to_string()));
    if let Some(name) = by_label {
        return name;
    }

    let by_header = lines
        .iter()
        .take(HEADER_SCAN_LINES)
        .filter(|line| !is_contact_or_header_line(line))
        .find_map(|line| name_from_header_line(line));
    if let Some(name) = by_header {
        return name;
    }

    lines
        .iter()
        .take(FALLBACK_SCAN_LINES)
        .find_map(|line| BARE_NAME_RE.captures(line).map(|c| c[1].to_string()))
        .unwrap_or_default()
}

fn is_contact_or_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.contains('@')
        || lower.contains("http")
        || lower.contains("linkedin")
        || lower.contains("github")
        || LONG_DIGIT_RUN_RE.is_match(line)
        || NON_NAME_LINE_RE.is_match(line)
        || GENERATOR_BANNER_RE.is_match(line)
}

fn name_from_header_line(line: &str) -> Option<String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return None;
    }
    let shaped = words
        .iter()
        .all(|w| NAME_WORD_SHAPES.iter().any(|re| re.is_match(w)));
    if !shaped {
        return None;
    }

    let kept: Vec<&str> = words
        .into_iter()
        .filter(|w| !HONORIFIC_TOKENS.contains(w) && !ROLE_NOISE_RE.is_match(w))
        .collect();
    (2..=4).contains(&kept.len()).then(|| kept.join(" "))
}

/// Recovers a professional title such as "Backend Engineer".
pub fn extract_title(text: &str) -> String {
    TITLE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).map(|c| c[1].trim().to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_label() {
        let text = "CURRICULUM VITAE\nFull Name: Arjun Mehta\nEmail: a@b.com";
        assert_eq!(extract_name(text), "Arjun Mehta");
    }

    #[test]
    fn test_name_from_first_line() {
        let text = "Jane Doe\nBackend Engineer\njane@x.com";
        assert_eq!(extract_name(text), "Jane Doe");
    }

    #[test]
    fn test_name_skips_contact_and_banner_lines() {
        let text = "Generated by APEX Resume Builder\njane@x.com | +14155550100\nRESUME\nMary Ann Smith\n";
        assert_eq!(extract_name(text), "Mary Ann Smith");
    }

    #[test]
    fn test_name_strips_honorifics_and_role_noise() {
        assert_eq!(extract_name("Dr. John Smith\nSomewhere"), "John Smith");
        assert_eq!(
            extract_name("Priya Sharma Android Developer\nBengaluru"),
            "Priya Sharma"
        );
    }

    #[test]
    fn test_name_allows_all_caps_and_apostrophes() {
        assert_eq!(extract_name("JOHN SMITH\nx"), "JOHN SMITH");
        assert_eq!(extract_name("Ra'shad Ali\nx"), "Ra'shad Ali");
    }

    #[test]
    fn test_role_line_is_not_a_name() {
        assert_eq!(
            extract_name("Senior Software Engineer at Acme\nfoo bar baz qux quux"),
            ""
        );
    }

    #[test]
    fn test_name_absent() {
        assert_eq!(extract_name("hello world\n12345\n"), "");
        assert_eq!(extract_name(""), "");
    }

    #[test]
    fn test_title_domain_role() {
        let text = "Jane Doe\nBackend Engineer\njane@x.com";
        assert_eq!(extract_title(text), "Backend Engineer");
        assert_eq!(
            extract_title("Sam Lee\nSenior Android Developer\n"),
            "Senior Android Developer"
        );
    }

    #[test]
    fn test_title_seniority_prefixed() {
        assert_eq!(
            extract_title("Sam Lee\nPrincipal Platform Engineer\n"),
            "Principal Platform Engineer"
        );
    }

    #[test]
    fn test_title_from_label() {
        assert_eq!(
            extract_title("Sam Lee\nRole: Solutions Architect\n"),
            "Solutions Architect"
        );
    }

    #[test]
    fn test_title_absent() {
        assert_eq!(extract_title("Sam Lee\nLikes hiking\n"), "");
    }
}
