//! Section segmenter. Locates labeled spans ("EXPERIENCE …") by keyword.
//!
//! A located section is an explicit byte range over the searched text. When
//! no later header is found the range runs to end-of-text.

/// Headers that terminate a section. Matched case-insensitively anywhere.
pub const SECTION_HEADERS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
    "awards",
    "references",
];

/// How far past the matched keyword the next-header search starts.
const NEXT_HEADER_OFFSET: usize = 10;

pub const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "professional experience",
];
pub const EDUCATION_KEYWORDS: &[&str] = &["education", "academic", "qualifications"];
pub const SKILLS_KEYWORDS: &[&str] = &["skills", "technical skills", "expertise"];
pub const PROJECTS_KEYWORDS: &[&str] = &["projects", "portfolio", "work samples"];

/// Half-open byte range `[start, end)` of a section within its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    /// Exclusive. Equals the text length when no following header exists.
    pub end: usize,
}

impl SectionSpan {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Finds the section for `keywords` and returns its span up to the next
/// recognized header.
///
/// A keyword standing alone on its line (`EXPERIENCE`, `## Projects:`) is
/// preferred over one inside prose; keywords are tried in priority order
/// within each pass. Headers matching the section's own keywords never
/// close it.
///
/// `None` means no keyword matched: the caller has no data on this path,
/// which is distinct from an empty section.
pub fn find_section_span(text: &str, keywords: &[&str]) -> Option<SectionSpan> {
    // ASCII lowercasing keeps byte offsets identical to `text`.
    let lower = text.to_ascii_lowercase();
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_ascii_lowercase()).collect();

    let (start, keyword) = keywords
        .iter()
        .find_map(|keyword| header_line_index(&lower, keyword).map(|i| (i, keyword)))
        .or_else(|| {
            keywords
                .iter()
                .find_map(|keyword| lower.find(keyword.as_str()).map(|i| (i, keyword)))
        })?;

    Some(SectionSpan {
        start,
        end: next_header_index(&lower, start + keyword.len(), &keywords),
    })
}

/// Convenience wrapper returning the section text itself.
pub fn find_section<'a>(text: &'a str, keywords: &[&str]) -> Option<&'a str> {
    find_section_span(text, keywords).map(|span| span.slice(text))
}

/// First occurrence of `keyword` that is the whole line once surrounding
/// punctuation and whitespace are dropped.
fn header_line_index(lower: &str, keyword: &str) -> Option<usize> {
    lower
        .match_indices(keyword)
        .map(|(i, _)| i)
        .find(|&i| {
            let line_start = lower[..i].rfind('\n').map_or(0, |n| n + 1);
            let line_end = lower[i..].find('\n').map_or(lower.len(), |n| i + n);
            lower[line_start..line_end].trim_matches(|c: char| !c.is_alphanumeric()) == keyword
        })
}

fn next_header_index(lower: &str, after_keyword: usize, own_keywords: &[String]) -> usize {
    let from = ceil_char_boundary(lower, after_keyword + NEXT_HEADER_OFFSET);
    if from >= lower.len() {
        return lower.len();
    }

    SECTION_HEADERS
        .iter()
        .filter(|header| !is_own_header(header, own_keywords))
        .filter_map(|header| lower[from..].find(*header).map(|i| from + i))
        .min()
        .unwrap_or(lower.len())
}

fn is_own_header(header: &str, own_keywords: &[String]) -> bool {
    own_keywords
        .iter()
        .any(|keyword| keyword.contains(header) || header.contains(keyword.as_str()))
}

/// Smallest char boundary `>= index`, clamped to the text length.
pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Largest char boundary `<= index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
