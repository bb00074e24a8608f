//! Fallback projects extractor.
//!
//! Titles are found by an ordered set of header shapes. Each title owns the
//! lines between it and the next title, which supply description,
//! technologies and a GitHub link.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{ProjectEntry, ProjectType};
use crate::parsing::experience::truncate_chars;
use crate::parsing::sections::{find_section, floor_char_boundary, PROJECTS_KEYWORDS};

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 60;
const MAX_BODY_LINES: usize = 5;
const MIN_DESCRIPTION_LINE_CHARS: usize = 11;
const MAX_DESCRIPTION_CHARS: usize = 300;
/// Bytes before a title searched for type hints.
const TYPE_HINT_WINDOW: usize = 30;

/// Title shapes in priority order. Capture 1 is the title.
static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Personal Project — Widget Maker
        r"(?i)(?:Personal|Open[- ]?source|Professional|Academic|Side)[ \t]+Project[ \t]*[—–:-][ \t]*([^\n]+)",
        // Portfolio Generator
        r"(?m)^[ \t]*([A-Z][A-Za-z \t]+(?:Generator|Platform|App|Application|System|Tool|Website|Portal|Dashboard|Manager|Tracker|Kit|API|Service|Bot|Engine|Framework|Library|Plugin|Extension|Client|Server|Interface|Builder))[ \t]*[—–-]?[ \t]*$",
        // **Inventory System**
        r"(?m)^[ \t]*\*?\*?([A-Z][A-Za-z0-9 \t-]+(?:Project|App|System|Platform|Tool|Generator|Kit|API))\*?\*?[ \t]*$",
        // A bare header directly followed by a bullet
        r"(?m)^[ \t]*([A-Z][A-Za-z0-9 \t-]{5,40})[ \t]*\n[ \t]*[•\-*]",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static TITLE_BLACKLIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:PROJECTS?|EXPERIENCE|EDUCATION|SKILLS|This|The|A|An|I|We|My)\b")
        .expect("valid regex")
});

static LEADING_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[•\-*][ \t]*").expect("valid regex"));

static TRAILING_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*[—–-][ \t]*$").expect("valid regex"));

static TECH_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Tech(?:nolog(?:y|ies))?(?:[ \t]+Stack)?[ \t]*:[ \t]*(.*)$")
        .expect("valid regex")
});

static TECH_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]").expect("valid regex"));

static GITHUB_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)github\.com/([a-zA-Z0-9_-]+(?:/[a-zA-Z0-9_-]+)?)").expect("valid regex")
});

static OPEN_SOURCE_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)open[- ]?source").expect("valid regex"));

static PROFESSIONAL_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)professional|work|client").expect("valid regex"));

/// An accepted title and where it sits in the section.
struct TitleMatch {
    start: usize,
    end: usize,
    title: String,
}

pub fn extract_projects_from_text(text: &str) -> Vec<ProjectEntry> {
    let Some(section) = find_section(text, PROJECTS_KEYWORDS) else {
        return Vec::new();
    };

    let titles = find_titles(section);
    let starts: Vec<usize> = titles.iter().map(|t| t.start).collect();

    titles
        .iter()
        .enumerate()
        .map(|(i, found)| {
            let body_end = starts
                .get(i + 1)
                .map(|next| (*next).max(found.end))
                .unwrap_or(section.len());
            let body = section.get(found.end..body_end).unwrap_or_default();

            let mut project = ProjectEntry {
                title: found.title.clone(),
                project_type: infer_project_type(section, found),
                ..Default::default()
            };
            fill_from_body(&mut project, body);
            project
        })
        .collect()
}

/// Accepted titles, deduplicated across patterns and sorted by position.
fn find_titles(section: &str) -> Vec<TitleMatch> {
    let mut seen = HashSet::new();
    let mut titles: Vec<TitleMatch> = Vec::new();

    for pattern in TITLE_PATTERNS.iter() {
        for caps in pattern.captures_iter(section) {
            let Some(m) = caps.get(1) else { continue };
            // A later, looser shape must not re-read an accepted header line.
            if titles
                .iter()
                .any(|t| m.start() < t.end && t.start < m.end())
            {
                continue;
            }
            let title = clean_title(m.as_str());
            if !is_acceptable_title(&title) || !seen.insert(title.to_lowercase()) {
                continue;
            }
            titles.push(TitleMatch {
                start: m.start(),
                end: m.end(),
                title,
            });
        }
    }

    titles.sort_by_key(|t| t.start);
    titles
}

fn clean_title(raw: &str) -> String {
    let title = LEADING_BULLET_RE.replace(raw.trim(), "");
    TRAILING_DASH_RE.replace(&title, "").trim().to_string()
}

fn is_acceptable_title(title: &str) -> bool {
    let len = title.chars().count();
    (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&len) && !TITLE_BLACKLIST_RE.is_match(title)
}

fn fill_from_body(project: &mut ProjectEntry, body: &str) {
    let mut description = Vec::new();

    let lines = body
        .lines()
        .map(|line| LEADING_BULLET_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_BODY_LINES);

    for line in lines {
        if let Some(caps) = TECH_LINE_RE.captures(&line) {
            for tech in TECH_SPLIT_RE.split(&caps[1]) {
                let tech = tech.trim();
                if !tech.is_empty() && !project.technologies.iter().any(|t| t == tech) {
                    project.technologies.push(tech.to_string());
                }
            }
        } else if line.to_ascii_lowercase().contains("github") {
            if let Some(caps) = GITHUB_REPO_RE.captures(&line) {
                project.github = format!("https://github.com/{}", &caps[1]);
            }
        } else if line.chars().count() >= MIN_DESCRIPTION_LINE_CHARS {
            description.push(line);
        }
    }

    project.description = truncate_chars(&description.join(" "), MAX_DESCRIPTION_CHARS);
}

/// Looks at the title and the few bytes before it.
fn infer_project_type(section: &str, found: &TitleMatch) -> ProjectType {
    let from = floor_char_boundary(section, found.start.saturating_sub(TYPE_HINT_WINDOW));
    let window = &section[from..found.end];

    if OPEN_SOURCE_HINT_RE.is_match(window) {
        ProjectType::OpenSource
    } else if PROFESSIONAL_HINT_RE.is_match(window) {
        ProjectType::Professional
    } else {
        ProjectType::Personal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_project_with_tech_line() {
        let text = "SKILLS\nGo\nPROJECTS\nPersonal Project — Widget Maker\n• A tool for widgets\nTech: Python, Go";
        let projects = extract_projects_from_text(text);
        assert_eq!(projects.len(), 1);
        let p = &projects[0];
        assert_eq!(p.title, "Widget Maker");
        assert_eq!(p.description, "A tool for widgets");
        assert_eq!(p.technologies, vec!["Python", "Go"]);
        assert_eq!(p.project_type, ProjectType::Personal);
    }

    #[test]
    fn test_open_source_type_and_github() {
        let text = "PROJECTS\nOpen-source Project – API Starter Kit\n- Scaffolds REST services quickly\n- Code: github.com/jdoe/starter-kit\n";
        let projects = extract_projects_from_text(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "API Starter Kit");
        assert_eq!(projects[0].project_type, ProjectType::OpenSource);
        assert_eq!(projects[0].github, "https://github.com/jdoe/starter-kit");
        assert_eq!(projects[0].description, "Scaffolds REST services quickly");
    }

    #[test]
    fn test_suffix_and_bare_titles_in_order() {
        let text = "PROJECTS\nPortfolio Generator\n- Generates static portfolio sites\nWeather Station\n- Reads sensors every minute\n";
        let projects = extract_projects_from_text(text);
        let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Portfolio Generator", "Weather Station"]);
        assert_eq!(projects[0].description, "Generates static portfolio sites");
        assert_eq!(projects[1].description, "Reads sensors every minute");
    }

    #[test]
    fn test_bold_title() {
        let text = "PROJECTS\n**Inventory System**\nTracks stock levels across stores\n";
        let projects = extract_projects_from_text(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Inventory System");
    }

    #[test]
    fn test_blacklisted_and_duplicate_titles_rejected() {
        let text = "PROJECTS\nThe Big Platform\n- not a title\nChat App\n- Realtime chat for teams\nchat app\n- again and again\n";
        let projects = extract_projects_from_text(text);
        let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Chat App"]);
    }

    #[test]
    fn test_professional_type() {
        let text = "PROJECTS\nProfessional Project - Billing Dashboard\n- Invoices for clients at scale\n";
        let projects = extract_projects_from_text(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Billing Dashboard");
        assert_eq!(projects[0].project_type, ProjectType::Professional);
    }

    #[test]
    fn test_description_truncated() {
        let long = "word ".repeat(100);
        let text = format!("PROJECTS\nPersonal Project - Long One\n- {long}\n");
        let projects = extract_projects_from_text(&text);
        assert_eq!(projects[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_no_projects_section() {
        assert!(extract_projects_from_text("EXPERIENCE\nDid things").is_empty());
    }

    #[test]
    fn test_prose_mention_of_projects_keeps_real_section() {
        let text = "EXPERIENCE\nBackend Engineer\nAcme Inc\n2020 - Present\n• Led three projects end to end\nPROJECTS\nPersonal Project — Widget Maker\n• A tool for widgets\n";
        let projects = extract_projects_from_text(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Widget Maker");
        assert_eq!(projects[0].description, "A tool for widgets");
    }
}
