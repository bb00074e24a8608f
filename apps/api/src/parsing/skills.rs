//! Fallback skills extractor.
//!
//! Labeled lines (`Languages: Python, Go`) are authoritative. Only when none
//! exist does the extractor fall back to a vocabulary scan of the whole text.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::SkillSet;
use crate::parsing::sections::{find_section, SKILLS_KEYWORDS};

const MAX_LABELED_SKILL_LEN: usize = 30;

/// Structural labels that group skills. Never emitted as a skill.
pub const CATEGORY_LABELS: &[&str] = &[
    "Languages",
    "Frontend",
    "Backend",
    "Databases",
    "DevOps",
    "Tools",
    "Frameworks",
    "Cloud",
    "Infrastructure",
];

/// Technology names recognized anywhere in the text.
pub const COMMON_SKILLS: &[&str] = &[
    "JavaScript", "TypeScript", "Python", "Java", "C++", "C#", "Ruby", "Rust", "PHP", "Swift",
    "Kotlin", "React", "Angular", "Vue", "Next.js", "Node.js", "Express", "Django", "Flask",
    "Spring", "Laravel", "HTML", "HTML5", "CSS", "CSS3", "Sass", "SCSS", "Tailwind",
    "Tailwind CSS", "Bootstrap", "Material UI", "MongoDB", "PostgreSQL", "MySQL", "Redis",
    "Firebase", "Supabase", "GraphQL", "REST", "REST APIs", "AWS", "Azure", "GCP", "Docker",
    "Kubernetes", "Jenkins", "CI/CD", "Git", "GitHub", "GitLab", "GitHub Actions", "Vite",
    "Webpack", "Babel", "ESLint", "Jest", "Mocha", "Cypress", "Figma", "Photoshop",
    "Illustrator", "XD", "Agile", "Scrum", "Jira", "Linux", "Unix", "Machine Learning",
    "TensorFlow", "PyTorch", "Data Science", "Responsive Design", "UI Optimization", "UI/UX",
    "Accessibility", "Postman", "VS Code", "IntelliJ", "Android", "iOS",
];

/// Tokens too short or too common to trust outside a skills section.
pub const STRICT_SKILLS: &[&str] = &["AI", "Go", "R"];

static LABELED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t|•*-]*(?:Programming(?:[ \t]+Languages?)?|Languages?|Front[- ]?end|Back[- ]?end|Databases?|Data[ \t]*Stores?|DevOps|Cloud|Infrastructure|Tools?|Utilities|Frameworks?)[ \t]*[:|][ \t]*([^\n]+)",
    )
    .expect("valid regex")
});

static LIST_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|]").expect("valid regex"));

/// One matcher per vocabulary entry, bounded by non-alphanumerics so `C++`
/// and `Node.js` match as whole tokens.
static COMMON_SKILL_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COMMON_SKILLS
        .iter()
        .map(|skill| {
            let pattern = format!(
                r"(?i)(?:^|[^A-Za-z0-9]){}(?:[^A-Za-z0-9]|$)",
                regex::escape(skill)
            );
            (*skill, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

static STRICT_SKILL_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    STRICT_SKILLS
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?:^|[,\s;|•·–-]){}(?:[,\s;|•·–-]|$)", regex::escape(skill));
            (*skill, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

pub fn is_category_label(value: &str) -> bool {
    let value = value.trim();
    CATEGORY_LABELS
        .iter()
        .any(|label| label.eq_ignore_ascii_case(value))
}

pub fn extract_skills_from_text(text: &str) -> SkillSet {
    let labeled = labeled_skills(text);
    if !labeled.is_empty() {
        return labeled;
    }

    let mut skills: SkillSet = COMMON_SKILL_MATCHERS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| *skill)
        .collect();

    if let Some(section) = find_section(text, SKILLS_KEYWORDS) {
        for (skill, re) in STRICT_SKILL_MATCHERS.iter() {
            if re.is_match(section) {
                skills.insert(*skill);
            }
        }
    }
    skills
}

fn labeled_skills(text: &str) -> SkillSet {
    LABELED_LINE_RE
        .captures_iter(text)
        .flat_map(|caps| {
            LIST_SPLIT_RE
                .split(&caps[1])
                .map(|token| token.trim().trim_end_matches('.').trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|token| is_labeled_skill_token(token))
        .collect()
}

fn is_labeled_skill_token(token: &str) -> bool {
    !token.is_empty()
        && token.chars().count() <= MAX_LABELED_SKILL_LEN
        && token.starts_with(|c: char| c.is_ascii_alphabetic())
        && !is_category_label(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(skills: &SkillSet) -> Vec<&str> {
        skills.iter().collect()
    }

    #[test]
    fn test_labeled_lines_win() {
        let text = "SKILLS\nLanguages: Python, Go\nFrontend | React; CSS\nDocker is mentioned in prose";
        let skills = extract_skills_from_text(text);
        assert_eq!(names(&skills), vec!["Python", "Go", "React", "CSS"]);
    }

    #[test]
    fn test_table_rows_are_labeled_lines() {
        let text = "| Languages | Java, JavaScript |\n| Databases | MongoDB |";
        let skills = extract_skills_from_text(text);
        assert!(skills.contains("Java"));
        assert!(skills.contains("JavaScript"));
        assert!(skills.contains("MongoDB"));
        assert!(!skills.iter().any(is_category_label));
    }

    #[test]
    fn test_labeled_tokens_filtered() {
        let text = "Tools: Git, 3D printing, Backend, a very long tool name that keeps on going forever";
        let skills = extract_skills_from_text(text);
        assert_eq!(names(&skills), vec!["Git"]);
    }

    #[test]
    fn test_labeled_duplicates_removed() {
        let text = "Languages: Python, python\nBackend: PYTHON, Django";
        let skills = extract_skills_from_text(text);
        assert_eq!(names(&skills), vec!["Python", "Django"]);
    }

    #[test]
    fn test_vocabulary_fallback() {
        let text = "Built services in Node.js and C++ with Docker on AWS.";
        let skills = extract_skills_from_text(text);
        assert!(skills.contains("Node.js"));
        assert!(skills.contains("C++"));
        assert!(skills.contains("Docker"));
        assert!(skills.contains("AWS"));
        assert!(!skills.contains("Java"));
    }

    #[test]
    fn test_vocabulary_needs_word_boundaries() {
        let skills = extract_skills_from_text("Javanese gitlabish reactor");
        assert!(skills.is_empty());
    }

    #[test]
    fn test_strict_skills_only_inside_skills_section() {
        let prose = "I will Go to the AI lab and R&D floor.\nExperience with Docker.";
        assert!(!extract_skills_from_text(prose).contains("Go"));

        let text = "Summary of work with Docker\nSKILLS\nDocker • Go • R, AI\n";
        let skills = extract_skills_from_text(text);
        assert!(skills.contains("Go"));
        assert!(skills.contains("R"));
        assert!(skills.contains("AI"));
    }

    #[test]
    fn test_nothing_found() {
        assert!(extract_skills_from_text("hello there").is_empty());
    }
}
