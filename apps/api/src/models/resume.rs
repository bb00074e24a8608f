use serde::{Deserialize, Serialize};

/// Contact and identity block at the top of a résumé.
/// Every field is optional; absence is the empty string, never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// True iff `end_date` is `Present` (case-insensitive).
    pub current: bool,
    pub description: String,
    pub technologies: Vec<String>,
}

/// Degree and institution always come from separate captures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub field: String,
    pub graduation_year: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[default]
    #[serde(rename = "personal")]
    Personal,
    #[serde(rename = "open-source")]
    OpenSource,
    #[serde(rename = "professional")]
    Professional,
}

impl ProjectType {
    /// Lenient parse of a free-text project type. Unknown labels yield `None`.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let compact: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match compact.as_str() {
            "personal" | "side" | "academic" => Some(Self::Personal),
            "opensource" => Some(Self::OpenSource),
            "professional" | "work" | "client" => Some(Self::Professional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub technologies: Vec<String>,
    pub url: String,
    pub github: String,
}

/// Case-insensitively unique set of skill names. Iteration follows
/// insertion order, which callers must not rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `skill` unless an equal name (ignoring case) is already present.
    /// Returns whether the skill was added.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        let skill = skill.trim();
        if skill.is_empty() || self.contains(skill) {
            return false;
        }
        self.0.push(skill.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        let needle = skill.trim();
        self.0.iter().any(|s| s.eq_ignore_ascii_case(needle))
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.0.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

/// Terminal snapshot returned for one parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedResume {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillSet,
    pub projects: Vec<ProjectEntry>,
    /// 0.0 – 1.0
    pub confidence: f64,
}
