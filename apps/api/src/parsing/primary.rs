//! Primary-result boundary.
//!
//! Calls the completion source under a time budget, locates the first JSON
//! object in whatever text comes back, repairs it once if needed, and maps
//! the loosely-typed candidate onto `ParsedResume`.
//!
//! Every failure on this path is logged and collapsed into
//! `PrimaryResult::Unavailable`; nothing here returns an error to the caller.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{CompletionSource, LlmError};
use crate::models::resume::{
    EducationEntry, ExperienceEntry, ParsedResume, PersonalInfo, ProjectEntry, ProjectType,
    SkillSet,
};
use crate::parsing::experience::normalize_experience;

/// Outcome of the primary source for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryResult {
    Success(ParsedResume),
    Unavailable,
}

#[derive(Debug, Error)]
pub enum PrimaryFailure {
    #[error("completion source unavailable: {0}")]
    Unavailable(#[from] LlmError),

    #[error("completion source timed out after {0:?}")]
    TimedOut(Duration),

    #[error("generated text contains no JSON object")]
    NoJson,

    #[error("generated JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

static TRAILING_COMMA_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\}").expect("valid regex"));

static TRAILING_COMMA_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\]").expect("valid regex"));

/// Runs the primary source. Never fails: problems become `Unavailable`.
pub async fn fetch_primary(
    source: &dyn CompletionSource,
    prompt: &str,
    budget: Duration,
) -> PrimaryResult {
    match request_primary(source, prompt, budget).await {
        Ok(resume) => {
            info!(
                experience = resume.experience.len(),
                education = resume.education.len(),
                skills = resume.skills.len(),
                projects = resume.projects.len(),
                "primary parse succeeded"
            );
            PrimaryResult::Success(resume)
        }
        Err(failure) => {
            warn!(error = %failure, "primary parse failed, using fallback extractors");
            PrimaryResult::Unavailable
        }
    }
}

async fn request_primary(
    source: &dyn CompletionSource,
    prompt: &str,
    budget: Duration,
) -> Result<ParsedResume, PrimaryFailure> {
    let generated = tokio::time::timeout(budget, source.complete(prompt))
        .await
        .map_err(|_| PrimaryFailure::TimedOut(budget))??;
    parse_generated_text(&generated)
}

/// Strict parse of the first JSON object, then one repair attempt.
pub fn parse_generated_text(generated: &str) -> Result<ParsedResume, PrimaryFailure> {
    let span = first_json_object(generated).ok_or(PrimaryFailure::NoJson)?;

    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(_) => serde_json::from_str(&repair_json(span))?,
    };
    let candidate = PrimaryCandidate::deserialize(value)?;
    Ok(candidate.into_resume())
}

/// The first balanced top-level `{...}` span. String contents are skipped so
/// braces inside values do not count. An unbalanced tail falls back to the
/// last closing brace.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Fixes the mistakes generators make most often.
pub fn repair_json(span: &str) -> String {
    let repaired = TRAILING_COMMA_OBJECT_RE.replace_all(span, "}");
    let repaired = TRAILING_COMMA_ARRAY_RE.replace_all(&repaired, "]");
    repaired.replace('\'', "\"").replace(['\n', '\t'], " ")
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient candidate shape
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PrimaryCandidate {
    #[serde(deserialize_with = "null_as_default")]
    personal_info: CandidatePersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    experience: Vec<CandidateExperience>,
    #[serde(deserialize_with = "null_as_default")]
    education: Vec<CandidateEducation>,
    #[serde(deserialize_with = "text_list")]
    skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    projects: Vec<CandidateProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePersonalInfo {
    #[serde(deserialize_with = "lenient_text")]
    name: String,
    #[serde(deserialize_with = "lenient_text")]
    title: String,
    #[serde(deserialize_with = "lenient_text")]
    email: String,
    #[serde(deserialize_with = "lenient_text")]
    phone: String,
    #[serde(deserialize_with = "lenient_text")]
    location: String,
    #[serde(deserialize_with = "lenient_text")]
    linkedin: String,
    #[serde(deserialize_with = "lenient_text")]
    github: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CandidateExperience {
    #[serde(deserialize_with = "lenient_text")]
    title: String,
    #[serde(deserialize_with = "lenient_text")]
    company: String,
    #[serde(deserialize_with = "lenient_text")]
    location: String,
    #[serde(deserialize_with = "lenient_text")]
    start_date: String,
    #[serde(deserialize_with = "lenient_text")]
    end_date: String,
    #[serde(deserialize_with = "lenient_bool")]
    current: bool,
    #[serde(deserialize_with = "lenient_text")]
    description: String,
    #[serde(deserialize_with = "text_list")]
    technologies: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CandidateEducation {
    #[serde(deserialize_with = "lenient_text")]
    degree: String,
    #[serde(deserialize_with = "lenient_text")]
    institution: String,
    #[serde(deserialize_with = "lenient_text")]
    field: String,
    #[serde(deserialize_with = "lenient_text")]
    graduation_year: String,
    #[serde(deserialize_with = "lenient_text")]
    gpa: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateProject {
    #[serde(deserialize_with = "lenient_text")]
    title: String,
    #[serde(deserialize_with = "lenient_text")]
    description: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    project_type: String,
    #[serde(deserialize_with = "text_list")]
    technologies: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    url: String,
    #[serde(deserialize_with = "lenient_text")]
    github: String,
}

impl PrimaryCandidate {
    fn into_resume(self) -> ParsedResume {
        let info = self.personal_info;
        ParsedResume {
            personal_info: PersonalInfo {
                name: info.name,
                title: info.title,
                email: info.email,
                phone: info.phone,
                location: info.location,
                linkedin: info.linkedin,
                github: info.github,
            },
            experience: self
                .experience
                .into_iter()
                .map(|e| {
                    normalize_experience(ExperienceEntry {
                        title: e.title,
                        company: e.company,
                        location: e.location,
                        start_date: e.start_date,
                        end_date: e.end_date,
                        current: e.current,
                        description: e.description,
                        technologies: e.technologies,
                    })
                })
                .collect(),
            education: self
                .education
                .into_iter()
                .map(|e| EducationEntry {
                    degree: e.degree,
                    institution: e.institution,
                    field: e.field,
                    graduation_year: e.graduation_year,
                    gpa: e.gpa,
                })
                .collect(),
            skills: self.skills.into_iter().collect::<SkillSet>(),
            projects: self
                .projects
                .into_iter()
                .map(|p| ProjectEntry {
                    // Unknown labels read as the default and may be backfilled.
                    project_type: ProjectType::parse_loose(&p.project_type).unwrap_or_default(),
                    title: p.title,
                    description: p.description,
                    technologies: p.technologies,
                    url: p.url,
                    github: p.github,
                })
                .collect(),
            confidence: 0.0,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings, numbers and booleans become text; anything else is empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// A list of strings, numbers or `{"name": ...}` objects.
fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => map.get("name").and_then(value_to_text),
            other => value_to_text(other),
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
