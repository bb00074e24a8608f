//! Merges the primary result with the deterministic extractors.
//!
//! Each field group has its own named policy; there is no generic merge.

use tracing::debug;

use crate::models::resume::{
    EducationEntry, ExperienceEntry, ParsedResume, PersonalInfo, ProjectEntry, ProjectType,
    SkillSet,
};
use crate::parsing::education::extract_education_from_text;
use crate::parsing::experience::extract_experience_from_text;
use crate::parsing::normalize::normalize;
use crate::parsing::primary::PrimaryResult;
use crate::parsing::projects::extract_projects_from_text;
use crate::parsing::sanitize::sanitize_personal_info;
use crate::parsing::scoring::{score_confidence, ConfidenceWeights};
use crate::parsing::skills::{extract_skills_from_text, is_category_label};

/// Fallback skills that may be appended to a primary skill list.
/// Closed and hand-maintained.
pub const TRUSTED_SKILLS: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "Express",
    "HTML",
    "CSS",
    "MongoDB",
    "PostgreSQL",
    "Docker",
    "Git",
    "GitHub",
    "AWS",
    "TypeScript",
    "REST APIs",
    "Postman",
    "VS Code",
    "GitHub Actions",
];

const MAX_SKILL_CHARS: usize = 50;

/// Output of the deterministic extractors for one document.
#[derive(Debug, Clone, Default)]
pub struct FallbackExtraction {
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillSet,
    pub projects: Vec<ProjectEntry>,
}

impl FallbackExtraction {
    pub fn extract(raw_text: &str) -> Self {
        let extraction = Self {
            experience: extract_experience_from_text(raw_text),
            education: extract_education_from_text(raw_text),
            skills: extract_skills_from_text(raw_text),
            projects: extract_projects_from_text(raw_text),
        };
        debug!(
            experience = extraction.experience.len(),
            education = extraction.education.len(),
            skills = extraction.skills.len(),
            projects = extraction.projects.len(),
            "fallback extraction complete"
        );
        extraction
    }
}

pub fn reconcile(
    primary: PrimaryResult,
    fallback: &FallbackExtraction,
    raw_text: &str,
) -> ParsedResume {
    let (primary, succeeded) = match primary {
        PrimaryResult::Success(resume) => (resume, true),
        PrimaryResult::Unavailable => (ParsedResume::default(), false),
    };

    let mut resume = ParsedResume {
        personal_info: reconcile_personal_info(&primary.personal_info, raw_text),
        experience: first_non_empty(primary.experience, &fallback.experience),
        education: first_non_empty(primary.education, &fallback.education),
        skills: reconcile_skills(&primary.skills, &fallback.skills),
        projects: reconcile_projects(primary.projects, &fallback.projects),
        confidence: 0.0,
    };

    resume.confidence = if succeeded {
        1.0
    } else {
        score_confidence(&resume, &ConfidenceWeights::default())
    };
    resume
}

/// Primary fields as given, always repaired against the raw text.
fn reconcile_personal_info(primary: &PersonalInfo, raw_text: &str) -> PersonalInfo {
    sanitize_personal_info(primary, raw_text)
}

/// No merge: the primary list wins whenever it has anything.
fn first_non_empty<T: Clone>(primary: Vec<T>, fallback: &[T]) -> Vec<T> {
    if primary.is_empty() {
        fallback.to_vec()
    } else {
        primary
    }
}

/// Primary skills, plus trusted fallback skills it missed. Without primary
/// skills the fallback set is used whole.
fn reconcile_skills(primary: &SkillSet, fallback: &SkillSet) -> SkillSet {
    let mut skills: SkillSet = primary
        .iter()
        .filter(|skill| !is_category_label(skill))
        .collect();

    if skills.is_empty() {
        skills = fallback.clone();
    } else {
        for skill in fallback.iter().filter(|skill| is_trusted_skill(skill)) {
            skills.insert(skill);
        }
    }

    skills.retain(|skill| {
        let len = skill.chars().count();
        len > 1 && len < MAX_SKILL_CHARS && !is_category_label(skill)
    });
    skills
}

fn is_trusted_skill(skill: &str) -> bool {
    TRUSTED_SKILLS
        .iter()
        .any(|trusted| trusted.eq_ignore_ascii_case(skill.trim()))
}

fn reconcile_projects(primary: Vec<ProjectEntry>, fallback: &[ProjectEntry]) -> Vec<ProjectEntry> {
    if primary.is_empty() {
        return fallback.iter().cloned().map(normalize_project_text).collect();
    }

    primary
        .into_iter()
        .map(normalize_project_text)
        .map(|project| match matching_project(&project.title, fallback) {
            Some(found) => backfill_project(project, found),
            None => project,
        })
        .collect()
}

fn normalize_project_text(mut project: ProjectEntry) -> ProjectEntry {
    project.title = normalize(&project.title);
    project.description = normalize(&project.description);
    project
}

/// Exact or substring match on titles, ignoring case, in either direction.
fn matching_project<'a>(title: &str, fallback: &'a [ProjectEntry]) -> Option<&'a ProjectEntry> {
    let title = title.to_lowercase();
    if title.is_empty() {
        return None;
    }
    fallback.iter().find(|candidate| {
        let other = candidate.title.to_lowercase();
        !other.is_empty() && (other.contains(&title) || title.contains(&other))
    })
}

/// Fills only the fields the primary left empty.
fn backfill_project(mut project: ProjectEntry, found: &ProjectEntry) -> ProjectEntry {
    if project.description.is_empty() {
        project.description = normalize(&found.description);
    }
    if project.technologies.is_empty() {
        project.technologies = found.technologies.clone();
    }
    if project.github.is_empty() {
        project.github = found.github.clone();
    }
    // An unrecognised primary type reads as the default.
    if project.project_type == ProjectType::default() {
        project.project_type = found.project_type;
    }
    project
}
