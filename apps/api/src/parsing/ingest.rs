use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionSource;
use crate::models::resume::ParsedResume;
use crate::parsing::primary::{fetch_primary, PrimaryResult};
use crate::parsing::prompts::build_parse_prompt;
use crate::parsing::reconcile::{reconcile, FallbackExtraction};

/// Trimmed inputs shorter than this are rejected outright.
pub const MIN_INPUT_CHARS: usize = 50;
/// Only this many leading characters reach the extractors.
pub const MAX_INPUT_CHARS: usize = 30_000;

/// Parses one document end to end.
///
/// The primary source and the fallback extractors run concurrently; the
/// extractors are CPU-bound and go to the blocking pool. Only input
/// rejection and a failed extraction task surface as errors.
pub async fn parse_document(
    text: &str,
    source: &dyn CompletionSource,
    budget: Duration,
) -> Result<ParsedResume, AppError> {
    if text.trim().chars().count() < MIN_INPUT_CHARS {
        return Err(AppError::Validation(
            "Invalid or too short resume text".to_string(),
        ));
    }

    let span = info_span!("parse_resume", request_id = %Uuid::new_v4());
    async move {
        let raw_text: Arc<str> = Arc::from(bounded(text));
        info!(
            input_chars = text.chars().count(),
            used_chars = raw_text.chars().count(),
            "parsing resume"
        );

        let prompt = build_parse_prompt(&raw_text);
        let extraction_input = Arc::clone(&raw_text);
        let (primary, fallback) = tokio::join!(
            fetch_primary(source, &prompt, budget),
            tokio::task::spawn_blocking(move || FallbackExtraction::extract(&extraction_input)),
        );
        let fallback = fallback.map_err(|e| anyhow::anyhow!("fallback extraction failed: {e}"))?;

        let used_primary = matches!(primary, PrimaryResult::Success(_));
        let resume = reconcile(primary, &fallback, &raw_text);
        info!(
            used_primary,
            confidence = resume.confidence,
            experience = resume.experience.len(),
            education = resume.education.len(),
            skills = resume.skills.len(),
            projects = resume.projects.len(),
            "resume parsed"
        );
        Ok::<_, AppError>(resume)
    }
    .instrument(span)
    .await
}

/// The first `MAX_INPUT_CHARS` characters of `text`.
fn bounded(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::{DisabledSource, LlmError};

    const DOCUMENT: &str = "Jane Doe\nBackend Engineer\njane@x.com\n+1 415 555 0100\nEXPERIENCE\nBackend Engineer\nAcme Inc\n2020 - Present\n• Built APIs\nEDUCATION\nBachelor of Technology in Computer Science, ABC University, 2019\nSKILLS\nLanguages: Python, Go\nPROJECTS\nPersonal Project — Widget Maker\n• A tool for widgets\nTech: Python, Go";

    /// Records the prompt it was given and answers with fixed text.
    struct RecordingSource {
        reply: &'static str,
        prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CompletionSource for RecordingSource {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            *self.prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    #[tokio::test]
    async fn test_short_input_rejected() {
        let err = parse_document("   too short   ", &DisabledSource, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fallback_path_end_to_end() {
        let resume = parse_document(DOCUMENT, &DisabledSource, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.experience.len(), 1);
        assert!(resume.experience[0].current);
        assert_eq!(resume.education[0].graduation_year, "2019");
        assert!(resume.skills.contains("Python"));
        assert!(resume.skills.contains("Go"));
        assert_eq!(resume.projects[0].title, "Widget Maker");
    }

    #[tokio::test]
    async fn test_primary_result_is_reconciled() {
        let source = RecordingSource {
            reply: r#"```json
{"personalInfo": {"name": "Jane Doe", "email": "not-an-email"},
 "skills": ["Rust", "Frontend",],
 "projects": [{"title": "Widget Maker", "type": "mystery"}],}
```"#,
            prompt: Mutex::new(None),
        };
        let resume = parse_document(DOCUMENT, &source, Duration::from_secs(5))
            .await
            .unwrap();

        let prompt = source.prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(DOCUMENT));

        assert_eq!(resume.confidence, 1.0);
        assert_eq!(resume.personal_info.email, "jane@x.com");
        assert!(resume.skills.contains("Rust"));
        assert!(resume.skills.contains("Python"));
        assert!(!resume.skills.contains("Frontend"));
        // Fallback backfills the empty project fields.
        let project = &resume.projects[0];
        assert_eq!(project.description, "A tool for widgets");
        assert_eq!(project.technologies, vec!["Python", "Go"]);
        // Primary had no experience, so the fallback list is used.
        assert_eq!(resume.experience[0].company, "Acme Inc");
    }

    #[test]
    fn test_bounded_input() {
        let long = "é".repeat(MAX_INPUT_CHARS + 10);
        assert_eq!(bounded(&long).chars().count(), MAX_INPUT_CHARS);
        assert_eq!(bounded("short"), "short");
    }
}
