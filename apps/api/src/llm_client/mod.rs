/// LLM Client: the single point of entry for calls to the hosted
/// text-generation service that backs the primary résumé parse.
///
/// ARCHITECTURAL RULE: No other module may call the inference API directly.
/// Everything else talks to a `CompletionSource`.
///
/// Model: deepseek-ai/DeepSeek-V3-0324 (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const INFERENCE_API_URL: &str = "https://api-inference.huggingface.co/models";
/// The model used for every primary parse.
pub const MODEL: &str = "deepseek-ai/DeepSeek-V3-0324";
const MAX_NEW_TOKENS: u32 = 3000;
const TEMPERATURE: f32 = 0.05;
const TOP_P: f32 = 0.95;
const MAX_RETRIES: u32 = 3;
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No inference credential configured")]
    NotConfigured,
}

/// Anything that can turn a prompt into generated text.
///
/// Carried in `AppState` as `Arc<dyn CompletionSource>` so the pipeline can
/// run against the hosted model, a disabled source, or a test double.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            do_sample: false,
            return_full_text: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// The endpoint answers with a list for batched inputs and a bare object
/// otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Batch(items) => items.into_iter().next()?.generated_text,
            Self::Single(item) => item.generated_text,
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Hosted client
// ────────────────────────────────────────────────────────────────────────────

/// Client for the hosted text-generation endpoint.
/// Retries on 429 and 5xx (including "model is loading") with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_token: String,
}

impl LlmClient {
    pub fn new(api_token: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_token })
    }

    /// Makes a raw text-generation call and returns the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{INFERENCE_API_URL}/{MODEL}");
        let request_body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::default(),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_token)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(if status.as_u16() == 429 {
                    LlmError::RateLimited {
                        retries: attempt + 1,
                    }
                } else {
                    LlmError::Api {
                        status: status.as_u16(),
                        message: error_message(body),
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
            }

            let generated: GenerationResponse = response.json().await?;
            let text = generated.into_text().ok_or(LlmError::EmptyContent)?;

            debug!("LLM call succeeded: generated_chars={}", text.len());

            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Pulls the message out of `{"error": "..."}` bodies, else returns the body.
fn error_message(body: String) -> String {
    serde_json::from_str::<InferenceError>(&body)
        .map(|e| e.error)
        .unwrap_or(body)
}

#[async_trait]
impl CompletionSource for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate(prompt).await
    }
}

/// Used when no credential is configured: every call fails fast so the
/// pipeline goes straight to the fallback extractors.
pub struct DisabledSource;

#[async_trait]
impl CompletionSource for DisabledSource {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_batch_shape() {
        let raw = r#"[{"generated_text": "{\"a\": 1}"}]"#;
        let parsed: GenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_response_single_shape() {
        let raw = r#"{"generated_text": "hello"}"#;
        let parsed: GenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_response_blank_is_empty() {
        let parsed: GenerationResponse = serde_json::from_str("[]").unwrap();
        assert!(parsed.into_text().is_none());
        let parsed: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text": "  "}]"#).unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": "Model is currently loading"}"#.to_string()),
            "Model is currently loading"
        );
        assert_eq!(error_message("plain".to_string()), "plain");
    }

    #[test]
    fn test_request_serializes_fixed_parameters() {
        let body = GenerationRequest {
            inputs: "hi",
            parameters: GenerationParameters::default(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["parameters"]["max_new_tokens"], 3000);
        assert_eq!(value["parameters"]["do_sample"], false);
        assert_eq!(value["parameters"]["return_full_text"], false);
    }

    #[tokio::test]
    async fn test_disabled_source_fails_fast() {
        let err = DisabledSource.complete("anything").await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }
}
