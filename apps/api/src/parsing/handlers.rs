use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ParsedResume;
use crate::parsing::ingest::parse_document;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParseResumeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub success: bool,
    pub data: ParsedResume,
}

/// POST /api/parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(req): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let budget = Duration::from_secs(state.config.primary_timeout_secs);
    let data = parse_document(&req.text, state.source.as_ref(), budget).await?;
    Ok(Json(ParseResumeResponse {
        success: true,
        data,
    }))
}
