pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::parsing::handlers;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/parse-resume", post(handlers::handle_parse_resume))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::DisabledSource;

    fn app() -> Router {
        build_router(AppState {
            source: Arc::new(DisabledSource),
            config: Config::default(),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn parse_request(body: Value) -> Request<Body> {
        Request::post("/api/parse-resume")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_routes() {
        for path in ["/health", "/api/health"] {
            let (status, body) = send(Request::get(path).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");
            assert_eq!(body["service"], "resume-api");
        }
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let (status, body) = send(parse_request(json!({ "text": "Jane Doe" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_text_is_rejected() {
        let (status, _) = send(parse_request(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_resume_fallback() {
        let text = "Jane Doe\nBackend Engineer\njane@x.com\n+1 415 555 0100\nEXPERIENCE\nBackend Engineer\nAcme Inc\n2020 - Present\n• Built APIs\nSKILLS\nLanguages: Python, Go\n";
        let (status, body) = send(parse_request(json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["personalInfo"]["name"], "Jane Doe");
        assert_eq!(data["personalInfo"]["email"], "jane@x.com");
        assert_eq!(data["experience"][0]["company"], "Acme Inc");
        assert_eq!(data["experience"][0]["current"], true);
        assert_eq!(data["skills"], json!(["Python", "Go"]));
        assert!(data["confidence"].as_f64().unwrap() < 1.0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, body) = send(Request::get("/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
