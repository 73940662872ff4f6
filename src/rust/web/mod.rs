//! Single-page web front end: a text area, a "Classify" button, the verdict
//! and a collapsible panel with the most recent classifications.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Form, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::service::ClassificationService;

mod page;

pub use page::{escape_html, verdict_message, Outcome, Page, EMPTY_INPUT_WARNING, NO_HISTORY};

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClassificationService>,
    pub history_limit: usize,
    pub diagnostics: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    history_records: usize,
}

/// Article text has no length cap, so the request body limit is lifted
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/classify", post(classify))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn render(state: &AppState, input: &str, outcome: Option<Outcome>) -> Html<String> {
    let history = state.service.recent_history(state.history_limit).await;
    Html(
        Page {
            input,
            outcome,
            history,
            diagnostics: state.diagnostics,
        }
        .render(),
    )
}

async fn index(State(state): State<AppState>) -> Html<String> {
    render(&state, "", None).await
}

async fn classify(State(state): State<AppState>, Form(form): Form<ClassifyForm>) -> (StatusCode, Html<String>) {
    let (status, outcome) = match state.service.classify(&form.text).await {
        Ok(classification) => (StatusCode::OK, Outcome::Verdict(classification.prediction)),
        Err(e) if e.is_validation() => (StatusCode::OK, Outcome::Warning(EMPTY_INPUT_WARNING.to_string())),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Outcome::Error(e.to_string())),
    };
    (status, render(&state, &form.text, Some(outcome)).await)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        history_records: state.service.history_len().await,
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, stopping server");
    }
}

/// Serves the app on `addr` until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classifier::tests::fixed_classifier;
    use crate::config::AppConfig;
    use crate::history::HistoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn state_with(config: &AppConfig, class: i64, proba: Vec<f64>, dir: &tempfile::TempDir) -> AppState {
        let store = HistoryStore::new(dir.path().join("history.json"));
        let service = ClassificationService::open(Arc::new(fixed_classifier(class, proba)), store).unwrap();
        AppState {
            service: Arc::new(service),
            history_limit: config.history_limit,
            diagnostics: config.diagnostics,
        }
    }

    fn state(class: i64, proba: Vec<f64>, dir: &tempfile::TempDir) -> AppState {
        state_with(&AppConfig::default(), class, proba, dir)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::post("/classify")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_shows_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(1, vec![0.1, 0.9], &dir))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(NO_HISTORY));
    }

    #[tokio::test]
    async fn test_classify_renders_verdict_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(1, vec![0.12, 0.88], &dir));

        let response = app
            .oneshot(post_form("text=Breaking%3A+stocks+rise+after+earnings+report"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This news seems REAL."));
        assert!(html.contains("FAKE: 0.1200, REAL: 0.8800"));
        assert!(html.contains("Breaking: stocks rise after earnings report..."));
        assert!(!html.contains("Raw prediction"));
    }

    #[tokio::test]
    async fn test_classify_with_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig { diagnostics: true, ..AppConfig::default() };
        let app = router(state_with(&config, 0, vec![0.7, 0.3], &dir));

        let html = body_text(app.oneshot(post_form("text=aliens")).await.unwrap()).await;
        assert!(html.contains("This news seems FAKE."));
        assert!(html.contains("FAKE: 0.7000, REAL: 0.3000"));
        assert!(html.contains("Raw prediction: 0"));
        assert!(html.contains("Model classes: [0 1]"));
    }

    #[tokio::test]
    async fn test_large_article_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(1, vec![0.1, 0.9], &dir);
        let service = state.service.clone();
        let text = "a".repeat(3 * 1024 * 1024);
        let request = Request::post("/classify")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("text={}", text)))
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("This news seems REAL."));
        assert_eq!(service.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_input_shows_warning() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(1, vec![0.1, 0.9], &dir);
        let service = state.service.clone();

        let response = router(state).oneshot(post_form("text=+++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(EMPTY_INPUT_WARNING));
        assert_eq!(service.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_prediction_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(1, vec![1.0], &dir))
            .oneshot(post_form("text=story"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Prediction error"));
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(1, vec![0.1, 0.9], &dir))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["history_records"], 0);
    }
}
