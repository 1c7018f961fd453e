//! HTTP backend exposing the summarizer pipeline.


use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::{Config, Secrets};
use crate::summarizer::{QuickSummary, SourceType, Summarizer, SummaryReport, TopicList};
use crate::BrieflyError;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    secrets: Arc<Secrets>,
}

impl AppState {
    #[inline]
    pub fn new(config: Config, secrets: Secrets) -> Self {
        Self {
            config: Arc::new(config),
            secrets: Arc::new(secrets),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub topics: Vec<String>,
    pub source_type: SourceType,
}

/// Error envelope matching the JSON bodies clients expect.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<BrieflyError> for ApiError {
    fn from(error: BrieflyError) -> Self {
        let status = match &error {
            BrieflyError::NoData(_) => StatusCode::NOT_FOUND,
            BrieflyError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.detail);
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[inline]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/generate-news-summary", post(generate_news_summary))
        .route("/quick-summary", post(quick_summary))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
#[inline]
pub async fn serve(config: Config, secrets: Secrets, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{}", addr);

    let app = router(AppState::new(config, secrets));
    axum::serve(listener, app)
        .await
        .context("Server failed")?;

    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Briefly API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "features": ["news_analysis", "reddit_analysis", "structured_summaries"]
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn generate_news_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryReport>, ApiError> {
    let (topics, summarizer) = prepare(&state, &request)?;

    let report = summarizer
        .generate_report(&topics, request.source_type)
        .await?;

    Ok(Json(report))
}

async fn quick_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<QuickSummary>, ApiError> {
    let (topics, summarizer) = prepare(&state, &request)?;

    let summary = summarizer.quick_summary(&topics, request.source_type).await?;

    Ok(Json(summary))
}

fn prepare(
    state: &AppState,
    request: &SummaryRequest,
) -> Result<(TopicList, Summarizer), ApiError> {
    let topics = TopicList::from_topics(&request.topics)
        .map_err(|e| BrieflyError::InvalidInput(e.to_string()))?;

    let summarizer = Summarizer::new(&state.config, &state.secrets)?;

    Ok((topics, summarizer))
}
