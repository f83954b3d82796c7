use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use learnplan_core::{LearningPlan, OllamaClient, OnboardingPlanner, PlannerError, Question};

use crate::config::LearnplanConfig;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub const UNAVAILABLE_MESSAGE: &'static str =
        "Ollama is not running. Please start Ollama: ollama serve";

    pub fn service_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: Self::UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        if err.is_unreachable() {
            tracing::warn!(error = %err, "ollama unreachable");
            Self::service_unavailable()
        } else {
            tracing::error!(error = %err, "onboarding step failed");
            Self::internal(err)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "detail": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FollowupRequest {
    pub background: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub background: String,
    pub focus_goal: String,
    pub time: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the CORS layer for the given origins.
///
/// Credentials are allowed, so methods and headers mirror the request
/// instead of using a wildcard. A lone `"*"` gives a permissive layer
/// without credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn build_router(planner: OnboardingPlanner, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/onboarding/step1", get(step1))
        .route("/api/onboarding/step2", post(step2))
        .route("/api/onboarding/step3", get(step3))
        .route("/api/onboarding/generate-plan", post(generate_plan))
        .layer(cors)
        .with_state(planner)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(config: &LearnplanConfig) -> Result<()> {
    let client = OllamaClient::new(config.ollama.clone())?;
    let planner = OnboardingPlanner::new(std::sync::Arc::new(client));
    let app = build_router(planner, cors_layer(&config.server.cors_origins)?);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.bind, config.server.port
            )
        })?;
    tracing::info!(
        model = %config.ollama.model,
        ollama = %config.ollama.base_url,
        "learnplan serve listening on http://{addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("learnplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(planner): State<OnboardingPlanner>) -> Json<Value> {
    Json(json!({
        "message": "Learning Planner API (Ollama)",
        "llm": "Ollama (Free, Local)",
        "model": planner.model(),
        "url": planner.base_url(),
        "endpoints": {
            "step1": "GET /api/onboarding/step1",
            "step2": "POST /api/onboarding/step2",
            "step3": "GET /api/onboarding/step3",
            "generate_plan": "POST /api/onboarding/generate-plan",
        }
    }))
}

async fn health(State(planner): State<OnboardingPlanner>) -> Result<Json<Value>, AppError> {
    planner.health_check().await?;
    Ok(Json(json!({
        "status": "healthy",
        "ollama": "connected",
        "model": planner.model(),
    })))
}

async fn step1(State(planner): State<OnboardingPlanner>) -> Result<Json<Question>, AppError> {
    Ok(Json(planner.background_question().await?))
}

async fn step2(
    State(planner): State<OnboardingPlanner>,
    payload: Result<Json<FollowupRequest>, JsonRejection>,
) -> Result<Json<Question>, AppError> {
    let Json(req) = payload?;
    Ok(Json(planner.followup_question(&req.background).await?))
}

async fn step3(State(planner): State<OnboardingPlanner>) -> Result<Json<Question>, AppError> {
    Ok(Json(planner.time_question().await?))
}

async fn generate_plan(
    State(planner): State<OnboardingPlanner>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<LearningPlan>, AppError> {
    let Json(req) = payload?;
    let plan = planner
        .learning_plan(&req.background, &req.focus_goal, &req.time)
        .await?;
    Ok(Json(plan))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
