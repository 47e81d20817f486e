//! HTTP surface: `POST /predict` and `GET /health`.
//!
//! Request bodies are validated at the serde/axum extraction boundary —
//! missing required fields never reach the scoring pipeline.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::engine::{RecommendEngine, UserProfile};
use crate::feedback::{self, FeedbackRecord, FeedbackStore};
use crate::ranking::Recommendation;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendEngine>,
    pub feedback: Arc<dyn FeedbackStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct PredictRequest {
    pub text: String,
    #[serde(rename = "userDetails")]
    pub user_details: UserProfile,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackRecord>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub message: String,
    pub recommendations: Vec<Recommendation>,
}

async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> Json<PredictResponse> {
    let user = anon_hash(&body.user_details.user_id);
    info!(user = %user, feedbacks = body.feedbacks.len(), "prediction request");

    let feedback_map = feedback::accumulate(
        state.feedback.as_ref(),
        &body.user_details.user_id,
        &body.feedbacks,
    )
    .await;

    let recommendations = state
        .engine
        .recommend(&body.text, &body.user_details, &feedback_map);

    if let Some(top) = recommendations.first() {
        info!(
            user = %user,
            top = %top.name,
            confidence = top.confidence,
            "prediction served"
        );
    }

    Json(PredictResponse {
        message: "Personalized ML recommendations (feedback-aware)".to_string(),
        recommendations,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ML server is running",
    })
}

/// Short SHA-256 prefix so user ids never appear raw in logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
