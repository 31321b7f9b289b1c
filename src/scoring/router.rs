use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::Discipline;

use super::domain::{CandidateProfile, ScoredMajor, Subject};
use super::service::{RecommendationService, DEFAULT_THRESHOLD};

/// Router builder exposing the recommendation endpoint.
pub fn recommendation_router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    pub(crate) test_type: Discipline,
    pub(crate) scores: BTreeMap<Subject, f64>,
    #[serde(default)]
    pub(crate) threshold: Option<f64>,
    /// Optional cap on how many ranked entries to return; ranking happens
    /// over the full catalog slice either way.
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationResponse {
    pub(crate) test_type: Discipline,
    pub(crate) threshold: f64,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) matches: usize,
    pub(crate) recommendations: Vec<ScoredMajor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

pub(crate) async fn recommend_handler(
    State(service): State<Arc<RecommendationService>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response {
    let threshold = request.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let profile = CandidateProfile {
        discipline: request.test_type,
        scores: request.scores,
    };

    match service.recommend(&profile, threshold) {
        Ok(ranked) => {
            let matches = ranked.len();
            let message = if matches == 0 {
                Some(format!(
                    "no {} majors reached the {threshold:.2} probability threshold",
                    profile.discipline
                ))
            } else {
                None
            };

            let recommendations = match request.limit {
                Some(limit) => ranked.into_iter().take(limit).collect(),
                None => ranked,
            };

            let body = RecommendationResponse {
                test_type: profile.discipline,
                threshold,
                generated_at: Utc::now(),
                matches,
                recommendations,
                message,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
