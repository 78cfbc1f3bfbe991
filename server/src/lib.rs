use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use vagas_core::engine::{RecommendError, Snapshot};
use vagas_core::JobPosting;

pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub trabalho: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub id: Option<String>,
}

/// Request-level error mapped to an HTTP status and a `{"error": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NoMatch => {
                ApiError::NotFound("Nenhuma vaga correspondente encontrada.".into())
            }
            RecommendError::UnknownId => {
                ApiError::NotFound("Nenhuma vaga encontrada com o ID fornecido.".into())
            }
        }
    }
}

pub fn build_app(snapshot: Arc<Snapshot>) -> Router {
    let state = AppState { snapshot };
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", post(recommend_handler))
        .route("/profile", post(profile_handler))
        .with_state(state)
        .layer(cors_layer())
}

// CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
fn cors_layer() -> CorsLayer {
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    }
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<Vec<JobPosting>>, ApiError> {
    let title = req
        .trabalho
        .ok_or_else(|| ApiError::BadRequest("O campo 'trabalho' é necessário.".into()))?;
    tracing::info!(%title, "recommendation request");
    let ranked = state.snapshot.recommend_by_text(&title)?;
    Ok(Json(ranked))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Vec<JobPosting>>, ApiError> {
    // A missing id matches no posting, as with any unknown id.
    let id = req.id.unwrap_or_default();
    tracing::info!(%id, "profile request");
    let ranked = state.snapshot.recommend_by_id(&id)?;
    Ok(Json(ranked))
}
