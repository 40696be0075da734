use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use hoopcast_models::{GamePrediction, PredictError, PredictionQuery, TeamSummary};
use hoopcast_services::PredictionService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    fn error(message: String) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            message: Some(message),
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub model_version: String,
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/predict", post(predict_game))
        .route("/api/teams", get(get_teams))
        .route("/api/teams/:team", get(get_team))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_version: state.service.model_version().to_string(),
    })
}

/// Unknown teams are 404s; a query that finds no usable data at all is a 422.
/// Data sparsity below that never reaches this layer, the assembler's
/// fallback ladder absorbs it.
fn error_status(error: &PredictError) -> StatusCode {
    match error {
        PredictError::UnknownTeam { .. } => StatusCode::NOT_FOUND,
        PredictError::NoData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn predict_game(
    State(state): State<AppState>,
    Json(query): Json<PredictionQuery>,
) -> Result<Json<ApiResponse<GamePrediction>>, (StatusCode, Json<ApiResponse<GamePrediction>>)> {
    match state.service.predict(&query.home_team, &query.away_team) {
        Ok(prediction) => Ok(ApiResponse::ok(prediction)),
        Err(error) => {
            tracing::warn!(
                home = %query.home_team,
                away = %query.away_team,
                %error,
                "prediction rejected"
            );
            Err((error_status(&error), ApiResponse::error(error.to_string())))
        }
    }
}

async fn get_teams(State(state): State<AppState>) -> Json<ApiResponse<Vec<TeamSummary>>> {
    let teams = state
        .service
        .team_summaries()
        .into_iter()
        .cloned()
        .collect();
    ApiResponse::ok(teams)
}

async fn get_team(
    State(state): State<AppState>,
    Path(team): Path<String>,
) -> Result<Json<ApiResponse<TeamSummary>>, StatusCode> {
    state
        .service
        .team_summary(&team)
        .cloned()
        .map(ApiResponse::ok)
        .ok_or(StatusCode::NOT_FOUND)
}
