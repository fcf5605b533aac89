//! HTTP routes and the error-to-response mapping.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use habitquest_core::{HabitError, RecommendationStrategy, Recommender, ScoredHabit, TopK};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    vector: Arc<dyn Recommender>,
    generative: Option<Arc<dyn Recommender>>,
    default_top_k: TopK,
}

impl AppState {
    /// Creates state with the similarity recommender and, when configured,
    /// the generative one.
    pub fn new(
        vector: Arc<dyn Recommender>,
        generative: Option<Arc<dyn Recommender>>,
        default_top_k: TopK,
    ) -> Self {
        Self {
            vector,
            generative,
            default_top_k,
        }
    }

    /// The recommender serving `strategy`.
    pub fn recommender(
        &self,
        strategy: RecommendationStrategy,
    ) -> Result<Arc<dyn Recommender>, HabitError> {
        match strategy {
            RecommendationStrategy::VectorSimilarity => Ok(self.vector.clone()),
            RecommendationStrategy::GenerativeText => self.generative.clone().ok_or_else(|| {
                HabitError::ConfigError("GEMINI_API_KEY is not configured".to_string())
            }),
        }
    }
}

#[derive(Serialize)]
struct StatusMessage {
    message: String,
}

#[derive(Serialize)]
struct HealthStatus {
    status: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct RecommendParams {
    top_k: Option<usize>,
}

/// A [`HabitError`] rendered as an HTTP response.
pub struct ApiError(pub HabitError);

impl From<HabitError> for ApiError {
    fn from(err: HabitError) -> Self {
        Self(err)
    }
}

/// Status code reported for each error category.
pub fn status_for(err: &HabitError) -> StatusCode {
    match err {
        HabitError::EmptyCorpus | HabitError::HabitNotFound(_) => StatusCode::NOT_FOUND,
        HabitError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        HabitError::UpstreamServiceError { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_caller_recoverable() {
            tracing::info!(error = %self.0, %status, "Request rejected");
        } else {
            tracing::error!(error = %self.0, %status, "Request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn home() -> impl IntoResponse {
    Json(StatusMessage {
        message: "HabitQuest API is running".to_string(),
    })
}

async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check requested");
    let health = HealthStatus {
        status: "ok".to_string(),
    };
    (StatusCode::OK, Json(health))
}

async fn recommend_habits(
    State(state): State<AppState>,
    Path(habit_title): Path<String>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<Vec<ScoredHabit>>, ApiError> {
    serve(&state, RecommendationStrategy::VectorSimilarity, &habit_title, params).await
}

async fn gemini_recommend_habits(
    State(state): State<AppState>,
    Path(habit_title): Path<String>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<Vec<ScoredHabit>>, ApiError> {
    serve(&state, RecommendationStrategy::GenerativeText, &habit_title, params).await
}

async fn serve(
    state: &AppState,
    strategy: RecommendationStrategy,
    habit_title: &str,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<Vec<ScoredHabit>>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| HabitError::validation_error("top_k", &rejection.body_text()))?;
    let top_k = match params.top_k {
        Some(n) => TopK::new(n)?,
        None => state.default_top_k,
    };
    let recommender = state.recommender(strategy)?;
    let results = recommender.recommend(habit_title, top_k).await?;
    tracing::info!(
        habit = habit_title,
        %strategy,
        returned = results.len(),
        "Served recommendations"
    );
    Ok(Json(results))
}

/// Builds the router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/recommend/:habit_title", get(recommend_habits))
        .route("/gemini-recommend/:habit_title", get(gemini_recommend_habits))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
