use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MoviesResponse, RecommendRequest, RecommendResponse},
};

use super::AppState;

/// Landing endpoint
pub async fn home() -> Json<Value> {
    Json(json!({ "message": "Movie Recommendation API is running" }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "movies": state.recommender.len(),
    }))
}

/// List every movie title in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    let movies = state
        .recommender
        .titles()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(MoviesResponse { movies })
}

/// `POST /recommend` with a JSON body
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    recommend_for(&state, &request_id, request).map(Json)
}

/// `GET /recommend` with query parameters
pub async fn recommend_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(request): Query<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    recommend_for(&state, &request_id, request).map(Json)
}

fn recommend_for(
    state: &AppState,
    request_id: &RequestId,
    request: RecommendRequest,
) -> AppResult<RecommendResponse> {
    let top_n = request.top_n.unwrap_or(state.default_top_n);
    if top_n > state.max_top_n {
        return Err(AppError::InvalidInput(format!(
            "top_n must be at most {}",
            state.max_top_n
        )));
    }

    tracing::info!(
        request_id = %request_id,
        movie_name = %request.movie_name,
        top_n,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(&request.movie_name, top_n)
        .ok_or_else(|| {
            tracing::info!(
                request_id = %request_id,
                movie_name = %request.movie_name,
                "Movie not found"
            );
            AppError::NotFound("Movie not found".to_string())
        })?;

    tracing::info!(
        request_id = %request_id,
        result_count = recommendations.len(),
        "Recommendations generated"
    );

    Ok(RecommendResponse {
        input_movie: request.movie_name,
        recommendations,
    })
}
