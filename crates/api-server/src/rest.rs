//! REST API handlers for recommendation queries, rating writes, and
//! operational endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use cinematch_core::config::EngineConfig;
use cinematch_core::error::CineError;
use cinematch_core::types::{MovieId, Recommendation, UserId};
use cinematch_engine::Recommender;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::registry::Registry;

/// Hard upper bound for `limit`, regardless of configuration.
const MAX_RESULT_LIMIT: usize = 100;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Recommender>,
    pub registry: Arc<Registry>,
    pub limits: EngineConfig,
    pub node_id: String,
    pub start_time: Instant,
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub limit: Option<usize>,
    pub min_rating: Option<f64>,
}

/// Resolve and validate the `limit` query parameter at the API boundary.
fn validate_limit(requested: Option<usize>, limits: &EngineConfig) -> Result<usize, &'static str> {
    let limit = requested.unwrap_or(limits.default_limit);
    if limit == 0 {
        return Err("'limit' must be at least 1");
    }
    if limit > limits.max_limit.min(MAX_RESULT_LIMIT) {
        return Err("'limit' exceeds the maximum result window");
    }
    Ok(limit)
}

/// Resolve and validate the `min_rating` query parameter.
fn validate_min_rating(
    requested: Option<f64>,
    limits: &EngineConfig,
) -> Result<f64, &'static str> {
    let min_rating = requested.unwrap_or(limits.min_rating);
    if !min_rating.is_finite() {
        return Err("'min_rating' must be a finite number");
    }
    Ok(min_rating)
}

fn validation_error(message: &'static str) -> (StatusCode, Json<ErrorResponse>) {
    metrics::counter!("api.validation_errors").increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: message.to_string(),
        }),
    )
}

/// Map engine errors onto HTTP statuses and wire error codes: missing
/// ids are 404, present-but-unusable data is 422, bad input is 400.
fn error_response(err: &CineError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match err {
        CineError::MovieNotFound(_) | CineError::UserNotFound(_) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        CineError::InsufficientRatings(_) | CineError::InsufficientSignal(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data")
        }
        CineError::InvalidRating { .. } => (StatusCode::BAD_REQUEST, "invalid_rating"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

/// GET / — Service banner listing the query endpoints.
#[utoipa::path(
    get,
    path = "/",
    tag = "Operations",
    responses(
        (status = 200, description = "Service banner", body = BannerResponse),
    )
)]
pub async fn banner(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        service: "cinematch".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        node_id: state.node_id.clone(),
        endpoints: vec![
            "/v1/movies/{movie_id}/similar".to_string(),
            "/v1/users/{user_id}/recommendations".to_string(),
            "/v1/ratings".to_string(),
            "/v1/registry/users".to_string(),
            "/v1/registry/movies".to_string(),
            "/docs".to_string(),
        ],
    })
}

/// GET /v1/movies/{movie_id}/similar — Movies ranked by cosine similarity.
#[utoipa::path(
    get,
    path = "/v1/movies/{movie_id}/similar",
    tag = "Movies",
    params(
        ("movie_id" = u32, Path, description = "Catalog movie identifier"),
        ("limit" = Option<usize>, Query, description = "Maximum rows to return"),
    ),
    responses(
        (status = 200, description = "Ranked similar movies", body = SimilarMoviesResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "Movie not in the similarity index", body = ErrorResponse),
        (status = 422, description = "Movie has no rating signal", body = ErrorResponse),
    )
)]
pub async fn similar_movies(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<SimilarMoviesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = validate_limit(params.limit, &state.limits).map_err(validation_error)?;

    metrics::counter!("api.similar.requests").increment(1);
    match state.engine.similar_movies(movie_id, limit) {
        Ok(results) => Ok(Json(SimilarMoviesResponse {
            request_id: Uuid::new_v4(),
            movie_id,
            count: results.len(),
            results,
            generated_at: Utc::now(),
        })),
        Err(e) => {
            warn!(movie_id, error = %e, "Similar-movies query failed");
            metrics::counter!("api.similar.errors").increment(1);
            Err(error_response(&e))
        }
    }
}

/// GET /v1/users/{user_id}/recommendations — Personalized ranking for one user.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/recommendations",
    tag = "Users",
    params(
        ("user_id" = u32, Path, description = "Rating user identifier"),
        ("limit" = Option<usize>, Query, description = "Maximum rows to return"),
        ("min_rating" = Option<f64>, Query, description = "Liked threshold for seed ratings"),
    ),
    responses(
        (status = 200, description = "Ranked recommendations", body = UserRecommendationsResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "User not in the rating matrix", body = ErrorResponse),
        (status = 422, description = "User has no usable ratings", body = ErrorResponse),
    )
)]
pub async fn user_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<UserRecommendationsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = validate_limit(params.limit, &state.limits).map_err(validation_error)?;
    let min_rating = validate_min_rating(params.min_rating, &state.limits).map_err(validation_error)?;

    metrics::counter!("api.recommend.requests").increment(1);
    match state.engine.recommend_for_user(user_id, limit, min_rating) {
        Ok(results) => Ok(Json(UserRecommendationsResponse {
            request_id: Uuid::new_v4(),
            user_id,
            min_rating,
            count: results.len(),
            results,
            generated_at: Utc::now(),
        })),
        Err(e) => {
            warn!(user_id, error = %e, "User recommendation query failed");
            metrics::counter!("api.recommend.errors").increment(1);
            Err(error_response(&e))
        }
    }
}

/// POST /v1/ratings — Record one rating and rebuild the model before
/// acknowledging.
#[utoipa::path(
    post,
    path = "/v1/ratings",
    tag = "Ratings",
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rating stored, model rebuilt", body = RatingAck),
        (status = 400, description = "Rating value rejected", body = ErrorResponse),
    )
)]
pub async fn submit_rating(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> Result<Json<RatingAck>, (StatusCode, Json<ErrorResponse>)> {
    let started = Instant::now();
    match state
        .engine
        .upsert_rating(request.user_id, request.movie_id, request.rating)
    {
        Ok(()) => {
            metrics::counter!("api.ratings.accepted").increment(1);
            metrics::histogram!("api.ratings.rebuild_ms")
                .record(started.elapsed().as_millis() as f64);
            Ok(Json(RatingAck {
                user_id: request.user_id,
                movie_id: request.movie_id,
                rating: request.rating,
                total_ratings: state.engine.stats().ratings,
                recorded_at: Utc::now(),
            }))
        }
        Err(e) => {
            warn!(
                user_id = request.user_id,
                movie_id = request.movie_id,
                error = %e,
                "Rating rejected"
            );
            metrics::counter!("api.ratings.rejected").increment(1);
            Err(error_response(&e))
        }
    }
}

/// GET /health — Health check with engine counts.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses(
        (status = 200, description = "Service health and model counts", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.engine.stats();
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        users: stats.users,
        movies: stats.movies,
        ratings: stats.ratings,
    })
}

/// GET /ready — Readiness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Still starting"),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses(
        (status = 200, description = "Process is alive"),
    )
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize, ToSchema)]
pub struct BannerResponse {
    pub service: String,
    pub version: String,
    pub node_id: String,
    pub endpoints: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SimilarMoviesResponse {
    pub request_id: Uuid,
    pub movie_id: MovieId,
    pub count: usize,
    pub results: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct UserRecommendationsResponse {
    pub request_id: Uuid,
    pub user_id: UserId,
    pub min_rating: f64,
    pub count: usize,
    pub results: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateRequest {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

#[derive(Serialize, ToSchema)]
pub struct RatingAck {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
    pub total_ratings: usize,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
}
