use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a rating user. MovieLens exports use small dense integers.
pub type UserId = u32;

/// Identifier of a catalog movie.
pub type MovieId = u32;

/// One explicit rating observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Star value on the half-step scale, 0.5 through 5.0.
    pub value: f64,
    pub rated_at: DateTime<Utc>,
}

/// Catalog entry for a single movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
}

/// One ranked row returned by the query paths, already joined with the
/// catalog. `score` is a cosine value for similar-movie queries and an
/// accumulated weighted sum for per-user recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub score: f64,
}
