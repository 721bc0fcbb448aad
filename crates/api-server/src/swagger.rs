//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CineMatch API",
        version = "0.1.0",
        description = "Item-based collaborative-filtering movie recommendations.\n\nQueries run against an in-memory cosine similarity model that is rebuilt synchronously on every rating write.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Movies", description = "Similar-movie queries"),
        (name = "Users", description = "Per-user recommendation queries"),
        (name = "Ratings", description = "Rating writes that rebuild the model"),
        (name = "Registry", description = "Demo-only user and movie registration"),
        (name = "Operations", description = "Service banner, health, readiness, and liveness"),
    ),
    paths(
        // Queries
        crate::rest::similar_movies,
        crate::rest::user_recommendations,
        // Writes
        crate::rest::submit_rating,
        // Operations
        crate::rest::banner,
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
        // Demo registry
        crate::registry::register_user,
        crate::registry::list_users,
        crate::registry::get_user,
        crate::registry::register_movie,
        crate::registry::list_movies,
        crate::registry::get_movie,
    ),
    components(schemas(
        // Core types
        cinematch_core::types::Movie,
        cinematch_core::types::Recommendation,
        // REST envelopes
        crate::rest::BannerResponse,
        crate::rest::SimilarMoviesResponse,
        crate::rest::UserRecommendationsResponse,
        crate::rest::RateRequest,
        crate::rest::RatingAck,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
        // Registry types
        crate::registry::RegisteredUser,
        crate::registry::RegisteredMovie,
        crate::registry::RegisterUserRequest,
        crate::registry::RegisterMovieRequest,
    ))
)]
pub struct ApiDoc;
