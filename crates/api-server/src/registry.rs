//! Demo-only registry for fabricated users and movies.
//!
//! Registered entries receive ids allocated above the real catalog
//! range, so a demo id can never shadow a dataset id. Nothing here
//! feeds the recommendation engine; the registry exists so demo
//! clients have ids to rate with.

use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use cinematch_core::types::{MovieId, UserId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::rest::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub user_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterMovieRequest {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Thread-safe in-memory registry for demo users and movies.
pub struct Registry {
    users: DashMap<UserId, RegisteredUser>,
    movies: DashMap<MovieId, RegisteredMovie>,
    next_user_id: AtomicU32,
    next_movie_id: AtomicU32,
}

impl Registry {
    /// `first_user_id` and `first_movie_id` seed the id counters; pass
    /// one past the highest real id of each kind.
    pub fn new(first_user_id: UserId, first_movie_id: MovieId) -> Self {
        Self {
            users: DashMap::new(),
            movies: DashMap::new(),
            next_user_id: AtomicU32::new(first_user_id),
            next_movie_id: AtomicU32::new(first_movie_id),
        }
    }

    pub fn register_user(&self, name: String) -> RegisteredUser {
        let user = RegisteredUser {
            user_id: self.next_user_id.fetch_add(1, Ordering::Relaxed),
            name,
            created_at: Utc::now(),
        };
        self.users.insert(user.user_id, user.clone());
        user
    }

    pub fn register_movie(&self, title: String, genres: Vec<String>) -> RegisteredMovie {
        let movie = RegisteredMovie {
            movie_id: self.next_movie_id.fetch_add(1, Ordering::Relaxed),
            title,
            genres,
            created_at: Utc::now(),
        };
        self.movies.insert(movie.movie_id, movie.clone());
        movie
    }

    pub fn get_user(&self, user_id: UserId) -> Option<RegisteredUser> {
        self.users.get(&user_id).map(|r| r.value().clone())
    }

    pub fn get_movie(&self, movie_id: MovieId) -> Option<RegisteredMovie> {
        self.movies.get(&movie_id).map(|r| r.value().clone())
    }

    pub fn list_users(&self) -> Vec<RegisteredUser> {
        let mut users: Vec<RegisteredUser> =
            self.users.iter().map(|r| r.value().clone()).collect();
        users.sort_by_key(|u| u.user_id);
        users
    }

    pub fn list_movies(&self) -> Vec<RegisteredMovie> {
        let mut movies: Vec<RegisteredMovie> =
            self.movies.iter().map(|r| r.value().clone()).collect();
        movies.sort_by_key(|m| m.movie_id);
        movies
    }
}

/// POST /v1/registry/users — Mint a demo user id.
#[utoipa::path(
    post,
    path = "/v1/registry/users",
    tag = "Registry",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Demo user registered", body = RegisteredUser),
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> (StatusCode, Json<RegisteredUser>) {
    let user = state.registry.register_user(request.name);
    metrics::counter!("registry.users.created").increment(1);
    (StatusCode::CREATED, Json(user))
}

/// GET /v1/registry/users — List demo users.
#[utoipa::path(
    get,
    path = "/v1/registry/users",
    tag = "Registry",
    responses(
        (status = 200, description = "All demo users", body = Vec<RegisteredUser>),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<RegisteredUser>> {
    Json(state.registry.list_users())
}

/// GET /v1/registry/users/{user_id} — Fetch one demo user.
#[utoipa::path(
    get,
    path = "/v1/registry/users/{user_id}",
    tag = "Registry",
    params(
        ("user_id" = u32, Path, description = "Demo user identifier"),
    ),
    responses(
        (status = 200, description = "Demo user", body = RegisteredUser),
        (status = 404, description = "Unknown demo user"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<RegisteredUser>, StatusCode> {
    state
        .registry
        .get_user(user_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /v1/registry/movies — Mint a demo movie id.
#[utoipa::path(
    post,
    path = "/v1/registry/movies",
    tag = "Registry",
    request_body = RegisterMovieRequest,
    responses(
        (status = 201, description = "Demo movie registered", body = RegisteredMovie),
    )
)]
pub async fn register_movie(
    State(state): State<AppState>,
    Json(request): Json<RegisterMovieRequest>,
) -> (StatusCode, Json<RegisteredMovie>) {
    let movie = state.registry.register_movie(request.title, request.genres);
    metrics::counter!("registry.movies.created").increment(1);
    (StatusCode::CREATED, Json(movie))
}

/// GET /v1/registry/movies — List demo movies.
#[utoipa::path(
    get,
    path = "/v1/registry/movies",
    tag = "Registry",
    responses(
        (status = 200, description = "All demo movies", body = Vec<RegisteredMovie>),
    )
)]
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<RegisteredMovie>> {
    Json(state.registry.list_movies())
}

/// GET /v1/registry/movies/{movie_id} — Fetch one demo movie.
#[utoipa::path(
    get,
    path = "/v1/registry/movies/{movie_id}",
    tag = "Registry",
    params(
        ("movie_id" = u32, Path, description = "Demo movie identifier"),
    ),
    responses(
        (status = 200, description = "Demo movie", body = RegisteredMovie),
        (status = 404, description = "Unknown demo movie"),
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Result<Json<RegisteredMovie>, StatusCode> {
    state
        .registry
        .get_movie(movie_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_allocate_above_seeds() {
        let registry = Registry::new(700, 200_000);
        let user = registry.register_user("demo".to_string());
        assert_eq!(user.user_id, 700);
        let next = registry.register_user("demo2".to_string());
        assert_eq!(next.user_id, 701);

        let movie = registry.register_movie("Demo Movie".to_string(), vec![]);
        assert_eq!(movie.movie_id, 200_000);
    }

    #[test]
    fn test_lookup_and_listing() {
        let registry = Registry::new(1, 1);
        let a = registry.register_user("a".to_string());
        let b = registry.register_user("b".to_string());

        assert_eq!(registry.get_user(a.user_id).map(|u| u.name), Some("a".to_string()));
        assert!(registry.get_user(999).is_none());

        let listed = registry.list_users();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].user_id, a.user_id);
        assert_eq!(listed[1].user_id, b.user_id);
    }
}
