//! Recommender facade: owns the store and both derived matrices, and
//! provides the query and write API used by the REST layer and CLI.

use std::cmp::Ordering;
use std::time::Instant;

use chrono::Utc;
use cinematch_core::error::{CineError, CineResult};
use cinematch_core::types::{Movie, MovieId, Rating, Recommendation, UserId};
use ndarray::Array1;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::matrix::RatingMatrix;
use crate::similarity::{CosineSimilarity, ItemSimilarity, SimilarityMatrix};
use crate::store::RatingStore;

/// Lowest rating value the write path accepts.
pub const MIN_RATING_VALUE: f64 = 0.5;
/// Highest rating value the write path accepts.
pub const MAX_RATING_VALUE: f64 = 5.0;
/// Seed count when a user has ratings but none reach the liked threshold.
pub const FALLBACK_SEED_COUNT: usize = 5;

/// Counts reported by the health and admin surfaces.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngineStats {
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
}

/// Store plus everything derived from it. Replaced as one unit so the
/// matrices can never lag the store.
struct EngineState {
    store: RatingStore,
    ratings: RatingMatrix,
    similarity: SimilarityMatrix,
}

impl EngineState {
    fn build(store: RatingStore, strategy: &dyn ItemSimilarity) -> Self {
        let ratings = RatingMatrix::build(&store);
        let similarity = strategy.compute(&ratings);
        Self {
            store,
            ratings,
            similarity,
        }
    }
}

/// Item-based collaborative-filtering recommender.
///
/// All mutable state lives behind one `RwLock`. A write takes the lock,
/// updates the store, rebuilds both matrices and publishes them in a
/// single replacement, so concurrent readers observe either the full
/// old state or the full new state.
pub struct Recommender {
    catalog: Catalog,
    strategy: Box<dyn ItemSimilarity>,
    state: RwLock<EngineState>,
}

impl Recommender {
    /// Build a recommender over the given catalog and observations with
    /// the default cosine strategy.
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        Self::with_strategy(movies, ratings, Box::new(CosineSimilarity))
    }

    pub fn with_strategy(
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
        strategy: Box<dyn ItemSimilarity>,
    ) -> Self {
        let started = Instant::now();
        let catalog = Catalog::new(movies);
        let store = RatingStore::from_ratings(ratings);
        let state = EngineState::build(store, strategy.as_ref());
        info!(
            users = state.ratings.user_count(),
            movies = state.ratings.movie_count(),
            ratings = state.store.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommendation model built"
        );
        Self {
            catalog,
            strategy,
            state: RwLock::new(state),
        }
    }

    /// Movies most similar to `movie_id`, best first, at most `limit`
    /// rows. The queried movie itself is never part of the result.
    pub fn similar_movies(
        &self,
        movie_id: MovieId,
        limit: usize,
    ) -> CineResult<Vec<Recommendation>> {
        let state = self.state.read();
        let row = state
            .similarity
            .row(movie_id)
            .ok_or(CineError::MovieNotFound(movie_id))?;
        // A zero diagonal marks a column with no rating signal. Ranking
        // a row of zeros would be noise, so report it instead.
        if state.similarity.similarity(movie_id, movie_id) == Some(0.0) {
            return Err(CineError::InsufficientSignal(movie_id));
        }

        let mut ranked: Vec<(MovieId, f64)> = state
            .similarity
            .movies()
            .iter()
            .zip(row.iter())
            .filter(|(id, _)| **id != movie_id)
            .map(|(id, value)| (*id, *value))
            .collect();
        rank(&mut ranked);
        ranked.truncate(limit);
        Ok(self.catalog.join(&ranked))
    }

    /// Ranked recommendations for one user, excluding everything they
    /// have already rated. Ratings at or above `min_rating` seed the
    /// query; when none qualify, the user's top rated movies do.
    pub fn recommend_for_user(
        &self,
        user_id: UserId,
        limit: usize,
        min_rating: f64,
    ) -> CineResult<Vec<Recommendation>> {
        let state = self.state.read();
        let row = state
            .ratings
            .user_row(user_id)
            .ok_or(CineError::UserNotFound(user_id))?;

        let rated: Vec<(MovieId, f64)> = state
            .ratings
            .movies()
            .iter()
            .zip(row.iter())
            .filter(|(_, value)| **value != 0.0)
            .map(|(id, value)| (*id, *value))
            .collect();
        if rated.is_empty() {
            return Err(CineError::InsufficientRatings(user_id));
        }

        let mut seeds: Vec<(MovieId, f64)> = rated
            .iter()
            .copied()
            .filter(|(_, value)| *value >= min_rating)
            .collect();
        if seeds.is_empty() {
            // Cold threshold: fall back to the user's strongest ratings.
            seeds = rated.clone();
            rank(&mut seeds);
            seeds.truncate(FALLBACK_SEED_COUNT);
        }

        let mut scores = Array1::<f64>::zeros(state.similarity.len());
        for (movie_id, value) in &seeds {
            if let Some(similarities) = state.similarity.row(*movie_id) {
                scores.scaled_add(*value, &similarities);
            }
        }
        // Never recommend what the user has already rated.
        for (movie_id, _) in &rated {
            if let Some(position) = state.similarity.position(*movie_id) {
                scores[position] = 0.0;
            }
        }

        let mut ranked: Vec<(MovieId, f64)> = state
            .similarity
            .movies()
            .iter()
            .zip(scores.iter())
            .filter(|(_, score)| **score > 0.0)
            .map(|(id, score)| (*id, *score))
            .collect();
        rank(&mut ranked);
        ranked.truncate(limit);
        Ok(self.catalog.join(&ranked))
    }

    /// Validate and record one rating, then rebuild both matrices before
    /// returning. The write lock spans mutation and rebuild, so readers
    /// never observe a store that is ahead of its matrices.
    pub fn upsert_rating(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        value: f64,
    ) -> CineResult<()> {
        validate_rating_value(value)?;

        let started = Instant::now();
        let mut state = self.state.write();
        state.store.upsert(Rating {
            user_id,
            movie_id,
            value,
            rated_at: Utc::now(),
        });
        state.ratings = RatingMatrix::build(&state.store);
        state.similarity = self.strategy.compute(&state.ratings);
        debug!(
            user_id,
            movie_id,
            value,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rating stored and matrices rebuilt"
        );
        Ok(())
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.read();
        EngineStats {
            users: state.ratings.user_count(),
            movies: state.ratings.movie_count(),
            ratings: state.store.len(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Reject values outside the half-step star scale before any state
/// changes. NaN and infinities are rejected explicitly so they can
/// never poison the matrices.
pub fn validate_rating_value(value: f64) -> CineResult<()> {
    if !value.is_finite() {
        return Err(CineError::InvalidRating {
            value,
            reason: "value must be a finite number".to_string(),
        });
    }
    if !(MIN_RATING_VALUE..=MAX_RATING_VALUE).contains(&value) {
        return Err(CineError::InvalidRating {
            value,
            reason: format!("value must be between {MIN_RATING_VALUE} and {MAX_RATING_VALUE}"),
        });
    }
    Ok(())
}

/// Descending score with ascending movie id breaking exact ties, so
/// equal scores always order the same way.
fn rank(entries: &mut [(MovieId, f64)]) {
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const EPS: f64 = 1e-9;

    fn movie(movie_id: MovieId, title: &str) -> Movie {
        Movie {
            movie_id,
            title: title.to_string(),
            genres: vec!["Drama".to_string()],
        }
    }

    fn obs(user_id: UserId, movie_id: MovieId, value: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            value,
            rated_at: Utc::now(),
        }
    }

    /// user 1: movie 1 -> 5, movie 2 -> 1; user 2: movie 1 -> 4, movie 3 -> 5.
    fn small_engine() -> Recommender {
        Recommender::new(
            vec![movie(1, "Alpha"), movie(2, "Beta"), movie(3, "Gamma")],
            vec![
                obs(1, 1, 5.0),
                obs(1, 2, 1.0),
                obs(2, 1, 4.0),
                obs(2, 3, 5.0),
            ],
        )
    }

    #[test]
    fn test_similar_movies_ranked_by_cosine() {
        let engine = small_engine();
        let rows = engine.similar_movies(1, 5).unwrap();
        let root_41 = 41.0_f64.sqrt();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].movie_id, 2);
        assert!((rows[0].score - 5.0 / root_41).abs() < EPS);
        assert_eq!(rows[1].movie_id, 3);
        assert!((rows[1].score - 20.0 / (5.0 * root_41)).abs() < EPS);
    }

    #[test]
    fn test_similar_movies_limit_and_self_exclusion() {
        let engine = small_engine();
        let rows = engine.similar_movies(1, 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movie_id, 2);
        assert!(rows.iter().all(|r| r.movie_id != 1));
    }

    #[test]
    fn test_unknown_movie_is_not_found() {
        let engine = small_engine();
        match engine.similar_movies(999, 5) {
            Err(CineError::MovieNotFound(999)) => {}
            other => panic!("expected MovieNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let engine = small_engine();
        match engine.recommend_for_user(999, 5, 4.0) {
            Err(CineError::UserNotFound(999)) => {}
            other => panic!("expected UserNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendations_exclude_rated_movies() {
        let engine = small_engine();
        // User 1 rated movies 1 and 2; only movie 3 can come back.
        let rows = engine.recommend_for_user(1, 5, 4.0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movie_id, 3);
        // Score is the liked rating times the similarity row entry.
        let expected = 5.0 * (20.0 / (5.0 * 41.0_f64.sqrt()));
        assert!((rows[0].score - expected).abs() < EPS);
    }

    #[test]
    fn test_fallback_seeds_when_nothing_reaches_threshold() {
        let engine = Recommender::new(
            vec![movie(3, "A"), movie(7, "B"), movie(9, "C")],
            vec![
                obs(1, 3, 3.5),
                obs(1, 7, 3.0),
                obs(2, 3, 5.0),
                obs(2, 9, 4.5),
                obs(3, 7, 4.0),
                obs(3, 9, 3.0),
            ],
        );
        // User 1 has no rating at 4.0 or above; their top rated movies
        // seed the query instead of failing.
        let rows = engine.recommend_for_user(1, 5, 4.0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movie_id, 9);
        assert!(rows[0].score > 0.0);
    }

    #[test]
    fn test_user_with_no_usable_ratings_is_insufficient() {
        // A zero-valued observation fed at build time leaves the user in
        // the matrix with nothing usable in their row.
        let engine = Recommender::new(
            vec![movie(1, "Alpha")],
            vec![obs(1, 1, 4.0), obs(9, 1, 0.0)],
        );
        match engine.recommend_for_user(9, 5, 4.0) {
            Err(CineError::InsufficientRatings(9)) => {}
            other => panic!("expected InsufficientRatings, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_movie_reports_insufficient_signal() {
        let engine = Recommender::new(
            vec![movie(1, "Alpha"), movie(99, "Ghost")],
            vec![obs(1, 1, 4.0), obs(1, 99, 0.0)],
        );
        match engine.similar_movies(99, 5) {
            Err(CineError::InsufficientSignal(99)) => {}
            other => panic!("expected InsufficientSignal, got {other:?}"),
        }
    }

    #[test]
    fn test_all_zero_scores_return_empty_not_error() {
        // User 3 only rated movie 40, which shares no raters with the
        // rest of the catalog, so every candidate accumulates 0.
        let engine = Recommender::new(
            vec![movie(10, "A"), movie(20, "B"), movie(40, "Loner")],
            vec![
                obs(1, 10, 5.0),
                obs(1, 20, 4.0),
                obs(2, 10, 4.0),
                obs(2, 20, 3.0),
                obs(3, 40, 5.0),
            ],
        );
        let rows = engine.recommend_for_user(3, 5, 4.0).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_equal_scores_tie_break_by_ascending_id() {
        // Movies 10 and 20 have identical rating columns, so their
        // similarity to movie 30 is bit-identical.
        let engine = Recommender::new(
            vec![movie(10, "A"), movie(20, "B"), movie(30, "C")],
            vec![
                obs(1, 10, 1.0),
                obs(1, 20, 1.0),
                obs(1, 30, 2.0),
                obs(2, 10, 2.0),
                obs(2, 20, 2.0),
                obs(2, 30, 1.0),
            ],
        );
        let rows = engine.similar_movies(30, 5).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].movie_id, 10);
        assert_eq!(rows[1].movie_id, 20);
        assert_eq!(rows[0].score, rows[1].score);
    }

    #[test]
    fn test_upsert_rejects_invalid_values() {
        let engine = small_engine();
        let before = engine.stats().ratings;
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, 0.4, 5.5] {
            match engine.upsert_rating(1, 1, value) {
                Err(CineError::InvalidRating { .. }) => {}
                other => panic!("expected InvalidRating for {value}, got {other:?}"),
            }
        }
        // Rejected writes never touch the store.
        assert_eq!(engine.stats().ratings, before);
    }

    #[test]
    fn test_upsert_is_visible_to_queries() {
        let engine = small_engine();
        assert!(matches!(
            engine.recommend_for_user(7, 5, 4.0),
            Err(CineError::UserNotFound(7))
        ));

        engine.upsert_rating(7, 1, 4.5).unwrap();
        let rows = engine.recommend_for_user(7, 5, 4.0).unwrap();
        assert!(rows.iter().all(|r| r.movie_id != 1));
        assert!(!rows.is_empty());
    }

    #[test]
    fn test_upsert_replaces_existing_rating() {
        let engine = small_engine();
        let before = engine.stats().ratings;
        engine.upsert_rating(1, 2, 5.0).unwrap();
        assert_eq!(engine.stats().ratings, before);

        // Movie 2 now seeds user 1's query, so movie 3 still returns but
        // through two seeds instead of one.
        let rows = engine.recommend_for_user(1, 5, 4.0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movie_id, 3);
    }

    #[test]
    fn test_empty_engine_has_no_answers() {
        let engine = Recommender::new(vec![], vec![]);
        let stats = engine.stats();
        assert_eq!(stats.users, 0);
        assert_eq!(stats.movies, 0);
        assert_eq!(stats.ratings, 0);
        assert!(matches!(
            engine.similar_movies(1, 5),
            Err(CineError::MovieNotFound(1))
        ));
        assert!(matches!(
            engine.recommend_for_user(1, 5, 4.0),
            Err(CineError::UserNotFound(1))
        ));
    }

    #[test]
    fn test_validate_rating_value_bounds() {
        assert!(validate_rating_value(0.5).is_ok());
        assert!(validate_rating_value(5.0).is_ok());
        assert!(validate_rating_value(3.7).is_ok());
        assert!(validate_rating_value(0.49).is_err());
        assert!(validate_rating_value(5.01).is_err());
        assert!(validate_rating_value(f64::NAN).is_err());
    }
}
