//! In-memory system of record for rating observations.

use std::collections::BTreeMap;

use cinematch_core::types::{MovieId, Rating, UserId};

/// Rating store keyed by (user, movie). The ordered map keeps iteration
/// deterministic, which keeps matrix axes stable across rebuilds.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: BTreeMap<(UserId, MovieId), Rating>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a batch of observations. Later entries for the
    /// same (user, movie) pair replace earlier ones.
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let mut store = Self::new();
        for rating in ratings {
            store.upsert(rating);
        }
        store
    }

    /// Insert or replace the rating for one (user, movie) pair, returning
    /// the previous observation if there was one.
    pub fn upsert(&mut self, rating: Rating) -> Option<Rating> {
        self.ratings
            .insert((rating.user_id, rating.movie_id), rating)
    }

    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<&Rating> {
        self.ratings.get(&(user_id, movie_id))
    }

    /// All observations in (user, movie) key order.
    pub fn iter(&self) -> impl Iterator<Item = &Rating> {
        self.ratings.values()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
