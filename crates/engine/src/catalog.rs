//! Read-only movie metadata joined into ranked query results.

use std::collections::BTreeMap;

use cinematch_core::types::{Movie, MovieId, Recommendation};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: BTreeMap<MovieId, Movie>,
}

impl Catalog {
    pub fn new(movies: impl IntoIterator<Item = Movie>) -> Self {
        let movies = movies.into_iter().map(|m| (m.movie_id, m)).collect();
        Self { movies }
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&Movie> {
        self.movies.get(&movie_id)
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.movies.contains_key(&movie_id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Highest id in the catalog. Demo registries allocate above this so
    /// fabricated ids can never shadow a real movie.
    pub fn max_movie_id(&self) -> Option<MovieId> {
        self.movies.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Join ranked (movie, score) pairs with metadata, preserving order.
    /// Pairs whose id has no catalog entry are dropped.
    pub fn join(&self, ranked: &[(MovieId, f64)]) -> Vec<Recommendation> {
        ranked
            .iter()
            .filter_map(|&(movie_id, score)| {
                self.get(movie_id).map(|movie| Recommendation {
                    movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score,
                })
            })
            .collect()
    }
}
