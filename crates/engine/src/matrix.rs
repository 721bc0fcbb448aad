//! Dense user x movie rating matrix derived from the store.

use std::collections::{BTreeSet, HashMap};

use cinematch_core::types::{MovieId, Rating, UserId};
use ndarray::{Array2, ArrayView1};

use crate::store::RatingStore;

/// User x movie matrix of rating values. A cell of 0.0 means the user
/// has not rated the movie; real ratings are always at least 0.5, so
/// the sentinel cannot collide with an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    users: Vec<UserId>,
    movies: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    cells: Array2<f64>,
}

impl RatingMatrix {
    /// Build the matrix from a sequence of observations. Axes are the
    /// distinct ids present, sorted ascending. Multiple observations for
    /// one (user, movie) cell are averaged arithmetically.
    pub fn from_ratings<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> Self {
        let observations: Vec<&Rating> = ratings.into_iter().collect();

        let user_ids: BTreeSet<UserId> = observations.iter().map(|r| r.user_id).collect();
        let movie_ids: BTreeSet<MovieId> = observations.iter().map(|r| r.movie_id).collect();
        let users: Vec<UserId> = user_ids.into_iter().collect();
        let movies: Vec<MovieId> = movie_ids.into_iter().collect();

        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let movie_index: HashMap<MovieId, usize> =
            movies.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut cells = Array2::<f64>::zeros((users.len(), movies.len()));
        let mut counts = Array2::<f64>::zeros((users.len(), movies.len()));
        for rating in &observations {
            let row = user_index[&rating.user_id];
            let col = movie_index[&rating.movie_id];
            cells[[row, col]] += rating.value;
            counts[[row, col]] += 1.0;
        }
        for (cell, count) in cells.iter_mut().zip(counts.iter()) {
            if *count > 1.0 {
                *cell /= *count;
            }
        }

        Self {
            users,
            movies,
            user_index,
            movie_index,
            cells,
        }
    }

    /// Rebuild from the current store contents.
    pub fn build(store: &RatingStore) -> Self {
        Self::from_ratings(store.iter())
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() || self.movies.is_empty()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    pub fn contains_movie(&self, movie_id: MovieId) -> bool {
        self.movie_index.contains_key(&movie_id)
    }

    /// Full rating row for one user, in movie-axis order.
    pub fn user_row(&self, user_id: UserId) -> Option<ArrayView1<'_, f64>> {
        self.user_index.get(&user_id).map(|&i| self.cells.row(i))
    }

    /// Rating column for one movie, in user-axis order.
    pub fn movie_column(&self, movie_id: MovieId) -> Option<ArrayView1<'_, f64>> {
        self.movie_index.get(&movie_id).map(|&i| self.cells.column(i))
    }

    /// The stored value for one cell, or None when the pair is absent.
    pub fn rating(&self, user_id: UserId, movie_id: MovieId) -> Option<f64> {
        let row = *self.user_index.get(&user_id)?;
        let col = *self.movie_index.get(&movie_id)?;
        let value = self.cells[[row, col]];
        (value != 0.0).then_some(value)
    }

    pub(crate) fn cells(&self) -> &Array2<f64> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn obs(user_id: UserId, movie_id: MovieId, value: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            value,
            rated_at: Utc::now(),
        }
    }

    #[test]
    fn test_axes_are_sorted_ascending() {
        let ratings = vec![obs(7, 30, 1.0), obs(2, 10, 2.0), obs(5, 20, 3.0)];
        let matrix = RatingMatrix::from_ratings(&ratings);
        assert_eq!(matrix.users(), &[2, 5, 7]);
        assert_eq!(matrix.movies(), &[10, 20, 30]);
    }

    #[test]
    fn test_absent_cells_are_zero() {
        let ratings = vec![obs(1, 10, 4.0), obs(2, 20, 3.0)];
        let matrix = RatingMatrix::from_ratings(&ratings);
        assert_eq!(matrix.rating(1, 10), Some(4.0));
        assert_eq!(matrix.rating(1, 20), None);
        let row = matrix.user_row(1).unwrap();
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn test_duplicate_observations_average() {
        // Same (user, movie) pair twice: the cell holds the arithmetic mean.
        let ratings = vec![obs(1, 10, 4.0), obs(1, 10, 2.0), obs(1, 20, 5.0)];
        let matrix = RatingMatrix::from_ratings(&ratings);
        assert_eq!(matrix.rating(1, 10), Some(3.0));
        assert_eq!(matrix.rating(1, 20), Some(5.0));
    }

    #[test]
    fn test_empty_input_yields_empty_matrix() {
        let matrix = RatingMatrix::from_ratings(std::iter::empty());
        assert!(matrix.is_empty());
        assert_eq!(matrix.user_count(), 0);
        assert_eq!(matrix.movie_count(), 0);
    }

    #[test]
    fn test_build_matches_store_contents() {
        let store = RatingStore::from_ratings(vec![obs(1, 10, 4.0), obs(2, 10, 2.5)]);
        let matrix = RatingMatrix::build(&store);
        assert_eq!(matrix.user_count(), 2);
        assert_eq!(matrix.movie_count(), 1);
        let column = matrix.movie_column(10).unwrap();
        assert_eq!(column.to_vec(), vec![4.0, 2.5]);
    }
}
