//! Item-item similarity table and the strategy seam that produces it.

use std::collections::HashMap;

use cinematch_core::types::MovieId;
use ndarray::{Array2, ArrayView1};

use crate::matrix::RatingMatrix;

/// Strategy seam for deriving the item-item similarity table from the
/// current rating matrix. Implementations must be pure functions of the
/// input so rebuilds stay idempotent.
pub trait ItemSimilarity: Send + Sync {
    fn compute(&self, ratings: &RatingMatrix) -> SimilarityMatrix;
}

/// Exact batch cosine over the movie columns of the rating matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl ItemSimilarity for CosineSimilarity {
    fn compute(&self, ratings: &RatingMatrix) -> SimilarityMatrix {
        let movies = ratings.movies().to_vec();
        let n = movies.len();
        let columns = ratings.cells();

        let norms: Vec<f64> = (0..n).map(|i| vector_norm(columns.column(i))).collect();

        let mut cells = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            // A zero-norm column has no signal; its whole row stays 0,
            // the diagonal included.
            if norms[i] == 0.0 {
                continue;
            }
            cells[[i, i]] = 1.0;
            for j in (i + 1)..n {
                if norms[j] == 0.0 {
                    continue;
                }
                let dot = columns.column(i).dot(&columns.column(j));
                let value = dot / (norms[i] * norms[j]);
                cells[[i, j]] = value;
                cells[[j, i]] = value;
            }
        }

        SimilarityMatrix::new(movies, cells)
    }
}

fn vector_norm(column: ArrayView1<'_, f64>) -> f64 {
    column.dot(&column).sqrt()
}

/// Symmetric movie x movie similarity table with movie ids on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    movies: Vec<MovieId>,
    movie_index: HashMap<MovieId, usize>,
    cells: Array2<f64>,
}

impl SimilarityMatrix {
    fn new(movies: Vec<MovieId>, cells: Array2<f64>) -> Self {
        let movie_index = movies.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self {
            movies,
            movie_index,
            cells,
        }
    }

    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.movie_index.contains_key(&movie_id)
    }

    pub fn position(&self, movie_id: MovieId) -> Option<usize> {
        self.movie_index.get(&movie_id).copied()
    }

    /// Similarity row for one movie, in movie-axis order.
    pub fn row(&self, movie_id: MovieId) -> Option<ArrayView1<'_, f64>> {
        self.position(movie_id).map(|i| self.cells.row(i))
    }

    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.cells[[i, j]])
    }
}
