//! MovieLens-format CSV parsing.
//!
//! Expects the standard export layout: `ratings.csv` with
//! `userId,movieId,rating,timestamp` and `movies.csv` with
//! `movieId,title,genres`, genres pipe-separated.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use cinematch_core::config::DataConfig;
use cinematch_core::error::{CineError, CineResult};
use cinematch_core::types::{Movie, Rating};
use serde::Deserialize;
use tracing::{info, warn};

/// Everything the engine needs at startup.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub movies: Vec<Movie>,
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: u32,
    #[serde(rename = "movieId")]
    movie_id: u32,
    rating: f64,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: u32,
    title: String,
    genres: String,
}

impl Dataset {
    /// Load both CSV files from the configured directory.
    pub fn load(config: &DataConfig) -> CineResult<Self> {
        let dir = Path::new(&config.dir);
        let movies = load_movies(&dir.join(&config.movies_file))?;
        let ratings = load_ratings(&dir.join(&config.ratings_file))?;
        info!(
            dir = %dir.display(),
            movies = movies.len(),
            ratings = ratings.len(),
            "Dataset loaded"
        );
        Ok(Self { movies, ratings })
    }

    /// Load from disk, falling back to the built-in sample so the
    /// service can always start.
    pub fn load_or_sample(config: &DataConfig) -> Self {
        match Self::load(config) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(
                    error = %e,
                    dir = %config.dir,
                    "Dataset not available, using built-in sample"
                );
                crate::sample::sample()
            }
        }
    }
}

pub fn load_movies(path: &Path) -> CineResult<Vec<Movie>> {
    let file = File::open(path)
        .map_err(|e| CineError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    read_movies(file)
}

pub fn load_ratings(path: &Path) -> CineResult<Vec<Rating>> {
    let file = File::open(path)
        .map_err(|e| CineError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    read_ratings(file)
}

/// Parse movie rows from any reader. Split from the file path so tests
/// can feed bytes directly.
pub fn read_movies(reader: impl Read) -> CineResult<Vec<Movie>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut movies = Vec::new();
    for (index, result) in csv_reader.deserialize::<MovieRow>().enumerate() {
        let row =
            result.map_err(|e| CineError::Dataset(format!("movies row {}: {e}", index + 2)))?;
        movies.push(Movie {
            movie_id: row.movie_id,
            title: row.title,
            genres: parse_genres(&row.genres),
        });
    }
    Ok(movies)
}

/// Parse rating rows from any reader.
pub fn read_ratings(reader: impl Read) -> CineResult<Vec<Rating>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ratings = Vec::new();
    for (index, result) in csv_reader.deserialize::<RatingRow>().enumerate() {
        let row =
            result.map_err(|e| CineError::Dataset(format!("ratings row {}: {e}", index + 2)))?;
        ratings.push(Rating {
            user_id: row.user_id,
            movie_id: row.movie_id,
            value: row.rating,
            rated_at: DateTime::from_timestamp(row.timestamp, 0).unwrap_or_default(),
        });
    }
    Ok(ratings)
}

/// Split the pipe-separated genre list. The MovieLens placeholder for
/// unclassified movies becomes an empty list.
fn parse_genres(raw: &str) -> Vec<String> {
    if raw.is_empty() || raw == "(no genres listed)" {
        return Vec::new();
    }
    raw.split('|')
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect()
}
