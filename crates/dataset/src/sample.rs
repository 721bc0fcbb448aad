//! Built-in miniature dataset used when no data directory is present,
//! so a fresh checkout can serve real-looking responses immediately.

use chrono::DateTime;
use cinematch_core::types::{Movie, Rating};

use crate::loader::Dataset;

/// (movie_id, title, pipe-separated genres)
const MOVIES: &[(u32, &str, &str)] = &[
    (1, "Midnight Circuit (2019)", "Action|Thriller"),
    (2, "The Glass Orchard (2017)", "Drama|Romance"),
    (3, "Starlight Protocol (2021)", "Sci-Fi|Action"),
    (4, "A Winter Apart (2016)", "Drama|War"),
    (5, "The Last Lighthouse (2018)", "Mystery|Thriller"),
    (6, "Paper Planets (2020)", "Animation|Children"),
    (7, "Crimson Harvest (2015)", "Horror|Thriller"),
    (8, "Dancing on Wires (2022)", "Comedy|Romance"),
    (9, "Quantum Alibi (2023)", "Sci-Fi|Mystery"),
    (10, "The Cartographer's Daughter (2014)", "Adventure|Drama"),
    (11, "Neon Tide (2021)", "Action|Crime"),
    (12, "Small Hours (2019)", "Documentary"),
];

/// (user_id, movie_id, rating value). Users cluster by taste so the
/// similarity table has visible structure out of the box. User 7 rates
/// everything below 4.0 and exercises the fallback seed path.
const RATINGS: &[(u32, u32, f64)] = &[
    (1, 1, 5.0),
    (1, 3, 4.5),
    (1, 11, 4.5),
    (1, 5, 3.5),
    (1, 2, 2.0),
    (2, 1, 4.5),
    (2, 3, 5.0),
    (2, 9, 4.5),
    (2, 11, 4.0),
    (2, 6, 2.5),
    (3, 2, 5.0),
    (3, 4, 4.5),
    (3, 10, 4.0),
    (3, 8, 3.5),
    (3, 1, 2.0),
    (4, 2, 4.5),
    (4, 8, 4.5),
    (4, 10, 4.5),
    (4, 4, 4.0),
    (4, 12, 3.0),
    (5, 7, 5.0),
    (5, 5, 4.5),
    (5, 1, 3.5),
    (5, 9, 3.0),
    (6, 6, 5.0),
    (6, 8, 4.0),
    (6, 2, 3.5),
    (6, 12, 4.5),
    (7, 1, 3.0),
    (7, 2, 3.0),
    (7, 7, 2.5),
    (7, 12, 3.5),
    (7, 9, 2.0),
    (8, 3, 4.5),
    (8, 9, 5.0),
    (8, 1, 4.0),
    (8, 6, 3.0),
];

const BASE_TIMESTAMP: i64 = 1_700_000_000;

pub fn sample() -> Dataset {
    let movies = MOVIES
        .iter()
        .map(|&(movie_id, title, genres)| Movie {
            movie_id,
            title: title.to_string(),
            genres: genres.split('|').map(str::to_string).collect(),
        })
        .collect();
    let ratings = RATINGS
        .iter()
        .enumerate()
        .map(|(index, &(user_id, movie_id, value))| Rating {
            user_id,
            movie_id,
            value,
            rated_at: DateTime::from_timestamp(BASE_TIMESTAMP + index as i64 * 60, 0)
                .unwrap_or_default(),
        })
        .collect();
    Dataset { movies, ratings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_well_formed() {
        let dataset = sample();
        assert_eq!(dataset.movies.len(), 12);
        assert_eq!(dataset.ratings.len(), 37);
        for rating in &dataset.ratings {
            assert!((0.5..=5.0).contains(&rating.value));
            assert!(dataset
                .movies
                .iter()
                .any(|m| m.movie_id == rating.movie_id));
        }
    }

    #[test]
    fn test_sample_has_a_cold_threshold_user() {
        // User 7 never rates at 4.0 or above.
        let dataset = sample();
        let user_7_max = dataset
            .ratings
            .iter()
            .filter(|r| r.user_id == 7)
            .map(|r| r.value)
            .fold(0.0, f64::max);
        assert!(user_7_max > 0.0);
        assert!(user_7_max < 4.0);
    }
}
