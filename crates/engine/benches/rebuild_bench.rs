//! Benchmarks for matrix rebuild and query latency.
//! Run with: cargo bench

#![allow(unused)]

use chrono::Utc;
use cinematch_core::types::{Movie, Rating};
use cinematch_engine::Recommender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const USERS: u32 = 200;
const MOVIES: u32 = 400;
const RATINGS: usize = 8_000;

fn synthetic_catalog() -> Vec<Movie> {
    (1..=MOVIES)
        .map(|movie_id| Movie {
            movie_id,
            title: format!("Movie {movie_id:04}"),
            genres: vec!["Drama".to_string()],
        })
        .collect()
}

fn synthetic_ratings(rng: &mut StdRng) -> Vec<Rating> {
    (0..RATINGS)
        .map(|_| Rating {
            user_id: rng.gen_range(1..=USERS),
            movie_id: rng.gen_range(1..=MOVIES),
            // Half-step values between 0.5 and 5.0.
            value: (rng.gen_range(1..=10) as f64) * 0.5,
            rated_at: Utc::now(),
        })
        .collect()
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let engine = Recommender::new(synthetic_catalog(), synthetic_ratings(&mut rng));

    // Warmup
    for _ in 0..5 {
        engine.upsert_rating(1, 1, 4.0).unwrap();
        engine.similar_movies(1, 10).unwrap();
    }

    // Write path: every upsert pays for a full rebuild of both matrices.
    let write_iterations = 50u32;
    let start = std::time::Instant::now();
    for i in 0..write_iterations {
        let user_id = 1 + (i % USERS);
        let movie_id = 1 + (i % MOVIES);
        engine.upsert_rating(user_id, movie_id, 4.5).unwrap();
    }
    let write_elapsed = start.elapsed();

    // Read path: similarity lookups against the published state.
    let read_iterations = 10_000u32;
    let start = std::time::Instant::now();
    for i in 0..read_iterations {
        let movie_id = 1 + (i % MOVIES);
        let _ = engine.similar_movies(movie_id, 10);
    }
    let similar_elapsed = start.elapsed();

    // Read path: per-user recommendations, seeds plus accumulation.
    let start = std::time::Instant::now();
    for i in 0..read_iterations {
        let user_id = 1 + (i % USERS);
        let _ = engine.recommend_for_user(user_id, 10, 4.0);
    }
    let recommend_elapsed = start.elapsed();

    println!("=== Rebuild Benchmark ===");
    println!("Matrix:          {} users x {} movies", USERS, MOVIES);
    println!("Writes:          {}", write_iterations);
    println!("Write total:     {:?}", write_elapsed);
    println!("Per rebuild:     {:?}", write_elapsed / write_iterations);
    println!("Reads:           {} per query path", read_iterations);
    println!("Per similar:     {:?}", similar_elapsed / read_iterations);
    println!("Per recommend:   {:?}", recommend_elapsed / read_iterations);
    println!(
        "Similar rate:    {:.0} queries/sec",
        read_iterations as f64 / similar_elapsed.as_secs_f64()
    );
    println!(
        "Recommend rate:  {:.0} queries/sec",
        read_iterations as f64 / recommend_elapsed.as_secs_f64()
    );
}
