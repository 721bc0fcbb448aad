//! Recs Admin CLI — inspect a ratings dataset and query the recommendation
//! model offline, without starting the HTTP service.

use cinematch_core::config::DataConfig;
use cinematch_core::types::{Movie, MovieId, Recommendation, UserId};
use cinematch_dataset::{sample, Dataset};
use cinematch_engine::Recommender;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recs-admin")]
#[command(about = "CineMatch model inspection and offline query tool")]
#[command(version)]
struct Cli {
    /// Directory holding the ratings and movies CSV files
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Use the built-in sample dataset instead of reading from disk
    #[arg(long, global = true, default_value_t = false)]
    sample_data: bool,

    /// Emit JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show model dimensions and a catalog preview
    Inspect,

    /// List catalog movies, optionally filtered by a title substring
    Movies {
        /// Case-insensitive substring matched against titles
        #[arg(short, long)]
        filter: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the movies most similar to one movie
    Similar {
        /// Movie id to query
        #[arg(long)]
        movie_id: MovieId,

        /// Maximum rows to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show ranked recommendations for one user
    Recommend {
        /// User id to query
        #[arg(long)]
        user_id: UserId,

        /// Maximum rows to print
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Liked threshold for recommendation seeds
        #[arg(long, default_value = "4.0")]
        min_rating: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let dataset = load_dataset(cli.data_dir, cli.sample_data);
    let engine = Recommender::new(dataset.movies, dataset.ratings);

    match cli.command {
        Commands::Inspect => cmd_inspect(&engine, cli.json),
        Commands::Movies { filter, limit } => cmd_movies(&engine, filter, limit, cli.json),
        Commands::Similar { movie_id, limit } => cmd_similar(&engine, movie_id, limit, cli.json),
        Commands::Recommend {
            user_id,
            limit,
            min_rating,
        } => cmd_recommend(&engine, user_id, limit, min_rating, cli.json),
    }
}

fn load_dataset(data_dir: Option<String>, sample_data: bool) -> Dataset {
    if sample_data {
        return sample::sample();
    }

    let mut config = DataConfig::default();
    if let Some(dir) = data_dir {
        config.dir = dir;
    }

    match Dataset::load(&config) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Failed to load dataset from '{}': {e}", config.dir);
            eprintln!("Pass --data-dir, or --sample-data for the built-in dataset.");
            std::process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_inspect(engine: &Recommender, json: bool) {
    let stats = engine.stats();

    if json {
        print_json(&stats);
        return;
    }

    println!("=== CineMatch Model ===");
    println!();
    println!("  Users:    {}", stats.users);
    println!("  Movies:   {}", stats.movies);
    println!("  Ratings:  {}", stats.ratings);
    println!("  Catalog:  {} titles", engine.catalog().len());

    println!();
    println!("  Catalog preview:");
    print_movie_header();
    for movie in engine.catalog().iter().take(10) {
        print_movie_row(movie);
    }
}

fn cmd_movies(engine: &Recommender, filter: Option<String>, limit: usize, json: bool) {
    let needle = filter.map(|f| f.to_lowercase());
    let rows: Vec<&Movie> = engine
        .catalog()
        .iter()
        .filter(|m| match &needle {
            Some(needle) => m.title.to_lowercase().contains(needle),
            None => true,
        })
        .take(limit)
        .collect();

    if json {
        print_json(&rows);
        return;
    }

    print_movie_header();
    for movie in &rows {
        print_movie_row(movie);
    }
    println!();
    println!("  {} movies shown", rows.len());
}

fn cmd_similar(engine: &Recommender, movie_id: MovieId, limit: usize, json: bool) {
    let source = engine
        .catalog()
        .get(movie_id)
        .map(|m| m.title.clone())
        .unwrap_or_else(|| format!("movie {movie_id}"));

    let rows = match engine.similar_movies(movie_id, limit) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&rows);
        return;
    }

    println!("=== Movies similar to {source} ===");
    println!();
    print_scored_rows(&rows, "No movie shares a rater with this one.");
}

fn cmd_recommend(
    engine: &Recommender,
    user_id: UserId,
    limit: usize,
    min_rating: f64,
    json: bool,
) {
    let rows = match engine.recommend_for_user(user_id, limit, min_rating) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&rows);
        return;
    }

    println!("=== Recommendations for user {user_id} ===");
    println!();
    print_scored_rows(&rows, "No unseen movie scored above zero for this user.");
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn print_json<T: serde::Serialize>(value: &T) {
    let rendered = serde_json::to_string_pretty(value).expect("Failed to serialize output");
    println!("{rendered}");
}

fn print_movie_header() {
    println!("  {:<8} {:<44} Genres", "ID", "Title");
    println!("  {}", "-".repeat(80));
}

fn print_movie_row(movie: &Movie) {
    println!(
        "  {:<8} {:<44} {}",
        movie.movie_id,
        truncate(&movie.title, 42),
        movie.genres.join(", "),
    );
}

fn print_scored_rows(rows: &[Recommendation], empty_note: &str) {
    if rows.is_empty() {
        println!("  {empty_note}");
        return;
    }

    println!("  {:<8} {:<44} {:>8}  Genres", "ID", "Title", "Score");
    println!("  {}", "-".repeat(90));
    for rec in rows {
        println!(
            "  {:<8} {:<44} {:>8.4}  {}",
            rec.movie_id,
            truncate(&rec.title, 42),
            rec.score,
            rec.genres.join(", "),
        );
    }
    println!();
    println!("  {} rows", rows.len());
}

fn truncate(s: &str, max: usize) -> String {
    if max < 3 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count > max {
        let truncated: String = s.chars().take(max - 2).collect();
        format!("{truncated}..")
    } else {
        s.to_string()
    }
}
