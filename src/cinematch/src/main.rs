//! CineMatch — item-based collaborative-filtering movie recommendations.
//!
//! Main entry point that loads the dataset, builds the model and starts
//! the server.

use cinematch_api::{ApiServer, Registry};
use cinematch_core::config::AppConfig;
use cinematch_dataset::Dataset;
use cinematch_engine::Recommender;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cinematch")]
#[command(about = "Item-based collaborative-filtering movie recommendation service")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CINEMATCH__NODE_ID")]
    node_id: Option<String>,

    /// Directory holding the ratings and movies CSV files (overrides config)
    #[arg(long, env = "CINEMATCH__DATA__DIR")]
    data_dir: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CINEMATCH__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Liked threshold for recommendation seeds (overrides config)
    #[arg(long, env = "CINEMATCH__ENGINE__MIN_RATING")]
    min_rating: Option<f64>,

    /// Serve the built-in sample dataset without reading from disk
    #[arg(long, default_value_t = false)]
    sample_data: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("CineMatch starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(min_rating) = cli.min_rating {
        config.engine.min_rating = min_rating;
    }

    info!(
        node_id = %config.node_id,
        data_dir = %config.data.dir,
        http_port = config.api.http_port,
        min_rating = config.engine.min_rating,
        "Configuration loaded"
    );

    // Load ratings and movies, then build the model
    let dataset = if cli.sample_data {
        info!("Running with the built-in sample dataset");
        cinematch_dataset::sample::sample()
    } else {
        Dataset::load_or_sample(&config.data)
    };

    let next_user_id = dataset
        .ratings
        .iter()
        .map(|r| r.user_id)
        .max()
        .unwrap_or(0)
        + 1;

    let engine = Arc::new(Recommender::new(dataset.movies, dataset.ratings));

    // Registry ids start above everything the dataset brought in
    let next_movie_id = engine.catalog().max_movie_id().unwrap_or(0) + 1;
    let registry = Arc::new(Registry::new(next_user_id, next_movie_id));

    let api_server = ApiServer::new(config.clone(), engine, registry);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("CineMatch is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
