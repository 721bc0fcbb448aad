//! API server — HTTP REST surface plus the Prometheus exporter.

use crate::registry::{self, Registry};
use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::routing::{get, post};
use axum::Router;
use cinematch_core::config::AppConfig;
use cinematch_engine::Recommender;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Main API server wrapping the recommender and demo registry.
pub struct ApiServer {
    config: AppConfig,
    engine: Arc<Recommender>,
    registry: Arc<Registry>,
}

impl ApiServer {
    pub fn new(config: AppConfig, engine: Arc<Recommender>, registry: Arc<Registry>) -> Self {
        Self {
            config,
            engine,
            registry,
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            engine: self.engine.clone(),
            registry: self.registry.clone(),
            limits: self.config.engine.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        let app = Router::new()
            // Service banner
            .route("/", get(rest::banner))
            // Recommendation queries
            .route("/v1/movies/:movie_id/similar", get(rest::similar_movies))
            .route(
                "/v1/users/:user_id/recommendations",
                get(rest::user_recommendations),
            )
            // Rating writes
            .route("/v1/ratings", post(rest::submit_rating))
            // Demo registry
            .route(
                "/v1/registry/users",
                get(registry::list_users).post(registry::register_user),
            )
            .route("/v1/registry/users/:user_id", get(registry::get_user))
            .route(
                "/v1/registry/movies",
                get(registry::list_movies).post(registry::register_movie),
            )
            .route("/v1/registry/movies/:movie_id", get(registry::get_movie))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .with_state(state)
            // Interactive documentation
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus scrape endpoint on its own port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
