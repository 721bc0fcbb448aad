use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CINEMATCH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

/// Where the MovieLens-format CSV files live.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_ratings_file")]
    pub ratings_file: String,
    #[serde(default = "default_movies_file")]
    pub movies_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Rows returned when a query does not pass `limit`.
    #[serde(default = "default_result_limit")]
    pub default_limit: usize,
    /// Upper bound any query can request.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Liked threshold for per-user recommendation seeds.
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_node_id() -> String {
    "cinematch-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_data_dir() -> String {
    "data/ml-latest-small".to_string()
}
fn default_ratings_file() -> String {
    "ratings.csv".to_string()
}
fn default_movies_file() -> String {
    "movies.csv".to_string()
}
fn default_result_limit() -> usize {
    5
}
fn default_max_limit() -> usize {
    100
}
fn default_min_rating() -> f64 {
    4.0
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            ratings_file: default_ratings_file(),
            movies_file: default_movies_file(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: default_result_limit(),
            max_limit: default_max_limit(),
            min_rating: default_min_rating(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            data: DataConfig::default(),
            engine: EngineConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CINEMATCH")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
