use crate::dataset::{Dataset, MOCK_RATING_COUNT};
use crate::loader;
use cinerec_core::{CineRecError, LogConfig, LogFormat};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Recommendation service configuration
///
/// Layered as defaults < `config/cinerec.{toml,yaml,json}` < `CINEREC__*`
/// environment variables (e.g. `CINEREC__SERVER__PORT=9000`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (default: 8090)
    pub port: u16,

    /// Worker threads (default: actix picks the CPU count)
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// List length when the caller does not ask for one (default: 5)
    pub default_top_n: usize,

    /// Upper bound on requested list length (default: 50)
    pub max_top_n: usize,

    /// Seed for the random affinity estimator; unset means fresh entropy
    pub affinity_seed: Option<u64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_top_n: 50,
            affinity_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Seed for mock rating generation; unset means fresh entropy
    pub seed: Option<u64>,

    /// Number of generated ratings (default: 500)
    pub rating_count: usize,

    /// MovieLens `movies.csv`; set together with `ratings_path` to replace the
    /// built-in data
    pub movies_path: Option<String>,

    pub ratings_path: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rating_count: MOCK_RATING_COUNT,
            movies_path: None,
            ratings_path: None,
        }
    }
}

impl DatasetConfig {
    /// Load the CSV pair if configured, otherwise build the mock dataset
    pub fn build(&self) -> cinerec_core::Result<Dataset> {
        match (&self.movies_path, &self.ratings_path) {
            (Some(movies), Some(ratings)) => {
                info!(movies = %movies, ratings = %ratings, "Loading dataset from CSV");
                loader::load_dataset(movies, ratings)
            }
            _ => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                info!(
                    rating_count = self.rating_count,
                    seeded = self.seed.is_some(),
                    "Generating built-in mock dataset"
                );
                Ok(Dataset::builtin_with_ratings(self.rating_count, &mut rng))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self, service_name: &str) -> LogConfig {
        LogConfig {
            level: self.level.clone(),
            format: self.format,
            service_name: service_name.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/cinerec").required(false))
            .add_source(
                config::Environment::with_prefix("CINEREC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CineRecError> {
        if self.server.port == 0 {
            return Err(config_error("port must be greater than 0", "server.port"));
        }

        if self.server.workers == Some(0) {
            return Err(config_error("workers must be greater than 0", "server.workers"));
        }

        if self.scoring.max_top_n == 0 {
            return Err(config_error(
                "max_top_n must be greater than 0",
                "scoring.max_top_n",
            ));
        }

        if self.scoring.default_top_n > self.scoring.max_top_n {
            return Err(config_error(
                format!(
                    "default_top_n ({}) cannot exceed max_top_n ({})",
                    self.scoring.default_top_n, self.scoring.max_top_n
                ),
                "scoring.default_top_n",
            ));
        }

        if self.dataset.movies_path.is_some() != self.dataset.ratings_path.is_some() {
            return Err(config_error(
                "movies_path and ratings_path must be set together",
                "dataset.movies_path",
            ));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>, key: &str) -> CineRecError {
    CineRecError::ConfigurationError {
        message: message.into(),
        key: Some(key.to_string()),
    }
}
