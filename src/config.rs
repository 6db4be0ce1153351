/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: resume-ranker.toml (in working directory)
/// 3. Environment variables: prefixed RANKER_, nested keys split on `__`
///    (e.g., RANKER_SCORING__EMBEDDING_WEIGHT=0.6)

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use crate::errors::RankerError;
use crate::scoring::weights::WeightTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Which embedding backend to initialise, and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "local" (fastembed, default) or "openai"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Directory where fastembed caches model weights
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,
}

/// Blend weights between the semantic and lexical halves of the
/// `skills_match` and `education_match` categories, plus the category
/// weight table used by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_blend_weight")]
    pub embedding_weight: f64,

    #[serde(default = "default_blend_weight")]
    pub fuzzy_weight: f64,

    #[serde(default)]
    pub weights: WeightTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Directory holding one `<job>_ranked_resumes.json` per job
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Upper bound on candidates scored concurrently within one job
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_embedding_provider() -> String {
    "local".to_string()
}

fn default_cache_dir() -> String {
    dirs::cache_dir()
        .map(|d| d.join("resume-ranker").join("fastembed"))
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| ".fastembed_cache".to_string())
}

fn default_openai_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_blend_weight() -> f64 {
    0.5
}

fn default_output_dir() -> String {
    "data/rankings".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            provider: default_embedding_provider(),
            cache_dir: default_cache_dir(),
            openai_api_key: None,
            openai_model: default_openai_model(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            embedding_weight: default_blend_weight(),
            fuzzy_weight: default_blend_weight(),
            weights: WeightTable::default(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            output_dir: default_output_dir(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            embedding: EmbeddingConfig::default(),
            scoring: ScoringConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Reject negative or non-finite weights before any scoring happens.
    pub fn validate(&self) -> Result<(), RankerError> {
        for (name, value) in [
            ("scoring.embedding_weight", self.embedding_weight),
            ("scoring.fuzzy_weight", self.fuzzy_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RankerError::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        self.weights.validate()
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: RANKER_LOG_LEVEL=debug overrides log_level in resume-ranker.toml
    pub fn load() -> Result<Config, RankerError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("resume-ranker.toml"))
            .merge(Env::prefixed("RANKER_").split("__"))
            .extract()
            .map_err(|e| RankerError::Config(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RankerError> {
        self.scoring.validate()?;
        if self.ranking.max_concurrency == 0 {
            return Err(RankerError::Config(
                "ranking.max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
