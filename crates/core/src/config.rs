use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Root configuration. Loaded from an optional TOML file and environment
/// variables with the prefix `CAMPAIGN_INSIGHTS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub experiments: ExperimentConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Metric scores below this trigger a targeted recommendation.
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: u8,
    /// Overall scores at or above this add the scale-up recommendation.
    #[serde(default = "default_scale_up_threshold")]
    pub scale_up_threshold: u32,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Per-variant visitor floor below which no significance is computed.
    #[serde(default = "default_min_visitors")]
    pub min_visitors: u64,
    /// Deployment-wide; defaults to the fixed 95 % level.
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
    #[serde(default = "default_p_value_floor")]
    pub p_value_floor: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_date_range")]
    pub default_date_range: String,
    /// How many campaigns the breakdown sections list.
    #[serde(default = "default_top_campaigns")]
    pub top_campaigns: usize,
}

// Default functions
fn default_recommendation_threshold() -> u8 {
    60
}
fn default_scale_up_threshold() -> u32 {
    80
}
fn default_max_recommendations() -> usize {
    4
}
fn default_min_visitors() -> u64 {
    100
}
fn default_significance_level() -> f64 {
    0.05
}
fn default_p_value_floor() -> f64 {
    0.001
}
fn default_date_range() -> String {
    "7d".to_string()
}
fn default_top_campaigns() -> usize {
    5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recommendation_threshold: default_recommendation_threshold(),
            scale_up_threshold: default_scale_up_threshold(),
            max_recommendations: default_max_recommendations(),
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_visitors: default_min_visitors(),
            significance_level: default_significance_level(),
            p_value_floor: default_p_value_floor(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_date_range: default_date_range(),
            top_campaigns: default_top_campaigns(),
        }
    }
}

impl InsightsConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an optional TOML file, overlaid with
    /// environment variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
