use serde::{Deserialize, Serialize};

use crate::error::{RatingsError, Result};

/// Ratings evaluation configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RatingsConfig {
    /// Input table locations
    #[serde(default)]
    pub data: DataConfig,

    /// Similarity and prediction parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Batch evaluation behaviour
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Movie catalog CSV (movieId,title,...)
    pub movies_path: String,

    /// Training ratings CSV (userId,movieId,rating,...)
    pub training_path: String,

    /// Held-out test ratings CSV (userId,movieId,rating,...)
    pub test_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            movies_path: "movies.csv".to_string(),
            training_path: "training_ratings.csv".to_string(),
            test_path: "test_ratings.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Width of the rating scale (default: 4.5 for 0.5-5.0)
    pub similarity_scale: f64,

    /// Prediction when the similarity weights sum to zero (default: 2.5)
    pub fallback_rating: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            similarity_scale: 4.5,
            fallback_rating: 2.5,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_scale.is_finite() || self.similarity_scale <= 0.0 {
            return Err(RatingsError::DegenerateInput(format!(
                "similarity scale must be positive and finite, got {}",
                self.similarity_scale
            )));
        }
        if !self.fallback_rating.is_finite() {
            return Err(RatingsError::DegenerateInput(format!(
                "fallback rating must be finite, got {}",
                self.fallback_rating
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Run batch predictions on the rayon pool
    pub parallel: bool,

    /// Print every prediction as a JSON line
    pub print_predictions: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            print_predictions: true,
        }
    }
}

impl RatingsConfig {
    /// Load configuration from config file and environment
    ///
    /// Environment variables use the `RATINGS` prefix with `__` between
    /// sections, e.g. `RATINGS__MODEL__FALLBACK_RATING=3.0`.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/ratings").required(false))
            .add_source(
                config::Environment::with_prefix("RATINGS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
