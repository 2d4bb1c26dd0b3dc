//! Item-based collaborative filtering for Media Gateway ratings
//!
//! Predicts how a user would rate a movie they have not rated yet. Items are
//! similar when their common raters scored them alike, and a missing rating
//! is the similarity-weighted average of the user's existing ratings.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod loader;
pub mod prediction;
pub mod similarity;
pub mod store;
pub mod types;

// Re-export key types
pub use config::{DataConfig, EvaluationConfig, ModelConfig, RatingsConfig};
pub use error::{RatingsError, Result};
pub use evaluation::{correlation, EvaluationReport};
pub use loader::LoadError;
pub use prediction::PredictionEngine;
pub use similarity::{CacheStats, ItemPair, SimilarityCache};
pub use store::{RatingStore, RatingStoreBuilder};
pub use types::*;
