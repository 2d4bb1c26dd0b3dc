//! Item-based rating prediction
//!
//! A missing rating is the similarity-weighted average of the user's existing
//! ratings. Similarities are fetched through the shared [`SimilarityCache`],
//! so each item pair is computed at most once per engine.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::similarity::{mean_difference_similarity, CacheStats, SimilarityCache};
use crate::store::RatingStore;
use crate::types::{ItemId, Prediction, RatingRecord, UserId};

/// Prediction engine over a fully built [`RatingStore`]
#[derive(Debug)]
pub struct PredictionEngine {
    store: RatingStore,
    cache: SimilarityCache,
    config: ModelConfig,
}

impl PredictionEngine {
    pub fn new(store: RatingStore) -> Self {
        Self {
            store,
            cache: SimilarityCache::new(),
            config: ModelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Similarity between two catalog items, memoized per unordered pair
    ///
    /// An item is fully similar to itself; that case bypasses the cache.
    pub fn similarity(&self, item_a: ItemId, item_b: ItemId) -> Result<f64> {
        self.store.lookup_item(item_a)?;
        self.store.lookup_item(item_b)?;

        if item_a == item_b {
            return Ok(1.0);
        }

        let scale = self.config.similarity_scale;
        self.cache.get_or_try_insert_with(item_a, item_b, || {
            let co_ratings = self.store.co_ratings(item_a, item_b)?;
            Ok(mean_difference_similarity(&co_ratings, scale))
        })
    }

    /// Similarities already computed for `item_id`, ordered by the other item id
    pub fn cached_neighbors(&self, item_id: ItemId) -> Result<Vec<(ItemId, f64)>> {
        self.store.lookup_item(item_id)?;
        Ok(self.cache.neighbors(item_id))
    }

    /// Predict how `user_id` would rate `item_id`
    ///
    /// An observed rating is returned as-is. Otherwise every item the user
    /// rated contributes `similarity * rating`, with no filtering on the sign
    /// of the similarity. A zero weight total yields the configured fallback.
    pub fn predict_rating(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        let rated = self.store.items_rated_by(user_id)?;
        self.store.lookup_item(item_id)?;

        if let Some(&rating) = rated.get(&item_id) {
            return Ok(rating);
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (&rated_item, &rating) in rated {
            let similarity = self.similarity(rated_item, item_id)?;
            weighted_sum += similarity * rating;
            weight_total += similarity;
        }

        if weight_total == 0.0 {
            debug!(
                user_id,
                item_id,
                rated_items = rated.len(),
                "Zero similarity weight, using fallback rating"
            );
            return Ok(self.config.fallback_rating);
        }

        Ok(weighted_sum / weight_total)
    }

    /// Predict every query in order; the first unknown id fails the batch
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub fn predict_batch(&self, queries: &[RatingRecord]) -> Result<Vec<Prediction>> {
        let predictions = queries
            .iter()
            .map(|query| self.predict_query(query))
            .collect::<Result<Vec<_>>>()?;

        self.log_batch_summary(predictions.len());
        Ok(predictions)
    }

    /// Same output as [`predict_batch`](Self::predict_batch), spread over the
    /// rayon pool
    ///
    /// Output order matches input order. If several queries are invalid, which
    /// of their errors is reported is unspecified.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub fn predict_batch_parallel(&self, queries: &[RatingRecord]) -> Result<Vec<Prediction>> {
        let predictions = queries
            .par_iter()
            .map(|query| self.predict_query(query))
            .collect::<Result<Vec<_>>>()?;

        self.log_batch_summary(predictions.len());
        Ok(predictions)
    }

    fn predict_query(&self, query: &RatingRecord) -> Result<Prediction> {
        let title = self.store.lookup_item(query.item_id)?.title.clone();
        let predicted = self.predict_rating(query.user_id, query.item_id)?;

        Ok(Prediction {
            user_id: query.user_id,
            item_id: query.item_id,
            title,
            predicted,
            actual: query.rating,
        })
    }

    fn log_batch_summary(&self, predictions: usize) {
        let stats = self.cache.stats();
        info!(
            predictions,
            cached_pairs = stats.entries,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            "Batch prediction complete"
        );
    }
}
