//! Item-item similarity and its memo cache
//!
//! Two items are similar when the users who rated both gave them close scores:
//!
//! ```text
//! similarity = 1 - mean(|r_a - r_b|) / scale
//! ```
//!
//! The result is deliberately not clamped. Strong disagreement yields a
//! negative similarity, which then pulls predictions away from that item.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::types::ItemId;

/// Unordered pair of item ids, stored as `(min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemPair(ItemId, ItemId);

impl ItemPair {
    pub fn new(a: ItemId, b: ItemId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> ItemId {
        self.0
    }

    pub fn high(&self) -> ItemId {
        self.1
    }

    /// The other member of the pair, if `item` is one of them
    pub fn other(&self, item: ItemId) -> Option<ItemId> {
        if self.0 == item {
            Some(self.1)
        } else if self.1 == item {
            Some(self.0)
        } else {
            None
        }
    }
}

/// Similarity from the co-rating pairs of two items
///
/// Returns 0.0 when no user rated both items.
pub fn mean_difference_similarity(co_ratings: &[(f64, f64)], scale: f64) -> f64 {
    if co_ratings.is_empty() {
        return 0.0;
    }

    let total_difference: f64 = co_ratings.iter().map(|(a, b)| (a - b).abs()).sum();
    let mean_difference = total_difference / co_ratings.len() as f64;

    1.0 - mean_difference / scale
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Process-local memo of computed item-pair similarities
///
/// One entry per unordered pair serves lookups in both directions. Entries
/// are never evicted or recomputed.
#[derive(Debug, Default)]
pub struct SimilarityCache {
    entries: DashMap<ItemPair, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: ItemId, b: ItemId) -> Option<f64> {
        self.entries.get(&ItemPair::new(a, b)).map(|value| *value)
    }

    /// Return the cached similarity or compute and store it
    ///
    /// The vacant entry stays locked while `compute` runs, so concurrent
    /// first lookups of the same pair store exactly one value. `compute` must
    /// not touch this cache.
    pub fn get_or_try_insert_with<E, F>(&self, a: ItemId, b: ItemId, compute: F) -> Result<f64, E>
    where
        F: FnOnce() -> Result<f64, E>,
    {
        let pair = ItemPair::new(a, b);

        if let Some(value) = self.entries.get(&pair) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(*value);
        }

        match self.entries.entry(pair) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(*entry.get())
            }
            Entry::Vacant(entry) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let value = compute()?;
                debug!(
                    item_a = pair.low(),
                    item_b = pair.high(),
                    similarity = value,
                    "Computed item similarity"
                );
                entry.insert(value);
                Ok(value)
            }
        }
    }

    /// Cached `(other_item, similarity)` entries involving `item`
    pub fn neighbors(&self, item: ItemId) -> Vec<(ItemId, f64)> {
        let mut neighbors: Vec<(ItemId, f64)> = self
            .entries
            .iter()
            .filter_map(|entry| entry.key().other(item).map(|other| (other, *entry.value())))
            .collect();
        neighbors.sort_by_key(|(other, _)| *other);
        neighbors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
