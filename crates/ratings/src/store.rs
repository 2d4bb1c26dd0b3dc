//! In-memory rating store
//!
//! Holds the movie catalog and the sparse user-item rating matrix. Ratings are
//! stored once, keyed by user; the per-item rater index is maintained by the
//! same insert routine so the two views cannot drift apart.
//!
//! Per-user ratings and per-item raters are ordered by id, so every sum taken
//! over them is accumulated in the same order for the same input.

use crate::error::{RatingsError, Result};
use crate::types::{CatalogRecord, Item, ItemId, RatingRecord, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

/// Read-only view of the catalog and rating matrix
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    catalog: HashMap<ItemId, Item>,
    /// user_id -> (item_id -> rating)
    user_ratings: HashMap<UserId, BTreeMap<ItemId, f64>>,
    /// item_id -> users who rated it
    raters: HashMap<ItemId, BTreeSet<UserId>>,
}

impl RatingStore {
    pub fn builder() -> RatingStoreBuilder {
        RatingStoreBuilder::default()
    }

    /// Build a store from already-parsed catalog and rating records
    pub fn from_records<C, R>(catalog: C, ratings: R) -> Result<Self>
    where
        C: IntoIterator<Item = CatalogRecord>,
        R: IntoIterator<Item = RatingRecord>,
    {
        let mut builder = Self::builder();
        for record in catalog {
            builder.add_item(record)?;
        }
        for record in ratings {
            builder.add_rating(record)?;
        }
        Ok(builder.build())
    }

    pub fn lookup_item(&self, item_id: ItemId) -> Result<&Item> {
        self.catalog
            .get(&item_id)
            .ok_or(RatingsError::UnknownItem(item_id))
    }

    pub fn rating_of(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        let ratings = self.items_rated_by(user_id)?;
        if !self.contains_item(item_id) {
            return Err(RatingsError::UnknownItem(item_id));
        }
        ratings
            .get(&item_id)
            .copied()
            .ok_or(RatingsError::NoSuchRating { user_id, item_id })
    }

    /// Users who rated the item; empty for a catalog item nobody rated
    pub fn raters_of(&self, item_id: ItemId) -> Result<&BTreeSet<UserId>> {
        self.raters
            .get(&item_id)
            .ok_or(RatingsError::UnknownItem(item_id))
    }

    pub fn items_rated_by(&self, user_id: UserId) -> Result<&BTreeMap<ItemId, f64>> {
        self.user_ratings
            .get(&user_id)
            .ok_or(RatingsError::UnknownUser(user_id))
    }

    /// Rating pairs `(rating of a, rating of b)` from every user who rated both items
    pub fn co_ratings(&self, item_a: ItemId, item_b: ItemId) -> Result<Vec<(f64, f64)>> {
        let raters_a = self.raters_of(item_a)?;
        let raters_b = self.raters_of(item_b)?;
        let (smaller, larger) = if raters_a.len() <= raters_b.len() {
            (raters_a, raters_b)
        } else {
            (raters_b, raters_a)
        };

        Ok(smaller
            .iter()
            .filter(|user| larger.contains(*user))
            .filter_map(|user| {
                let ratings = self.user_ratings.get(user)?;
                Some((*ratings.get(&item_a)?, *ratings.get(&item_b)?))
            })
            .collect())
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_ratings.contains_key(&user_id)
    }

    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.catalog.contains_key(&item_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.catalog.values()
    }

    pub fn num_items(&self) -> usize {
        self.catalog.len()
    }

    pub fn num_users(&self) -> usize {
        self.user_ratings.len()
    }

    pub fn num_ratings(&self) -> usize {
        self.user_ratings.values().map(BTreeMap::len).sum()
    }
}

/// Single writer for a [`RatingStore`]
#[derive(Debug, Default)]
pub struct RatingStoreBuilder {
    store: RatingStore,
}

impl RatingStoreBuilder {
    /// Add a catalog entry; ids must be unique
    pub fn add_item(&mut self, record: CatalogRecord) -> Result<&mut Self> {
        if self.store.catalog.contains_key(&record.item_id) {
            return Err(RatingsError::DuplicateItem(record.item_id));
        }
        self.store.catalog.insert(
            record.item_id,
            Item {
                id: record.item_id,
                title: record.title,
            },
        );
        self.store.raters.insert(record.item_id, BTreeSet::new());
        Ok(self)
    }

    /// Record a rating; a repeated (user, item) pair keeps the last value
    pub fn add_rating(&mut self, record: RatingRecord) -> Result<&mut Self> {
        let raters = self
            .store
            .raters
            .get_mut(&record.item_id)
            .ok_or(RatingsError::UnknownItem(record.item_id))?;
        raters.insert(record.user_id);
        self.store
            .user_ratings
            .entry(record.user_id)
            .or_default()
            .insert(record.item_id, record.rating);
        Ok(self)
    }

    /// Register a user who has not rated anything yet
    pub fn add_user(&mut self, user_id: UserId) -> &mut Self {
        self.store.user_ratings.entry(user_id).or_default();
        self
    }

    pub fn build(self) -> RatingStore {
        let store = self.store;
        info!(
            items = store.num_items(),
            users = store.num_users(),
            ratings = store.num_ratings(),
            "Rating store built"
        );
        store
    }
}
