//! Record types shared by the store, engine, loader and reports

use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ItemId = u64;

/// A rateable catalog entry (a movie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.title)
    }
}

/// One row of the movie catalog table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "movieId")]
    pub item_id: ItemId,
    pub title: String,
}

impl CatalogRecord {
    pub fn new(item_id: ItemId, title: impl Into<String>) -> Self {
        Self {
            item_id,
            title: title.into(),
        }
    }
}

/// One row of a ratings table (training or test)
///
/// In a query batch `rating` is the held-out actual rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub item_id: ItemId,
    pub rating: f64,
}

impl RatingRecord {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

/// Predicted rating paired with the rating the user actually gave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub title: String,
    pub predicted: f64,
    pub actual: f64,
}
