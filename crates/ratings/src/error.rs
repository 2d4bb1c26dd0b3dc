use crate::types::{ItemId, UserId};

pub type Result<T> = std::result::Result<T, RatingsError>;

/// Errors returned by the rating store, prediction engine and evaluation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingsError {
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("User {user_id} has not rated item {item_id}")]
    NoSuchRating { user_id: UserId, item_id: ItemId },

    #[error("Length mismatch: {predicted} predicted vs {actual} actual ratings")]
    LengthMismatch { predicted: usize, actual: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Duplicate item in catalog: {0}")]
    DuplicateItem(ItemId),
}
