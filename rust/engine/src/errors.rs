use thiserror::Error;

/// Recoverable failures of board, backpack and shop operations.
///
/// Every variant means the action was refused and nothing was mutated: a
/// dropped item goes back to where it came from, coins stay where they were.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Soil {index} is already planted")]
    SoilOccupied { index: usize },
    #[error("Soil {index} already carries an upgrade")]
    SoilAlreadyUpgraded { index: usize },
    #[error("Item was not dropped on any soil")]
    NoTarget,
    #[error("Soil index {index} out of range (board has {len} soils)")]
    SoilOutOfRange { index: usize, len: usize },
    #[error("Hand slot {index} is empty")]
    HandIndexOutOfRange { index: usize },
    #[error("A hand is being resolved")]
    Resolving,
    #[error("Backpack is full (capacity {capacity})")]
    BackpackFull { capacity: usize },
    #[error("Upgrade capacity reached ({capacity})")]
    UpgradeCapacity { capacity: usize },
    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u32, available: u32 },
    #[error("Shop slot {slot} is empty")]
    EmptyShopSlot { slot: usize },
}

/// Failures while loading or validating a seed/upgrade catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog entry `{name}`: {reason}")]
    Invalid { name: String, reason: String },
}
