use thiserror::Error;

use crate::model::Category;

/// Failures while building or drawing from a rarity ladder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("nothing to sample from")]
    Empty,
    #[error("sum of weights is zero or not finite")]
    ZeroSum,
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("exponent must be finite and greater than zero (got {0})")]
    InvalidExponent(f64),
    #[error("ladder of {len} rungs exceeds the supported length")]
    LadderTooLong { len: usize },
}

/// Typed failure reasons of the roll pipeline. The orchestrator matches on
/// these to pick a recovery stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RollError {
    #[error("no catalog data for category {category}")]
    DataUnavailable { category: Category },
    #[error("every {category} item was removed by content filters")]
    FilteredToEmpty { category: Category },
    #[error("no candidates left to select from")]
    NoCandidates,
    #[error("rarity sampling failed: {0}")]
    Sample(#[from] SampleError),
}

/// Errors surfaced by a [`PreferenceStore`](crate::PreferenceStore) backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {category} catalog: {source}")]
    Parse {
        category: Category,
        #[source]
        source: serde_json::Error,
    },
    #[error("{category} item {title:?} has a non-finite rarity")]
    NonFiniteRarity { category: Category, title: String },
    #[error("{0} is not a catalog collection")]
    NotACollection(Category),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid roll configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("exponent must be finite and greater than zero (got {0})")]
    Exponent(f64),
    #[error("at least one rarity tolerance is required")]
    NoTolerances,
    #[error("tolerance {value} at index {index} must be positive and wider than the previous one")]
    Tolerance { index: usize, value: f64 },
    #[error("history cap must be at least 1")]
    HistoryCap,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a roll is already in progress")]
    RollInProgress,
}
