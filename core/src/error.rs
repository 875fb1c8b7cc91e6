use alloc::string::String;
use thiserror::Error;

use crate::Cell;

/// Guarded rule violations. Commands that hit one leave every container untouched.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cache has no coins to pick up")]
    EmptyCache,
    #[error("Inventory has no coins to drop")]
    EmptyInventory,
    #[error("No cache is active at {0}")]
    CacheNotActive(Cell),
    #[error("Unsupported cache memento version {0}")]
    UnsupportedMementoVersion(u8),
    #[error("Cache memento belongs to another position")]
    MementoPositionMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Faults while reading or writing the saved game. A saved game that cannot be read is treated
/// as absent by [`PersistenceAdapter::load`](crate::PersistenceAdapter::load).
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage backend failed: {0}")]
    Storage(String),
    #[error("Could not encode saved game")]
    Encode(#[source] serde_json::Error),
    #[error("Could not decode saved game")]
    Decode(#[source] serde_json::Error),
    #[error("Invalid position key {0:?}")]
    InvalidPositionKey(String),
}

impl From<crate::ParsePositionKeyError> for PersistenceError {
    fn from(err: crate::ParsePositionKeyError) -> Self {
        Self::InvalidPositionKey(err.0)
    }
}
