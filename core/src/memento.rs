use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Only memento layout this build reads or writes.
pub const MEMENTO_VERSION: u8 = 1;

/// Self-contained snapshot of a [`Cache`]: its position and its coins, in order.
///
/// A memento restores to an equal cache without consulting anything else. Its string form is the
/// JSON object `{"version":1,"i":..,"j":..,"coins":[..]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMemento {
    version: u8,
    i: Coord,
    j: Coord,
    coins: Vec<Coin>,
}

impl CacheMemento {
    pub fn capture(cache: &Cache) -> Self {
        let position = cache.position();
        Self {
            version: MEMENTO_VERSION,
            i: position.i,
            j: position.j,
            coins: cache.coins().to_vec(),
        }
    }

    pub fn restore(&self) -> Result<Cache> {
        self.check_version()?;
        Ok(Cache::with_coins(self.position(), self.coins.clone()))
    }

    pub const fn version(&self) -> u8 {
        self.version
    }

    pub const fn position(&self) -> Cell {
        Cell::new(self.i, self.j)
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(encoded: &str) -> serde_json::Result<Self> {
        serde_json::from_str(encoded)
    }

    /// Rejects mementos that cannot stand for the cache at `position`.
    pub fn validate_for(&self, position: Cell) -> Result<()> {
        self.check_version()?;
        if self.position() != position {
            return Err(GameError::MementoPositionMismatch);
        }
        Ok(())
    }

    fn check_version(&self) -> Result<()> {
        if self.version == MEMENTO_VERSION {
            Ok(())
        } else {
            Err(GameError::UnsupportedMementoVersion(self.version))
        }
    }
}
