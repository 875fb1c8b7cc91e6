use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Coins the player carries. Like a cache, the most recently added coin leaves first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    coins: Vec<Coin>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
    }

    /// Moves the top coin of `cache` into the inventory and records the cache in `store`.
    pub fn pickup(&mut self, cache: &mut Cache, store: &mut CacheStateStore) -> Result<Coin> {
        let coin = cache.pop().ok_or(GameError::EmptyCache)?;
        self.coins.push(coin);
        store.record(cache);
        log::debug!("picked up {} from {}", coin, cache.position());
        Ok(coin)
    }

    /// Moves the top inventory coin into `cache` and records the cache in `store`.
    pub fn drop(&mut self, cache: &mut Cache, store: &mut CacheStateStore) -> Result<Coin> {
        let coin = self.coins.pop().ok_or(GameError::EmptyInventory)?;
        cache.push(coin);
        store.record(cache);
        log::debug!("dropped {} into {}", coin, cache.position());
        Ok(coin)
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }

    pub fn status_line(&self) -> String {
        if self.coins.is_empty() {
            "No coins yet...".into()
        } else {
            format!("{} coins currently held", self.coins.len())
        }
    }
}
