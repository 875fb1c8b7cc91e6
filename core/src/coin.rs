use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Collectible token, identified by the cell that minted it and its serial there.
///
/// Coins are never mutated; they only move between a [`Cache`] and the [`Inventory`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "CoinRecord", into = "CoinRecord")]
pub struct Coin {
    origin: Cell,
    serial: Serial,
}

impl Coin {
    pub const fn new(origin: Cell, serial: Serial) -> Self {
        Self { origin, serial }
    }

    pub const fn origin(&self) -> Cell {
        self.origin
    }

    pub const fn serial(&self) -> Serial {
        self.serial
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.origin.i, self.origin.j, self.serial)
    }
}

/// Persisted shape of a coin, `{cellI, cellJ, serial}`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinRecord {
    cell_i: Coord,
    cell_j: Coord,
    serial: Serial,
}

impl From<CoinRecord> for Coin {
    fn from(record: CoinRecord) -> Self {
        Self::new(Cell::new(record.cell_i, record.cell_j), record.serial)
    }
}

impl From<Coin> for CoinRecord {
    fn from(coin: Coin) -> Self {
        Self {
            cell_i: coin.origin.i,
            cell_j: coin.origin.j,
            serial: coin.serial,
        }
    }
}

/// Coins sitting at one map position. The last coin in the sequence is the next one handed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cache {
    position: Cell,
    coins: Vec<Coin>,
}

impl Cache {
    pub fn new(position: Cell) -> Self {
        Self::with_coins(position, Vec::new())
    }

    pub fn with_coins(position: Cell, coins: Vec<Coin>) -> Self {
        Self { position, coins }
    }

    /// Cache as first generated: `count` coins minted here with serials `0..count`.
    pub fn minted(position: Cell, count: Serial) -> Self {
        let coins = (0..count).map(|serial| Coin::new(position, serial)).collect();
        Self::with_coins(position, coins)
    }

    pub const fn position(&self) -> Cell {
        self.position
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

    pub fn bounds(&self, tile_degrees: f64) -> Bounds {
        self.position.bounds(tile_degrees)
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub(crate) fn pop(&mut self) -> Option<Coin> {
        self.coins.pop()
    }
}
