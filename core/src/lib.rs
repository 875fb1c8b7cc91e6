#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use coin::*;
pub use error::*;
pub use generator::*;
pub use inventory::*;
pub use location::*;
pub use luck::*;
pub use memento::*;
pub use persistence::*;
pub use registry::*;
pub use session::*;
pub use state::*;
pub use store::*;
pub use surface::*;
pub use types::*;

mod coin;
mod error;
mod generator;
mod inventory;
mod location;
mod luck;
mod memento;
mod persistence;
mod registry;
mod session;
mod state;
mod store;
mod surface;
mod types;

/// Where a new player starts: the Oakes College classroom.
pub const CLASSROOM: LatLng = LatLng::new(36.98949379578401, -122.06277128548504);
pub const DEFAULT_TILE_DEGREES: f64 = 1e-4;
pub const DEFAULT_NEIGHBORHOOD_RADIUS: u32 = 8;
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;
pub const DEFAULT_MAX_INITIAL_COINS: Serial = 10;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player location at start and after a reset.
    pub origin: LatLng,
    pub tile_degrees: f64,
    pub neighborhood_radius: u32,
    pub spawn_probability: f64,
    pub max_initial_coins: Serial,
}

impl GameConfig {
    pub const fn new_unchecked(
        origin: LatLng,
        neighborhood_radius: u32,
        spawn_probability: f64,
    ) -> Self {
        Self {
            origin,
            tile_degrees: DEFAULT_TILE_DEGREES,
            neighborhood_radius,
            spawn_probability,
            max_initial_coins: DEFAULT_MAX_INITIAL_COINS,
        }
    }

    pub fn new(origin: LatLng, neighborhood_radius: u32, spawn_probability: f64) -> Self {
        Self::new_unchecked(origin, neighborhood_radius, spawn_probability).sanitized()
    }

    /// Clamps `spawn_probability` into `[0, 1]` and replaces unusable values with defaults.
    pub fn sanitized(mut self) -> Self {
        self.spawn_probability = if self.spawn_probability.is_nan() {
            DEFAULT_SPAWN_PROBABILITY
        } else {
            self.spawn_probability.clamp(0., 1.)
        };
        if !(self.tile_degrees.is_finite() && self.tile_degrees > 0.) {
            self.tile_degrees = DEFAULT_TILE_DEGREES;
        }
        self
    }

    pub fn cell_of(&self, location: LatLng) -> Cell {
        location.cell(self.tile_degrees)
    }

    pub fn bounds_of(&self, cell: Cell) -> Bounds {
        cell.bounds(self.tile_degrees)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            CLASSROOM,
            DEFAULT_NEIGHBORHOOD_RADIUS,
            DEFAULT_SPAWN_PROBABILITY,
        )
    }
}
