use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single grid axis, counted in tiles from latitude/longitude zero.
pub type Coord = i32;

/// Serial number of a coin within the cell that minted it.
pub type Serial = u32;

/// Grid coordinate `(i, j)`, where `i` follows latitude and `j` longitude.
///
/// Canonical identities for cells are handed out by [`CellRegistry`](crate::CellRegistry); the value
/// itself is just the coordinate pair and is what gets persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: Coord,
    pub j: Coord,
}

impl Cell {
    pub const fn new(i: Coord, j: Coord) -> Self {
        Self { i, j }
    }

    /// Moves by `(di, dj)` tiles, saturating at the edges of the coordinate space.
    pub fn offset(self, di: i64, dj: i64) -> Self {
        Self {
            i: saturate(i64::from(self.i) + di),
            j: saturate(i64::from(self.j) + dj),
        }
    }

    pub fn manhattan_distance(self, other: Self) -> u64 {
        let di = i64::from(self.i) - i64::from(other.i);
        let dj = i64::from(self.j) - i64::from(other.j);
        di.unsigned_abs() + dj.unsigned_abs()
    }

    /// Position key, `"i,j"`.
    pub fn key(self) -> String {
        format!("{},{}", self.i, self.j)
    }

    /// Key fed to the luck function to size a fresh cache, `"i,j,initialValue"`.
    pub fn initial_value_key(self) -> String {
        format!("{},{},initialValue", self.i, self.j)
    }

    /// Point in the middle of the tile.
    pub fn center(self, tile_degrees: f64) -> LatLng {
        LatLng::new(
            f64::from(self.i) * tile_degrees,
            f64::from(self.j) * tile_degrees,
        )
    }

    /// Tile centered on the cell, so every point inside maps back to this cell.
    pub fn bounds(self, tile_degrees: f64) -> Bounds {
        let half = tile_degrees / 2.;
        let center = self.center(tile_degrees);
        Bounds {
            south_west: LatLng::new(center.lat - half, center.lng - half),
            north_east: LatLng::new(center.lat + half, center.lng + half),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid position key {0:?}, expected \"i,j\"")]
pub struct ParsePositionKeyError(pub String);

impl FromStr for Cell {
    type Err = ParsePositionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePositionKeyError(s.into());
        let (i, j) = s.split_once(',').ok_or_else(invalid)?;
        let i = i.trim().parse().map_err(|_| invalid())?;
        let j = j.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(i, j))
    }
}

fn saturate(value: i64) -> Coord {
    value.clamp(Coord::MIN.into(), Coord::MAX.into()) as Coord
}

/// `Math.round` semantics: halves round toward positive infinity.
///
/// Written with casts because `f64::floor` needs `std`.
fn round_to_coord(value: f64) -> Coord {
    let shifted = value + 0.5;
    let truncated = shifted as i64;
    let floored = if (truncated as f64) > shifted {
        truncated - 1
    } else {
        truncated
    };
    saturate(floored)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Cell containing this point, with cells anchored at `(0, 0)`.
    pub fn cell(self, tile_degrees: f64) -> Cell {
        Cell::new(
            round_to_coord(self.lat / tile_degrees),
            round_to_coord(self.lng / tile_degrees),
        )
    }

    pub fn step(self, direction: Direction, tile_degrees: f64) -> Self {
        let (di, dj) = direction.delta();
        Self::new(
            self.lat + f64::from(di) * tile_degrees,
            self.lng + f64::from(dj) * tile_degrees,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..self.north_east.lng).contains(&point.lng)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Tile delta `(di, dj)`; north is increasing latitude.
    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            North => (1, 0),
            South => (-1, 0),
            East => (0, 1),
            West => (0, -1),
        }
    }
}
