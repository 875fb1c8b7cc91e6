use alloc::vec::Vec;
use core::ops::Index;
use hashbrown::HashMap;

use crate::*;

/// Stable handle to a canonical cell inside a [`CellRegistry`].
///
/// Two handles compare equal exactly when they name the same coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(usize);

impl CellId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Flyweight store of grid cells: one entry per coordinate pair ever requested. Entries are never
/// evicted, so a handle stays valid for the registry's whole life.
#[derive(Clone, Debug, Default)]
pub struct CellRegistry {
    cells: Vec<Cell>,
    ids: HashMap<Cell, CellId>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical handle for `(i, j)`, interning it on first request.
    pub fn get(&mut self, i: Coord, j: Coord) -> CellId {
        let cell = Cell::new(i, j);
        if let Some(&id) = self.ids.get(&cell) {
            return id;
        }

        let id = CellId(self.cells.len());
        self.cells.push(cell);
        self.ids.insert(cell, id);
        log::trace!("interned cell {} as {:?}", cell, id);
        id
    }

    pub fn intern(&mut self, cell: Cell) -> CellId {
        self.get(cell.i, cell.j)
    }

    pub fn lookup(&self, cell: Cell) -> Option<CellId> {
        self.ids.get(&cell).copied()
    }

    pub fn cell(&self, id: CellId) -> Option<Cell> {
        self.cells.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Index<CellId> for CellRegistry {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Self::Output {
        &self.cells[id.index()]
    }
}
