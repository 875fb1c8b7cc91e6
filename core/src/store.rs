use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use crate::*;

/// Latest memento of every cache ever generated, keyed by position.
///
/// Caches outside the active view exist only here. Entries are overwritten on each mutation and
/// only dropped wholesale by [`clear_all`](Self::clear_all).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStateStore {
    mementos: BTreeMap<Cell, CacheMemento>,
}

impl CacheStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, position: Cell, memento: CacheMemento) {
        debug_assert_eq!(memento.position(), position);
        log::trace!(
            "saved memento for {}: {} coins",
            position,
            memento.coins().len()
        );
        self.mementos.insert(position, memento);
    }

    /// Captures `cache` and saves it under its own position.
    pub fn record(&mut self, cache: &Cache) {
        self.save(cache.position(), CacheMemento::capture(cache));
    }

    pub fn load(&self, position: Cell) -> Option<&CacheMemento> {
        self.mementos.get(&position)
    }

    pub fn contains(&self, position: Cell) -> bool {
        self.mementos.contains_key(&position)
    }

    pub fn clear_all(&mut self) {
        log::debug!("dropping {} cache mementos", self.mementos.len());
        self.mementos.clear();
    }

    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }

    /// Entries in position order.
    pub fn iter(&self) -> btree_map::Iter<'_, Cell, CacheMemento> {
        self.mementos.iter()
    }
}

impl<'a> IntoIterator for &'a CacheStateStore {
    type Item = (&'a Cell, &'a CacheMemento);
    type IntoIter = btree_map::Iter<'a, Cell, CacheMemento>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
