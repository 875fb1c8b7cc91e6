use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use crate::*;
pub use neighborhood::*;

mod neighborhood;

/// Caches currently materialized in the view, keyed by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveCaches {
    caches: BTreeMap<Cell, Cache>,
}

impl ActiveCaches {
    pub fn get(&self, position: Cell) -> Option<&Cache> {
        self.caches.get(&position)
    }

    pub fn get_mut(&mut self, position: Cell) -> Option<&mut Cache> {
        self.caches.get_mut(&position)
    }

    pub fn contains(&self, position: Cell) -> bool {
        self.caches.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Cell> + '_ {
        self.caches.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Values<'_, Cell, Cache> {
        self.caches.values()
    }

    fn insert(&mut self, cache: Cache) {
        self.caches.insert(cache.position(), cache);
    }
}

impl<'a> IntoIterator for &'a ActiveCaches {
    type Item = &'a Cache;
    type IntoIter = btree_map::Values<'a, Cell, Cache>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Decides which cells host a cache and materializes them, preferring stored mementos over fresh
/// generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenerationEngine {
    max_initial_coins: Serial,
}

impl GenerationEngine {
    pub const fn new(max_initial_coins: Serial) -> Self {
        Self { max_initial_coins }
    }

    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_initial_coins)
    }

    pub fn spawns_at(cell: Cell, spawn_probability: f64) -> bool {
        luck(&cell.key()) < spawn_probability
    }

    /// `floor(luck("i,j,initialValue") * max_initial_coins)`.
    pub fn initial_coin_count(&self, cell: Cell) -> Serial {
        // luck is non-negative, so truncation is floor
        (luck(&cell.initial_value_key()) * f64::from(self.max_initial_coins)) as Serial
    }

    /// Every cache within `radius` of `center`, restored from `store` where a memento exists and
    /// freshly generated (and immediately recorded) otherwise.
    pub fn populate(
        &self,
        center: Cell,
        radius: u32,
        spawn_probability: f64,
        store: &mut CacheStateStore,
    ) -> ActiveCaches {
        let mut active = ActiveCaches::default();
        let mut restored = 0usize;

        for cell in Neighborhood::new(center, radius) {
            if !Self::spawns_at(cell, spawn_probability) {
                continue;
            }

            let cache = match self.restore(cell, store) {
                Some(cache) => {
                    restored += 1;
                    cache
                }
                None => {
                    let cache = Cache::minted(cell, self.initial_coin_count(cell));
                    log::trace!("generated cache at {} with {} coins", cell, cache.len());
                    store.record(&cache);
                    cache
                }
            };
            active.insert(cache);
        }

        log::debug!(
            "populated {} caches around {} (radius {}, {} restored)",
            active.len(),
            center,
            radius,
            restored
        );
        active
    }

    /// Flushes every active cache into `store`, then lets them go.
    pub fn clear(&self, active: ActiveCaches, store: &mut CacheStateStore) {
        Self::flush(&active, store);
        log::debug!("cleared {} caches from view", active.len());
    }

    pub fn flush(active: &ActiveCaches, store: &mut CacheStateStore) {
        for cache in active {
            store.record(cache);
        }
    }

    fn restore(&self, cell: Cell, store: &CacheStateStore) -> Option<Cache> {
        let memento = store.load(cell)?;
        match memento
            .validate_for(cell)
            .and_then(|()| memento.restore())
        {
            Ok(cache) => Some(cache),
            Err(err) => {
                log::warn!("regenerating cache at {} from scratch: {}", cell, err);
                None
            }
        }
    }
}

impl Default for GenerationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INITIAL_COINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn spawn_decision_follows_luck_of_position_key() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();
        let center = Cell::new(0, 0);

        let active = engine.populate(center, 8, 0.1, &mut store);

        for cell in Neighborhood::new(center, 8) {
            assert_eq!(
                active.contains(cell),
                luck(&cell.key()) < 0.1,
                "cell {cell}"
            );
        }
    }

    #[test]
    fn probability_bounds_spawn_nothing_or_everything() {
        let engine = GenerationEngine::default();
        let center = Cell::new(369_895, -1_220_628);

        let none = engine.populate(center, 3, 0., &mut CacheStateStore::new());
        let all = engine.populate(center, 3, 1., &mut CacheStateStore::new());

        assert!(none.is_empty());
        assert_eq!(all.len() as u64, Neighborhood::cell_count(3));
    }

    #[test]
    fn fresh_caches_hold_lucky_coin_count_and_are_recorded() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();

        let active = engine.populate(Cell::new(2, 3), 2, 1., &mut store);

        assert_eq!(store.len(), active.len());
        for cache in &active {
            let expected = (luck(&cache.position().initial_value_key()) * 10.) as usize;
            assert_eq!(cache.len(), expected);
            assert!(expected < 10);
            let serials: Vec<_> = cache.coins().iter().map(Coin::serial).collect();
            assert_eq!(serials, (0..expected as Serial).collect::<Vec<_>>());
            assert_eq!(store.load(cache.position()).unwrap().restore().unwrap(), *cache);
        }
    }

    #[test]
    fn populate_twice_yields_identical_caches() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();
        let center = Cell::new(-40, 17);

        let first = engine.populate(center, 8, 0.1, &mut store);
        engine.clear(first.clone(), &mut store);
        let second = engine.populate(center, 8, 0.1, &mut store);

        assert_eq!(first, second);
    }

    #[test]
    fn stored_memento_wins_over_fresh_generation() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();
        let position = Cell::new(5, 5);
        let planted = Cache::with_coins(position, [Coin::new(Cell::new(1, 1), 42)].into());
        store.record(&planted);

        let active = engine.populate(position, 0, 1., &mut store);

        assert_eq!(active.get(position), Some(&planted));
    }

    #[test]
    fn unreadable_memento_falls_back_to_fresh_generation() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();
        let position = Cell::new(5, 5);
        let stale = CacheMemento::decode(r#"{"version":0,"i":5,"j":5,"coins":[]}"#).unwrap();
        store.save(position, stale);

        let active = engine.populate(position, 0, 1., &mut store);

        let cache = active.get(position).unwrap();
        assert_eq!(cache.len() as Serial, engine.initial_coin_count(position));
        assert_eq!(store.load(position).unwrap().version(), MEMENTO_VERSION);
    }

    #[test]
    fn clear_flushes_mutations_before_discarding() {
        let engine = GenerationEngine::default();
        let mut store = CacheStateStore::new();
        let position = Cell::new(0, 0);
        let mut active = engine.populate(position, 0, 1., &mut store);

        active
            .get_mut(position)
            .unwrap()
            .push(Coin::new(Cell::new(7, 7), 0));
        engine.clear(active, &mut store);

        let restored = engine.populate(position, 0, 1., &mut store);
        let cache = restored.get(position).unwrap();
        assert_eq!(cache.coins().last(), Some(&Coin::new(Cell::new(7, 7), 0)));
    }
}
