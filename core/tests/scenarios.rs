use geocoin_core::*;

const TILE: f64 = DEFAULT_TILE_DEGREES;

/// Game around `center` where every cell in a radius-2 diamond holds a cache.
fn dense_config(center: Cell) -> GameConfig {
    GameConfig::new(center.center(TILE), 2, 1.)
}

fn pickup_survives_clear_and_reload(position: Cell) {
    let engine = GenerationEngine::default();
    let mut store = CacheStateStore::new();
    let mut inventory = Inventory::new();

    let mut active = engine.populate(position, 0, 1., &mut store);
    let initial = engine.initial_coin_count(position) as usize;
    assert_eq!(active.get(position).unwrap().len(), initial);

    let taken = initial.min(2);
    for _ in 0..taken {
        let cache = active.get_mut(position).unwrap();
        inventory.pickup(cache, &mut store).unwrap();
    }
    assert_eq!(inventory.len(), taken);
    assert_eq!(active.get(position).unwrap().len(), initial - taken);

    engine.clear(active, &mut store);

    let mut adapter = PersistenceAdapter::new(MemoryStorage::new());
    adapter
        .save(&GameSnapshot {
            player_location: position.center(TILE),
            inventory,
            cache_mementos: store,
        })
        .unwrap();
    let GameSnapshot {
        inventory,
        cache_mementos: mut store,
        ..
    } = adapter.load().unwrap();

    let restored = engine.populate(position, 0, 1., &mut store);
    assert_eq!(restored.get(position).unwrap().len(), initial - taken);
    assert_eq!(inventory.len(), taken);
    assert!(inventory.coins().iter().all(|coin| coin.origin() == position));
}

#[test]
fn pickups_at_two_three_survive_clear_and_reload() {
    pickup_survives_clear_and_reload(Cell::new(2, 3));
}

#[test]
fn two_pickups_survive_clear_and_reload() {
    let engine = GenerationEngine::default();
    let position = (0..)
        .map(|j| Cell::new(2, 3 + j))
        .find(|&cell| engine.initial_coin_count(cell) >= 2)
        .unwrap();

    pickup_survives_clear_and_reload(position);
}

#[test]
fn regeneration_is_idempotent_at_default_settings() {
    let config = GameConfig::default();
    let engine = GenerationEngine::from_config(&config);
    let center = config.cell_of(config.origin);

    let mut first_store = CacheStateStore::new();
    let first = engine.populate(
        center,
        config.neighborhood_radius,
        config.spawn_probability,
        &mut first_store,
    );
    let mut second_store = CacheStateStore::new();
    let second = engine.populate(
        center,
        config.neighborhood_radius,
        config.spawn_probability,
        &mut second_store,
    );

    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(first_store, second_store);
}

#[test]
fn session_resumes_from_storage() {
    let config = dense_config(Cell::new(10, 10));
    let mut game = Game::open(config, MemoryStorage::new());
    let position = game
        .state()
        .active_caches()
        .iter()
        .find(|cache| !cache.is_empty())
        .map(Cache::position)
        .unwrap();
    let before = game.state().cache(position).unwrap().len();

    let outcome = game.dispatch(Command::Pickup(position)).unwrap();
    assert!(matches!(outcome, CommandOutcome::PickedUp(_)));
    game.dispatch(Command::Move(Direction::North)).unwrap();
    game.dispatch(Command::Move(Direction::North)).unwrap();
    game.dispatch(Command::Move(Direction::North)).unwrap();

    let resumed = Game::open(config, game.into_storage());
    assert_eq!(resumed.state().player_cell(), Cell::new(13, 10));
    assert_eq!(resumed.state().inventory().len(), 1);
    assert_eq!(
        resumed.state().store().load(position).unwrap().coins().len(),
        before - 1
    );
}

#[test]
fn guarded_commands_do_not_touch_storage() {
    let config = dense_config(Cell::new(0, 0));
    let mut game = Game::open(config, MemoryStorage::new());

    let outcome = game.dispatch(Command::Drop(Cell::new(0, 0))).unwrap();

    assert_eq!(outcome, CommandOutcome::Guarded(GameError::EmptyInventory));
    assert!(game.persistence().storage().get(GameSnapshot::KEY).is_none());
}

#[test]
fn unreadable_storage_starts_a_fresh_game() {
    let config = dense_config(Cell::new(0, 0));
    let mut storage = MemoryStorage::new();
    storage.write(GameSnapshot::KEY, "][").unwrap();

    let game = Game::open(config, storage);
    let fresh = GameState::new(config);

    assert!(game.state().inventory().is_empty());
    assert_eq!(game.state().active_caches(), fresh.active_caches());
}

#[test]
fn reset_matches_a_completely_fresh_run() {
    let config = GameConfig::new(CLASSROOM, 4, 0.3);
    let fresh = Game::open(config, MemoryStorage::new());
    let mut game = Game::open(config, MemoryStorage::new());

    for direction in [Direction::East, Direction::East, Direction::South] {
        game.dispatch(Command::Move(direction)).unwrap();
        let positions: Vec<_> = game.state().active_caches().positions().collect();
        for position in positions {
            game.dispatch(Command::Pickup(position)).unwrap();
        }
    }
    game.dispatch(Command::Move(Direction::West)).unwrap();
    let remembered = game.state().store().len();
    assert!(remembered > fresh.state().store().len());

    let outcome = game.dispatch(Command::Reset).unwrap();

    assert_eq!(outcome, CommandOutcome::Reset);
    assert!(game.persistence().storage().get(GameSnapshot::KEY).is_none());
    assert_eq!(game.state().inventory().len(), 0);
    assert_eq!(game.state().player_location(), CLASSROOM);
    assert_eq!(game.state().active_caches(), fresh.state().active_caches());
    assert_eq!(game.state().store(), fresh.state().store());
}

#[test]
fn cleared_store_and_inventory_regenerate_original_layout() {
    let config = GameConfig::default();
    let engine = GenerationEngine::from_config(&config);
    let origin = config.cell_of(config.origin);
    let mut store = CacheStateStore::new();
    let mut inventory = Inventory::new();

    let original = engine.populate(origin, 8, 0.1, &mut store);
    let mut active = original.clone();
    let position = active.positions().next().unwrap();
    let _ = inventory.pickup(active.get_mut(position).unwrap(), &mut store);
    engine.clear(active, &mut store);

    store.clear_all();
    inventory.clear();
    assert_eq!(store.len(), 0);
    assert_eq!(inventory.len(), 0);

    let regenerated = engine.populate(origin, 8, 0.1, &mut store);
    assert_eq!(regenerated, original);
}

struct ScriptedProvider {
    track: Vec<LatLng>,
    subscribers: Vec<Option<LocationCallback>>,
}

impl ScriptedProvider {
    fn play(&mut self) {
        for &location in &self.track {
            for callback in self.subscribers.iter_mut().flatten() {
                callback(location);
            }
        }
    }
}

impl LocationProvider for ScriptedProvider {
    type Handle = usize;

    fn subscribe(&mut self, on_update: LocationCallback) -> usize {
        self.subscribers.push(Some(on_update));
        self.subscribers.len() - 1
    }

    fn unsubscribe(&mut self, handle: usize) {
        self.subscribers[handle] = None;
    }
}

#[test]
fn location_updates_follow_the_movement_path() {
    let config = dense_config(Cell::new(0, 0));
    let mut game = Game::open(config, MemoryStorage::new());
    let feed = LocationFeed::new();
    let mut provider = ScriptedProvider {
        track: vec![
            Cell::new(0, 1).center(TILE),
            LatLng::new(0.00001, 0.00012),
            Cell::new(5, 5).center(TILE),
        ],
        subscribers: Vec::new(),
    };

    let handle = provider.subscribe(feed.sink());
    provider.play();
    provider.unsubscribe(handle);
    provider.play();

    let outcomes = game.drain_locations(&feed).unwrap();

    assert_eq!(
        outcomes,
        [
            CommandOutcome::Moved {
                from: Cell::new(0, 0),
                to: Cell::new(0, 1),
            },
            CommandOutcome::Unchanged,
            CommandOutcome::Moved {
                from: Cell::new(0, 1),
                to: Cell::new(5, 5),
            },
        ]
    );
    assert!(feed.is_empty());
    assert_eq!(game.state().player_cell(), Cell::new(5, 5));
    assert!(game.state().cache(Cell::new(5, 7)).is_some());
}

#[test]
fn one_unsupported_memento_keeps_the_rest_of_the_saved_game() {
    let config = dense_config(Cell::new(0, 0));
    let engine = GenerationEngine::from_config(&config);
    let mut game = Game::open(config, MemoryStorage::new());
    let position = game
        .state()
        .active_caches()
        .iter()
        .find(|cache| !cache.is_empty())
        .map(Cache::position)
        .unwrap();
    game.dispatch(Command::Pickup(position)).unwrap();

    let mut storage = game.into_storage();
    let mut blob: serde_json::Value =
        serde_json::from_str(storage.get(GameSnapshot::KEY).unwrap()).unwrap();
    let entry = &mut blob["cacheMementos"][0];
    let damaged: Cell = entry[0].as_str().unwrap().parse().unwrap();
    let memento = entry[1].as_str().unwrap().replace(r#""version":1"#, r#""version":2"#);
    entry[1] = memento.into();
    storage.write(GameSnapshot::KEY, &blob.to_string()).unwrap();

    let resumed = Game::open(config, storage);

    assert_eq!(resumed.state().inventory().len(), 1);
    assert_eq!(
        resumed.state().cache(damaged).unwrap().len() as Serial,
        engine.initial_coin_count(damaged)
    );
    if damaged != position {
        assert_eq!(
            resumed.state().cache(position).unwrap().len() as Serial,
            engine.initial_coin_count(position) - 1
        );
    }
}
