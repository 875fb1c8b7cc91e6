use core::mem;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player intents, as dispatched by whatever UI drives the game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Take the top coin from the cache at this position.
    Pickup(Cell),
    /// Put the top inventory coin into the cache at this position.
    Drop(Cell),
    /// Step one tile.
    Move(Direction),
    /// Location sensor reported a new position.
    Relocate(LatLng),
    /// Forget everything and start over at the origin.
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    PickedUp(Coin),
    Dropped(Coin),
    Moved { from: Cell, to: Cell },
    /// Location changed but the player is still in the same cell.
    Unchanged,
    /// Rule check failed; nothing changed.
    Guarded(GameError),
    Reset,
}

impl CommandOutcome {
    /// Whether this outcome changed anything worth saving.
    pub const fn has_update(self) -> bool {
        use CommandOutcome::*;
        match self {
            PickedUp(_) | Dropped(_) | Moved { .. } | Reset => true,
            // the location itself moved, even if the view did not
            Unchanged => true,
            Guarded(_) => false,
        }
    }
}

/// The whole mutable game, owned in one place and threaded through every component call.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    engine: GenerationEngine,
    registry: CellRegistry,
    store: CacheStateStore,
    inventory: Inventory,
    player_location: LatLng,
    player_cell: CellId,
    active: ActiveCaches,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self::from_snapshot(config, GameSnapshot::fresh(config.origin))
    }

    /// Rebuilds the store and inventory from `snapshot`, then runs the first population pass.
    pub fn from_snapshot(config: GameConfig, snapshot: GameSnapshot) -> Self {
        let GameSnapshot {
            player_location,
            inventory,
            cache_mementos,
        } = snapshot;

        let mut registry = CellRegistry::new();
        let player_cell = registry.intern(config.cell_of(player_location));
        let mut state = Self {
            config,
            engine: GenerationEngine::from_config(&config),
            registry,
            store: cache_mementos,
            inventory,
            player_location,
            player_cell,
            active: ActiveCaches::default(),
        };
        state.regenerate();
        state
    }

    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        log::debug!("apply {:?}", command);
        let outcome = match command {
            Command::Pickup(position) => self.pickup(position),
            Command::Drop(position) => self.drop(position),
            Command::Move(direction) => {
                let target = self
                    .player_location
                    .step(direction, self.config.tile_degrees);
                self.relocate(target)
            }
            Command::Relocate(location) => self.relocate(location),
            Command::Reset => {
                self.reset();
                CommandOutcome::Reset
            }
        };
        if let CommandOutcome::Guarded(err) = outcome {
            log::debug!("guarded: {}", err);
        }
        outcome
    }

    pub fn pickup(&mut self, position: Cell) -> CommandOutcome {
        let Some(cache) = self.active.get_mut(position) else {
            return CommandOutcome::Guarded(GameError::CacheNotActive(position));
        };
        match self.inventory.pickup(cache, &mut self.store) {
            Ok(coin) => CommandOutcome::PickedUp(coin),
            Err(err) => CommandOutcome::Guarded(err),
        }
    }

    pub fn drop(&mut self, position: Cell) -> CommandOutcome {
        let Some(cache) = self.active.get_mut(position) else {
            return CommandOutcome::Guarded(GameError::CacheNotActive(position));
        };
        match self.inventory.drop(cache, &mut self.store) {
            Ok(coin) => CommandOutcome::Dropped(coin),
            Err(err) => CommandOutcome::Guarded(err),
        }
    }

    /// Moves the player; crossing into another cell clears the view and repopulates it.
    pub fn relocate(&mut self, location: LatLng) -> CommandOutcome {
        let from = self.player_cell();
        let to = self.config.cell_of(location);
        self.player_location = location;
        if from == to {
            return CommandOutcome::Unchanged;
        }

        self.player_cell = self.registry.intern(to);
        self.regenerate();
        CommandOutcome::Moved { from, to }
    }

    /// Drops every memento and coin, puts the player back at the origin and repopulates.
    pub fn reset(&mut self) {
        log::info!("resetting game state");
        // discarded without a flush, nothing of the old game may survive
        self.active = ActiveCaches::default();
        self.store.clear_all();
        self.inventory.clear();
        self.player_location = self.config.origin;
        self.player_cell = self.registry.intern(self.config.cell_of(self.config.origin));
        self.regenerate();
    }

    /// Current state in persistable form. Active caches are flushed first.
    pub fn snapshot(&mut self) -> GameSnapshot {
        GenerationEngine::flush(&self.active, &mut self.store);
        GameSnapshot {
            player_location: self.player_location,
            inventory: self.inventory.clone(),
            cache_mementos: self.store.clone(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_location(&self) -> LatLng {
        self.player_location
    }

    pub fn player_cell(&self) -> Cell {
        self.registry[self.player_cell]
    }

    pub fn player_cell_id(&self) -> CellId {
        self.player_cell
    }

    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    pub fn store(&self) -> &CacheStateStore {
        &self.store
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn active_caches(&self) -> &ActiveCaches {
        &self.active
    }

    pub fn cache(&self, position: Cell) -> Option<&Cache> {
        self.active.get(position)
    }

    /// Popup content for the cache at `position`, if it is in view.
    pub fn popup(&self, position: Cell) -> Option<CachePopup> {
        self.active
            .get(position)
            .map(|cache| CachePopup::new(cache, &self.inventory))
    }

    /// Clear then populate, strictly in that order.
    fn regenerate(&mut self) {
        let previous = mem::take(&mut self.active);
        self.engine.clear(previous, &mut self.store);
        let center = self.player_cell();
        self.active = self.engine.populate(
            center,
            self.config.neighborhood_radius,
            self.config.spawn_probability,
            &mut self.store,
        );
    }
}
