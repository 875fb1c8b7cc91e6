use alloc::vec::Vec;

use crate::*;

/// A [`GameState`] bound to durable storage: every state change is saved before control returns.
#[derive(Debug)]
pub struct Game<S> {
    state: GameState,
    persistence: PersistenceAdapter<S>,
}

impl<S: BlobStorage> Game<S> {
    /// Resumes the saved game in `storage`, or starts fresh when there is none or it is unreadable.
    pub fn open(config: GameConfig, storage: S) -> Self {
        let persistence = PersistenceAdapter::new(storage);
        let state = match persistence.load() {
            Some(snapshot) => {
                log::debug!(
                    "resuming saved game: {} coins held, {} caches remembered",
                    snapshot.inventory.len(),
                    snapshot.cache_mementos.len()
                );
                GameState::from_snapshot(config, snapshot)
            }
            None => GameState::new(config),
        };
        Self { state, persistence }
    }

    pub fn dispatch(
        &mut self,
        command: Command,
    ) -> core::result::Result<CommandOutcome, PersistenceError> {
        if let Command::Reset = command {
            self.persistence.reset()?;
        }

        let outcome = self.state.apply(command);
        match outcome {
            // storage stays empty until the next change
            CommandOutcome::Reset => {}
            outcome if outcome.has_update() => self.save()?,
            _ => {}
        }
        Ok(outcome)
    }

    /// Feeds every queued location update through [`dispatch`](Self::dispatch).
    pub fn drain_locations(
        &mut self,
        feed: &LocationFeed,
    ) -> core::result::Result<Vec<CommandOutcome>, PersistenceError> {
        feed.take_pending()
            .into_iter()
            .map(|location| self.dispatch(Command::Relocate(location)))
            .collect()
    }

    pub fn save(&mut self) -> core::result::Result<(), PersistenceError> {
        let snapshot = self.state.snapshot();
        self.persistence.save(&snapshot)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }
}
