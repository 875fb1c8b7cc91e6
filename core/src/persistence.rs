use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::de::Error as _;
use serde::ser::{Error as _, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::*;

/// Name a value is stored under in a [`BlobStorage`].
pub trait StorageKey {
    const KEY: &'static str;
}

/// Durable string storage, in the shape of the browser's local storage.
pub trait BlobStorage {
    fn read(&self, key: &str) -> core::result::Result<Option<String>, PersistenceError>;
    fn write(&mut self, key: &str, blob: &str) -> core::result::Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> core::result::Result<(), PersistenceError>;
}

/// Volatile storage, for tests and sessions that should not outlive the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    blobs: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl BlobStorage for MemoryStorage {
    fn read(&self, key: &str) -> core::result::Result<Option<String>, PersistenceError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> core::result::Result<(), PersistenceError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> core::result::Result<(), PersistenceError> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// Everything that survives a restart: where the player is, what they carry, and every cache
/// memento.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub player_location: LatLng,
    pub inventory: Inventory,
    pub cache_mementos: CacheStateStore,
}

impl GameSnapshot {
    /// Initial state: player at `origin`, nothing carried, nothing visited.
    pub fn fresh(origin: LatLng) -> Self {
        Self {
            player_location: origin,
            inventory: Inventory::new(),
            cache_mementos: CacheStateStore::new(),
        }
    }
}

impl StorageKey for GameSnapshot {
    const KEY: &'static str = "geocoin:game:v1";
}

/// Serialized as a list of `[positionKey, serializedMemento]` pairs.
impl Serialize for CacheStateStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (position, memento) in self {
            let encoded = memento.encode().map_err(S::Error::custom)?;
            seq.serialize_element(&(position.key(), encoded))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CacheStateStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let entries = Vec::<(String, String)>::deserialize(deserializer)?;
        Self::try_from(entries).map_err(D::Error::custom)
    }
}

/// Mementos that decode but cannot stand for their position are dropped, so that cell is
/// generated fresh on its next visit. Malformed keys or JSON reject the whole list.
impl TryFrom<Vec<(String, String)>> for CacheStateStore {
    type Error = PersistenceError;

    fn try_from(entries: Vec<(String, String)>) -> core::result::Result<Self, Self::Error> {
        let mut store = Self::new();
        for (key, encoded) in entries {
            let position: Cell = key.parse()?;
            let memento = CacheMemento::decode(&encoded).map_err(PersistenceError::Decode)?;
            if let Err(err) = memento.validate_for(position) {
                log::warn!("forgetting cache memento at {}: {}", position, err);
                continue;
            }
            store.save(position, memento);
        }
        Ok(store)
    }
}

/// Reads and writes the [`GameSnapshot`] blob.
#[derive(Clone, Debug)]
pub struct PersistenceAdapter<S> {
    storage: S,
}

impl<S: BlobStorage> PersistenceAdapter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save(&mut self, snapshot: &GameSnapshot) -> core::result::Result<(), PersistenceError> {
        let blob = serde_json::to_string(snapshot).map_err(PersistenceError::Encode)?;
        self.storage.write(GameSnapshot::KEY, &blob)?;
        log::trace!("saved game ({} bytes)", blob.len());
        Ok(())
    }

    /// Saved game, or `None` when there is none or it cannot be read.
    pub fn load(&self) -> Option<GameSnapshot> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("ignoring unreadable saved game: {}", err);
                None
            }
        }
    }

    pub fn load_or_fresh(&self, origin: LatLng) -> GameSnapshot {
        self.load().unwrap_or_else(|| GameSnapshot::fresh(origin))
    }

    pub fn try_load(&self) -> core::result::Result<Option<GameSnapshot>, PersistenceError> {
        let Some(blob) = self.storage.read(GameSnapshot::KEY)? else {
            log::debug!("no saved game");
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&blob).map_err(PersistenceError::Decode)?;
        Ok(Some(snapshot))
    }

    /// Erases the saved game; callers reinitialize their in-memory state.
    pub fn reset(&mut self) -> core::result::Result<(), PersistenceError> {
        log::info!("erasing saved game");
        self.storage.remove(GameSnapshot::KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
