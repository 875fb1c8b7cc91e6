use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::*;

/// Map drawing backend. The core hands it bounds and popup content and never touches pixels.
pub trait RenderSurface {
    type Handle;

    fn render_region(&mut self, bounds: Bounds) -> Self::Handle;
    fn remove_region(&mut self, handle: Self::Handle);
    fn attach_popup(&mut self, handle: &Self::Handle, popup: CachePopup);
}

/// What a cache popup shows and which of its actions are enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachePopup {
    pub position: Cell,
    pub coin_count: usize,
    pub can_pick_up: bool,
    pub can_drop: bool,
}

impl CachePopup {
    pub fn new(cache: &Cache, inventory: &Inventory) -> Self {
        Self {
            position: cache.position(),
            coin_count: cache.len(),
            can_pick_up: !cache.is_empty(),
            can_drop: !inventory.is_empty(),
        }
    }

    pub fn pickup_command(&self) -> Command {
        Command::Pickup(self.position)
    }

    pub fn drop_command(&self) -> Command {
        Command::Drop(self.position)
    }

    pub fn message(&self) -> String {
        format!(
            "There is a cache here at \"{}\". It has {} coins.",
            self.position, self.coin_count
        )
    }
}

/// Keeps a [`RenderSurface`] in step with the active caches: one region per cache in view.
#[derive(Debug)]
pub struct SurfaceSync<H> {
    regions: BTreeMap<Cell, H>,
}

impl<H> Default for SurfaceSync<H> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<H> SurfaceSync<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes regions of caches that left the view, draws new ones, and refreshes every popup.
    pub fn sync<R>(&mut self, surface: &mut R, state: &GameState)
    where
        R: RenderSurface<Handle = H>,
    {
        let active = state.active_caches();
        let stale: Vec<Cell> = self
            .regions
            .keys()
            .copied()
            .filter(|&position| !active.contains(position))
            .collect();
        for position in stale {
            if let Some(handle) = self.regions.remove(&position) {
                surface.remove_region(handle);
            }
        }

        for cache in active {
            let position = cache.position();
            let handle = self
                .regions
                .entry(position)
                .or_insert_with(|| surface.render_region(state.config().bounds_of(position)));
            surface.attach_popup(handle, CachePopup::new(cache, state.inventory()));
        }
    }

    /// Removes every region this sync drew.
    pub fn clear<R>(&mut self, surface: &mut R)
    where
        R: RenderSurface<Handle = H>,
    {
        for (_, handle) in core::mem::take(&mut self.regions) {
            surface.remove_region(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
