use geocoin_core::{Bounds, CachePopup, RenderSurface};
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug)]
struct Region {
    bounds: Bounds,
    popup: Option<CachePopup>,
}

/// Render surface that lays regions out as text lines.
#[derive(Debug, Default)]
pub(crate) struct TextSurface {
    next_handle: u32,
    regions: BTreeMap<u32, Region>,
}

impl TextSurface {
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        for region in self.regions.values() {
            let Some(popup) = &region.popup else {
                continue;
            };
            let actions = match (popup.can_pick_up, popup.can_drop) {
                (true, true) => "pick up | drop",
                (true, false) => "pick up",
                (false, true) => "drop",
                (false, false) => "-",
            };
            let _ = writeln!(
                out,
                "[{:.5}, {:.5}] {} [{}]",
                region.bounds.south_west.lat,
                region.bounds.south_west.lng,
                popup.message(),
                actions
            );
        }
        out
    }

    pub(crate) fn len(&self) -> usize {
        self.regions.len()
    }
}

impl RenderSurface for TextSurface {
    type Handle = u32;

    fn render_region(&mut self, bounds: Bounds) -> Self::Handle {
        self.next_handle += 1;
        self.regions.insert(
            self.next_handle,
            Region {
                bounds,
                popup: None,
            },
        );
        self.next_handle
    }

    fn remove_region(&mut self, handle: Self::Handle) {
        self.regions.remove(&handle);
    }

    fn attach_popup(&mut self, handle: &Self::Handle, popup: CachePopup) {
        match self.regions.get_mut(handle) {
            Some(region) => region.popup = Some(popup),
            None => log::warn!("popup for unknown region {}", handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{Cell, GameConfig, GameState, LatLng, SurfaceSync};

    #[test]
    fn renders_one_line_per_cache_in_view() {
        let state = GameState::new(GameConfig::new(LatLng::new(0., 0.), 1, 1.));
        let mut surface = TextSurface::default();
        let mut sync = SurfaceSync::new();

        sync.sync(&mut surface, &state);
        let text = surface.render();

        assert_eq!(surface.len(), 5);
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains(r#"cache here at "0,0""#));
    }

    #[test]
    fn region_without_popup_is_not_listed() {
        let mut surface = TextSurface::default();
        surface.render_region(Cell::new(0, 0).bounds(1e-4));

        assert!(surface.render().is_empty());
    }
}
