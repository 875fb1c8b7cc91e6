use anyhow::{Context, bail};
use geocoin_core::{LatLng, LocationCallback, LocationProvider};
use std::path::Path;

/// Location provider replaying a recorded track: one `lat,lng` pair per line, `#` comments.
pub(crate) struct TrackFile {
    points: Vec<LatLng>,
    subscribers: Vec<Option<LocationCallback>>,
}

impl TrackFile {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read track {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid track {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> anyhow::Result<Self> {
        let mut points = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((lat, lng)) = line.split_once(',') else {
                bail!("line {}: expected \"lat,lng\", got {:?}", index + 1, line);
            };
            let lat = lat
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad latitude", index + 1))?;
            let lng = lng
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad longitude", index + 1))?;
            points.push(LatLng::new(lat, lng));
        }
        log::debug!("loaded track with {} points", points.len());
        Ok(Self {
            points,
            subscribers: Vec::new(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// Delivers every point, in order, to every current subscriber.
    pub(crate) fn replay(&mut self) {
        for &point in &self.points {
            for on_update in self.subscribers.iter_mut().flatten() {
                on_update(point);
            }
        }
    }
}

impl LocationProvider for TrackFile {
    type Handle = usize;

    fn subscribe(&mut self, on_update: LocationCallback) -> Self::Handle {
        self.subscribers.push(Some(on_update));
        self.subscribers.len() - 1
    }

    fn unsubscribe(&mut self, handle: Self::Handle) {
        if let Some(slot) = self.subscribers.get_mut(handle) {
            *slot = None;
        }
    }
}
