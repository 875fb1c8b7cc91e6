use anyhow::Context;
use geocoin_core::GameConfig;
use std::path::Path;

/// Settings from the command line that win over the config file.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) radius: Option<u32>,
    pub(crate) spawn_probability: Option<f64>,
}

/// Reads a JSON [`GameConfig`]; fields it leaves out keep their defaults.
pub(crate) fn load(path: &Path) -> anyhow::Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

pub(crate) fn resolve(file: Option<&Path>, overrides: Overrides) -> anyhow::Result<GameConfig> {
    let mut config = match file {
        Some(path) => load(path)?,
        None => GameConfig::default(),
    };
    if let Some(radius) = overrides.radius {
        config.neighborhood_radius = radius;
    }
    if let Some(spawn_probability) = overrides.spawn_probability {
        config.spawn_probability = spawn_probability;
    }
    let config = config.sanitized();
    log::debug!("game config: {:?}", config);
    Ok(config)
}
