//! FS1599 driver configuration

use crate::audio::scene::{Scene, SceneTables};

/// Runtime configuration of one FS1599 instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AmpConfig {
    /// Scene written by the next `reg_init`, after the common table.
    pub next_scene: Scene,
    /// Decoded register tables.
    pub tables: SceneTables,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            next_scene: Scene::Music,
            tables: SceneTables::new(),
        }
    }
}

impl AmpConfig {
    /// Configuration with the given tables and the default scene.
    pub fn with_tables(tables: SceneTables) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }
}
