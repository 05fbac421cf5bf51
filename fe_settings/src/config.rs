use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::info::{InfoField, RotationState};

/// On-disk front-end configuration. Relative paths are resolved against the
/// directory holding the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub layouts_root: PathBuf,
    pub fonts_dir: PathBuf,
    /// Script run before every layout script, relative to `layouts_root`.
    pub global_script: String,
    pub screensaver: ScreensaverConfig,
    pub autorotate: RotationState,
    pub volumes: VolumeConfig,
    /// Localised user-facing strings keyed by their English text.
    pub resources: BTreeMap<String, String>,
    pub lists: Vec<ListConfig>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            layouts_root: PathBuf::from("layouts"),
            fonts_dir: PathBuf::from("fonts"),
            global_script: "global.lua".to_string(),
            screensaver: ScreensaverConfig::default(),
            autorotate: RotationState::None,
            volumes: VolumeConfig::default(),
            resources: BTreeMap::new(),
            lists: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensaverConfig {
    /// Layout directory name under `layouts_root`.
    pub layout: String,
    /// Idle seconds before the screensaver starts; zero disables it.
    pub timeout_secs: u64,
}

impl Default for ScreensaverConfig {
    fn default() -> Self {
        Self {
            layout: "screensaver".to_string(),
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub sound: u8,
    pub movie: u8,
    pub muted: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            sound: 100,
            movie: 100,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub name: String,
    /// Layout directory name under `layouts_root`.
    pub layout: String,
    /// Artwork role (e.g. `snap`, `marquee`) to the directory holding it.
    pub artwork: BTreeMap<String, PathBuf>,
    pub games: Vec<GameEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameEntry {
    pub name: String,
    pub title: String,
    pub emulator: String,
    pub cloneof: String,
    pub year: String,
    pub manufacturer: String,
    pub category: String,
    pub players: String,
    pub rotation: String,
    pub control: String,
    pub status: String,
    pub display_count: String,
    pub display_type: String,
    pub alt_romname: String,
    pub alt_title: String,
    pub extra: String,
}

impl GameEntry {
    pub fn field(&self, field: InfoField) -> &str {
        match field {
            InfoField::Name => &self.name,
            InfoField::Title => &self.title,
            InfoField::Emulator => &self.emulator,
            InfoField::Cloneof => &self.cloneof,
            InfoField::Year => &self.year,
            InfoField::Manufacturer => &self.manufacturer,
            InfoField::Category => &self.category,
            InfoField::Players => &self.players,
            InfoField::Rotation => &self.rotation,
            InfoField::Control => &self.control,
            InfoField::Status => &self.status,
            InfoField::DisplayCount => &self.display_count,
            InfoField::DisplayType => &self.display_type,
            InfoField::AltRomname => &self.alt_romname,
            InfoField::AltTitle => &self.alt_title,
            InfoField::Extra => &self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{
            "autorotate": "left",
            "screensaver": { "timeout_secs": 30 },
            "lists": [
                { "name": "Arcade", "layout": "basic",
                  "games": [ { "name": "pacman", "title": "Pac-Man", "rotation": "90" } ] }
            ]
        }"#;
        let config: FrontendConfig = serde_json::from_str(json).expect("config parses");
        assert_eq!(config.autorotate, RotationState::Left);
        assert_eq!(config.screensaver.timeout_secs, 30);
        assert_eq!(config.screensaver.layout, "screensaver");
        assert_eq!(config.global_script, "global.lua");
        assert_eq!(config.volumes.sound, 100);
        let game = &config.lists[0].games[0];
        assert_eq!(game.field(InfoField::Title), "Pac-Man");
        assert_eq!(game.field(InfoField::Rotation), "90");
        assert_eq!(game.field(InfoField::Year), "");
    }
}
