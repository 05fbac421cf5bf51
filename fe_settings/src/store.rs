use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::{FrontendConfig, GameEntry, ListConfig};
use crate::info::{InfoField, RotationState, SoundKind};
use crate::provider::FrontendSettings;

pub const LAYOUT_SCRIPT: &str = "layout.lua";
const DEFAULT_ARTWORK_ROLE: &str = "snap";
const ARTWORK_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "mp4", "avi", "mkv", "flv", "mpg",
];
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-process data provider backed by a [`FrontendConfig`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: FrontendConfig,
    base_dir: PathBuf,
    current_list: usize,
    selections: Vec<usize>,
    layout_variants: BTreeMap<String, usize>,
}

impl SettingsStore {
    pub fn new(config: FrontendConfig, base_dir: impl Into<PathBuf>) -> Self {
        let selections = vec![0; config.lists.len()];
        Self {
            config,
            base_dir: base_dir.into(),
            current_list: 0,
            selections,
            layout_variants: BTreeMap::new(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: FrontendConfig =
            serde_json::from_str(&data).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::new(config, base_dir))
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn current_list_index(&self) -> usize {
        self.current_list
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn layouts_root(&self) -> PathBuf {
        self.resolve(&self.config.layouts_root)
    }

    fn current(&self) -> Option<&ListConfig> {
        self.config.lists.get(self.current_list)
    }

    fn game_at(&self, offset: i32) -> Option<&GameEntry> {
        let list = self.current()?;
        if list.games.is_empty() {
            return None;
        }
        let selected = self.selections.get(self.current_list).copied().unwrap_or(0);
        let len = list.games.len() as i64;
        let index = (selected as i64 + offset as i64).rem_euclid(len) as usize;
        list.games.get(index)
    }

    fn current_layout_name(&self) -> &str {
        self.current().map(|list| list.layout.as_str()).unwrap_or("")
    }

    fn switch_list(&mut self, step: i64) -> bool {
        let count = self.config.lists.len() as i64;
        if count == 0 {
            return false;
        }
        let previous = self.current_layout_name().to_string();
        self.current_list = (self.current_list as i64 + step).rem_euclid(count) as usize;
        let changed = previous != self.current_layout_name();
        log::debug!(
            "switched to list {} ({}), layout change: {changed}",
            self.current_list,
            self.list_title()
        );
        changed
    }

    /// Script variants in a layout directory: `layout.lua` plus any other
    /// `layout*.lua`, sorted by name.
    fn layout_variants(dir: &Path) -> Vec<PathBuf> {
        let mut variants: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .map(|name| name.starts_with("layout") && name.ends_with(".lua"))
                        .unwrap_or(false)
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        variants.sort();
        variants
    }
}

fn find_with_extensions(dir: &Path, stem: &str, extensions: &[&str]) -> Option<PathBuf> {
    let direct = dir.join(stem);
    if direct.extension().is_some() && direct.is_file() {
        return Some(direct);
    }
    extensions
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

impl FrontendSettings for SettingsStore {
    fn lists_count(&self) -> usize {
        self.config.lists.len()
    }

    fn change_selection(&mut self, step: i32, wrap: bool) {
        let size = self.list_size();
        if size == 0 {
            return;
        }
        let Some(selected) = self.selections.get_mut(self.current_list) else {
            return;
        };
        let target = *selected as i64 + step as i64;
        let size = size as i64;
        *selected = if wrap {
            target.rem_euclid(size) as usize
        } else {
            target.clamp(0, size - 1) as usize
        };
    }

    fn next_list(&mut self) -> bool {
        self.switch_list(1)
    }

    fn prev_list(&mut self) -> bool {
        self.switch_list(-1)
    }

    fn toggle_layout(&mut self) {
        let name = self.current_layout_name().to_string();
        let count = Self::layout_variants(&self.current_layout_dir()).len().max(1);
        let variant = self.layout_variants.entry(name).or_insert(0);
        *variant = (*variant + 1) % count;
    }

    fn game_info(&self, offset: i32, field: InfoField) -> String {
        self.game_at(offset)
            .map(|game| game.field(field).to_string())
            .unwrap_or_default()
    }

    fn list_title(&self) -> String {
        self.current().map(|list| list.name.clone()).unwrap_or_default()
    }

    fn list_size(&self) -> usize {
        self.current().map(|list| list.games.len()).unwrap_or(0)
    }

    fn selection_index(&self) -> Option<usize> {
        if self.list_size() == 0 {
            return None;
        }
        self.selections.get(self.current_list).copied()
    }

    fn artwork_file(&self, role: &str, offset: i32) -> Option<PathBuf> {
        let role = if role.is_empty() {
            DEFAULT_ARTWORK_ROLE
        } else {
            role
        };
        let dir = self.current()?.artwork.get(role)?;
        let game = self.game_at(offset)?;
        find_with_extensions(&self.resolve(dir), &game.name, ARTWORK_EXTENSIONS)
    }

    fn autorotate(&self) -> RotationState {
        self.config.autorotate
    }

    fn screensaver_timeout(&self) -> Duration {
        Duration::from_secs(self.config.screensaver.timeout_secs)
    }

    fn screensaver_script(&self) -> PathBuf {
        self.layouts_root()
            .join(&self.config.screensaver.layout)
            .join(LAYOUT_SCRIPT)
    }

    fn current_layout_script(&self) -> PathBuf {
        let dir = self.current_layout_dir();
        let variants = Self::layout_variants(&dir);
        let chosen = self
            .layout_variants
            .get(self.current_layout_name())
            .copied()
            .unwrap_or(0);
        variants
            .get(chosen % variants.len().max(1))
            .cloned()
            .unwrap_or_else(|| dir.join(LAYOUT_SCRIPT))
    }

    fn current_layout_dir(&self) -> PathBuf {
        self.layouts_root().join(self.current_layout_name())
    }

    fn layout_global_script(&self) -> PathBuf {
        self.layouts_root().join(&self.config.global_script)
    }

    fn font_file(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        find_with_extensions(&self.resolve(&self.config.fonts_dir), name, FONT_EXTENSIONS)
    }

    fn is_muted(&self) -> bool {
        self.config.volumes.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.config.volumes.muted = muted;
    }

    fn play_volume(&self, kind: SoundKind) -> f32 {
        if self.config.volumes.muted {
            return 0.0;
        }
        let volume = match kind {
            SoundKind::Sound => self.config.volumes.sound,
            SoundKind::Movie => self.config.volumes.movie,
        };
        f32::from(volume.min(100))
    }

    fn resource(&self, key: &str) -> String {
        self.config
            .resources
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str) -> GameEntry {
        GameEntry {
            name: name.to_string(),
            title: name.to_uppercase(),
            ..GameEntry::default()
        }
    }

    fn store() -> SettingsStore {
        let config = FrontendConfig {
            lists: vec![
                ListConfig {
                    name: "Arcade".to_string(),
                    layout: "basic".to_string(),
                    games: vec![game("a"), game("b"), game("c"), game("d")],
                    ..ListConfig::default()
                },
                ListConfig {
                    name: "Shooters".to_string(),
                    layout: "basic".to_string(),
                    games: vec![game("x")],
                    ..ListConfig::default()
                },
                ListConfig {
                    name: "Consoles".to_string(),
                    layout: "grid".to_string(),
                    games: Vec::new(),
                    ..ListConfig::default()
                },
            ],
            ..FrontendConfig::default()
        };
        SettingsStore::new(config, "/frontend")
    }

    #[test]
    fn selection_wraps_or_clamps() {
        let mut store = store();
        store.change_selection(-1, true);
        assert_eq!(store.selection_index(), Some(3));
        store.change_selection(1, true);
        assert_eq!(store.selection_index(), Some(0));
        store.change_selection(10, false);
        assert_eq!(store.selection_index(), Some(3));
        store.change_selection(-10, false);
        assert_eq!(store.selection_index(), Some(0));
    }

    #[test]
    fn game_info_reads_relative_to_selection() {
        let mut store = store();
        store.change_selection(1, true);
        assert_eq!(store.game_info(0, InfoField::Name), "b");
        assert_eq!(store.game_info(-2, InfoField::Title), "D");
        assert_eq!(store.game_info(3, InfoField::Name), "a");
    }

    #[test]
    fn list_switch_reports_layout_changes() {
        let mut store = store();
        assert!(!store.next_list(), "Arcade -> Shooters keeps the layout");
        assert!(store.next_list(), "Shooters -> Consoles switches layout");
        assert_eq!(store.list_size(), 0);
        assert_eq!(store.selection_index(), None);
        assert_eq!(store.game_info(0, InfoField::Name), "");
        assert!(store.next_list(), "wraps back to Arcade");
        assert_eq!(store.current_list_index(), 0);
        assert!(store.prev_list());
        assert_eq!(store.list_title(), "Consoles");
    }

    #[test]
    fn layout_paths_follow_config() {
        let store = store();
        assert_eq!(
            store.current_layout_dir(),
            PathBuf::from("/frontend/layouts/basic")
        );
        assert_eq!(
            store.current_layout_script(),
            PathBuf::from("/frontend/layouts/basic/layout.lua")
        );
        assert_eq!(
            store.screensaver_script(),
            PathBuf::from("/frontend/layouts/screensaver/layout.lua")
        );
        assert_eq!(
            store.layout_global_script(),
            PathBuf::from("/frontend/layouts/global.lua")
        );
    }

    #[test]
    fn mute_zeroes_volumes() {
        let mut store = store();
        assert_eq!(store.play_volume(SoundKind::Movie), 100.0);
        store.set_muted(true);
        assert_eq!(store.play_volume(SoundKind::Movie), 0.0);
        assert_eq!(store.play_volume(SoundKind::Sound), 0.0);
    }

    #[test]
    fn resources_fall_back_to_key() {
        let mut store = store();
        assert_eq!(store.resource("No lists configured."), "No lists configured.");
        store
            .config
            .resources
            .insert("No lists configured.".into(), "Keine Listen.".into());
        assert_eq!(store.resource("No lists configured."), "Keine Listen.");
    }
}
