use std::path::PathBuf;
use std::time::Duration;

use crate::info::{InfoField, RotationState, SoundKind};

/// Everything the presentation engine asks of the game-list/settings layer.
pub trait FrontendSettings {
    fn lists_count(&self) -> usize;

    /// Moves the selection by `step` games. With `wrap` unset the selection
    /// clamps at either end of the list.
    fn change_selection(&mut self, step: i32, wrap: bool);

    /// Switches to the next list; true when the new list uses another layout.
    fn next_list(&mut self) -> bool;

    /// Switches to the previous list; true when the new list uses another layout.
    fn prev_list(&mut self) -> bool;

    /// Cycles to the next layout script variant of the current layout.
    fn toggle_layout(&mut self);

    /// Field of the game `offset` entries away from the current selection.
    fn game_info(&self, offset: i32, field: InfoField) -> String;

    fn list_title(&self) -> String;
    fn list_size(&self) -> usize;
    fn selection_index(&self) -> Option<usize>;

    /// Asset of the given artwork role for the game `offset` entries away
    /// from the current selection.
    fn artwork_file(&self, role: &str, offset: i32) -> Option<PathBuf>;

    fn autorotate(&self) -> RotationState;

    /// Idle time before the screensaver starts; zero disables it.
    fn screensaver_timeout(&self) -> Duration;
    fn screensaver_script(&self) -> PathBuf;
    fn current_layout_script(&self) -> PathBuf;
    fn current_layout_dir(&self) -> PathBuf;
    fn layout_global_script(&self) -> PathBuf;

    fn font_file(&self, name: &str) -> Option<PathBuf>;

    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Effective playback volume (0-100) for the sound category.
    fn play_volume(&self, kind: SoundKind) -> f32;

    /// Localised text for a user-facing message.
    fn resource(&self, key: &str) -> String;
}
