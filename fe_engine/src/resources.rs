//! Texture containers and script sounds owned by the currently loaded layout.
//!
//! Every entry lives in a slot map; clearing the pool bumps the slot
//! versions, so handles kept by a previous layout generation stop resolving.

use std::path::{Path, PathBuf};

use fe_settings::FrontendSettings;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TextureId;
    pub struct SoundId;
}

const MOVIE_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "flv", "mpg", "mpeg", "mov", "webm"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    /// Resolved from the current selection on every selection change.
    Artwork { role: String },
    /// Fixed file inside the layout directory.
    Static { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MovieState {
    pub frame: u64,
}

#[derive(Debug, Clone)]
pub struct TextureContainer {
    source: TextureSource,
    index_offset: i32,
    resolved: Option<PathBuf>,
    size: Option<(u32, u32)>,
    movie_enabled: bool,
    play_state: bool,
    volume: f32,
    movie: Option<MovieState>,
}

impl TextureContainer {
    pub fn artwork(role: impl Into<String>) -> Self {
        Self::with_source(TextureSource::Artwork { role: role.into() })
    }

    pub fn static_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut container = Self::with_source(TextureSource::Static { path: path.clone() });
        container.bind(Some(path));
        container
    }

    fn with_source(source: TextureSource) -> Self {
        Self {
            source,
            index_offset: 0,
            resolved: None,
            size: None,
            movie_enabled: true,
            play_state: true,
            volume: 100.0,
            movie: None,
        }
    }

    fn bind(&mut self, path: Option<PathBuf>) {
        if path == self.resolved {
            return;
        }
        self.size = path.as_deref().and_then(probe_size);
        self.resolved = path;
        self.movie = None;
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn is_artwork(&self) -> bool {
        matches!(self.source, TextureSource::Artwork { .. })
    }

    pub fn resolved(&self) -> Option<&Path> {
        self.resolved.as_deref()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn index_offset(&self) -> i32 {
        self.index_offset
    }

    pub fn set_index_offset(&mut self, offset: i32) {
        self.index_offset = offset;
    }

    pub fn movie_enabled(&self) -> bool {
        self.movie_enabled
    }

    pub fn set_movie_enabled(&mut self, enabled: bool) {
        self.movie_enabled = enabled;
        if !enabled {
            self.movie = None;
        }
    }

    pub fn play_state(&self) -> bool {
        self.play_state
    }

    /// Pauses or resumes movie playback without losing the current frame.
    pub fn set_play_state(&mut self, playing: bool) {
        self.play_state = playing;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 100.0);
    }

    pub fn movie(&self) -> Option<MovieState> {
        self.movie
    }

    pub fn is_movie(&self) -> bool {
        self.resolved.as_deref().map(is_movie_file).unwrap_or(false)
    }

    /// Re-resolves artwork against the new selection. Static assets keep
    /// their binding. Returns true when the bound asset changed.
    pub fn on_new_selection(&mut self, settings: &dyn FrontendSettings) -> bool {
        let TextureSource::Artwork { role } = &self.source else {
            return false;
        };
        let next = settings.artwork_file(role, self.index_offset);
        let changed = next != self.resolved;
        self.bind(next);
        // a new selection always restarts the delayed movie start
        self.movie = None;
        changed
    }

    /// Advances per-frame playback state; true when the visible frame changed.
    pub fn tick(&mut self) -> bool {
        if !self.movie_enabled || !self.play_state || !self.is_movie() {
            return false;
        }
        match self.movie.as_mut() {
            Some(state) => state.frame += 1,
            None => {
                log::debug!(
                    "starting movie {}",
                    self.resolved
                        .as_deref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default()
                );
                self.movie = Some(MovieState::default());
            }
        }
        true
    }
}

fn is_movie_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MOVIE_EXTENSIONS
                .iter()
                .any(|movie| movie.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn probe_size(path: &Path) -> Option<(u32, u32)> {
    if is_movie_file(path) {
        return None;
    }
    match image::image_dimensions(path) {
        Ok(size) => Some(size),
        Err(err) => {
            log::debug!("no texture size for {}: {err}", path.display());
            None
        }
    }
}

/// Sound object created by a layout script.
#[derive(Debug, Clone)]
pub struct ScriptSound {
    path: Option<PathBuf>,
    volume: f32,
    pitch: f32,
    position: [f32; 3],
    playing: bool,
}

impl ScriptSound {
    pub fn new(volume: f32) -> Self {
        Self {
            path: None,
            volume: volume.clamp(0.0, 100.0),
            pitch: 1.0,
            position: [0.0; 3],
            playing: false,
        }
    }

    /// Binds the sound to a file; a missing file leaves it silent.
    pub fn load(&mut self, path: PathBuf) -> bool {
        self.playing = false;
        if path.is_file() {
            self.path = Some(path);
            true
        } else {
            log::warn!("sound file not found: {}", path.display());
            self.path = None;
            false
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Marks the sound as playing; false when nothing is loaded.
    pub fn play(&mut self) -> bool {
        self.playing = self.path.is_some();
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 100.0);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn position_mut(&mut self) -> &mut [f32; 3] {
        &mut self.position
    }
}

#[derive(Debug, Default)]
pub struct ResourcePool {
    textures: SlotMap<TextureId, TextureContainer>,
    sounds: SlotMap<SoundId, ScriptSound>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, texture: TextureContainer) -> TextureId {
        self.textures.insert(texture)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureContainer> {
        self.textures.get(id)
    }

    pub fn texture_mut(&mut self, id: TextureId) -> Option<&mut TextureContainer> {
        self.textures.get_mut(id)
    }

    pub fn textures_mut(&mut self) -> impl Iterator<Item = &mut TextureContainer> {
        self.textures.values_mut()
    }

    pub fn add_sound(&mut self, sound: ScriptSound) -> SoundId {
        self.sounds.insert(sound)
    }

    pub fn sound(&self, id: SoundId) -> Option<&ScriptSound> {
        self.sounds.get(id)
    }

    pub fn sound_mut(&mut self, id: SoundId) -> Option<&mut ScriptSound> {
        self.sounds.get_mut(id)
    }

    pub fn sounds_mut(&mut self) -> impl Iterator<Item = &mut ScriptSound> {
        self.sounds.values_mut()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.sounds.is_empty()
    }

    /// Releases textures before sounds.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.sounds.clear();
    }
}
