//! State shared between the presenter and the script bindings.
//!
//! The interpreter's callbacks hold a [`SharedContext`] clone instead of
//! reaching for a process-wide "current presenter". Borrows are never held
//! across a call into the interpreter.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use fe_settings::{FrontendSettings, RotationState, SoundKind};
use glam::{Affine2, Vec2};

use crate::audio::AudioCallback;
use crate::clock::Clock;
use crate::error::PresentError;
use crate::input::InputSource;
use crate::navigation::MoveState;
use crate::resources::{ResourcePool, ScriptSound, SoundId, TextureContainer};
use crate::scene::{
    Bounds, Element, ElementId, ImageElement, ListBoxElement, Presentable, Scene, SceneFrame,
    TextElement,
};
use crate::transform::{render_transform, DisplaySize};
use crate::transitions::CallbackRegistry;

pub type SharedContext = Rc<RefCell<PresentContext>>;

/// Per-layout presentation state.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub base_rotation: RotationState,
    pub toggle_rotation: RotationState,
    pub layout_size: Vec2,
    pub transform: Affine2,
    pub font: Option<PathBuf>,
    pub font_name: String,
    pub screensaver_active: bool,
    /// Directory relative asset and script names resolve against.
    pub dir: PathBuf,
    pub play_movies: bool,
    pub layout_start: Duration,
    pub last_input: Duration,
    pub movie_start: Duration,
}

pub struct PresentContext {
    pub(crate) settings: Box<dyn FrontendSettings>,
    pub(crate) input: Rc<dyn InputSource>,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) audio: Option<Rc<dyn AudioCallback>>,
    pub(crate) display: DisplaySize,
    pub(crate) default_font: Option<PathBuf>,
    pub(crate) scene: Scene,
    pub(crate) pool: ResourcePool,
    pub(crate) layout: LayoutState,
    pub(crate) callbacks: CallbackRegistry,
    pub(crate) move_state: MoveState,
    pub(crate) redraw_requested: bool,
    events: Vec<String>,
}

impl PresentContext {
    pub(crate) fn new(
        settings: Box<dyn FrontendSettings>,
        input: Rc<dyn InputSource>,
        clock: Rc<dyn Clock>,
        display: DisplaySize,
        default_font: Option<PathBuf>,
    ) -> Self {
        let now = clock.now();
        let layout = LayoutState {
            base_rotation: RotationState::None,
            toggle_rotation: RotationState::None,
            layout_size: display.as_vec2(),
            transform: Affine2::IDENTITY,
            font: default_font.clone(),
            font_name: String::new(),
            screensaver_active: false,
            dir: settings.current_layout_dir(),
            play_movies: true,
            layout_start: now,
            last_input: now,
            movie_start: now,
        };
        Self {
            settings,
            input,
            clock,
            audio: None,
            display,
            default_font,
            scene: Scene::new(),
            pool: ResourcePool::new(),
            layout,
            callbacks: CallbackRegistry::default(),
            move_state: MoveState::default(),
            redraw_requested: false,
            events: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn layout_elapsed(&self) -> Duration {
        self.now().saturating_sub(self.layout.layout_start)
    }

    pub fn settings(&self) -> &dyn FrontendSettings {
        self.settings.as_ref()
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub(crate) fn log_event(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn full_display_bounds(&self) -> Bounds {
        let size = self.display.as_vec2();
        Bounds::new(0.0, 0.0, size.x, size.y)
    }

    fn layout_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.layout.dir.join(path)
        }
    }

    /// Adds an image backed by a new pooled texture. Artwork resolves
    /// against the current selection; other names are files in the layout
    /// directory.
    pub(crate) fn add_image(&mut self, is_artwork: bool, name: &str, bounds: Bounds) -> ElementId {
        let mut texture = if is_artwork {
            TextureContainer::artwork(name)
        } else {
            TextureContainer::static_file(self.layout_path(name))
        };
        texture.set_volume(self.settings.play_volume(SoundKind::Movie));
        texture.set_play_state(self.layout.play_movies);
        texture.on_new_selection(self.settings.as_ref());
        let texture = self.pool.add_texture(texture);
        self.redraw_requested = true;
        self.scene
            .add(Element::Image(ImageElement::new(texture, bounds)))
    }

    /// Duplicates an image along with its texture container, so the copy
    /// keeps no link to the original.
    pub(crate) fn add_clone(&mut self, source: ElementId) -> Option<ElementId> {
        let texture_id = self.scene.get(source)?.as_image()?.texture;
        let texture = self.pool.texture(texture_id)?.clone();
        let texture = self.pool.add_texture(texture);
        let id = self.scene.clone_image(source, texture)?;
        self.redraw_requested = true;
        Some(id)
    }

    pub(crate) fn add_text(&mut self, msg: &str, bounds: Bounds) -> ElementId {
        let mut text = TextElement::new(msg, bounds, self.layout.font.clone());
        text.on_new_selection(self.settings.as_ref());
        self.redraw_requested = true;
        self.scene.add(Element::Text(text))
    }

    pub(crate) fn add_listbox(&mut self, bounds: Bounds) -> ElementId {
        let mut list = ListBoxElement::new(bounds, self.layout.font.clone());
        list.on_new_selection(self.settings.as_ref());
        self.redraw_requested = true;
        self.scene.add(Element::ListBox(list))
    }

    pub(crate) fn add_sound(&mut self, name: &str) -> SoundId {
        let mut sound = ScriptSound::new(self.settings.play_volume(SoundKind::Sound));
        sound.load(self.layout_path(name));
        self.pool.add_sound(sound)
    }

    /// Loads a file into an existing sound; relative names use the layout
    /// directory.
    pub(crate) fn load_sound(&mut self, id: SoundId, name: &str) -> Result<bool, PresentError> {
        let path = self.layout_path(name);
        let sound = self.pool.sound_mut(id).ok_or(PresentError::StaleHandle)?;
        Ok(sound.load(path))
    }

    /// Starts a sound; returns the audio observer to notify, if any. The
    /// observer is handed back so it can be called without a borrow held.
    pub(crate) fn play_sound(
        &mut self,
        id: SoundId,
    ) -> Result<Option<(Rc<dyn AudioCallback>, PathBuf, f32, f32)>, PresentError> {
        let sound = self.pool.sound_mut(id).ok_or(PresentError::StaleHandle)?;
        if !sound.play() {
            return Ok(None);
        }
        let Some(path) = sound.path().map(Path::to_path_buf) else {
            return Ok(None);
        };
        let (volume, pitch) = (sound.volume(), sound.pitch());
        Ok(self
            .audio
            .clone()
            .map(|audio| (audio, path, volume, pitch)))
    }

    /// Refreshes artwork bindings and selection-dependent text.
    pub(crate) fn on_new_selection(&mut self) {
        let settings = self.settings.as_ref();
        for texture in self.pool.textures_mut() {
            texture.on_new_selection(settings);
        }
        self.scene.on_new_selection(settings);
        self.layout.movie_start = self.clock.now();
    }

    /// Re-resolves one element after its index offset changed.
    pub(crate) fn refresh_element(&mut self, id: ElementId) {
        let settings = self.settings.as_ref();
        let Some(element) = self.scene.get_mut(id) else {
            return;
        };
        if let Some(texture) = element
            .as_image()
            .and_then(|image| self.pool.texture_mut(image.texture))
        {
            texture.on_new_selection(settings);
        }
        element.on_new_selection(settings);
    }

    pub(crate) fn set_layout_width(&mut self, width: f32) {
        self.layout.layout_size.x = width;
        self.recompute_transform();
        self.redraw_requested = true;
    }

    pub(crate) fn set_layout_height(&mut self, height: f32) {
        self.layout.layout_size.y = height;
        self.recompute_transform();
        self.redraw_requested = true;
    }

    pub(crate) fn set_layout_orient(&mut self, rotation: RotationState) {
        self.layout.base_rotation = rotation;
        self.recompute_transform();
        self.redraw_requested = true;
    }

    /// Switches the font used by elements created afterwards. A name with no
    /// matching font file keeps the current font.
    pub(crate) fn set_layout_font(&mut self, name: &str) {
        self.layout.font_name = name.to_string();
        match self.settings.font_file(name) {
            Some(path) => {
                self.layout.font = Some(path);
                self.redraw_requested = true;
            }
            None => {
                let missing = PresentError::MissingResource {
                    kind: "font",
                    path: PathBuf::from(name),
                };
                log::warn!("{missing}");
            }
        }
    }

    pub(crate) fn recompute_transform(&mut self) {
        self.layout.transform = render_transform(
            self.layout.base_rotation,
            self.layout.toggle_rotation,
            self.layout.layout_size,
            self.display,
        );
    }

    pub fn frame(&self) -> SceneFrame {
        SceneFrame::capture(&self.scene, &self.pool, self.layout.transform)
    }

    /// Releases elements, then textures, then sounds, and resets the
    /// per-layout state. Rotations, mute and the screensaver flag survive.
    pub(crate) fn clear(&mut self) {
        self.scene.clear();
        self.pool.clear();
        self.callbacks.clear();
        self.move_state.reset();
        self.layout.layout_size = self.display.as_vec2();
        self.layout.font = self.default_font.clone();
        self.layout.font_name.clear();
        self.recompute_transform();
    }
}
