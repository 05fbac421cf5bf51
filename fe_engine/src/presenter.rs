//! Presentation driver: layout loading, command handling and the per-frame
//! tick.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use fe_settings::{FrontendSettings, InfoField, RotationState, SoundKind};
use serde::{Deserialize, Serialize};

use crate::audio::AudioCallback;
use crate::clock::Clock;
use crate::context::{PresentContext, SharedContext};
use crate::input::{Command, InputEvent, InputSource};
use crate::navigation::{MoveDirection, RepeatDecision};
use crate::scene::{Presentable, Rgba, SceneFrame};
use crate::script_host::ScriptHost;
use crate::surface::{RenderSurface, SurfaceRef};
use crate::transform::{autorotate_toggle, DisplaySize};
use crate::transitions::{run_tick_callbacks, run_transition, TransitionType};

/// Time after a selection change before movies start playing.
pub const MOVIE_START_DELAY: Duration = Duration::from_millis(500);

const NO_LISTS_MESSAGE: &str = "No lists configured.";
const FALLBACK_ARTWORK_COLOR: Rgba = Rgba::new(100, 100, 100, 180);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentOptions {
    pub display: DisplaySize,
    /// Font name resolved through the data provider.
    pub default_font: Option<String>,
    /// Frames a transition callback may keep animating before it is
    /// abandoned. `None` waits for the callback indefinitely.
    pub transition_frame_limit: Option<u32>,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            display: DisplaySize::new(640, 480),
            default_font: None,
            transition_frame_limit: None,
        }
    }
}

pub struct Presenter {
    context: SharedContext,
    host: ScriptHost,
    options: PresentOptions,
}

impl Presenter {
    pub fn new(
        settings: Box<dyn FrontendSettings>,
        input: Rc<dyn InputSource>,
        clock: Rc<dyn Clock>,
        options: PresentOptions,
    ) -> Self {
        let default_font = options.default_font.as_deref().and_then(|name| {
            let found = settings.font_file(name);
            if found.is_none() {
                log::warn!("default font {name} not found; text uses the renderer's font");
            }
            found
        });
        let context = PresentContext::new(settings, input, clock, options.display, default_font);
        let context = Rc::new(RefCell::new(context));
        context.borrow_mut().recompute_transform();
        Self {
            context,
            host: ScriptHost::new(),
            options,
        }
    }

    pub fn with_audio(self, audio: Rc<dyn AudioCallback>) -> Self {
        self.context.borrow_mut().audio = Some(audio);
        self
    }

    pub fn options(&self) -> &PresentOptions {
        &self.options
    }

    pub fn with_settings<R>(&self, f: impl FnOnce(&dyn FrontendSettings) -> R) -> R {
        f(self.context.borrow().settings())
    }

    pub fn with_settings_mut<R>(&self, f: impl FnOnce(&mut dyn FrontendSettings) -> R) -> R {
        f(self.context.borrow_mut().settings.as_mut())
    }

    /// Scene changes made by the callbacks stay pending for the next tick.
    fn transition(&self, kind: TransitionType, variant: i32, surface: SurfaceRef<'_>) {
        let changed = run_transition(
            &self.host,
            &self.context,
            kind,
            variant,
            surface,
            self.options.transition_frame_limit,
        );
        if changed {
            log::debug!("{} callbacks changed the scene", kind.script_name());
        }
    }

    /// Drops every element, texture and sound of the current layout.
    pub fn clear(&mut self) {
        self.context.borrow_mut().clear();
    }

    fn start_scripts(&mut self, script: &Path) {
        let global = {
            let mut ctx = self.context.borrow_mut();
            let now = ctx.now();
            ctx.layout.layout_start = now;
            ctx.layout.last_input = now;
            ctx.layout.dir = script
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(PathBuf::new);
            ctx.log_event(format!("layout.load {}", script.display()));
            ctx.settings.layout_global_script()
        };
        self.host.run_layout(&self.context, &global, script);
    }

    /// Reloads the layout for the current list.
    pub fn load_layout(&mut self, mut surface: SurfaceRef<'_>) {
        let from_screensaver = self.context.borrow().layout.screensaver_active;
        self.transition(TransitionType::EndLayout, 0, surface.as_deref_mut());

        let lists = {
            let mut ctx = self.context.borrow_mut();
            ctx.clear();
            ctx.layout.screensaver_active = false;
            ctx.settings.lists_count()
        };

        if lists == 0 {
            self.host.close();
            {
                let mut ctx = self.context.borrow_mut();
                let message = ctx.settings.resource(NO_LISTS_MESSAGE);
                let bounds = ctx.full_display_bounds();
                ctx.add_text(&message, bounds);
                ctx.log_event("layout.no_lists");
            }
            self.update(true);
            return;
        }

        let script = self.context.borrow().settings.current_layout_script();
        self.start_scripts(&script);

        {
            let mut ctx = self.context.borrow_mut();
            if ctx.scene.is_empty() {
                log::info!("{} added no elements; using the default list", script.display());
                let bounds = ctx.full_display_bounds();
                let background = ctx.add_image(true, "", bounds);
                if let Some(element) = ctx.scene.get_mut(background) {
                    element.placement_mut().color = FALLBACK_ARTWORK_COLOR;
                }
                ctx.add_listbox(bounds);
                ctx.log_event("layout.fallback");
            }
        }

        self.update(true);
        self.transition(
            TransitionType::StartLayout,
            i32::from(from_screensaver),
            surface,
        );
    }

    /// Replaces the current layout with the screensaver layout.
    pub fn load_screensaver(&mut self, mut surface: SurfaceRef<'_>) {
        let from_screensaver = self.context.borrow().layout.screensaver_active;
        self.transition(TransitionType::EndLayout, 1, surface.as_deref_mut());

        let script = {
            let mut ctx = self.context.borrow_mut();
            ctx.clear();
            ctx.layout.screensaver_active = true;
            ctx.log_event("screensaver.start");
            ctx.settings.screensaver_script()
        };
        self.start_scripts(&script);

        self.update(true);
        self.transition(
            TransitionType::StartLayout,
            i32::from(from_screensaver),
            surface,
        );
    }

    /// Re-resolves artwork and selection-dependent text after the selection
    /// or the list changed.
    pub fn update(&mut self, new_list: bool) {
        let mut ctx = self.context.borrow_mut();
        if new_list {
            log::debug!("refreshing scene for list {}", ctx.settings.list_title());
        }
        ctx.on_new_selection();
        ctx.redraw_requested = true;
    }

    pub fn page_size(&self) -> i32 {
        self.context.borrow().scene.page_size()
    }

    fn step_selection(&mut self, direction: MoveDirection, wrap: bool, surface: SurfaceRef<'_>) {
        let step = direction.step(self.page_size());
        self.transition(TransitionType::ToNewSelection, step, surface);
        self.context
            .borrow_mut()
            .settings
            .change_selection(step, wrap);
        self.update(false);
    }

    fn begin_move(
        &mut self,
        direction: MoveDirection,
        event: Option<InputEvent>,
        surface: SurfaceRef<'_>,
    ) {
        {
            let mut ctx = self.context.borrow_mut();
            let now = ctx.now();
            ctx.move_state.begin(direction, event, now);
        }
        self.step_selection(direction, direction.wraps(), surface);
    }

    /// Handles one front-end command. Returns false for commands the
    /// presenter does not act on. Any command wakes the screensaver.
    pub fn handle_event(
        &mut self,
        command: Command,
        event: Option<InputEvent>,
        mut surface: SurfaceRef<'_>,
    ) -> bool {
        let screensaver_active = {
            let mut ctx = self.context.borrow_mut();
            ctx.move_state.reset();
            let now = ctx.now();
            ctx.layout.last_input = now;
            ctx.layout.screensaver_active
        };

        if screensaver_active {
            self.context.borrow_mut().log_event("screensaver.wake");
            self.load_layout(surface);
            return true;
        }

        match command {
            Command::Up => self.begin_move(MoveDirection::Up, event, surface),
            Command::Down => self.begin_move(MoveDirection::Down, event, surface),
            Command::PageUp => self.begin_move(MoveDirection::PageUp, event, surface),
            Command::PageDown => self.begin_move(MoveDirection::PageDown, event, surface),
            Command::ToggleRotateRight => self.toggle_rotate(RotationState::Right),
            Command::ToggleFlip => self.toggle_rotate(RotationState::Flip),
            Command::ToggleRotateLeft => self.toggle_rotate(RotationState::Left),
            Command::ToggleMovie => self.toggle_movie(),
            Command::ToggleMute => {
                self.with_settings_mut(|settings| {
                    let muted = settings.is_muted();
                    settings.set_muted(!muted);
                });
                self.toggle_mute();
            }
            Command::NextList | Command::PrevList => {
                let layout_changed = {
                    let mut ctx = self.context.borrow_mut();
                    if command == Command::NextList {
                        ctx.settings.next_list()
                    } else {
                        ctx.settings.prev_list()
                    }
                };
                if layout_changed {
                    self.load_layout(surface.as_deref_mut());
                } else {
                    self.update(true);
                }
            }
            Command::ToggleLayout => {
                self.context.borrow_mut().settings.toggle_layout();
                self.load_layout(surface);
            }
            _ => return false,
        }
        true
    }

    /// Advances one frame. Returns true when the scene needs redrawing.
    ///
    /// Passing no surface means an overlay owns the screen: transitions do
    /// not animate and the screensaver does not start.
    pub fn tick(&mut self, mut surface: SurfaceRef<'_>) -> bool {
        let mut redraw = false;

        let decision = {
            let mut ctx = self.context.borrow_mut();
            let now = ctx.now();
            let input = ctx.input.clone();
            ctx.move_state.poll(now, input.as_ref())
        };
        if let RepeatDecision::Repeat(direction) = decision {
            self.step_selection(direction, false, surface.as_deref_mut());
            redraw = true;
        }

        {
            let mut ctx = self.context.borrow_mut();
            let since_selection = ctx.now().saturating_sub(ctx.layout.movie_start);
            if ctx.layout.play_movies && since_selection > MOVIE_START_DELAY {
                for texture in ctx.pool.textures_mut() {
                    if texture.tick() {
                        redraw = true;
                    }
                }
            }
        }

        if run_tick_callbacks(&self.host, &self.context) {
            redraw = true;
        }

        if surface.is_some() {
            let start_screensaver = {
                let ctx = self.context.borrow();
                let timeout = ctx.settings.screensaver_timeout();
                let idle = ctx.now().saturating_sub(ctx.layout.last_input);
                !ctx.layout.screensaver_active && !timeout.is_zero() && idle > timeout
            };
            if start_screensaver {
                self.load_screensaver(surface);
                redraw = true;
            }
        }

        redraw
    }

    fn set_play_state_all(&mut self, playing: bool) {
        let mut ctx = self.context.borrow_mut();
        for texture in ctx.pool.textures_mut() {
            texture.set_play_state(playing);
        }
    }

    /// Pauses movies and runs the end-of-layout transition before the
    /// front-end shuts down.
    pub fn stop(&mut self, surface: SurfaceRef<'_>) {
        self.set_play_state_all(false);
        self.transition(TransitionType::EndLayout, 0, surface);
    }

    /// Called before a game is launched.
    pub fn pre_run(&mut self, surface: SurfaceRef<'_>) {
        self.set_play_state_all(false);
        self.transition(TransitionType::ToGame, 0, surface);
    }

    /// Called after a launched game exits.
    pub fn post_run(&mut self, surface: SurfaceRef<'_>) {
        self.perform_autorotate();
        self.transition(TransitionType::FromGame, 0, surface);
        let playing = self.context.borrow().layout.play_movies;
        self.set_play_state_all(playing);
    }

    fn perform_autorotate(&mut self) {
        let mut ctx = self.context.borrow_mut();
        let policy = ctx.settings.autorotate();
        if policy == RotationState::None {
            return;
        }
        let game_rotation = ctx.settings.game_info(0, InfoField::Rotation);
        ctx.layout.toggle_rotation =
            autorotate_toggle(policy, ctx.layout.base_rotation, &game_rotation);
        ctx.recompute_transform();
        ctx.redraw_requested = true;
    }

    pub fn toggle_movie(&mut self) {
        let playing = {
            let mut ctx = self.context.borrow_mut();
            ctx.layout.play_movies = !ctx.layout.play_movies;
            ctx.redraw_requested = true;
            ctx.layout.play_movies
        };
        self.set_play_state_all(playing);
    }

    /// Re-applies the provider's volumes after the mute setting changed.
    pub fn toggle_mute(&mut self) {
        let (audio, movie_volume) = {
            let mut guard = self.context.borrow_mut();
            let ctx = &mut *guard;
            let movie_volume = ctx.settings.play_volume(SoundKind::Movie);
            let sound_volume = ctx.settings.play_volume(SoundKind::Sound);
            for texture in ctx.pool.textures_mut() {
                texture.set_volume(movie_volume);
            }
            for sound in ctx.pool.sounds_mut() {
                sound.set_volume(sound_volume);
            }
            (ctx.audio.clone(), movie_volume)
        };
        if let Some(audio) = audio {
            audio.movie_volume(movie_volume);
        }
    }

    /// Applies `rotation` as the toggle rotation, or clears it when one is
    /// already set.
    pub fn toggle_rotate(&mut self, rotation: RotationState) {
        let mut ctx = self.context.borrow_mut();
        ctx.layout.toggle_rotation = if ctx.layout.toggle_rotation != RotationState::None {
            RotationState::None
        } else {
            rotation
        };
        ctx.recompute_transform();
        ctx.redraw_requested = true;
    }

    pub fn frame(&self) -> SceneFrame {
        self.context.borrow().frame()
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let frame = self.frame();
        surface.clear();
        surface.draw(&frame);
        surface.display();
    }

    pub fn events(&self) -> Vec<String> {
        self.context.borrow().events().to_vec()
    }

    pub fn element_count(&self) -> usize {
        self.context.borrow().scene.len()
    }

    pub fn texture_count(&self) -> usize {
        self.context.borrow().pool.texture_count()
    }

    pub fn sound_count(&self) -> usize {
        self.context.borrow().pool.sound_count()
    }

    pub fn base_rotation(&self) -> RotationState {
        self.context.borrow().layout.base_rotation
    }

    pub fn toggle_rotation(&self) -> RotationState {
        self.context.borrow().layout.toggle_rotation
    }

    pub fn is_screensaver_active(&self) -> bool {
        self.context.borrow().layout.screensaver_active
    }

    pub fn is_playing_movies(&self) -> bool {
        self.context.borrow().layout.play_movies
    }

    pub fn move_direction(&self) -> MoveDirection {
        self.context.borrow().move_state.direction()
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }
}
