use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use fe_engine::{
    AudioEvent, Command, DrawItem, HeadlessSurface, InputEvent, InputSource, JoyAxis, ManualClock,
    MoveDirection, PresentOptions, Presenter, RecordingAudioCallback,
};
use fe_settings::{FrontendConfig, RotationState, SettingsStore};
use serde_json::json;
use tempfile::{tempdir, TempDir};

const DOWN_KEY: i32 = 74;

#[derive(Default)]
struct HeldKeys {
    keys: RefCell<HashSet<i32>>,
}

impl HeldKeys {
    fn press(&self, code: i32) {
        self.keys.borrow_mut().insert(code);
    }

    fn release(&self, code: i32) {
        self.keys.borrow_mut().remove(&code);
    }
}

impl InputSource for HeldKeys {
    fn is_key_pressed(&self, code: i32) -> bool {
        self.keys.borrow().contains(&code)
    }

    fn is_joystick_button_pressed(&self, _device: u32, _button: u32) -> bool {
        false
    }

    fn joystick_axis_position(&self, _device: u32, _axis: JoyAxis) -> f32 {
        0.0
    }
}

struct Fixture {
    dir: TempDir,
    clock: ManualClock,
    input: Rc<HeldKeys>,
}

impl Fixture {
    fn new(layout: &str) -> Result<Self> {
        let fixture = Self {
            dir: tempdir()?,
            clock: ManualClock::new(),
            input: Rc::new(HeldKeys::default()),
        };
        fixture.write("layouts/basic/layout.lua", layout)?;
        Ok(fixture)
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn config(&self, games: usize) -> Result<FrontendConfig> {
        let games: Vec<_> = (0..games)
            .map(|index| {
                json!({
                    "name": format!("g{index}"),
                    "title": format!("Game {index}"),
                    "rotation": if index % 2 == 0 { "0" } else { "90" },
                })
            })
            .collect();
        let config = serde_json::from_value(json!({
            "screensaver": { "layout": "saver", "timeout_secs": 0 },
            "lists": [ { "name": "Arcade", "layout": "basic", "games": games } ]
        }))?;
        Ok(config)
    }

    fn presenter_with(&self, config: FrontendConfig, options: PresentOptions) -> Presenter {
        Presenter::new(
            Box::new(SettingsStore::new(config, self.root())),
            self.input.clone(),
            Rc::new(self.clock.clone()),
            options,
        )
    }

    fn presenter(&self, games: usize) -> Result<Presenter> {
        Ok(self.presenter_with(self.config(games)?, PresentOptions::default()))
    }

    fn at(&self, millis: u64) {
        self.clock.set(Duration::from_millis(millis));
    }
}

fn selection(presenter: &Presenter) -> Option<usize> {
    presenter.with_settings(|settings| settings.selection_index())
}

fn count_events(presenter: &Presenter, event: &str) -> usize {
    presenter.events().iter().filter(|entry| *entry == event).count()
}

fn texts(presenter: &Presenter) -> Vec<String> {
    presenter
        .frame()
        .items
        .into_iter()
        .filter_map(|item| match item {
            DrawItem::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn held_move_repeats_only_after_the_delay() -> Result<()> {
    let fixture = Fixture::new("")?;
    let mut presenter = fixture.presenter(20)?;
    presenter.load_layout(None);

    fixture.input.press(DOWN_KEY);
    let key = InputEvent::Key { code: DOWN_KEY };
    assert!(presenter.handle_event(Command::Down, Some(key), None));
    assert_eq!(selection(&presenter), Some(1));

    fixture.at(499);
    presenter.tick(None);
    assert_eq!(selection(&presenter), Some(1));
    assert_eq!(count_events(&presenter, "transition.to_new_selection 1"), 1);

    fixture.at(501);
    assert!(presenter.tick(None));
    assert_eq!(selection(&presenter), Some(2));
    assert_eq!(count_events(&presenter, "transition.to_new_selection 1"), 2);

    // the repeat restarted the timer
    fixture.at(900);
    presenter.tick(None);
    assert_eq!(selection(&presenter), Some(2));
    assert_eq!(presenter.move_direction(), MoveDirection::Down);
    Ok(())
}

#[test]
fn released_move_stops_without_another_step() -> Result<()> {
    let fixture = Fixture::new("")?;
    let mut presenter = fixture.presenter(20)?;
    presenter.load_layout(None);

    fixture.input.press(DOWN_KEY);
    presenter.handle_event(Command::Down, Some(InputEvent::Key { code: DOWN_KEY }), None);
    fixture.at(300);
    fixture.input.release(DOWN_KEY);

    fixture.at(501);
    presenter.tick(None);
    assert_eq!(selection(&presenter), Some(1));
    assert_eq!(presenter.move_direction(), MoveDirection::None);
    Ok(())
}

#[test]
fn page_size_follows_the_active_list_box() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        local list = fe.add_listbox(0, 0, 640, 160)
        list.charsize = 20
        "#,
    )?;
    let mut presenter = fixture.presenter(30)?;
    presenter.load_layout(None);
    assert_eq!(presenter.page_size(), 8);

    presenter.handle_event(Command::PageDown, None, None);
    assert_eq!(count_events(&presenter, "transition.to_new_selection 8"), 1);
    assert_eq!(selection(&presenter), Some(8));
    Ok(())
}

#[test]
fn page_size_falls_back_without_a_list_box() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_text("[Title]", 0, 0, 320, 20)"#)?;
    let mut presenter = fixture.presenter(30)?;
    presenter.load_layout(None);

    presenter.handle_event(Command::PageDown, None, None);
    assert_eq!(count_events(&presenter, "transition.to_new_selection 5"), 1);
    assert_eq!(selection(&presenter), Some(5));
    assert_eq!(texts(&presenter), vec!["Game 5".to_string()]);

    // page moves clamp at the list ends
    presenter.handle_event(Command::PageUp, None, None);
    presenter.handle_event(Command::PageUp, None, None);
    assert_eq!(selection(&presenter), Some(0));
    Ok(())
}

#[test]
fn empty_layout_gets_the_fallback_scene() -> Result<()> {
    let fixture = Fixture::new("-- nothing here\n")?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);

    assert_eq!(presenter.element_count(), 2);
    let frame = presenter.frame();
    match &frame.items[..] {
        [DrawItem::Image { bounds, color, .. }, DrawItem::ListBox { rows, .. }] => {
            assert_eq!(color.a, 180);
            assert_eq!((bounds.width, bounds.height), (640.0, 480.0));
            assert!(rows.iter().any(|row| row == "Game 0"));
        }
        other => panic!("unexpected fallback scene {other:?}"),
    }
    assert_eq!(count_events(&presenter, "layout.fallback"), 1);
    Ok(())
}

#[test]
fn screensaver_starts_once_and_any_command_wakes_it() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_text("browse", 0, 0, 100, 20)"#)?;
    fixture.write(
        "layouts/saver/layout.lua",
        r#"fe.add_text(ScreenSaverActive and "saver" or "awake", 0, 0, 100, 20)"#,
    )?;
    let mut config = fixture.config(3)?;
    config.screensaver.timeout_secs = 2;
    let mut presenter = fixture.presenter_with(config, PresentOptions::default());
    let mut surface = HeadlessSurface::new();

    presenter.load_layout(Some(&mut surface));
    fixture.at(1_000);
    presenter.tick(Some(&mut surface));
    assert!(!presenter.is_screensaver_active());

    // no screensaver while an overlay owns the screen
    fixture.at(2_500);
    presenter.tick(None);
    assert!(!presenter.is_screensaver_active());

    assert!(presenter.tick(Some(&mut surface)));
    assert!(presenter.is_screensaver_active());
    assert_eq!(texts(&presenter), vec!["saver".to_string()]);

    fixture.at(6_000);
    presenter.tick(Some(&mut surface));
    assert_eq!(count_events(&presenter, "screensaver.start"), 1);

    assert!(presenter.handle_event(Command::Select, None, Some(&mut surface)));
    assert!(!presenter.is_screensaver_active());
    assert_eq!(texts(&presenter), vec!["browse".to_string()]);
    assert_eq!(count_events(&presenter, "transition.start_layout 1"), 1);
    assert_eq!(selection(&presenter), Some(0));
    Ok(())
}

#[test]
fn finished_transition_presents_nothing() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("x", 0, 0, 10, 10)
        calls = 0
        function quick(kind, var, ms)
            calls = calls + 1
            return false
        end
        fe.add_transition_callback("quick")
        "#,
    )?;
    let mut presenter = fixture.presenter(5)?;
    let mut surface = HeadlessSurface::new();
    presenter.load_layout(Some(&mut surface));
    presenter.handle_event(Command::Down, None, Some(&mut surface));

    assert_eq!(surface.presents(), 0);
    assert_eq!(count_events(&presenter, "transition.start_layout 0"), 1);
    assert_eq!(count_events(&presenter, "transition.to_new_selection 1"), 1);
    Ok(())
}

#[test]
fn animating_transition_redraws_until_done() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        local label = fe.add_text("x", 0, 0, 10, 10)
        function fade(kind, var, ms)
            if kind ~= Transition.ToNewSelection then
                return false
            end
            label.alpha = 255 - ms
            return ms < 100
        end
        fe.add_transition_callback("fade")
        "#,
    )?;
    let mut presenter = fixture.presenter(5)?;
    let mut surface = HeadlessSurface::with_clock(fixture.clock.clone(), Duration::from_millis(20));
    presenter.load_layout(Some(&mut surface));
    assert_eq!(surface.presents(), 0);

    presenter.handle_event(Command::Down, None, Some(&mut surface));
    assert_eq!(surface.presents(), 5);
    assert_eq!(surface.clears(), 5);
    match surface.last_frame().map(|frame| &frame.items[..]) {
        Some([DrawItem::Text { color, .. }]) => assert_eq!(color.a, 175),
        other => panic!("unexpected frame {other:?}"),
    }
    assert_eq!(selection(&presenter), Some(1));
    Ok(())
}

#[test]
fn transition_frame_limit_abandons_endless_callbacks() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("x", 0, 0, 10, 10)
        function forever(kind, var, ms) return kind == Transition.ToNewSelection end
        fe.add_transition_callback("forever")
        "#,
    )?;
    let options = PresentOptions {
        transition_frame_limit: Some(3),
        ..PresentOptions::default()
    };
    let mut presenter = fixture.presenter_with(fixture.config(5)?, options);
    let mut surface = HeadlessSurface::new();
    presenter.load_layout(Some(&mut surface));
    presenter.handle_event(Command::Down, None, Some(&mut surface));

    assert_eq!(surface.presents(), 3);
    assert_eq!(count_events(&presenter, "transition.abandoned forever"), 1);
    assert_eq!(selection(&presenter), Some(1));
    Ok(())
}

#[test]
fn clearing_twice_keeps_rotation_and_mute() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.layout.orient = RotateScreen.Right
        fe.add_artwork("snap", 0, 0, 320, 240)
        fe.add_image("background.png")
        fe.add_sound("click.ogg")
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    presenter.handle_event(Command::ToggleMute, None, None);
    assert_eq!(presenter.element_count(), 2);
    assert_eq!(presenter.texture_count(), 2);
    assert_eq!(presenter.sound_count(), 1);

    for _ in 0..2 {
        presenter.clear();
        assert_eq!(presenter.element_count(), 0);
        assert_eq!(presenter.texture_count(), 0);
        assert_eq!(presenter.sound_count(), 0);
        assert_eq!(presenter.base_rotation(), RotationState::Right);
        assert!(presenter.with_settings(|settings| settings.is_muted()));
    }
    Ok(())
}

#[test]
fn script_errors_are_logged_and_loading_continues() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("still here", 0, 0, 100, 20)
        fe.add_ticks_callback("broken_tick")
        function broken_tick(ms) error("tick failed") end
        fe.add_transition_callback("broken_transition")
        function broken_transition(kind, var, ms) error("transition failed") end
        error("layout failed late")
        "#,
    )?;
    fixture.write("layouts/global.lua", "function (")?;
    let mut presenter = fixture.presenter(3)?;
    let mut surface = HeadlessSurface::new();
    presenter.load_layout(Some(&mut surface));

    let global = fixture.root().join("layouts/global.lua");
    let layout = fixture.root().join("layouts/basic/layout.lua");
    assert_eq!(
        count_events(&presenter, &format!("script.error {}", global.display())),
        1
    );
    assert_eq!(
        count_events(&presenter, &format!("script.error {}", layout.display())),
        1
    );
    assert_eq!(texts(&presenter), vec!["still here".to_string()]);

    fixture.at(100);
    presenter.tick(Some(&mut surface));
    presenter.handle_event(Command::Down, None, Some(&mut surface));
    assert_eq!(surface.presents(), 0);
    assert_eq!(selection(&presenter), Some(1));
    Ok(())
}

#[test]
fn callbacks_are_looked_up_when_they_run() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        marker = fe.add_text("none", 0, 0, 100, 20)
        fe.add_ticks_callback("step")
        function step(ms)
            marker.msg = "first " .. ms
            step = function(ms) marker.msg = "second" end
        end
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);

    fixture.at(100);
    assert!(presenter.tick(None));
    assert_eq!(texts(&presenter), vec!["first 100".to_string()]);
    fixture.at(120);
    assert!(presenter.tick(None));
    assert_eq!(texts(&presenter), vec!["second".to_string()]);
    Ok(())
}

#[test]
fn do_nut_runs_scripts_from_the_layout_directory() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.do_nut("missing.lua")
        fe.do_nut("parts/extra.lua")
        fe.add_text("after " .. extra_loaded, 0, 20, 100, 20)
        "#,
    )?;
    fixture.write(
        "layouts/basic/parts/extra.lua",
        r#"
        extra_loaded = "yes"
        fe.add_text("from extra", 0, 0, 100, 20)
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    assert_eq!(
        texts(&presenter),
        vec!["from extra".to_string(), "after yes".to_string()]
    );
    Ok(())
}

#[test]
fn fe_obj_lists_elements_in_creation_order() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_image("bg.png", 10, 20, 30, 40)
        fe.add_listbox(0, 100, 200, 200)
        local first = fe.obj[1]
        local copy = fe.add_clone(first)
        copy.x = 50
        fe.add_text(#fe.obj .. " " .. first.x .. " " .. fe.obj[3].x, 0, 0, 100, 20)
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    assert_eq!(presenter.element_count(), 4);
    assert_eq!(presenter.texture_count(), 2);
    assert_eq!(texts(&presenter), vec!["3 10 50".to_string()]);
    Ok(())
}

#[test]
fn clones_keep_no_link_to_the_original() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        local art = fe.add_artwork("snap", 0, 0, 64, 64)
        local copy = fe.add_clone(art)
        copy.index_offset = 3
        copy.movie_enabled = false
        fe.add_text(art.index_offset .. " " .. tostring(art.movie_enabled) .. " "
            .. copy.index_offset .. " " .. tostring(copy.movie_enabled), 0, 0, 100, 20)
        "#,
    )?;
    let mut presenter = fixture.presenter(5)?;
    presenter.load_layout(None);
    assert_eq!(texts(&presenter), vec!["0 true 3 false".to_string()]);
    assert_eq!(presenter.texture_count(), 2);
    Ok(())
}

#[test]
fn transition_changes_are_reported_by_the_next_tick() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        label = fe.add_text("[Title]", 0, 0, 100, 20)
        function nudge(kind, var, ms)
            if kind == Transition.ToNewSelection then
                label.x = 99
            end
            return false
        end
        fe.add_transition_callback("nudge")
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    fixture.at(16);
    assert!(presenter.tick(None));
    fixture.at(32);
    assert!(!presenter.tick(None));

    presenter.handle_event(Command::Down, None, None);
    fixture.at(48);
    assert!(presenter.tick(None));
    match &presenter.frame().items[..] {
        [DrawItem::Text { bounds, text, .. }] => {
            assert_eq!(bounds.x, 99.0);
            assert_eq!(text, "Game 1");
        }
        other => panic!("unexpected frame {other:?}"),
    }

    fixture.at(64);
    assert!(!presenter.tick(None));
    Ok(())
}

fn movie_frame(presenter: &Presenter) -> Option<u64> {
    presenter.frame().items.iter().find_map(|item| match item {
        DrawItem::Image { movie, .. } => movie.map(|state| state.frame),
        _ => None,
    })
}

#[test]
fn stop_pauses_movies_and_ends_the_layout() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_image("intro.mp4", 0, 0, 64, 64)"#)?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    assert_eq!(count_events(&presenter, "transition.end_layout 0"), 1);

    fixture.at(600);
    presenter.tick(None);
    fixture.at(620);
    presenter.tick(None);
    assert_eq!(movie_frame(&presenter), Some(1));

    presenter.stop(None);
    fixture.at(640);
    presenter.tick(None);
    assert_eq!(movie_frame(&presenter), Some(1));
    assert_eq!(count_events(&presenter, "transition.end_layout 0"), 2);
    Ok(())
}

#[test]
fn toggle_layout_reloads_the_next_script_variant() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_text("standard", 0, 0, 100, 20)"#)?;
    fixture.write(
        "layouts/basic/layout1.lua",
        r#"fe.add_text("variant", 0, 0, 100, 20)"#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    assert_eq!(texts(&presenter), vec!["standard".to_string()]);

    assert!(presenter.handle_event(Command::ToggleLayout, None, None));
    assert_eq!(texts(&presenter), vec!["variant".to_string()]);
    let variant = fixture.root().join("layouts/basic/layout1.lua");
    assert_eq!(
        count_events(&presenter, &format!("layout.load {}", variant.display())),
        1
    );

    presenter.handle_event(Command::ToggleLayout, None, None);
    assert_eq!(texts(&presenter), vec!["standard".to_string()]);
    Ok(())
}

#[test]
fn layout_font_applies_to_elements_created_afterwards() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("before", 0, 0, 100, 20)
        fe.layout.font = "arcade"
        fe.add_text(fe.layout.font, 0, 20, 100, 20)
        fe.add_listbox(0, 40, 100, 100)
        "#,
    )?;
    fixture.write("fonts/arcade.ttf", "")?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);

    let font = Some(fixture.root().join("fonts/arcade.ttf"));
    match &presenter.frame().items[..] {
        [DrawItem::Text { font: first, .. }, DrawItem::Text {
            text,
            font: second,
            ..
        }, DrawItem::ListBox { font: list, .. }] => {
            assert_eq!(first, &None);
            assert_eq!(text, "arcade");
            assert_eq!(second, &font);
            assert_eq!(list, &font);
        }
        other => panic!("unexpected frame {other:?}"),
    }
    Ok(())
}

#[test]
fn text_tokens_follow_the_selection() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("[Title] ([ListEntry]/[ListSize]) [ListTitle]", 0, 0, 300, 20)
        local next = fe.add_text("[Name]", 0, 20, 300, 20)
        next.index_offset = 1
        fe.add_text(fe.game_info(Info.Title, 2), 0, 40, 300, 20)
        "#,
    )?;
    let mut presenter = fixture.presenter(3)?;
    presenter.load_layout(None);
    assert_eq!(
        texts(&presenter),
        vec![
            "Game 0 (1/3) Arcade".to_string(),
            "g1".to_string(),
            "Game 2".to_string()
        ]
    );

    presenter.handle_event(Command::Up, None, None);
    assert_eq!(selection(&presenter), Some(2));
    assert_eq!(texts(&presenter)[..2], ["Game 2 (3/3) Arcade", "g0"]);
    Ok(())
}

#[test]
fn sounds_and_mute_reach_the_audio_callback() -> Result<()> {
    let fixture = Fixture::new(
        r#"
        fe.add_text("x", 0, 0, 10, 10)
        local click = fe.add_sound("click.ogg")
        click.pitch = 2
        click:play()
        "#,
    )?;
    fixture.write("layouts/basic/click.ogg", "")?;
    let audio = RecordingAudioCallback::new();
    let mut presenter = fixture
        .presenter(3)?
        .with_audio(Rc::new(audio.clone()));
    presenter.load_layout(None);
    presenter.handle_event(Command::ToggleMute, None, None);

    let events = audio.events();
    assert_eq!(
        events,
        vec![
            AudioEvent::SoundPlay {
                path: fixture.root().join("layouts/basic/click.ogg"),
                volume: 100.0,
                pitch: 2.0,
            },
            AudioEvent::MovieVolume { volume: 0.0 },
        ]
    );
    Ok(())
}

#[test]
fn autorotate_applies_after_a_game_exits() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_text("x", 0, 0, 10, 10)"#)?;
    let mut config = fixture.config(3)?;
    config.autorotate = RotationState::Left;
    let mut presenter = fixture.presenter_with(config, PresentOptions::default());
    presenter.load_layout(None);

    presenter.pre_run(None);
    presenter.post_run(None);
    assert_eq!(presenter.toggle_rotation(), RotationState::None);

    // g1 is a vertical game
    presenter.handle_event(Command::Down, None, None);
    presenter.pre_run(None);
    presenter.post_run(None);
    assert_eq!(presenter.toggle_rotation(), RotationState::Left);
    assert_eq!(count_events(&presenter, "transition.from_game 0"), 2);
    Ok(())
}

#[test]
fn list_switching_reloads_only_when_the_layout_changes() -> Result<()> {
    let fixture = Fixture::new(r#"fe.add_text("[ListTitle]", 0, 0, 100, 20)"#)?;
    fixture.write("layouts/grid/layout.lua", r#"fe.add_text("grid", 0, 0, 100, 20)"#)?;
    let config: FrontendConfig = serde_json::from_value(json!({
        "screensaver": { "timeout_secs": 0 },
        "lists": [
            { "name": "Arcade", "layout": "basic", "games": [ { "name": "a" } ] },
            { "name": "Shooters", "layout": "basic", "games": [ { "name": "b" } ] },
            { "name": "Consoles", "layout": "grid", "games": [ { "name": "c" } ] }
        ]
    }))?;
    let mut presenter = fixture.presenter_with(config, PresentOptions::default());
    presenter.load_layout(None);
    let loads = |presenter: &Presenter| {
        presenter
            .events()
            .iter()
            .filter(|entry| entry.starts_with("layout.load"))
            .count()
    };
    assert_eq!(loads(&presenter), 1);

    presenter.handle_event(Command::NextList, None, None);
    assert_eq!(loads(&presenter), 1);
    assert_eq!(texts(&presenter), vec!["Shooters".to_string()]);

    presenter.handle_event(Command::NextList, None, None);
    assert_eq!(loads(&presenter), 2);
    assert_eq!(texts(&presenter), vec!["grid".to_string()]);
    Ok(())
}
