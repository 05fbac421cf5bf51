use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use fe_engine::{
    DisplaySize, HeadlessSurface, ManualClock, NullInput, PresentOptions, Presenter,
};
use fe_settings::SettingsStore;
use serde::Serialize;

mod cli;

#[derive(Serialize)]
struct EventLog<'a> {
    events: &'a [String],
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {what} to JSON"))?;
    fs::write(path, json).with_context(|| format!("writing {what} to {}", path.display()))?;
    println!("Saved {what} to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::parse()?;
    init_logging(args.verbose);

    let settings = SettingsStore::from_json_file(&args.config)
        .with_context(|| format!("loading front-end config from {}", args.config.display()))?;

    let clock = ManualClock::new();
    let frame_time = Duration::from_millis(args.frame_ms);
    let options = PresentOptions {
        display: DisplaySize::new(args.width, args.height),
        default_font: args.font.clone(),
        transition_frame_limit: args.transition_frame_limit,
    };
    let mut presenter = Presenter::new(
        Box::new(settings),
        Rc::new(NullInput),
        Rc::new(clock.clone()),
        options,
    );
    let mut surface = HeadlessSurface::with_clock(clock.clone(), frame_time);

    presenter.load_layout(Some(&mut surface));
    presenter.render(&mut surface);

    let mut redraws = 0usize;
    for frame in 0..args.frames {
        let mut handled = false;
        for scheduled in args.commands.iter().filter(|entry| entry.frame == frame) {
            if presenter.handle_event(scheduled.command, None, Some(&mut surface)) {
                handled = true;
            } else {
                log::warn!(
                    "frame {frame}: command {} is not handled by the presenter",
                    scheduled.command.name()
                );
            }
        }
        let redraw = presenter.tick(Some(&mut surface));
        if redraw || handled {
            presenter.render(&mut surface);
            redraws += 1;
        } else {
            clock.advance(frame_time);
        }
    }

    let selection = presenter.with_settings(|settings| {
        settings
            .selection_index()
            .map(|index| index.to_string())
            .unwrap_or_else(|| "-".to_string())
    });
    println!(
        "frames: {}, redraws: {redraws}, presents: {}, selection: {selection}, elements: {}, screensaver: {}",
        args.frames,
        surface.presents(),
        presenter.element_count(),
        presenter.is_screensaver_active()
    );

    if let Some(path) = args.events_json.as_deref() {
        let events = presenter.events();
        write_json(path, &EventLog { events: &events }, "event log")?;
    }
    if let Some(path) = args.frame_json.as_deref() {
        let frame = surface
            .last_frame()
            .cloned()
            .unwrap_or_else(|| presenter.frame());
        write_json(path, &frame, "frame snapshot")?;
    }
    Ok(())
}
