use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use fe_engine::Command;

/// Headless driver that loads the current layout and steps frames.
#[derive(Parser, Debug)]
#[command(about = "Runs a front-end layout headlessly and reports what it drew", version)]
pub struct Args {
    /// Front-end configuration JSON
    #[arg(long)]
    pub config: PathBuf,

    /// Number of frames to step after the layout loads
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// Simulated milliseconds per frame
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Command to issue before a frame, as FRAME:NAME (e.g. 10:down); repeatable
    #[arg(long = "command", value_name = "FRAME:NAME")]
    pub commands: Vec<ScheduledCommand>,

    /// Display width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Display height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Font name used until a layout sets its own
    #[arg(long)]
    pub font: Option<String>,

    /// Abandon a transition callback after this many animated frames
    #[arg(long)]
    pub transition_frame_limit: Option<u32>,

    /// Path to write the presenter event log as JSON
    #[arg(long)]
    pub events_json: Option<PathBuf>,

    /// Path to write the last drawn frame as JSON
    #[arg(long)]
    pub frame_json: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCommand {
    pub frame: u32,
    pub command: Command,
}

impl FromStr for ScheduledCommand {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (frame, name) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("expected FRAME:NAME, got {value:?}"))?;
        let frame = frame
            .trim()
            .parse()
            .with_context(|| format!("invalid frame number in {value:?}"))?;
        let Some(command) = Command::from_name(name.trim()) else {
            bail!("unknown command {name:?}");
        };
        Ok(Self { frame, command })
    }
}

pub fn parse() -> Result<Args> {
    let args = Args::parse();
    if args.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_commands_parse() {
        let parsed: ScheduledCommand = "12:page_down".parse().unwrap();
        assert_eq!(parsed.frame, 12);
        assert_eq!(parsed.command, Command::PageDown);
        assert!("down".parse::<ScheduledCommand>().is_err());
        assert!("3:sideways".parse::<ScheduledCommand>().is_err());
    }
}
