use std::time::Duration;

use crate::clock::ManualClock;
use crate::scene::SceneFrame;

/// Target the presenter draws onto during blocking transitions.
pub trait RenderSurface {
    fn clear(&mut self);
    fn draw(&mut self, frame: &SceneFrame);
    fn display(&mut self);
}

/// Optional surface argument. `None` means something else owns the screen.
pub type SurfaceRef<'a> = Option<&'a mut (dyn RenderSurface + 'static)>;

/// Surface that keeps the last drawn frame and counts presents. When given a
/// manual clock it advances it on every present, like a vsynced display.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    clears: usize,
    presents: usize,
    last_frame: Option<SceneFrame>,
    clock: Option<(ManualClock, Duration)>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: ManualClock, frame_time: Duration) -> Self {
        Self {
            clock: Some((clock, frame_time)),
            ..Self::default()
        }
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.last_frame.as_ref()
    }
}

impl RenderSurface for HeadlessSurface {
    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw(&mut self, frame: &SceneFrame) {
        self.last_frame = Some(frame.clone());
    }

    fn display(&mut self) {
        self.presents += 1;
        if let Some((clock, frame_time)) = &self.clock {
            clock.advance(*frame_time);
        }
    }
}
