use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

/// Observer for playback requests; mixing and decoding live elsewhere.
pub trait AudioCallback {
    fn sound_play(&self, _path: &Path, _volume: f32, _pitch: f32) {}
    fn sound_stop(&self, _path: &Path) {}
    fn movie_volume(&self, _volume: f32) {}
}

impl fmt::Debug for dyn AudioCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AudioCallback")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    SoundPlay {
        path: PathBuf,
        volume: f32,
        pitch: f32,
    },
    SoundStop {
        path: PathBuf,
    },
    MovieVolume {
        volume: f32,
    },
}

#[derive(Clone, Default)]
pub struct RecordingAudioCallback {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudioCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.borrow().clone()
    }
}

impl AudioCallback for RecordingAudioCallback {
    fn sound_play(&self, path: &Path, volume: f32, pitch: f32) {
        self.events.borrow_mut().push(AudioEvent::SoundPlay {
            path: path.to_path_buf(),
            volume,
            pitch,
        });
    }

    fn sound_stop(&self, path: &Path) {
        self.events.borrow_mut().push(AudioEvent::SoundStop {
            path: path.to_path_buf(),
        });
    }

    fn movie_volume(&self, volume: f32) {
        self.events
            .borrow_mut()
            .push(AudioEvent::MovieVolume { volume });
    }
}
