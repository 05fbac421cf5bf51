//! Data-provider side of the front-end: the contract the presentation engine
//! consumes (current list, selection, per-game info, layout paths, volumes)
//! plus a JSON-configured implementation of it.

pub mod config;
pub mod info;
pub mod provider;
pub mod store;

pub use config::{FrontendConfig, GameEntry, ListConfig, ScreensaverConfig, VolumeConfig};
pub use info::{InfoField, RotationState, SoundKind};
pub use provider::FrontendSettings;
pub use store::{SettingsError, SettingsStore};
