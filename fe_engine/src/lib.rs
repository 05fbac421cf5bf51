//! Presentation engine for a game-browsing front-end: the scene built by Lua
//! layout scripts, the selection and transition state machines driving it,
//! and the rotation/scale transform it is drawn through.

pub mod audio;
pub mod clock;
pub mod context;
pub mod error;
pub mod input;
pub mod navigation;
pub mod presenter;
pub mod resources;
pub mod scene;
pub mod script_host;
pub mod surface;
pub mod transform;
pub mod transitions;

pub use audio::{AudioCallback, AudioEvent, RecordingAudioCallback};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PresentError, PresentResult};
pub use input::{Command, InputEvent, InputSource, JoyAxis, NullInput};
pub use navigation::MoveDirection;
pub use presenter::{PresentOptions, Presenter};
pub use scene::{DrawItem, SceneFrame};
pub use surface::{HeadlessSurface, RenderSurface, SurfaceRef};
pub use transform::DisplaySize;
pub use transitions::TransitionType;
