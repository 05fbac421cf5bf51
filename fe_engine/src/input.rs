//! Input commands, the physical events that trigger them, and the live input
//! state the presenter re-samples while a move is repeating.

use serde::{Deserialize, Serialize};

/// Axis deflection (out of 100) past which a joystick axis counts as held.
pub const JOY_THRESHOLD: f32 = 75.0;

/// Key codes exposed to scripts through the `Key` enumeration, in code order.
pub const KEY_NAMES: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "Num0", "Num1", "Num2", "Num3", "Num4", "Num5", "Num6",
    "Num7", "Num8", "Num9", "Escape", "LControl", "LShift", "LAlt", "LSystem", "RControl",
    "RShift", "RAlt", "RSystem", "Menu", "LBracket", "RBracket", "SemiColon", "Comma", "Period",
    "Quote", "Slash", "BackSlash", "Tilde", "Equal", "Dash", "Space", "Return", "BackSpace",
    "Tab", "PageUp", "PageDown", "End", "Home", "Insert", "Delete", "Add", "Subtract", "Multiply",
    "Divide", "Left", "Right", "Up", "Down", "Numpad0", "Numpad1", "Numpad2", "Numpad3",
    "Numpad4", "Numpad5", "Numpad6", "Numpad7", "Numpad8", "Numpad9", "F1", "F2", "F3", "F4",
    "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14", "F15", "Pause",
];

pub fn key_code(name: &str) -> Option<i32> {
    KEY_NAMES
        .iter()
        .position(|key| key.eq_ignore_ascii_case(name))
        .map(|idx| idx as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoyAxis {
    X,
    Y,
    Z,
    R,
    U,
    V,
    PovX,
    PovY,
}

impl JoyAxis {
    pub const ALL: [JoyAxis; 8] = [
        JoyAxis::X,
        JoyAxis::Y,
        JoyAxis::Z,
        JoyAxis::R,
        JoyAxis::U,
        JoyAxis::V,
        JoyAxis::PovX,
        JoyAxis::PovY,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            JoyAxis::X => "X",
            JoyAxis::Y => "Y",
            JoyAxis::Z => "Z",
            JoyAxis::R => "R",
            JoyAxis::U => "U",
            JoyAxis::V => "V",
            JoyAxis::PovX => "PovX",
            JoyAxis::PovY => "PovY",
        }
    }
}

/// Front-end commands an input mapping can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Up,
    Down,
    PageUp,
    PageDown,
    NextList,
    PrevList,
    ToggleLayout,
    ToggleRotateRight,
    ToggleFlip,
    ToggleRotateLeft,
    ToggleMovie,
    ToggleMute,
    Select,
    ExitMenu,
    Configure,
    ScreenSaver,
}

impl Command {
    pub const ALL: [Command; 16] = [
        Command::Up,
        Command::Down,
        Command::PageUp,
        Command::PageDown,
        Command::NextList,
        Command::PrevList,
        Command::ToggleLayout,
        Command::ToggleRotateRight,
        Command::ToggleFlip,
        Command::ToggleRotateLeft,
        Command::ToggleMovie,
        Command::ToggleMute,
        Command::Select,
        Command::ExitMenu,
        Command::Configure,
        Command::ScreenSaver,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Down => "down",
            Command::PageUp => "page_up",
            Command::PageDown => "page_down",
            Command::NextList => "next_list",
            Command::PrevList => "prev_list",
            Command::ToggleLayout => "toggle_layout",
            Command::ToggleRotateRight => "toggle_rotate_right",
            Command::ToggleFlip => "toggle_flip",
            Command::ToggleRotateLeft => "toggle_rotate_left",
            Command::ToggleMovie => "toggle_movie",
            Command::ToggleMute => "toggle_mute",
            Command::Select => "select",
            Command::ExitMenu => "exit_menu",
            Command::Configure => "configure",
            Command::ScreenSaver => "screen_saver",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.name().eq_ignore_ascii_case(name))
    }
}

/// The physical event that produced a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key {
        code: i32,
    },
    JoystickButton {
        device: u32,
        button: u32,
    },
    JoystickAxis {
        device: u32,
        axis: JoyAxis,
        position: f32,
    },
}

/// Live input state, polled synchronously.
pub trait InputSource {
    fn is_key_pressed(&self, code: i32) -> bool;
    fn is_joystick_button_pressed(&self, device: u32, button: u32) -> bool;
    fn joystick_axis_position(&self, device: u32, axis: JoyAxis) -> f32;

    /// Whether the input behind `event` is still held down.
    fn is_engaged(&self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Key { code } => self.is_key_pressed(code),
            InputEvent::JoystickButton { device, button } => {
                self.is_joystick_button_pressed(device, button)
            }
            InputEvent::JoystickAxis { device, axis, .. } => {
                self.joystick_axis_position(device, axis).abs() > JOY_THRESHOLD
            }
        }
    }
}

/// Input source with nothing ever pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn is_key_pressed(&self, _code: i32) -> bool {
        false
    }

    fn is_joystick_button_pressed(&self, _device: u32, _button: u32) -> bool {
        false
    }

    fn joystick_axis_position(&self, _device: u32, _axis: JoyAxis) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stick(f32);

    impl InputSource for Stick {
        fn is_key_pressed(&self, code: i32) -> bool {
            code == 3
        }

        fn is_joystick_button_pressed(&self, device: u32, button: u32) -> bool {
            device == 1 && button == 2
        }

        fn joystick_axis_position(&self, _device: u32, _axis: JoyAxis) -> f32 {
            self.0
        }
    }

    #[test]
    fn engagement_resamples_the_originating_input() {
        let held = Stick(-80.0);
        assert!(held.is_engaged(&InputEvent::Key { code: 3 }));
        assert!(!held.is_engaged(&InputEvent::Key { code: 4 }));
        assert!(held.is_engaged(&InputEvent::JoystickButton {
            device: 1,
            button: 2
        }));
        let axis = InputEvent::JoystickAxis {
            device: 0,
            axis: JoyAxis::Y,
            position: 100.0,
        };
        assert!(held.is_engaged(&axis));
        assert!(!Stick(JOY_THRESHOLD).is_engaged(&axis));
        assert!(!NullInput.is_engaged(&axis));
    }

    #[test]
    fn key_codes_follow_table_order() {
        assert_eq!(key_code("A"), Some(0));
        assert_eq!(key_code("escape"), Some(36));
        assert_eq!(key_code("Down"), Some(74));
        assert_eq!(key_code("NoSuchKey"), None);
        assert_eq!(Command::from_name("page_down"), Some(Command::PageDown));
    }
}
