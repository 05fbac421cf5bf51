//! Directional move-and-repeat state driven by held input.

use std::time::Duration;

use serde::Serialize;

use crate::input::{InputEvent, InputSource};

/// Hold time after which a held move repeats.
pub const REPEAT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    #[default]
    None,
    Up,
    Down,
    PageUp,
    PageDown,
}

impl MoveDirection {
    /// Signed selection step for this direction.
    pub fn step(self, page_size: i32) -> i32 {
        match self {
            MoveDirection::None => 0,
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
            MoveDirection::PageUp => -page_size,
            MoveDirection::PageDown => page_size,
        }
    }

    /// Whether the initial step wraps around the list ends.
    pub fn wraps(self) -> bool {
        matches!(self, MoveDirection::Up | MoveDirection::Down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatDecision {
    Idle,
    Wait,
    Repeat(MoveDirection),
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct MoveState {
    direction: MoveDirection,
    event: Option<InputEvent>,
    started: Duration,
}

impl MoveState {
    pub fn direction(&self) -> MoveDirection {
        self.direction
    }

    pub fn begin(&mut self, direction: MoveDirection, event: Option<InputEvent>, now: Duration) {
        self.direction = direction;
        self.event = event;
        self.started = now;
    }

    pub fn reset(&mut self) {
        self.direction = MoveDirection::None;
        self.event = None;
    }

    /// Decides whether a held move repeats this tick. A repeat restarts the
    /// timer; a released input ends the move.
    pub fn poll(&mut self, now: Duration, input: &dyn InputSource) -> RepeatDecision {
        if self.direction == MoveDirection::None {
            return RepeatDecision::Idle;
        }
        if now.saturating_sub(self.started) <= REPEAT_DELAY {
            return RepeatDecision::Wait;
        }
        let held = self
            .event
            .as_ref()
            .map(|event| input.is_engaged(event))
            .unwrap_or(false);
        if held {
            self.started = now;
            RepeatDecision::Repeat(self.direction)
        } else {
            self.reset();
            RepeatDecision::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::input::JoyAxis;

    struct Key(Cell<bool>);

    impl InputSource for Key {
        fn is_key_pressed(&self, code: i32) -> bool {
            code == 74 && self.0.get()
        }

        fn is_joystick_button_pressed(&self, _device: u32, _button: u32) -> bool {
            false
        }

        fn joystick_axis_position(&self, _device: u32, _axis: JoyAxis) -> f32 {
            0.0
        }
    }

    const DOWN: InputEvent = InputEvent::Key { code: 74 };

    #[test]
    fn repeats_only_after_the_delay() {
        let input = Key(Cell::new(true));
        let mut state = MoveState::default();
        assert_eq!(state.poll(Duration::ZERO, &input), RepeatDecision::Idle);

        state.begin(MoveDirection::Down, Some(DOWN), Duration::from_millis(1000));
        assert_eq!(
            state.poll(Duration::from_millis(1499), &input),
            RepeatDecision::Wait
        );
        assert_eq!(
            state.poll(Duration::from_millis(1500), &input),
            RepeatDecision::Wait
        );
        assert_eq!(
            state.poll(Duration::from_millis(1501), &input),
            RepeatDecision::Repeat(MoveDirection::Down)
        );
        // timer restarted by the repeat
        assert_eq!(
            state.poll(Duration::from_millis(1900), &input),
            RepeatDecision::Wait
        );

        input.0.set(false);
        assert_eq!(
            state.poll(Duration::from_millis(2100), &input),
            RepeatDecision::Stop
        );
        assert_eq!(state.direction(), MoveDirection::None);
    }

    #[test]
    fn steps_scale_with_page_size() {
        assert_eq!(MoveDirection::PageDown.step(8), 8);
        assert_eq!(MoveDirection::PageUp.step(5), -5);
        assert_eq!(MoveDirection::Up.step(8), -1);
        assert!(MoveDirection::Down.wraps());
        assert!(!MoveDirection::PageDown.wraps());
    }
}
