//! Rotation and layout-scale transforms applied to the whole scene.
//!
//! The render transform is `rotation * scale`: layout coordinates are first
//! scaled from the script-chosen logical size onto the physical display, then
//! rotated (with the display's aspect swapped for quarter turns) around it.

use fe_settings::RotationState;
use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
    }
}

/// Transform for the effective rotation `(base + toggle) mod 4`.
pub fn compose(base: RotationState, toggle: RotationState, display: DisplaySize) -> Affine2 {
    let size = display.as_vec2();
    let aspect = Vec2::new(size.x / size.y, size.y / size.x);
    match base.combine(toggle) {
        RotationState::None => Affine2::IDENTITY,
        RotationState::Right => {
            Affine2::from_translation(Vec2::new(size.x, 0.0))
                * Affine2::from_scale(aspect)
                * Affine2::from_angle(90f32.to_radians())
        }
        RotationState::Flip => {
            Affine2::from_translation(size) * Affine2::from_angle(180f32.to_radians())
        }
        RotationState::Left => {
            Affine2::from_translation(Vec2::new(0.0, size.y))
                * Affine2::from_scale(aspect)
                * Affine2::from_angle(270f32.to_radians())
        }
    }
}

/// Maps the logical layout size onto the display, independently per axis.
/// Non-positive logical sizes leave that axis unscaled.
pub fn layout_scale(layout_size: Vec2, display: DisplaySize) -> Affine2 {
    let size = display.as_vec2();
    let axis = |display: f32, logical: f32| {
        if logical > 0.0 {
            display / logical
        } else {
            1.0
        }
    };
    Affine2::from_scale(Vec2::new(
        axis(size.x, layout_size.x),
        axis(size.y, layout_size.y),
    ))
}

pub fn render_transform(
    base: RotationState,
    toggle: RotationState,
    layout_size: Vec2,
    display: DisplaySize,
) -> Affine2 {
    compose(base, toggle, display) * layout_scale(layout_size, display)
}

/// Toggle rotation implied by the autorotate policy for a game whose native
/// orientation is `game_rotation` degrees ("0", "90", "180" or "270").
pub fn autorotate_toggle(
    policy: RotationState,
    base: RotationState,
    game_rotation: &str,
) -> RotationState {
    if policy == RotationState::None {
        return RotationState::None;
    }
    let game_is_vertical = match game_rotation.trim() {
        "90" | "270" => Some(true),
        "0" | "180" => Some(false),
        _ => None,
    };
    match game_is_vertical {
        Some(vertical) if vertical != base.is_sideways() => policy,
        _ => RotationState::None,
    }
}
