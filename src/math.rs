//! Small numeric helpers shared by the behaviour controllers.
//!
//! The world is Y-up: [`Vec2::Y`] is "up", positive X is "right". Angles are
//! in degrees and positive angles rotate counter-clockwise.

use glam::Vec2;

/// Threshold under which a vertical speed is treated as zero.
///
/// Controllers use it to tell "settled on the ground" from "rising" or
/// "falling".
pub const EPSILON: f32 = 1.0e-3;

/// Tolerance for [`approximately`].
const APPROX_TOLERANCE: f32 = 1.0e-5;

/// Compare two floats with a tolerance scaled to their magnitude.
pub fn approximately(a: f32, b: f32) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= APPROX_TOLERANCE * scale
}

/// Rotate `v` counter-clockwise by `degrees`.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Sine ease-out on `t` in `[0, 1]`.
pub fn ease_out_sine(t: f32) -> f32 {
    (t * std::f32::consts::FRAC_PI_2).sin()
}
