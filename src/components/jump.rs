//! Charge-and-release jump controller.
//!
//! Holding jump while grounded charges an impulse; releasing it launches the
//! entity in the fixed-rate phase that follows. The launch direction leans
//! toward the single held side by up to `diagonal_angle` degrees, in
//! proportion to how full the charge was.
//!
//! # States
//!
//! ```text
//! Idle --(jump held, grounded)--> Charging --(jump released)--> Released
//!   ^                                |                              |
//!   +-------(ground lost)------------+                              |
//!   +---------------------(fixed step applies the launch)-----------+
//! ```
//!
//! Charging accumulates `impulse * impulse_multiplier` per second, on the
//! clock selected by [`ChargeClock`], clamped to `[0, max_impulse]`.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::debug;

use crate::components::movement::HeldInput;
use crate::math::{EPSILON, rotate_degrees};
use crate::resources::playerconfig::{ChargeClock, JumpConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    #[default]
    Idle,
    Charging,
    Released,
}

/// Side effects requested by the variable-rate phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargeUpdate {
    /// A charge started this tick.
    pub started: bool,
    /// The entity is charging after this tick.
    pub charging: bool,
    /// A charge was lost because the ground went away.
    pub aborted: bool,
}

/// Side effects requested by the fixed-rate phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpStep {
    /// Zero horizontal velocity.
    pub stop_horizontal: bool,
    /// Airborne and descending.
    pub falling: bool,
    /// Launch acceleration to apply.
    pub launch: Option<Vec2>,
}

#[derive(Component, Debug, Clone)]
pub struct JumpController {
    pub config: JumpConfig,
    phase: JumpPhase,
    accumulated: f32,
    last_used: f32,
    input: HeldInput,
    /// Seconds spent charging without ground contact.
    ungrounded_for: f32,
}

impl JumpController {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            config,
            phase: JumpPhase::Idle,
            accumulated: 0.0,
            last_used: 0.0,
            input: HeldInput::default(),
            ungrounded_for: 0.0,
        }
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn accumulated_impulse(&self) -> f32 {
        self.accumulated
    }

    /// Impulse of the most recent launch, 0 before the first one.
    pub fn last_used_impulse(&self) -> f32 {
        self.last_used
    }

    pub fn max_impulse(&self) -> f32 {
        self.config.max_impulse
    }

    pub fn is_charging(&self) -> bool {
        self.phase == JumpPhase::Charging
    }

    /// Charge rate in impulse per second.
    pub fn charge_rate(&self) -> f32 {
        self.config.impulse * self.config.impulse_multiplier
    }

    /// Add `dt` seconds of charge.
    pub fn accumulate(&mut self, dt: f32) {
        self.accumulated =
            (self.accumulated + self.charge_rate() * dt).clamp(0.0, self.config.max_impulse.max(0.0));
    }

    fn abort(&mut self) {
        self.accumulated = 0.0;
        self.ungrounded_for = 0.0;
        self.phase = JumpPhase::Idle;
    }

    /// Variable-rate phase.
    ///
    /// `released` is the jump "ended" edge of this tick. `blocked` is true
    /// while a long-fall recovery clip is still playing.
    pub fn update(
        &mut self,
        input: HeldInput,
        released: bool,
        grounded: bool,
        blocked: bool,
        dt: f32,
    ) -> ChargeUpdate {
        self.input = input;
        let mut out = ChargeUpdate::default();

        if !grounded {
            match self.phase {
                JumpPhase::Charging => {
                    self.ungrounded_for += dt;
                    let within_leniency = self
                        .config
                        .leniency
                        .is_some_and(|window| self.ungrounded_for <= window);
                    if !within_leniency {
                        self.abort();
                        out.aborted = true;
                        return out;
                    }
                    if released {
                        self.phase = JumpPhase::Released;
                    }
                    out.charging = self.is_charging();
                }
                JumpPhase::Idle => self.accumulated = 0.0,
                JumpPhase::Released => {}
            }
            return out;
        }
        self.ungrounded_for = 0.0;

        if input.jump && !blocked && self.phase != JumpPhase::Released {
            if self.phase == JumpPhase::Idle {
                self.phase = JumpPhase::Charging;
                out.started = true;
            }
            if self.config.charge_clock == ChargeClock::Variable {
                self.accumulate(dt);
            }
        }

        if released && self.phase == JumpPhase::Charging {
            self.phase = JumpPhase::Released;
        }

        out.charging = self.is_charging();
        out
    }

    /// Fixed-rate phase.
    pub fn fixed_update(&mut self, grounded: bool, vertical_speed: f32, fixed_dt: f32) -> JumpStep {
        let mut out = JumpStep {
            falling: vertical_speed < -EPSILON && !grounded,
            ..JumpStep::default()
        };

        match self.phase {
            JumpPhase::Idle => {}
            JumpPhase::Charging => {
                if !grounded {
                    // Inside a leniency window the charge is frozen; the
                    // variable phase decides when the window has run out.
                    if self.config.leniency.is_none() {
                        self.abort();
                    }
                    return out;
                }
                if self.config.charge_clock == ChargeClock::Fixed {
                    self.accumulate(fixed_dt);
                }
                out.stop_horizontal = true;
            }
            JumpPhase::Released => {
                let impulse = self
                    .accumulated
                    .max(self.config.min_impulse)
                    .min(self.config.max_impulse.max(self.config.min_impulse));
                let launch = self.launch_direction(impulse, self.input.direction()) * impulse;
                debug!("jump released: impulse={impulse:.2} launch={launch:?}");
                self.last_used = impulse;
                self.abort();
                out.launch = Some(launch);
            }
        }

        out
    }

    /// Unit launch direction for `impulse` with a horizontal bias of
    /// `direction` (-1, 0 or +1).
    pub fn launch_direction(&self, impulse: f32, direction: f32) -> Vec2 {
        if direction == 0.0 || self.config.max_impulse <= 0.0 {
            return Vec2::Y;
        }
        let fraction = (impulse / self.config.max_impulse).clamp(0.0, 1.0);
        let angle = self.config.diagonal_angle * fraction;
        rotate_degrees(Vec2::Y, -angle * direction.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < TOL
    }

    fn config(clock: ChargeClock, leniency: Option<f32>) -> JumpConfig {
        JumpConfig {
            impulse: 50.0,
            impulse_multiplier: 1.0,
            min_impulse: 10.0,
            max_impulse: 100.0,
            diagonal_angle: 30.0,
            charge_clock: clock,
            leniency,
        }
    }

    fn held(jump: bool, left: bool, right: bool) -> HeldInput {
        HeldInput { left, right, jump }
    }

    fn charge(jump: &mut JumpController, seconds: f32, dt: f32) {
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            jump.update(held(true, false, false), false, true, false, dt);
            jump.fixed_update(true, 0.0, dt);
        }
    }

    // ==================== CHARGE TESTS ====================

    #[test]
    fn test_charge_for_one_and_a_half_seconds() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 1.5, 0.01);
        assert!(approx_eq(jump.accumulated_impulse(), 75.0));
    }

    #[test]
    fn test_charge_clamps_at_max() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 3.0, 0.01);
        assert!(approx_eq(jump.accumulated_impulse(), 100.0));
    }

    #[test]
    fn test_variable_clock_accumulates_in_update() {
        let mut jump = JumpController::new(config(ChargeClock::Variable, None));
        for _ in 0..150 {
            jump.update(held(true, false, false), false, true, false, 0.01);
        }
        assert!(approx_eq(jump.accumulated_impulse(), 75.0));
        jump.fixed_update(true, 0.0, 0.5);
        assert!(approx_eq(jump.accumulated_impulse(), 75.0));
    }

    #[test]
    fn test_charge_start_reported_once() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        let first = jump.update(held(true, false, false), false, true, false, 0.01);
        let second = jump.update(held(true, false, false), false, true, false, 0.01);
        assert!(first.started && first.charging);
        assert!(!second.started && second.charging);
    }

    #[test]
    fn test_charging_stops_horizontal_motion() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        jump.update(held(true, false, false), false, true, false, 0.01);
        assert!(jump.fixed_update(true, 0.0, 0.01).stop_horizontal);
    }

    #[test]
    fn test_blocked_does_not_charge() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        let out = jump.update(held(true, false, false), false, true, true, 0.01);
        assert!(!out.charging);
        assert_eq!(jump.phase(), JumpPhase::Idle);
    }

    // ==================== GROUND LOSS TESTS ====================

    #[test]
    fn test_ground_loss_resets_charge() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 0.5, 0.01);
        assert!(jump.accumulated_impulse() > 0.0);
        let out = jump.update(held(true, false, false), false, false, false, 0.01);
        assert!(out.aborted);
        assert_eq!(jump.accumulated_impulse(), 0.0);
        assert_eq!(jump.phase(), JumpPhase::Idle);
    }

    #[test]
    fn test_fixed_step_without_ground_resets_charge() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        jump.update(held(true, false, false), false, true, false, 0.1);
        jump.fixed_update(true, 0.0, 0.1);
        assert!(approx_eq(jump.accumulated_impulse(), 5.0));

        let step = jump.fixed_update(false, 0.0, 0.1);
        assert!(!step.stop_horizontal);
        jump.fixed_update(false, 0.0, 0.1);
        assert_eq!(jump.accumulated_impulse(), 0.0);
        assert_eq!(jump.phase(), JumpPhase::Idle);
    }

    #[test]
    fn test_fixed_step_without_ground_freezes_lenient_charge() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, Some(0.1)));
        jump.update(held(true, false, false), false, true, false, 0.1);
        jump.fixed_update(true, 0.0, 0.1);
        jump.fixed_update(false, 0.0, 0.1);
        jump.fixed_update(false, 0.0, 0.1);
        assert!(approx_eq(jump.accumulated_impulse(), 5.0));
        assert_eq!(jump.phase(), JumpPhase::Charging);
    }

    #[test]
    fn test_leniency_keeps_charge_briefly() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, Some(0.05)));
        charge(&mut jump, 0.5, 0.01);
        let before = jump.accumulated_impulse();

        let out = jump.update(held(true, false, false), false, false, false, 0.02);
        assert!(!out.aborted);
        assert!(approx_eq(jump.accumulated_impulse(), before));

        let out = jump.update(held(true, false, false), false, false, false, 0.04);
        assert!(out.aborted);
        assert_eq!(jump.accumulated_impulse(), 0.0);
    }

    #[test]
    fn test_release_inside_leniency_still_fires() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, Some(0.1)));
        charge(&mut jump, 0.5, 0.01);
        jump.update(held(false, false, false), true, false, false, 0.02);
        assert_eq!(jump.phase(), JumpPhase::Released);
        assert!(jump.fixed_update(false, 0.0, 0.01).launch.is_some());
    }

    // ==================== RELEASE TESTS ====================

    #[test]
    fn test_release_without_charge_does_nothing() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        jump.update(held(false, false, false), true, true, false, 0.01);
        assert_eq!(jump.phase(), JumpPhase::Idle);
        assert!(jump.fixed_update(true, 0.0, 0.01).launch.is_none());
    }

    #[test]
    fn test_release_is_deferred_to_fixed_phase() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 1.0, 0.01);
        jump.update(held(false, false, false), true, true, false, 0.01);
        assert_eq!(jump.phase(), JumpPhase::Released);
        assert!(approx_eq(jump.accumulated_impulse(), 50.0));

        let step = jump.fixed_update(true, 0.0, 0.01);
        let launch = step.launch.unwrap();
        assert!(approx_eq(launch.x, 0.0));
        assert!(approx_eq(launch.y, 50.0));
        assert_eq!(jump.accumulated_impulse(), 0.0);
        assert!(approx_eq(jump.last_used_impulse(), 50.0));
        assert_eq!(jump.phase(), JumpPhase::Idle);
    }

    #[test]
    fn test_release_floors_to_min_impulse() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 0.02, 0.01);
        jump.update(held(false, false, false), true, true, false, 0.01);
        let launch = jump.fixed_update(true, 0.0, 0.01).launch.unwrap();
        assert!(approx_eq(launch.length(), 10.0));
        assert!(approx_eq(jump.last_used_impulse(), 10.0));
    }

    #[test]
    fn test_half_charge_right_leans_fifteen_degrees() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 1.0, 0.01);
        jump.update(held(false, false, true), true, true, false, 0.01);
        let launch = jump.fixed_update(true, 0.0, 0.01).launch.unwrap();

        let expected = Vec2::new(15f32.to_radians().sin(), 15f32.to_radians().cos()) * 50.0;
        assert!(approx_eq(launch.x, expected.x));
        assert!(approx_eq(launch.y, expected.y));
    }

    #[test]
    fn test_left_mirrors_right() {
        let jump = JumpController::new(config(ChargeClock::Fixed, None));
        let right = jump.launch_direction(100.0, 1.0);
        let left = jump.launch_direction(100.0, -1.0);
        assert!(approx_eq(right.x, 0.5));
        assert!(approx_eq(left.x, -0.5));
        assert!(approx_eq(left.y, right.y));
    }

    #[test]
    fn test_both_directions_launch_straight_up() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        charge(&mut jump, 2.0, 0.01);
        jump.update(held(false, true, true), true, true, false, 0.01);
        let launch = jump.fixed_update(true, 0.0, 0.01).launch.unwrap();
        assert!(approx_eq(launch.x, 0.0));
        assert!(approx_eq(launch.y, 100.0));
    }

    #[test]
    fn test_falling_flag() {
        let mut jump = JumpController::new(config(ChargeClock::Fixed, None));
        assert!(jump.fixed_update(false, -10.0, 0.01).falling);
        assert!(!jump.fixed_update(true, -10.0, 0.01).falling);
        assert!(!jump.fixed_update(false, 10.0, 0.01).falling);
    }
}
