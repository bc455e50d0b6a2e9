//! Ground locomotion controller.
//!
//! The variable-rate phase caches the left/right/jump inputs; the fixed-rate
//! phase turns them into a horizontal velocity while the entity stands on a
//! platform. See [`MovementController::plan`] for the decision table.

use bevy_ecs::prelude::Component;

use crate::math::EPSILON;

/// Inputs cached by the last variable-rate tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl HeldInput {
    /// -1 for left, +1 for right, 0 for neither or both.
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// What the fixed-rate phase should do this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementStep {
    /// Airborne, rising, or recovering: leave the body alone.
    Hold,
    /// Jump is being charged: only update facing.
    Face { flip: bool },
    /// Stop horizontally and play "idle".
    Idle,
    /// Walk with the given horizontal velocity and play "walk".
    Walk { velocity_x: f32, flip: bool },
}

#[derive(Component, Debug, Clone)]
pub struct MovementController {
    /// Horizontal speed in world units per second.
    pub speed: f32,
    pub input: HeldInput,
}

impl MovementController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            input: HeldInput::default(),
        }
    }

    pub fn sample(&mut self, input: HeldInput) {
        self.input = input;
    }

    /// Decide the fixed-rate step.
    ///
    /// `recovering` is true while an unfinished long-fall clip is playing.
    pub fn plan(&self, grounded: bool, vertical_speed: f32, recovering: bool) -> MovementStep {
        if !grounded || vertical_speed.abs() > EPSILON || recovering {
            return MovementStep::Hold;
        }

        let direction = self.input.direction();
        if self.input.jump {
            // Right wins when both sides are held.
            return match (self.input.left, self.input.right) {
                (false, false) => MovementStep::Hold,
                (true, false) => MovementStep::Face { flip: true },
                (_, true) => MovementStep::Face { flip: false },
            };
        }

        if direction == 0.0 {
            MovementStep::Idle
        } else {
            MovementStep::Walk {
                velocity_x: direction * self.speed,
                flip: direction < 0.0,
            }
        }
    }
}
