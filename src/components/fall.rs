//! Long-fall detection.
//!
//! [`FallController`] times uninterrupted descent. The first tick the entity
//! stops falling decides the outcome: a fall longer than
//! `allowed_duration` is a hard landing (stop, "fall" clip and sound), any
//! other fall that ends on the ground is a plain landing. The timer always
//! restarts from zero after a non-falling tick.

use bevy_ecs::prelude::Component;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    None,
    Soft,
    Hard,
}

#[derive(Component, Debug, Clone)]
pub struct FallController {
    /// Seconds of falling tolerated before a landing counts as hard.
    pub allowed_duration: f32,
    timer: f32,
    pending_stop: bool,
}

impl FallController {
    pub fn new(allowed_duration: f32) -> Self {
        Self {
            allowed_duration,
            timer: 0.0,
            pending_stop: false,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Variable-rate phase.
    pub fn update(&mut self, falling: bool, grounded: bool, dt: f32) -> Landing {
        if falling {
            self.timer += dt;
            return Landing::None;
        }

        let landing = if self.timer > self.allowed_duration {
            debug!("hard landing after {:.2}s of falling", self.timer);
            self.pending_stop = true;
            Landing::Hard
        } else if self.timer > 0.0 && grounded {
            Landing::Soft
        } else {
            Landing::None
        };
        self.timer = 0.0;
        landing
    }

    /// Fixed-rate phase: whether horizontal velocity must be zeroed.
    pub fn take_pending_stop(&mut self) -> bool {
        std::mem::take(&mut self.pending_stop)
    }
}
