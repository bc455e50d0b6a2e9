//! World-space placement of an entity.
//!
//! [`Transform2D`] stores the pivot position, rotation (degrees,
//! counter-clockwise) and scale. Colliders and renderers are laid out around
//! the position, so moving the transform moves everything attached to it.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2D {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Reset rotation to identity.
    pub fn reset_rotation(&mut self) {
        self.rotation = 0.0;
    }
}
