//! Rigid body component consumed by the physics step.
//!
//! The [`RigidBody`] component stores the body kind, simulation parameters
//! and current linear/angular velocity of an entity. Behaviour controllers
//! read `velocity` and write it only during the fixed-rate phase, either by
//! assigning a component directly or by queueing a one-shot acceleration with
//! [`RigidBody::add_acceleration`].
//!
//! Queued accelerations are drained by the physics step on its next run and
//! applied as a velocity change, independent of mass.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the physics step treats a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// Never moves; other bodies are pushed out of it.
    #[default]
    Static,
    /// Moves by its own velocity, ignores gravity and is never pushed.
    Kinematic,
    /// Affected by gravity, drag and queued accelerations.
    Dynamic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionDetection {
    #[default]
    Discrete,
    Continuous,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    None,
    Interpolate,
}

/// Simulation state of a body.
///
/// # Fields
/// - `kind` - Static, kinematic or dynamic
/// - `mass` - Mass in arbitrary units; must be positive for dynamic bodies
/// - `drag` - Linear damping: `velocity *= 1 / (1 + drag * dt)` each step
/// - `gravity_scale` - Multiplier on the world gravity
/// - `velocity` - Current linear velocity in world units per second
/// - `angular_velocity` / `angular_drag` - Rotation rate in degrees per second
#[derive(Component, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub collision_detection: CollisionDetection,
    pub interpolation: Interpolation,
    pub mass: f32,
    pub drag: f32,
    pub gravity_scale: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub angular_drag: f32,
    /// Accelerations queued since the last physics step.
    #[serde(skip)]
    pending_acceleration: Vec2,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(BodyKind::Static)
    }
}

impl RigidBody {
    /// Create a body of the given kind at rest.
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            collision_detection: CollisionDetection::Discrete,
            interpolation: Interpolation::None,
            mass: 1.0,
            drag: 0.0,
            gravity_scale: if kind == BodyKind::Dynamic { 1.0 } else { 0.0 },
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            angular_drag: 0.0,
            pending_acceleration: Vec2::ZERO,
        }
    }

    /// Create a dynamic body with the given mass and drag.
    pub fn dynamic(mass: f32, drag: f32) -> Self {
        Self {
            mass,
            drag,
            ..Self::new(BodyKind::Dynamic)
        }
    }

    pub fn kinematic() -> Self {
        Self::new(BodyKind::Kinematic)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_collision_detection(mut self, mode: CollisionDetection) -> Self {
        self.collision_detection = mode;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Queue an acceleration to be applied by the next physics step.
    pub fn add_acceleration(&mut self, acceleration: Vec2) {
        self.pending_acceleration += acceleration;
    }

    /// Change velocity immediately.
    pub fn add_velocity(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    /// Accelerations queued since the last step.
    pub fn pending_acceleration(&self) -> Vec2 {
        self.pending_acceleration
    }

    /// Drain the queued accelerations.
    pub fn take_acceleration(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending_acceleration)
    }
}
