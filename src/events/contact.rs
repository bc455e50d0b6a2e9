//! Contact event types emitted by the physics step.
//!
//! - [`TriggerEvent`] reports overlaps involving a trigger collider (the
//!   ground and ceiling sensors). It is sent once on enter, once per step
//!   while the overlap lasts, and once on exit.
//! - [`CollisionEvent`] reports solid contacts of a dynamic body, on enter
//!   and exit only, with the contact manifold.
//!
//! Both are delivered to global observers; the behaviour layer registers its
//! own in [`crate::systems::contact`] and [`crate::systems::knockback`].

use bevy_ecs::prelude::*;
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Enter,
    Stay,
    Exit,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerEvent {
    /// Entity owning the trigger collider.
    pub sensor: Entity,
    /// Entity it overlaps.
    pub other: Entity,
    pub kind: TriggerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Enter,
    Exit,
}

/// A single point of a contact manifold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub position: Vec2,
    /// Normal pointing from `other` toward `entity`.
    pub normal: Vec2,
    pub penetration: f32,
}

/// Geometry of a solid contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactManifold {
    pub points: SmallVec<[ContactPoint; 2]>,
}

impl ContactManifold {
    pub fn single(point: ContactPoint) -> Self {
        let mut points = SmallVec::new();
        points.push(point);
        Self { points }
    }

    pub fn first_point(&self) -> Option<Vec2> {
        self.points.first().map(|p| p.position)
    }
}

#[derive(Event, Debug, Clone)]
pub struct CollisionEvent {
    /// The dynamic body receiving the event.
    pub entity: Entity,
    pub other: Entity,
    pub kind: CollisionKind,
    /// Empty on exit.
    pub manifold: ContactManifold,
}
