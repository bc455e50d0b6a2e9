//! Settings and bookkeeping for the stand-in physics step.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::error::BehaviourError;

/// Distance under which two boxes still count as touching.
pub const DEFAULT_CONTACT_SKIN: f32 = 0.05;

#[derive(Resource, Debug, Clone, Copy)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    pub contact_skin: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -980.0),
            contact_skin: DEFAULT_CONTACT_SKIN,
        }
    }
}

/// Ordered pair key; the first entity is the one receiving the events.
pub type ContactPair = (Entity, Entity);

/// Contacts seen by the previous physics step, used to tell enter, stay and
/// exit apart.
#[derive(Resource, Debug, Default)]
pub struct ContactPairs {
    pub triggers: FxHashSet<ContactPair>,
    pub collisions: FxHashSet<ContactPair>,
}

/// Hard failures raised by contact observers while the physics step was
/// delivering events. The step drains them and fails with the first one.
#[derive(Resource, Debug, Default)]
pub struct ContactFaults {
    pub errors: Vec<BehaviourError>,
}
