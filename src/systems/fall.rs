//! Fall systems.
//!
//! [`fall_update`] times the descent every variable-rate tick and reacts to
//! the landing: a hard landing plays the "fall" clip and sound, a soft one
//! plays the "landing" sound. The horizontal stop of a hard landing is a
//! velocity write, so [`fall_fixed_update`] applies it on the next fixed
//! step.

use bevy_ecs::prelude::*;

use crate::components::animator::{self as anim, Animator};
use crate::components::contact::{ContactTracker, PlayerSensors, touching};
use crate::components::fall::{FallController, Landing};
use crate::components::rigidbody::RigidBody;
use crate::components::sound::{self, SoundAggregator};
use crate::error::BehaviourError;
use crate::math::EPSILON;
use crate::resources::worldtime::WorldTime;

const CONTROLLER: &str = "FallController";

pub fn fall_update(
    time: Option<Res<WorldTime>>,
    mut query: Query<(
        Entity,
        &mut FallController,
        Option<&PlayerSensors>,
        Option<&RigidBody>,
        Option<&mut Animator>,
        Option<&mut SoundAggregator>,
    )>,
    trackers: Query<&ContactTracker>,
) -> Result<(), BehaviourError> {
    let time = time.ok_or(BehaviourError::MissingResource("WorldTime"))?;

    for (entity, mut fall, sensors, rigidbody, animator, sounds) in query.iter_mut() {
        let Some(rigidbody) = rigidbody else {
            continue;
        };
        let missing = |sibling| BehaviourError::MissingSibling {
            entity,
            controller: CONTROLLER,
            sibling,
        };
        let sensors = sensors.ok_or_else(|| missing("PlayerSensors"))?;
        let mut animator = animator.ok_or_else(|| missing("Animator"))?;
        let mut sounds = sounds.ok_or_else(|| missing("SoundAggregator"))?;

        let grounded = touching(&trackers, sensors.ground);
        let falling = rigidbody.velocity.y < -EPSILON && !grounded;
        match fall.update(falling, grounded, time.delta) {
            Landing::None => {}
            Landing::Soft => sounds.add_sound(sound::LANDING),
            Landing::Hard => {
                animator.set_animation(anim::FALL);
                sounds.add_sound(sound::FALL);
            }
        }
    }
    Ok(())
}

pub fn fall_fixed_update(
    mut query: Query<(&mut FallController, Option<&mut RigidBody>)>,
) -> Result<(), BehaviourError> {
    for (mut fall, rigidbody) in query.iter_mut() {
        if fall.take_pending_stop()
            && let Some(mut rigidbody) = rigidbody
        {
            rigidbody.velocity.x = 0.0;
        }
    }
    Ok(())
}
