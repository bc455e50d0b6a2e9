//! Jump systems.
//!
//! - [`jump_update`] (variable rate) drives the charge state machine from the
//!   jump action and ground contact, and requests the "jumpHold" clip.
//! - [`jump_fixed_update`] (fixed rate) accumulates charge on the fixed clock,
//!   pins the entity horizontally while charging, requests "jumpFall" while
//!   descending, and applies the launch.
//!
//! Contract
//! - Reads [`WorldTime`] for `delta` and `fixed_delta`.
//! - Requires [`Animator`] and [`SoundAggregator`] on the jumping entity.
//! - Entities without a [`RigidBody`] are skipped.

use bevy_ecs::prelude::*;

use crate::components::animator::{self as anim, Animator};
use crate::components::contact::{ContactTracker, PlayerSensors, touching};
use crate::components::jump::JumpController;
use crate::components::rigidbody::RigidBody;
use crate::components::sound::{self, SoundAggregator};
use crate::error::BehaviourError;
use crate::resources::actions::{Action, ActionState};
use crate::resources::worldtime::WorldTime;
use crate::systems::movement::held_input;

const CONTROLLER: &str = "JumpController";

fn missing(entity: Entity, sibling: &'static str) -> BehaviourError {
    BehaviourError::MissingSibling {
        entity,
        controller: CONTROLLER,
        sibling,
    }
}

pub fn jump_update(
    time: Option<Res<WorldTime>>,
    actions: Option<Res<ActionState>>,
    mut query: Query<(
        Entity,
        &mut JumpController,
        Option<&PlayerSensors>,
        Has<RigidBody>,
        Option<&mut Animator>,
        Option<&mut SoundAggregator>,
    )>,
    trackers: Query<&ContactTracker>,
) -> Result<(), BehaviourError> {
    let time = time.ok_or(BehaviourError::MissingResource("WorldTime"))?;
    let actions = actions.ok_or(BehaviourError::MissingResource("ActionState"))?;
    let input = held_input(&actions);
    let released = actions.ended(Action::Jump);

    for (entity, mut jump, sensors, has_body, animator, sounds) in query.iter_mut() {
        if !has_body {
            continue;
        }
        let sensors = sensors.ok_or_else(|| missing(entity, "PlayerSensors"))?;
        let mut animator = animator.ok_or_else(|| missing(entity, "Animator"))?;
        let mut sounds = sounds.ok_or_else(|| missing(entity, "SoundAggregator"))?;

        let grounded = touching(&trackers, sensors.ground);
        let blocked = animator.is_playing_unfinished(anim::FALL);
        let update = jump.update(input, released, grounded, blocked, time.delta);

        if update.started {
            sounds.add_sound(sound::JUMP_HOLD);
        }
        if update.charging {
            animator.set_animation(anim::JUMP_HOLD);
        }
    }
    Ok(())
}

pub fn jump_fixed_update(
    time: Option<Res<WorldTime>>,
    mut query: Query<(
        Entity,
        &mut JumpController,
        Option<&PlayerSensors>,
        Option<&mut RigidBody>,
        Option<&mut Animator>,
        Option<&mut SoundAggregator>,
    )>,
    trackers: Query<&ContactTracker>,
) -> Result<(), BehaviourError> {
    let time = time.ok_or(BehaviourError::MissingResource("WorldTime"))?;

    for (entity, mut jump, sensors, rigidbody, animator, sounds) in query.iter_mut() {
        let Some(mut rigidbody) = rigidbody else {
            continue;
        };
        let sensors = sensors.ok_or_else(|| missing(entity, "PlayerSensors"))?;
        let mut animator = animator.ok_or_else(|| missing(entity, "Animator"))?;
        let mut sounds = sounds.ok_or_else(|| missing(entity, "SoundAggregator"))?;

        let grounded = touching(&trackers, sensors.ground);
        let step = jump.fixed_update(grounded, rigidbody.velocity.y, time.fixed_delta);

        if step.falling {
            animator.set_animation(anim::JUMP_FALL);
        }
        if step.stop_horizontal {
            rigidbody.velocity.x = 0.0;
        }
        if let Some(launch) = step.launch {
            rigidbody.add_acceleration(launch);
            animator.set_animation(anim::JUMP);
            sounds.add_sound(sound::JUMP);
        }
    }
    Ok(())
}
