//! Movement systems.
//!
//! - [`movement_update`] (variable rate) caches the held actions and locks
//!   the entity rotation.
//! - [`movement_fixed_update`] (fixed rate) applies the step decided by
//!   [`MovementController::plan`].

use bevy_ecs::prelude::*;

use crate::components::animator::{self as anim, Animator};
use crate::components::contact::{ContactTracker, PlayerSensors, touching};
use crate::components::movement::{HeldInput, MovementController, MovementStep};
use crate::components::properties::{FLIP_HORIZONTALLY, Properties};
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform2D;
use crate::error::BehaviourError;
use crate::resources::actions::{Action, ActionState};

const CONTROLLER: &str = "MovementController";

/// Held input as seen by the controllers.
pub fn held_input(actions: &ActionState) -> HeldInput {
    HeldInput {
        left: actions.held(Action::Left),
        right: actions.held(Action::Right),
        jump: actions.held(Action::Jump),
    }
}

pub fn movement_update(
    actions: Option<Res<ActionState>>,
    mut query: Query<(&mut MovementController, Option<&mut Transform2D>)>,
) -> Result<(), BehaviourError> {
    let actions = actions.ok_or(BehaviourError::MissingResource("ActionState"))?;
    let input = held_input(&actions);
    for (mut controller, transform) in query.iter_mut() {
        controller.sample(input);
        if let Some(mut transform) = transform {
            transform.reset_rotation();
        }
    }
    Ok(())
}

pub fn movement_fixed_update(
    mut query: Query<(
        Entity,
        &MovementController,
        Option<&PlayerSensors>,
        Option<&mut RigidBody>,
        Option<&mut Animator>,
        Option<&mut Properties>,
    )>,
    trackers: Query<&ContactTracker>,
) -> Result<(), BehaviourError> {
    for (entity, controller, sensors, rigidbody, animator, properties) in query.iter_mut() {
        let Some(mut rigidbody) = rigidbody else {
            continue;
        };
        let sensors = sensors.ok_or(BehaviourError::MissingSibling {
            entity,
            controller: CONTROLLER,
            sibling: "PlayerSensors",
        })?;
        let mut animator = animator.ok_or(BehaviourError::MissingSibling {
            entity,
            controller: CONTROLLER,
            sibling: "Animator",
        })?;

        let grounded = touching(&trackers, sensors.ground);
        let recovering = animator.is_playing_unfinished(anim::FALL);
        let flip = match controller.plan(grounded, rigidbody.velocity.y, recovering) {
            MovementStep::Hold => None,
            MovementStep::Face { flip } => Some(flip),
            MovementStep::Idle => {
                rigidbody.velocity.x = 0.0;
                animator.set_animation(anim::IDLE);
                None
            }
            MovementStep::Walk { velocity_x, flip } => {
                rigidbody.velocity.x = velocity_x;
                animator.set_animation(anim::WALK);
                Some(flip)
            }
        };

        if let (Some(flip), Some(mut properties)) = (flip, properties) {
            properties.set_bool(FLIP_HORIZONTALLY, flip);
        }
    }
    Ok(())
}
