//! Knockback system and collision observer.
//!
//! - [`knockback_cache_velocity`] runs first in the fixed-rate phase and
//!   remembers the velocity before any controller touches it.
//! - [`observe_knockback_collisions`] reacts to collision events delivered by
//!   the physics step.
//!
//! The observer runs outside the scheduler phases. Setup errors it hits are
//! pushed to [`ContactFaults`] and surfaced by the physics step.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animator::{self as anim, Animator};
use crate::components::contact::{ContactTracker, PlayerSensors, touching};
use crate::components::jump::JumpController;
use crate::components::knockback::{HitContext, KnockbackController};
use crate::components::object::Tag;
use crate::components::rigidbody::RigidBody;
use crate::components::sound::{self, SoundAggregator};
use crate::components::transform::Transform2D;
use crate::error::BehaviourError;
use crate::events::contact::{CollisionEvent, CollisionKind};
use crate::resources::physics::ContactFaults;

const CONTROLLER: &str = "KnockbackController";

pub fn knockback_cache_velocity(
    mut query: Query<(&mut KnockbackController, &RigidBody)>,
) -> Result<(), BehaviourError> {
    for (mut knockback, rigidbody) in query.iter_mut() {
        knockback.cache_velocity(rigidbody.velocity);
    }
    Ok(())
}

type KnockbackQueryData<'a> = (
    &'a mut KnockbackController,
    &'a Transform2D,
    Option<&'a PlayerSensors>,
    Option<&'a mut RigidBody>,
    Option<&'a JumpController>,
    Option<&'a mut Animator>,
    Option<&'a mut SoundAggregator>,
);

/// Global observer applying knockback on new platform collisions.
pub fn observe_knockback_collisions(
    trigger: On<CollisionEvent>,
    mut query: Query<KnockbackQueryData>,
    tags: Query<&Tag>,
    trackers: Query<&ContactTracker>,
    faults: Option<ResMut<ContactFaults>>,
) {
    let event = trigger.event();
    if let Err(err) = handle_collision(event, &mut query, &tags, &trackers)
        && let Some(mut faults) = faults
    {
        faults.errors.push(err);
    }
}

fn handle_collision(
    event: &CollisionEvent,
    query: &mut Query<KnockbackQueryData>,
    tags: &Query<&Tag>,
    trackers: &Query<&ContactTracker>,
) -> Result<(), BehaviourError> {
    let entity = event.entity;
    let Ok((mut knockback, transform, sensors, rigidbody, jump, animator, sounds)) =
        query.get_mut(entity)
    else {
        return Ok(());
    };

    if event.kind == CollisionKind::Exit {
        knockback.on_collision_exit(event.other);
        return Ok(());
    }

    let is_platform = tags.get(event.other).map(Tag::is_platform).unwrap_or(false);
    if !is_platform {
        return Ok(());
    }
    let Some(mut rigidbody) = rigidbody else {
        return Ok(());
    };

    let missing = |sibling| BehaviourError::MissingSibling {
        entity,
        controller: CONTROLLER,
        sibling,
    };
    let sensors = sensors.ok_or_else(|| missing("PlayerSensors"))?;
    let jump = jump.ok_or_else(|| missing("JumpController"))?;
    let mut animator = animator.ok_or_else(|| missing("Animator"))?;
    let mut sounds = sounds.ok_or_else(|| missing("SoundAggregator"))?;

    let ctx = HitContext {
        position: transform.position,
        contact_point: event.manifold.first_point(),
        grounded: touching(trackers, sensors.ground),
        touching_ceiling: touching(trackers, sensors.ceiling),
        last_used_impulse: jump.last_used_impulse(),
        max_impulse: jump.max_impulse(),
    };
    if let Some(acceleration) = knockback.on_collision_enter(event.other, &ctx) {
        debug!("knockback on {entity}: {acceleration:?}");
        rigidbody.add_acceleration(acceleration);
        animator.set_animation(anim::KNOCKBACK);
        sounds.add_sound(sound::KNOCKBACK);
    }
    Ok(())
}
