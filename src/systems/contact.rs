//! Sensor placement and trigger bookkeeping.
//!
//! - [`contact_resync`] runs first in the variable-rate phase and snaps every
//!   sensor flush against its parent's bounds, rotation reset.
//! - [`place_sensors`] does the same from exclusive world code; the physics
//!   step calls it after moving bodies so contacts are detected against
//!   up-to-date sensor positions.
//! - [`observe_sensor_triggers`] feeds trigger events into the
//!   [`ContactTracker`] of the sensor, keeping platform contacts only.
//!
//! Sensors or parents without a collider are left where they are.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::collider::Collider;
use crate::components::contact::ContactTracker;
use crate::components::object::Tag;
use crate::components::transform::Transform2D;
use crate::error::BehaviourError;
use crate::events::contact::{TriggerEvent, TriggerKind};

/// Reposition sensors against their parents.
pub fn contact_resync(
    mut sensors: Query<(&ContactTracker, &Collider, &mut Transform2D)>,
    parents: Query<(&Transform2D, &Collider), Without<ContactTracker>>,
) -> Result<(), BehaviourError> {
    for (tracker, collider, mut transform) in sensors.iter_mut() {
        if let Ok((parent_transform, parent_collider)) = parents.get(tracker.parent) {
            transform.position =
                tracker.flush_position(collider, parent_transform.position, parent_collider);
            transform.reset_rotation();
        }
    }
    Ok(())
}

/// [`contact_resync`] for callers holding the whole world.
pub fn place_sensors(world: &mut World) {
    let mut sensors = world.query::<(Entity, &ContactTracker, &Collider)>();
    let mut parents = world.query_filtered::<(&Transform2D, &Collider), Without<ContactTracker>>();

    let view: &World = world;
    let placements: Vec<_> = sensors
        .iter(view)
        .filter_map(|(entity, tracker, collider)| {
            let (parent_transform, parent_collider) = parents.get(view, tracker.parent).ok()?;
            Some((
                entity,
                tracker.flush_position(collider, parent_transform.position, parent_collider),
            ))
        })
        .collect();

    for (entity, position) in placements {
        if let Some(mut transform) = world.get_mut::<Transform2D>(entity) {
            transform.position = position;
            transform.reset_rotation();
        }
    }
}

/// Global observer updating sensor contact sets from trigger events.
///
/// Events whose sensor has no tracker, or whose other entity is not tagged
/// as a platform, are ignored. Exits are applied whatever the tag is, so a
/// platform that lost its tag still clears.
pub fn observe_sensor_triggers(
    trigger: On<TriggerEvent>,
    mut trackers: Query<&mut ContactTracker>,
    tags: Query<&Tag>,
) {
    let event = trigger.event();
    let Ok(mut tracker) = trackers.get_mut(event.sensor) else {
        return;
    };
    match event.kind {
        TriggerKind::Exit => tracker.on_trigger_exit(event.other),
        TriggerKind::Enter | TriggerKind::Stay => {
            let is_platform = tags.get(event.other).map(Tag::is_platform).unwrap_or(false);
            if !is_platform {
                return;
            }
            if event.kind == TriggerKind::Enter {
                tracker.on_trigger_enter(event.other);
            } else {
                tracker.on_trigger_stay(event.other);
            }
        }
    }
}
