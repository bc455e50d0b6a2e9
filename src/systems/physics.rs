//! Stand-in physics step.
//!
//! A minimal solver good enough to drive the behaviour layer headlessly:
//! boxes only, no rotation response, dynamic bodies against static solids.
//! It runs once per fixed step, after the behaviour controllers.
//!
//! Order of one step
//! 1. Integrate every active body. Dynamic bodies first absorb their queued
//!    accelerations, then gravity and drag. They move one axis at a time and
//!    are pushed out of static solids after each axis.
//! 2. Re-place the contact sensors against their moved parents.
//! 3. Detect overlaps and diff them against the previous step.
//! 4. Deliver [`TriggerEvent`]s then [`CollisionEvent`]s to the observers.
//!    Within each kind, enters go out before exits so that crossing a seam
//!    between two touching tiles never reads as "no contact".
//! 5. Fail with the first fault the observers reported, if any.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::components::collider::{Aabb, Collider};
use crate::components::contact::ContactTracker;
use crate::components::object::Active;
use crate::components::rigidbody::{BodyKind, RigidBody};
use crate::components::transform::Transform2D;
use crate::error::BehaviourError;
use crate::events::contact::{
    CollisionEvent, CollisionKind, ContactManifold, ContactPoint, TriggerEvent, TriggerKind,
};
use crate::resources::physics::{ContactFaults, ContactPair, ContactPairs, PhysicsSettings};
use crate::resources::worldtime::WorldTime;
use crate::systems::contact::place_sensors;

/// Overlap depth below which a solid is not resolved on the other axis.
const RESOLVE_SLOP: f32 = 1.0e-3;

fn is_active(active: Option<&Active>) -> bool {
    active.is_none_or(|a| a.0)
}

/// Advance the simulation by one fixed step.
///
/// Contract
/// - Reads [`WorldTime::fixed_delta`]; fails if [`WorldTime`] is missing.
/// - Uses [`PhysicsSettings`] when present, defaults otherwise.
/// - Keeps its contact bookkeeping in [`ContactPairs`] (inserted on demand).
pub fn physics_step(world: &mut World) -> Result<(), BehaviourError> {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|t| t.fixed_delta)
        .ok_or(BehaviourError::MissingResource("WorldTime"))?;
    let settings = world
        .get_resource::<PhysicsSettings>()
        .copied()
        .unwrap_or_default();

    integrate(world, &settings, dt);
    place_sensors(world);

    let (triggers, collisions) = detect_contacts(world, settings.contact_skin);
    let mut pairs = world.get_resource_or_init::<ContactPairs>();
    let trigger_events = diff_triggers(&pairs.triggers, &triggers);
    let collision_events = diff_collisions(&pairs.collisions, &collisions);
    pairs.triggers = triggers.into_iter().collect();
    pairs.collisions = collisions.iter().map(|(pair, _)| *pair).collect();

    for event in trigger_events {
        world.trigger(event);
    }
    for event in collision_events {
        debug!(
            "collision {:?} {} -> {}",
            event.kind, event.entity, event.other
        );
        world.trigger(event);
    }
    world.flush();

    let faults = world
        .get_resource_mut::<ContactFaults>()
        .map(|mut faults| std::mem::take(&mut faults.errors))
        .unwrap_or_default();
    let mut faults = faults.into_iter();
    match faults.next() {
        Some(first) => {
            for extra in faults {
                warn!("contact observer fault: {extra}");
            }
            Err(first)
        }
        None => Ok(()),
    }
}

fn integrate(world: &mut World, settings: &PhysicsSettings, dt: f32) {
    let solids: Vec<Aabb> = {
        let mut query = world.query::<(
            &Transform2D,
            &Collider,
            Option<&RigidBody>,
            Option<&Active>,
        )>();
        query
            .iter(world)
            .filter(|(_, collider, body, active)| {
                is_active(*active)
                    && !collider.is_trigger
                    && body.is_none_or(|b| b.kind == BodyKind::Static)
            })
            .map(|(transform, collider, _, _)| collider.bounds(transform.position))
            .collect()
    };

    let mut bodies = world.query::<(
        &mut Transform2D,
        &mut RigidBody,
        Option<&Collider>,
        Option<&Active>,
    )>();
    for (mut transform, mut body, collider, active) in bodies.iter_mut(world) {
        if !is_active(active) {
            continue;
        }
        let kind = body.kind;
        match kind {
            BodyKind::Static => {}
            BodyKind::Kinematic => {
                transform.position += body.velocity * dt;
                transform.rotation += body.angular_velocity * dt;
            }
            BodyKind::Dynamic => {
                let queued = body.take_acceleration();
                let damping = 1.0 / (1.0 + body.drag * dt);
                let velocity =
                    (body.velocity + queued + settings.gravity * body.gravity_scale * dt) * damping;
                body.velocity = velocity;
                body.angular_velocity *= 1.0 / (1.0 + body.angular_drag * dt);
                transform.rotation += body.angular_velocity * dt;

                let solid = collider.filter(|c| !c.is_trigger);
                let mut position = transform.position;
                let mut velocity = body.velocity;
                move_axis(&mut position, &mut velocity, solid, &solids, 0, dt);
                move_axis(&mut position, &mut velocity, solid, &solids, 1, dt);
                transform.position = position;
                body.velocity = velocity;
            }
        }
    }
}

/// Move along one axis and push out of every solid overlapped on it.
fn move_axis(
    position: &mut Vec2,
    velocity: &mut Vec2,
    collider: Option<&Collider>,
    solids: &[Aabb],
    axis: usize,
    dt: f32,
) {
    position[axis] += velocity[axis] * dt;
    let Some(collider) = collider else {
        return;
    };
    let cross = 1 - axis;
    for solid in solids {
        let bounds = collider.bounds(*position);
        let Some(depth) = bounds.penetration(solid) else {
            continue;
        };
        if depth[cross] <= RESOLVE_SLOP {
            continue;
        }
        let from_below = if velocity[axis] != 0.0 {
            velocity[axis] > 0.0
        } else {
            bounds.center()[axis] < solid.center()[axis]
        };
        let push = if from_below { -depth[axis] } else { depth[axis] };
        position[axis] += push;
        if velocity[axis] * push < 0.0 {
            velocity[axis] = 0.0;
        }
    }
}

struct ContactBody {
    entity: Entity,
    bounds: Aabb,
    is_trigger: bool,
    is_dynamic: bool,
    /// Parent of a sensor; sensors never report their own parent.
    parent: Option<Entity>,
}

type Collisions = Vec<(ContactPair, ContactManifold)>;

fn detect_contacts(world: &mut World, skin: f32) -> (Vec<ContactPair>, Collisions) {
    let mut query = world.query::<(
        Entity,
        &Transform2D,
        &Collider,
        Option<&RigidBody>,
        Option<&ContactTracker>,
        Option<&Active>,
    )>();
    let bodies: Vec<ContactBody> = query
        .iter(world)
        .filter(|(.., active)| is_active(*active))
        .map(|(entity, transform, collider, body, tracker, _)| ContactBody {
            entity,
            bounds: collider.bounds(transform.position),
            is_trigger: collider.is_trigger,
            is_dynamic: body.is_some_and(RigidBody::is_dynamic),
            parent: tracker.map(|t| t.parent),
        })
        .collect();

    let mut triggers = Vec::new();
    let mut collisions = Vec::new();
    for a in &bodies {
        if a.is_trigger {
            for b in bodies.iter().filter(|b| !b.is_trigger && b.entity != a.entity) {
                if Some(b.entity) != a.parent && a.bounds.overlaps(&b.bounds) {
                    triggers.push((a.entity, b.entity));
                }
            }
        } else if a.is_dynamic {
            for b in bodies.iter().filter(|b| !b.is_trigger && b.entity != a.entity) {
                if a.bounds.overlaps_with_margin(&b.bounds, skin) {
                    collisions.push(((a.entity, b.entity), manifold(&a.bounds, &b.bounds, skin)));
                }
            }
        }
    }
    triggers.sort();
    collisions.sort_by_key(|(pair, _)| *pair);
    (triggers, collisions)
}

/// Single-point manifold at the centre of the shared region.
///
/// The normal points from `other` toward `body` along the shallower axis.
fn manifold(body: &Aabb, other: &Aabb, skin: f32) -> ContactManifold {
    let grown = Aabb {
        min: body.min - Vec2::splat(skin),
        max: body.max + Vec2::splat(skin),
    };
    let shared = grown.intersection(other);
    let depth = shared.size();
    let away = body.center() - other.center();
    let normal = if depth.x < depth.y {
        Vec2::new(away.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, away.y.signum())
    };
    ContactManifold::single(ContactPoint {
        position: shared.center(),
        normal,
        penetration: (depth.min_element() - skin).max(0.0),
    })
}

fn diff_triggers(
    previous: &FxHashSet<ContactPair>,
    current: &[ContactPair],
) -> Vec<TriggerEvent> {
    let current_set: FxHashSet<ContactPair> = current.iter().copied().collect();
    let mut events: Vec<TriggerEvent> = current
        .iter()
        .map(|&(sensor, other)| TriggerEvent {
            sensor,
            other,
            kind: if previous.contains(&(sensor, other)) {
                TriggerKind::Stay
            } else {
                TriggerKind::Enter
            },
        })
        .collect();
    let mut exits: Vec<ContactPair> = previous
        .iter()
        .filter(|pair| !current_set.contains(*pair))
        .copied()
        .collect();
    exits.sort();
    events.extend(exits.into_iter().map(|(sensor, other)| TriggerEvent {
        sensor,
        other,
        kind: TriggerKind::Exit,
    }));
    events
}

fn diff_collisions(previous: &FxHashSet<ContactPair>, current: &Collisions) -> Vec<CollisionEvent> {
    let current_set: FxHashSet<ContactPair> = current.iter().map(|(pair, _)| *pair).collect();
    let mut events: Vec<CollisionEvent> = current
        .iter()
        .filter(|(pair, _)| !previous.contains(pair))
        .map(|((entity, other), manifold)| CollisionEvent {
            entity: *entity,
            other: *other,
            kind: CollisionKind::Enter,
            manifold: manifold.clone(),
        })
        .collect();
    let mut exits: Vec<ContactPair> = previous
        .iter()
        .filter(|pair| !current_set.contains(*pair))
        .copied()
        .collect();
    exits.sort();
    events.extend(exits.into_iter().map(|(entity, other)| CollisionEvent {
        entity,
        other,
        kind: CollisionKind::Exit,
        manifold: ContactManifold::default(),
    }));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::object::Tag;
    use bevy_ecs::observer::On;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn world_with_floor() -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(WorldTime::with_fixed_delta(0.02));
        world.insert_resource(PhysicsSettings::default());
        let floor = world
            .spawn((
                Tag::platform(),
                Transform2D::from_position(Vec2::new(0.0, -5.0)),
                RigidBody::default(),
                Collider::rect(200.0, 10.0),
            ))
            .id();
        (world, floor)
    }

    // ==================== INTEGRATION TESTS ====================

    #[test]
    fn test_queued_acceleration_is_one_shot() {
        let mut world = World::new();
        world.insert_resource(WorldTime::with_fixed_delta(0.1));
        world.insert_resource(PhysicsSettings {
            gravity: Vec2::ZERO,
            ..Default::default()
        });
        let mut body = RigidBody::dynamic(5.0, 0.0);
        body.add_acceleration(Vec2::new(10.0, 0.0));
        let e = world.spawn((Transform2D::default(), body)).id();

        physics_step(&mut world).unwrap();
        let t = world.get::<Transform2D>(e).unwrap();
        assert!(approx_eq(t.position.x, 1.0));
        physics_step(&mut world).unwrap();
        let b = world.get::<RigidBody>(e).unwrap();
        assert!(approx_eq(b.velocity.x, 10.0));
        assert_eq!(b.pending_acceleration(), Vec2::ZERO);
    }

    #[test]
    fn test_body_rests_on_floor() {
        let (mut world, _) = world_with_floor();
        let e = world
            .spawn((
                Transform2D::from_position(Vec2::new(0.0, 10.0)),
                RigidBody::dynamic(1.0, 0.0),
                Collider::rect(10.0, 20.0),
            ))
            .id();
        for _ in 0..50 {
            physics_step(&mut world).unwrap();
        }
        let t = world.get::<Transform2D>(e).unwrap();
        assert!(approx_eq(t.position.y, 10.0));
        assert!(approx_eq(world.get::<RigidBody>(e).unwrap().velocity.y, 0.0));
    }

    #[test]
    fn test_inactive_body_does_not_move() {
        let (mut world, _) = world_with_floor();
        let e = world
            .spawn((
                Active(false),
                Transform2D::from_position(Vec2::new(0.0, 100.0)),
                RigidBody::dynamic(1.0, 0.0),
            ))
            .id();
        physics_step(&mut world).unwrap();
        assert_eq!(world.get::<Transform2D>(e).unwrap().position.y, 100.0);
    }

    // ==================== CONTACT TESTS ====================

    #[derive(Resource, Default)]
    struct Seen(Vec<CollisionKind>);

    fn record(trigger: On<CollisionEvent>, mut seen: ResMut<Seen>) {
        seen.0.push(trigger.event().kind);
    }

    #[test]
    fn test_collision_enter_then_exit() {
        let (mut world, floor) = world_with_floor();
        world.init_resource::<Seen>();
        world.add_observer(record);
        let e = world
            .spawn((
                Transform2D::from_position(Vec2::new(0.0, 10.0)),
                RigidBody::dynamic(1.0, 0.0),
                Collider::rect(10.0, 20.0),
            ))
            .id();

        physics_step(&mut world).unwrap();
        assert_eq!(world.resource::<Seen>().0, vec![CollisionKind::Enter]);
        assert!(world.resource::<ContactPairs>().collisions.contains(&(e, floor)));

        world.get_mut::<RigidBody>(e).unwrap().add_acceleration(Vec2::new(0.0, 300.0));
        physics_step(&mut world).unwrap();
        assert_eq!(
            world.resource::<Seen>().0,
            vec![CollisionKind::Enter, CollisionKind::Exit]
        );
    }

    #[test]
    fn test_manifold_normal_and_point() {
        let body = Aabb::from_center(Vec2::new(0.0, 10.0), Vec2::new(10.0, 20.0));
        let wall = Aabb::from_center(Vec2::new(10.0, 10.0), Vec2::new(10.0, 40.0));
        let m = manifold(&body, &wall, 0.05);
        let p = m.points[0];
        assert_eq!(p.normal, Vec2::new(-1.0, 0.0));
        assert!(p.position.x > 5.0);
        assert!(approx_eq(p.position.y, 10.0));
    }

    #[test]
    fn test_observer_fault_fails_step() {
        let (mut world, _) = world_with_floor();
        world.init_resource::<ContactFaults>();
        world
            .resource_mut::<ContactFaults>()
            .errors
            .push(BehaviourError::MissingResource("Test"));
        let result = physics_step(&mut world);
        assert!(matches!(result, Err(BehaviourError::MissingResource("Test"))));
        assert!(world.resource::<ContactFaults>().errors.is_empty());
    }
}
