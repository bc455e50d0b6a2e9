//! Ground and ceiling contact sensing.
//!
//! A sensor is a small trigger collider kept flush against one side of its
//! parent's bounds. The [`ContactTracker`] on the sensor records which
//! platforms currently overlap it, and the parent asks "am I grounded?" by
//! reading the tracker of the sensor referenced from its [`PlayerSensors`].
//!
//! The parent is referenced by [`Entity`] handle only; it is looked up every
//! tick and a despawned parent simply stops the sensor from moving.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::components::collider::Collider;

/// Set of entities currently in contact.
///
/// Insert on enter/stay, remove on exit. Touching means non-empty.
#[derive(Debug, Clone, Default)]
pub struct ContactSet {
    contacts: FxHashSet<Entity>,
}

impl ContactSet {
    /// Record `id` as touching. Returns `true` if it was not tracked yet.
    pub fn insert(&mut self, id: Entity) -> bool {
        self.contacts.insert(id)
    }

    /// Forget `id`. Removing an untracked id is a no-op.
    pub fn remove(&mut self, id: Entity) -> bool {
        self.contacts.remove(&id)
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.contacts.contains(&id)
    }

    pub fn is_touching(&self) -> bool {
        !self.contacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}

/// Which side of the parent a sensor hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorPlacement {
    /// Below the parent's minimum Y bound.
    Below,
    /// Above the parent's maximum Y bound.
    Above,
}

/// Contact tracker living on a sensor entity.
#[derive(Component, Debug, Clone)]
pub struct ContactTracker {
    pub parent: Entity,
    pub placement: SensorPlacement,
    pub contacts: ContactSet,
}

impl ContactTracker {
    pub fn ground(parent: Entity) -> Self {
        Self {
            parent,
            placement: SensorPlacement::Below,
            contacts: ContactSet::default(),
        }
    }

    pub fn ceiling(parent: Entity) -> Self {
        Self {
            parent,
            placement: SensorPlacement::Above,
            contacts: ContactSet::default(),
        }
    }

    pub fn on_trigger_enter(&mut self, id: Entity) {
        self.contacts.insert(id);
    }

    pub fn on_trigger_stay(&mut self, id: Entity) {
        self.contacts.insert(id);
    }

    pub fn on_trigger_exit(&mut self, id: Entity) {
        self.contacts.remove(id);
    }

    pub fn is_touching(&self) -> bool {
        self.contacts.is_touching()
    }

    /// Position that puts `sensor` flush against the parent's bounds,
    /// horizontally centred on the parent.
    pub fn flush_position(&self, sensor: &Collider, parent_position: Vec2, parent: &Collider) -> Vec2 {
        let bounds = parent.bounds(parent_position);
        let half_height = sensor.height() * 0.5;
        let center_y = match self.placement {
            SensorPlacement::Below => bounds.min.y - half_height,
            SensorPlacement::Above => bounds.max.y + half_height,
        };
        Vec2::new(parent_position.x, center_y) - sensor.offset
    }
}

/// Handles to the sensors of an entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerSensors {
    pub ground: Entity,
    pub ceiling: Entity,
}

/// Read-only grounded/ceiling query used by the controller systems.
///
/// A missing or despawned sensor reads as "not touching".
pub fn touching(trackers: &Query<&ContactTracker>, sensor: Entity) -> bool {
    trackers
        .get(sensor)
        .map(|tracker| tracker.is_touching())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_empty_set_is_not_touching() {
        let set = ContactSet::default();
        assert!(!set.is_touching());
        assert!(set.is_empty());
    }

    #[test]
    fn test_is_touching_is_or_of_contacts() {
        let e = ids(3);
        let mut tracker = ContactTracker::ground(e[0]);

        tracker.on_trigger_enter(e[1]);
        tracker.on_trigger_enter(e[2]);
        assert!(tracker.is_touching());

        tracker.on_trigger_exit(e[1]);
        assert!(tracker.is_touching());

        tracker.on_trigger_stay(e[1]);
        tracker.on_trigger_exit(e[2]);
        assert!(tracker.is_touching());

        tracker.on_trigger_exit(e[1]);
        assert!(!tracker.is_touching());
    }

    #[test]
    fn test_exit_of_untracked_id_is_noop() {
        let e = ids(3);
        let mut tracker = ContactTracker::ceiling(e[0]);
        tracker.on_trigger_exit(e[1]);
        assert!(!tracker.is_touching());

        tracker.on_trigger_enter(e[2]);
        tracker.on_trigger_exit(e[1]);
        assert!(tracker.is_touching());
        assert_eq!(tracker.contacts.len(), 1);
    }

    #[test]
    fn test_repeated_enter_is_idempotent() {
        let e = ids(2);
        let mut set = ContactSet::default();
        assert!(set.insert(e[1]));
        assert!(!set.insert(e[1]));
        assert!(set.remove(e[1]));
        assert!(!set.is_touching());
    }

    #[test]
    fn test_flush_position_below_and_above() {
        let e = ids(1);
        let parent = Collider::rect(32.0, 40.0);
        let sensor = Collider::rect(16.0, 0.5).as_trigger();
        let at = Vec2::new(10.0, 100.0);

        let ground = ContactTracker::ground(e[0]).flush_position(&sensor, at, &parent);
        assert!((ground - Vec2::new(10.0, 79.75)).length() < 1e-5);

        let ceiling = ContactTracker::ceiling(e[0]).flush_position(&sensor, at, &parent);
        assert!((ceiling - Vec2::new(10.0, 120.25)).length() < 1e-5);
    }

    #[test]
    fn test_placements() {
        let e = ids(1);
        assert_eq!(ContactTracker::ground(e[0]).placement, SensorPlacement::Below);
        assert_eq!(ContactTracker::ceiling(e[0]).placement, SensorPlacement::Above);
    }
}
