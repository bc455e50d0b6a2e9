//! Knockback reaction to airborne platform hits.
//!
//! Hitting a wall or a ledge while flying through the air bounces the entity
//! away from the contact point. The bounce leans upward in proportion to how
//! strong the last jump was. Landing straight down on a platform never
//! bounces.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::contact::ContactSet;
use crate::math::{approximately, rotate_degrees};
use crate::resources::playerconfig::KnockbackConfig;

/// Everything the controller needs to know about the entity at the moment
/// of a collision.
#[derive(Debug, Clone, Copy)]
pub struct HitContext {
    pub position: Vec2,
    /// First contact point of the collision, if the manifold had any.
    pub contact_point: Option<Vec2>,
    pub grounded: bool,
    pub touching_ceiling: bool,
    pub last_used_impulse: f32,
    pub max_impulse: f32,
}

#[derive(Component, Debug, Clone)]
pub struct KnockbackController {
    pub config: KnockbackConfig,
    pub platforms: ContactSet,
    /// Velocity at the start of the last fixed-rate phase.
    pub previous_velocity: Vec2,
}

impl KnockbackController {
    pub fn new(config: KnockbackConfig) -> Self {
        Self {
            config,
            platforms: ContactSet::default(),
            previous_velocity: Vec2::ZERO,
        }
    }

    pub fn cache_velocity(&mut self, velocity: Vec2) {
        self.previous_velocity = velocity;
    }

    pub fn platform_contact(&self) -> bool {
        self.platforms.is_touching()
    }

    /// `true` when the cached velocity points straight up or down.
    pub fn was_moving_vertically(&self) -> bool {
        let dir = self.previous_velocity.normalize_or_zero();
        approximately(Vec2::Y.dot(dir).abs(), 1.0)
    }

    /// Record a collision with platform `other` and return the knockback
    /// acceleration if it should fire.
    pub fn on_collision_enter(&mut self, other: Entity, ctx: &HitContext) -> Option<Vec2> {
        if self.platforms.contains(other) {
            return None;
        }
        let already_in_contact = self.platform_contact();
        self.platforms.insert(other);

        if already_in_contact
            || ctx.grounded
            || ctx.touching_ceiling
            || self.was_moving_vertically()
        {
            return None;
        }
        let contact = ctx.contact_point?;
        Some(self.direction(ctx, contact) * self.config.impulse)
    }

    pub fn on_collision_exit(&mut self, other: Entity) {
        self.platforms.remove(other);
    }

    fn direction(&self, ctx: &HitContext, contact: Vec2) -> Vec2 {
        let fraction = if ctx.max_impulse > 0.0 {
            (ctx.last_used_impulse / ctx.max_impulse).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut direction = rotate_degrees(Vec2::X, self.config.diagonal_angle * fraction);
        if ctx.position.x < contact.x {
            direction.x = -direction.x;
        }
        direction
    }
}
