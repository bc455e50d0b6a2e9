//! Screen-by-screen camera follow.
//!
//! The view changes only when the player's feet cross into another screen
//! height. The camera then eases from where it was to the new screen over
//! `1 / speed` seconds.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::collider::Collider;
use crate::components::object::Tag;
use crate::components::transform::Transform2D;
use crate::error::BehaviourError;
use crate::math::ease_out_sine;
use crate::resources::camera::{Camera, CameraController};
use crate::resources::worldtime::WorldTime;

/// Track the entity tagged `player`.
///
/// Without a camera, a controller or a player the system does nothing.
pub fn camera_update(
    time: Option<Res<WorldTime>>,
    camera: Option<ResMut<Camera>>,
    controller: Option<ResMut<CameraController>>,
    query: Query<(&Tag, &Transform2D, &Collider)>,
) -> Result<(), BehaviourError> {
    let time = time.ok_or(BehaviourError::MissingResource("WorldTime"))?;
    let (Some(mut camera), Some(mut controller)) = (camera, controller) else {
        return Ok(());
    };
    let Some((_, transform, collider)) = query.iter().find(|(tag, _, _)| tag.is(Tag::PLAYER))
    else {
        return Ok(());
    };

    let feet = collider.bounds(transform.position).min.y;
    let level = controller.level_for(&camera, feet);
    let target = Vec2::new(
        camera.position.x,
        camera.world_height() * level as f32 + controller.initial.y,
    );
    if target != controller.current {
        controller.previous = camera.position;
        controller.current = target;
        controller.transition = 0.0;
    }
    if controller.transition < 1.0 {
        controller.transition = (controller.transition + time.delta * controller.speed).clamp(0.0, 1.0);
        let eased = ease_out_sine(controller.transition);
        camera.position = controller.previous.lerp(controller.current, eased);
    }
    Ok(())
}
