//! Entity prefabs.
//!
//! - [`spawn_player`] builds the playable character, its ground and ceiling
//!   sensors, and attaches every behaviour controller.
//! - [`spawn_map`] turns a [`Tilemap`] into one static entity per tile.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::animator::{self as anim, Animator};
use crate::components::collider::{Collider, Material};
use crate::components::contact::{ContactTracker, PlayerSensors};
use crate::components::fall::FallController;
use crate::components::jump::JumpController;
use crate::components::knockback::KnockbackController;
use crate::components::movement::MovementController;
use crate::components::object::{Active, Tag};
use crate::components::properties::{FLIP_HORIZONTALLY, IMAGE, Properties, SOUNDS};
use crate::components::renderer::Renderer;
use crate::components::rigidbody::{CollisionDetection, Interpolation, RigidBody};
use crate::components::sound::SoundAggregator;
use crate::components::transform::Transform2D;
use crate::resources::playerconfig::PlayerConfig;
use crate::resources::tilemap::Tilemap;

/// Height of the contact sensors, in world units.
pub const SENSOR_HEIGHT: f32 = 0.5;

/// Spawn the player and its two sensors. Returns the player entity.
pub fn spawn_player(world: &mut World, config: &PlayerConfig) -> Entity {
    let object = &config.object;
    let clips = Arc::new(config.animations.clone());
    let animator = Animator::with_initial(clips, anim::IDLE);

    let mut properties = Properties::default();
    if let Some(frame) = animator.current_frame() {
        properties.set_text(IMAGE, frame);
    }
    properties.set_bool(FLIP_HORIZONTALLY, false);
    properties.set_list(SOUNDS, Vec::new());

    let collider = Collider::rect(object.collider_size.x, object.collider_size.y)
        .with_offset(object.collider_offset)
        .with_material(Material {
            friction: object.friction,
            ..Material::default()
        });
    let sensor_width = object.collider_size.x * 0.5;

    let player = world
        .spawn((
            Tag::player(),
            Active::default(),
            Transform2D::from_position(object.position),
            RigidBody::dynamic(object.mass, object.drag)
                .with_interpolation(Interpolation::Interpolate)
                .with_collision_detection(CollisionDetection::Continuous),
            collider,
            Renderer::new(object.renderer_size).with_offset(object.renderer_offset),
            properties,
            animator,
            SoundAggregator::default(),
        ))
        .id();

    let ground = spawn_sensor(world, ContactTracker::ground(player), sensor_width);
    let ceiling = spawn_sensor(world, ContactTracker::ceiling(player), sensor_width);

    world.entity_mut(player).insert((
        MovementController::new(config.movement.speed),
        JumpController::new(config.jump),
        KnockbackController::new(config.knockback),
        FallController::new(config.fall.allowed_duration),
        PlayerSensors { ground, ceiling },
    ));

    crate::systems::contact::place_sensors(world);
    info!("Spawned player {player} at {:?}", object.position);
    player
}

fn spawn_sensor(world: &mut World, tracker: ContactTracker, width: f32) -> Entity {
    world
        .spawn((
            Active::default(),
            Transform2D::default(),
            RigidBody::kinematic(),
            Collider::rect(width, SENSOR_HEIGHT).as_trigger(),
            tracker,
        ))
        .id()
}

/// Spawn every tile of `map`. Returns the number of entities spawned.
///
/// Tiles of a layer whose name mentions "platform" are tagged `platform`;
/// other tiles carry the layer name. Only layers flagged `collider` get a
/// solid box.
pub fn spawn_map(world: &mut World, map: &Tilemap) -> usize {
    let size = map.tile_size;
    let mut count = 0;
    for layer in &map.layers {
        let tag = if layer.is_platform() {
            Tag::platform()
        } else {
            Tag::new(layer.name.clone())
        };
        for tile in &layer.tiles {
            let center = Vec2::new(
                (tile.x as f32 + 0.5) * size,
                (map.world_row(tile.y) as f32 + 0.5) * size,
            );
            let mut properties = Properties::default();
            if let Some(image) = map.tile_images.get(&tile.id) {
                properties.set_text(IMAGE, image.clone());
            }

            let mut entity = world.spawn((
                tag.clone(),
                Active::default(),
                Transform2D::from_position(center),
                RigidBody::default(),
                Renderer::new(Vec2::splat(size)),
                properties,
            ));
            if layer.collider {
                entity.insert(Collider::rect(size, size));
            }
            count += 1;
        }
    }
    info!("Spawned {count} tiles from {} layers", map.layers.len());
    count
}
