//! Per-tick presentation snapshot.
//!
//! [`capture`] copies what a renderer needs out of the world: every active
//! object the camera can see, the camera itself and the sounds raised this
//! tick. The snapshot is plain serde data, so the headless runner prints it
//! as JSON.

use std::collections::BTreeSet;

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::components::collider::{Aabb, Collider};
use crate::components::object::{Active, Tag};
use crate::components::properties::{FLIP_HORIZONTALLY, IMAGE, Properties, SOUNDS};
use crate::components::renderer::Renderer;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform2D;
use crate::resources::camera::Camera;

#[derive(Debug, Clone, Serialize)]
pub struct RendererSnapshot {
    pub size: glam::Vec2,
    pub offset: glam::Vec2,
    pub image: Option<String>,
    pub flip_horizontally: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectSnapshot {
    pub id: u64,
    pub active: bool,
    pub tag: String,
    pub transform: Transform2D,
    pub rigid_body: Option<RigidBody>,
    pub collider: Option<Collider>,
    pub bounds: Option<Aabb>,
    pub renderer: Option<RendererSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub frame: u64,
    pub game_objects: Vec<ObjectSnapshot>,
    pub camera: Option<Camera>,
    /// Sounds raised during the tick, sorted and deduplicated.
    pub sounds: Vec<String>,
}

impl GameSnapshot {
    pub fn object_with_tag(&self, tag: &str) -> Option<&ObjectSnapshot> {
        self.game_objects.iter().find(|o| o.tag == tag)
    }
}

type ObjectQueryData<'a> = (
    Entity,
    &'a Tag,
    &'a Transform2D,
    Option<&'a Active>,
    Option<&'a RigidBody>,
    Option<&'a Collider>,
    Option<&'a Renderer>,
    Option<&'a Properties>,
);

/// Capture the presentation state of `world`.
///
/// Objects without a collider or renderer have no extent and are kept
/// whatever the camera sees. Without a [`Camera`] every active object is
/// kept.
pub fn capture(world: &mut World, frame: u64) -> GameSnapshot {
    let camera = world.get_resource::<Camera>().copied();
    let mut query = world.query::<ObjectQueryData>();

    let mut sounds = BTreeSet::new();
    let mut game_objects = Vec::new();
    for (entity, tag, transform, active, body, collider, renderer, properties) in query.iter(world)
    {
        if let Some(list) = properties.and_then(|p| p.get_list(SOUNDS)) {
            sounds.extend(list.iter().cloned());
        }
        if !active.is_none_or(|a| a.0) {
            continue;
        }

        let bounds = collider.map(|c| c.bounds(transform.position));
        let drawn = renderer
            .map(|r| Aabb::from_center(transform.position + r.offset, r.size));
        let visible = match (camera, bounds.or(drawn)) {
            (Some(camera), Some(extent)) => camera.is_visible(&extent),
            _ => true,
        };
        if !visible {
            continue;
        }

        game_objects.push(ObjectSnapshot {
            id: entity.to_bits(),
            active: true,
            tag: tag.name().to_string(),
            transform: *transform,
            rigid_body: body.cloned(),
            collider: collider.cloned(),
            bounds,
            renderer: renderer.map(|r| RendererSnapshot {
                size: r.size,
                offset: r.offset,
                image: properties
                    .and_then(|p| p.get_text(IMAGE))
                    .map(str::to_string),
                flip_horizontally: properties
                    .and_then(|p| p.get_bool(FLIP_HORIZONTALLY))
                    .unwrap_or(false),
            }),
        });
    }
    game_objects.sort_by_key(|o| o.id);

    GameSnapshot {
        frame,
        game_objects,
        camera,
        sounds: sounds.into_iter().collect(),
    }
}
