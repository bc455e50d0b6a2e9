use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Presentation descriptor: size and offset of the drawn image, in world
/// units, relative to the entity position. The image itself is resolved from
/// the entity's [`Properties`](super::properties::Properties).
#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Renderer {
    pub size: Vec2,
    pub offset: Vec2,
}

impl Renderer {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}
