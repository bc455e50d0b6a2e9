//! Identity components shared by every game object.
//!
//! - [`Tag`] names the role of an entity (`"player"`, `"platform"`, or the map
//!   layer it came from). Contact tracking only cares about platforms.
//! - [`Active`] hides an entity from snapshots without despawning it.

use bevy_ecs::prelude::*;
use serde::Serialize;

#[derive(Component, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tag(pub String);

impl Tag {
    pub const PLATFORM: &'static str = "platform";
    pub const PLAYER: &'static str = "player";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn platform() -> Self {
        Self::new(Self::PLATFORM)
    }

    pub fn player() -> Self {
        Self::new(Self::PLAYER)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    pub fn is_platform(&self) -> bool {
        self.is(Self::PLATFORM)
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Active(true)
    }
}

/// First entity carrying `tag`, if any.
pub fn find_with_tag(world: &mut World, tag: &str) -> Option<Entity> {
    let mut query = world.query::<(Entity, &Tag)>();
    query
        .iter(world)
        .find(|(_, t)| t.is(tag))
        .map(|(entity, _)| entity)
}
