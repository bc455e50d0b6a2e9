//! Per-tick sound event collection.
//!
//! Controllers add sound keys while they run; once per tick the sound system
//! drains the set into the entity's `Sounds` property for the presentation
//! layer. A key added several times in the same tick is emitted once.

use std::collections::BTreeSet;

use bevy_ecs::prelude::Component;

pub const JUMP_HOLD: &str = "jumpHold";
pub const JUMP: &str = "jump";
pub const KNOCKBACK: &str = "knockBack";
pub const LANDING: &str = "landing";
pub const FALL: &str = "fall";

#[derive(Component, Debug, Clone, Default)]
pub struct SoundAggregator {
    pending: BTreeSet<String>,
}

impl SoundAggregator {
    pub fn add_sound(&mut self, key: &str) {
        if !self.pending.contains(key) {
            self.pending.insert(key.to_string());
        }
    }

    /// Take every sound added since the last drain, in key order.
    pub fn drain_sounds(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
