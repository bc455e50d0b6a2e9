//! Sound publication.
//!
//! Once per tick, after the last fixed step, [`sound_update`] drains each
//! [`SoundAggregator`] into the `Sounds` property. The list is replaced every
//! tick, so an empty list means silence.

use bevy_ecs::prelude::*;

use crate::components::properties::{Properties, SOUNDS};
use crate::components::sound::SoundAggregator;
use crate::error::BehaviourError;

pub fn sound_update(
    mut query: Query<(&mut SoundAggregator, Option<&mut Properties>)>,
) -> Result<(), BehaviourError> {
    for (mut sounds, properties) in query.iter_mut() {
        let drained = sounds.drain_sounds();
        if let Some(mut properties) = properties {
            properties.set_list(SOUNDS, drained);
        }
    }
    Ok(())
}
