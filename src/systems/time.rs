//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta and
//! feeding the fixed-step accumulator.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed, delta and accumulator on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled tick delta in seconds. Negative or
/// non-finite deltas are treated as zero. Returns `false` when the resource
/// is missing.
pub fn update_world_time(world: &mut World, dt: f32) -> bool {
    let Some(mut wt) = world.get_resource_mut::<WorldTime>() else {
        return false;
    };
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.accumulator += scaled_dt;
    wt.frame_count += 1;
    true
}
