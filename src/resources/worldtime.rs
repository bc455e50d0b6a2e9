use bevy_ecs::prelude::Resource;

/// Default fixed step, in seconds.
pub const DEFAULT_FIXED_DELTA: f32 = 1.0 / 75.0;

/// Simulation clock.
///
/// `delta` is the scaled duration of the current tick and drives the
/// variable-rate phase. The fixed-rate phase always advances by
/// `fixed_delta`; `accumulator` holds the time not yet covered by fixed
/// steps.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
    pub fixed_delta: f32,
    pub accumulator: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            fixed_delta: DEFAULT_FIXED_DELTA,
            accumulator: 0.0,
        }
    }
}

impl WorldTime {
    pub fn with_fixed_delta(fixed_delta: f32) -> Self {
        Self {
            fixed_delta,
            ..Self::default()
        }
    }

    /// Number of fixed steps owed for the accumulated time, at most
    /// `max_steps`. When the cap is hit, the backlog beyond one step is
    /// dropped.
    pub fn consume_fixed_steps(&mut self, max_steps: u32) -> u32 {
        if self.fixed_delta <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.accumulator >= self.fixed_delta && steps < max_steps {
            self.accumulator -= self.fixed_delta;
            steps += 1;
        }
        if steps == max_steps {
            self.accumulator = self.accumulator.min(self.fixed_delta);
        }
        steps
    }
}
