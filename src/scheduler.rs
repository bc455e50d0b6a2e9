//! Two-rate behaviour scheduler.
//!
//! Systems are registered once into the [`World`] and kept as ordered
//! [`SystemId`] lists, one per [`Phase`]. A tick runs:
//!
//! 1. [`Phase::Variable`] once, with `WorldTime::delta`.
//! 2. Zero or more fixed steps, as many as the accumulator owes (capped by
//!    `max_fixed_steps`). Each step runs [`Phase::Fixed`] then
//!    [`Phase::PostFixed`].
//! 3. [`Phase::Late`] once, after the last fixed step.
//!
//! The first system to fail aborts the tick. Nothing already written is
//! rolled back.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use log::error;

use crate::error::{BehaviourError, TickError};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation_update;
use crate::systems::camera::camera_update;
use crate::systems::contact::{contact_resync, observe_sensor_triggers};
use crate::systems::fall::{fall_fixed_update, fall_update};
use crate::systems::jump::{jump_fixed_update, jump_update};
use crate::systems::knockback::{knockback_cache_velocity, observe_knockback_collisions};
use crate::systems::movement::{movement_fixed_update, movement_update};
use crate::systems::physics::physics_step;
use crate::systems::sound::sound_update;
use crate::systems::time::update_world_time;

/// Default cap on fixed steps per tick.
pub const DEFAULT_MAX_FIXED_STEPS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Once per tick, input sampling and presentation state.
    Variable,
    /// Once per fixed step, velocity writes.
    Fixed,
    /// After every fixed step, world collaborators such as physics.
    PostFixed,
    /// Once per tick after the fixed steps, publication of the tick's output.
    Late,
}

/// Handle of a registered behaviour system.
pub type BehaviourSystem = SystemId<(), Result<(), BehaviourError>>;

/// What a successful tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// `WorldTime::frame_count` after the tick.
    pub frame: u64,
    pub fixed_steps: u32,
}

pub struct BehaviourScheduler {
    variable: Vec<(String, BehaviourSystem)>,
    fixed: Vec<(String, BehaviourSystem)>,
    post_fixed: Vec<(String, BehaviourSystem)>,
    late: Vec<(String, BehaviourSystem)>,
    max_fixed_steps: u32,
}

impl BehaviourScheduler {
    pub fn new(max_fixed_steps: u32) -> Self {
        Self {
            variable: Vec::new(),
            fixed: Vec::new(),
            post_fixed: Vec::new(),
            late: Vec::new(),
            max_fixed_steps: max_fixed_steps.max(1),
        }
    }

    /// Scheduler with every behaviour system in run order, the stand-in
    /// physics step, and the contact observers installed in `world`.
    pub fn with_default_systems(world: &mut World, max_fixed_steps: u32) -> Self {
        add_contact_observers(world);

        let mut scheduler = Self::new(max_fixed_steps);
        scheduler.register(world, Phase::Variable, "contact_resync", contact_resync);
        scheduler.register(world, Phase::Variable, "movement_update", movement_update);
        scheduler.register(world, Phase::Variable, "jump_update", jump_update);
        scheduler.register(world, Phase::Variable, "fall_update", fall_update);
        scheduler.register(world, Phase::Variable, "animation_update", animation_update);
        scheduler.register(world, Phase::Variable, "camera_update", camera_update);

        scheduler.register(
            world,
            Phase::Fixed,
            "knockback_cache_velocity",
            knockback_cache_velocity,
        );
        scheduler.register(world, Phase::Fixed, "movement_fixed_update", movement_fixed_update);
        scheduler.register(world, Phase::Fixed, "jump_fixed_update", jump_fixed_update);
        scheduler.register(world, Phase::Fixed, "fall_fixed_update", fall_fixed_update);

        scheduler.register(world, Phase::PostFixed, "physics_step", physics_step);

        scheduler.register(world, Phase::Late, "sound_update", sound_update);
        scheduler
    }

    /// Register `system` into `world` and append it to `phase`.
    pub fn register<M>(
        &mut self,
        world: &mut World,
        phase: Phase,
        name: impl Into<String>,
        system: impl IntoSystem<(), Result<(), BehaviourError>, M> + 'static,
    ) -> BehaviourSystem {
        let id = world.register_system(system);
        self.phase_mut(phase).push((name.into(), id));
        id
    }

    /// Names of the systems of `phase`, in run order.
    pub fn system_names(&self, phase: Phase) -> Vec<&str> {
        self.phase(phase)
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn max_fixed_steps(&self) -> u32 {
        self.max_fixed_steps
    }

    /// Advance `world` by `dt` seconds of unscaled time.
    pub fn tick(&self, world: &mut World, dt: f32) -> Result<TickReport, TickError> {
        if !update_world_time(world, dt) {
            error!("tick aborted: WorldTime resource is missing");
            return Err(TickError::MissingTime);
        }

        self.run_phase(world, Phase::Variable)?;

        let steps = world
            .get_resource_mut::<WorldTime>()
            .map(|mut time| time.consume_fixed_steps(self.max_fixed_steps))
            .ok_or(TickError::MissingTime)?;
        for _ in 0..steps {
            self.run_phase(world, Phase::Fixed)?;
            self.run_phase(world, Phase::PostFixed)?;
        }
        self.run_phase(world, Phase::Late)?;

        world.clear_trackers();
        let frame = world
            .get_resource::<WorldTime>()
            .map(|time| time.frame_count)
            .ok_or(TickError::MissingTime)?;
        Ok(TickReport {
            frame,
            fixed_steps: steps,
        })
    }

    fn run_phase(&self, world: &mut World, phase: Phase) -> Result<(), TickError> {
        for (name, id) in self.phase(phase) {
            match world.run_system(*id) {
                Ok(Ok(())) => {}
                Ok(Err(source)) => {
                    error!("{phase:?} system '{name}' failed: {source}");
                    return Err(TickError::Behaviour {
                        phase,
                        system: name.clone(),
                        source,
                    });
                }
                Err(err) => {
                    error!("{phase:?} system '{name}' could not run: {err}");
                    return Err(TickError::Dispatch {
                        phase,
                        system: name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn phase(&self, phase: Phase) -> &[(String, BehaviourSystem)] {
        match phase {
            Phase::Variable => &self.variable,
            Phase::Fixed => &self.fixed,
            Phase::PostFixed => &self.post_fixed,
            Phase::Late => &self.late,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut Vec<(String, BehaviourSystem)> {
        match phase {
            Phase::Variable => &mut self.variable,
            Phase::Fixed => &mut self.fixed,
            Phase::PostFixed => &mut self.post_fixed,
            Phase::Late => &mut self.late,
        }
    }
}

/// Install the trigger and collision observers of the behaviour layer.
pub fn add_contact_observers(world: &mut World) {
    world.spawn(Observer::new(observe_sensor_triggers));
    world.spawn(Observer::new(observe_knockback_collisions));
    world.flush();
}
