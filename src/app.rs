//! Game assembly.
//!
//! [`App`] owns the [`World`] and the [`BehaviourScheduler`]. It builds the
//! level from configuration and advances it one host tick at a time.

use bevy_ecs::prelude::*;
use log::info;

use crate::error::{ConfigError, TickError};
use crate::prefab::{spawn_map, spawn_player};
use crate::resources::actions::{Action, ActionState};
use crate::resources::camera::{Camera, CameraController};
use crate::resources::gameconfig::GameConfig;
use crate::resources::physics::{ContactFaults, ContactPairs, PhysicsSettings};
use crate::resources::playerconfig::PlayerConfig;
use crate::resources::tilemap::Tilemap;
use crate::resources::worldtime::WorldTime;
use crate::scheduler::BehaviourScheduler;
use crate::snapshot::{GameSnapshot, capture};

pub struct App {
    world: World,
    scheduler: BehaviourScheduler,
    player: Entity,
}

impl App {
    /// Build the world: resources, observers, systems, map and player.
    pub fn new(config: &GameConfig, player: &PlayerConfig, map: &Tilemap) -> Self {
        let mut world = World::new();

        world.insert_resource(WorldTime::with_fixed_delta(config.fixed_delta()));
        world.insert_resource(ActionState::default());
        world.insert_resource(PhysicsSettings {
            gravity: config.gravity,
            ..PhysicsSettings::default()
        });
        world.insert_resource(ContactPairs::default());
        world.insert_resource(ContactFaults::default());

        let camera = Camera::new(
            config.camera_position,
            config.camera_width as f32,
            config.camera_height as f32,
            config.camera_ppu,
        );
        world.insert_resource(CameraController::new(&camera, config.transition_speed));
        world.insert_resource(camera);
        world.insert_resource(config.clone());

        let scheduler = BehaviourScheduler::with_default_systems(&mut world, config.max_fixed_steps);
        spawn_map(&mut world, map);
        let player = spawn_player(&mut world, player);

        info!(
            "World ready: fixed step {:.4}s, up to {} steps per tick",
            config.fixed_delta(),
            scheduler.max_fixed_steps()
        );
        Self {
            world,
            scheduler,
            player,
        }
    }

    /// Load the player and map files named by `config` and build the world.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        let player = PlayerConfig::load_from_file(&config.player_path)?;
        let map = Tilemap::load_from_file(&config.map_path)?;
        Ok(Self::new(config, &player, &map))
    }

    /// Run one tick with exactly `actions` held and return what to present.
    pub fn step(&mut self, actions: &[Action], dt: f32) -> Result<GameSnapshot, TickError> {
        self.world
            .get_resource_or_init::<ActionState>()
            .apply(actions.iter().copied());
        let report = self.scheduler.tick(&mut self.world, dt)?;
        Ok(capture(&mut self.world, report.frame))
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn scheduler(&self) -> &BehaviourScheduler {
        &self.scheduler
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
