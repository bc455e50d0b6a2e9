//! Engine configuration resource.
//!
//! Manages engine settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! update_rate = 75
//! gravity_x = 0
//! gravity_y = -980
//! max_fixed_steps = 5
//!
//! [camera]
//! x = 0
//! y = 0
//! width = 1280
//! height = 720
//! ppu = 1
//! transition_speed = 4
//!
//! [assets]
//! player = ./assets/player.json
//! map = ./assets/map.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::{info, warn};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_UPDATE_RATE: f32 = 75.0;
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -980.0);
const DEFAULT_MAX_FIXED_STEPS: u32 = 5;
const DEFAULT_CAMERA_POSITION: Vec2 = Vec2::ZERO;
const DEFAULT_CAMERA_WIDTH: u32 = 1280;
const DEFAULT_CAMERA_HEIGHT: u32 = 720;
const DEFAULT_CAMERA_PPU: f32 = 1.0;
const DEFAULT_TRANSITION_SPEED: f32 = 4.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_PLAYER_PATH: &str = "./assets/player.json";
const DEFAULT_MAP_PATH: &str = "./assets/map.json";

/// Engine configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Fixed-rate updates per second.
    pub update_rate: f32,
    /// World gravity in units per second squared.
    pub gravity: Vec2,
    /// Upper bound on fixed steps run in a single tick.
    pub max_fixed_steps: u32,
    /// Initial camera centre in world units.
    pub camera_position: Vec2,
    /// Camera width in pixels.
    pub camera_width: u32,
    /// Camera height in pixels.
    pub camera_height: u32,
    /// Pixels per world unit.
    pub camera_ppu: f32,
    /// Camera level transitions per second.
    pub transition_speed: f32,
    pub player_path: PathBuf,
    pub map_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            gravity: DEFAULT_GRAVITY,
            max_fixed_steps: DEFAULT_MAX_FIXED_STEPS,
            camera_position: DEFAULT_CAMERA_POSITION,
            camera_width: DEFAULT_CAMERA_WIDTH,
            camera_height: DEFAULT_CAMERA_HEIGHT,
            camera_ppu: DEFAULT_CAMERA_PPU,
            transition_speed: DEFAULT_TRANSITION_SPEED,
            player_path: PathBuf::from(DEFAULT_PLAYER_PATH),
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Fixed step duration in seconds.
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.update_rate
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Values that
    /// parse but make no sense are replaced by the defaults with a warning.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|message| ConfigError::Ini {
            path: self.config_path.display().to_string(),
            message,
        })?;

        // [physics] section
        if let Some(rate) = config.getfloat("physics", "update_rate").ok().flatten() {
            self.update_rate = rate as f32;
        }
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity.x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity.y = y as f32;
        }
        if let Some(steps) = config.getuint("physics", "max_fixed_steps").ok().flatten() {
            self.max_fixed_steps = steps as u32;
        }

        // [camera] section
        if let Some(x) = config.getfloat("camera", "x").ok().flatten() {
            self.camera_position.x = x as f32;
        }
        if let Some(y) = config.getfloat("camera", "y").ok().flatten() {
            self.camera_position.y = y as f32;
        }
        if let Some(width) = config.getuint("camera", "width").ok().flatten() {
            self.camera_width = width as u32;
        }
        if let Some(height) = config.getuint("camera", "height").ok().flatten() {
            self.camera_height = height as u32;
        }
        if let Some(ppu) = config.getfloat("camera", "ppu").ok().flatten() {
            self.camera_ppu = ppu as f32;
        }
        if let Some(speed) = config.getfloat("camera", "transition_speed").ok().flatten() {
            self.transition_speed = speed as f32;
        }

        // [assets] section
        if let Some(player) = config.get("assets", "player") {
            self.player_path = PathBuf::from(player);
        }
        if let Some(map) = config.get("assets", "map") {
            self.map_path = PathBuf::from(map);
        }

        self.sanitize();

        info!(
            "Loaded config: update_rate={}, gravity=({}, {}), camera {}x{} @ {} ppu",
            self.update_rate,
            self.gravity.x,
            self.gravity.y,
            self.camera_width,
            self.camera_height,
            self.camera_ppu
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [physics] section
        config.set("physics", "update_rate", Some(self.update_rate.to_string()));
        config.set("physics", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity.y.to_string()));
        config.set(
            "physics",
            "max_fixed_steps",
            Some(self.max_fixed_steps.to_string()),
        );

        // [camera] section
        config.set("camera", "x", Some(self.camera_position.x.to_string()));
        config.set("camera", "y", Some(self.camera_position.y.to_string()));
        config.set("camera", "width", Some(self.camera_width.to_string()));
        config.set("camera", "height", Some(self.camera_height.to_string()));
        config.set("camera", "ppu", Some(self.camera_ppu.to_string()));
        config.set(
            "camera",
            "transition_speed",
            Some(self.transition_speed.to_string()),
        );

        // [assets] section
        config.set(
            "assets",
            "player",
            Some(self.player_path.display().to_string()),
        );
        config.set("assets", "map", Some(self.map_path.display().to_string()));

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Io {
                path: self.config_path.display().to_string(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    fn sanitize(&mut self) {
        if !(self.update_rate > 0.0) {
            warn!("update_rate must be positive, using {DEFAULT_UPDATE_RATE}");
            self.update_rate = DEFAULT_UPDATE_RATE;
        }
        if self.max_fixed_steps == 0 {
            warn!("max_fixed_steps must be at least 1, using {DEFAULT_MAX_FIXED_STEPS}");
            self.max_fixed_steps = DEFAULT_MAX_FIXED_STEPS;
        }
        if !(self.camera_ppu > 0.0) {
            warn!("camera ppu must be positive, using {DEFAULT_CAMERA_PPU}");
            self.camera_ppu = DEFAULT_CAMERA_PPU;
        }
    }
}
